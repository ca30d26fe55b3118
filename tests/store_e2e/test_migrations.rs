//! E2E tests: migrations and table lifecycle, each in a throwaway schema.

use filestore_lib::db::DbPool;
use filestore_lib::db::schema::quote_ident;
use filestore_lib::models::Status;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use super::test_helpers::*;

/// Pool whose search path is a fresh schema, so dropping tables does not
/// disturb tests sharing the default schema.
async fn create_isolated_pool() -> (DbPool, String) {
    let schema = format!("filestore_{}", Uuid::new_v4().simple());
    let mut config = test_config();
    config.database.schema = Some(schema.clone());

    let pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");
    (pool, schema)
}

async fn drop_schema(pool: DbPool, schema: &str) {
    pool.connection()
        .execute_unprepared(&format!("DROP SCHEMA IF EXISTS {} CASCADE", quote_ident(schema)))
        .await
        .expect("Failed to drop test schema");
    pool.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_migrate_after_drop_recreates_tables() {
    let (pool, schema) = create_isolated_pool().await;

    pool.run_migrations().await.unwrap();
    pool.drop_all_tables().await.unwrap();
    pool.run_migrations().await.unwrap();

    let created = pool.create_file(sample_file()).await.unwrap();
    assert_eq!(created.status, Status::InProgress);

    drop_schema(pool, &schema).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_migrations_are_idempotent() {
    let (pool, schema) = create_isolated_pool().await;

    pool.run_migrations().await.unwrap();
    pool.run_migrations().await.unwrap();
    pool.create_all_tables().await.unwrap();

    let created = pool.create_file(sample_file()).await.unwrap();
    assert!(pool.get_file(&created.id).await.unwrap().is_some());

    drop_schema(pool, &schema).await;
}
