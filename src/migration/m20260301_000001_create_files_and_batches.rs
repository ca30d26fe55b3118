//! Migration: Create the status enum plus file and batch tables.
//!
//! Batches reference their owning file and are removed with it.

use sea_orm_migration::prelude::*;

use crate::db::schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(schema::CREATE_ALL)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(schema::DROP_ALL)
            .await?;

        Ok(())
    }
}
