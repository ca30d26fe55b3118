//! File entity for SeaORM.
//!
//! A file is the top-level unit of work: a JSON document plus a status,
//! owning zero or more batches.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

use crate::models::Status;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    /// Free-form document, always a JSON object
    #[sea_orm(column_type = "JsonBinary")]
    pub content: JsonValue,
    pub status: Status,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::batch::Entity")]
    Batches,
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
