//! SeaORM entity definitions for PostgreSQL database.

pub mod batch;
pub mod file;
