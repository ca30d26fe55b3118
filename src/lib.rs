//! File store library.
//!
//! Persistence for files and their processing batches in PostgreSQL, plus a
//! Redis cache client used alongside it.

pub mod cache;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
