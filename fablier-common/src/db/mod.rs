//! Database layer: initialization, schema, seeding, and row models

pub mod init;
pub mod models;
pub mod seed;

pub use init::{create_schema, init_database};
