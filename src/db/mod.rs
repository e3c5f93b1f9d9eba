//! Database module: models, seed DDL and MySQL storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring `stores` rows
//! - `schema.rs`: seed DDL (database, table, access user)
//! - `mysql.rs`: storage layer and the pipeline's MySQL backend

pub mod models;
pub mod mysql;
pub mod schema;

pub use models::{NewStore, StoreRow};
pub use mysql::{MySqlGate, StoreStorage};
