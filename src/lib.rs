pub mod config;
pub mod db;
pub mod error;
pub mod service;

pub use error::GateError;
pub use service::orchestrator::{Backend, Orchestrator, Step};
