pub mod orchestrator;
pub mod readiness;
pub mod script;
