use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum GateError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("database not ready after {attempts} probe attempts")]
    NotReady { attempts: usize },

    #[error("collection script exited with code {code}")]
    ScriptFailed { code: i32 },

    #[error("empty command line for step {step}")]
    EmptyCommand { step: &'static str },
}
