//! The startup pipeline: an ordered sequence of named steps driven by a
//! runner that halts on the first fatal failure. Best-effort steps log and
//! continue; the pass-through command only runs after a fully successful
//! sequence.

use crate::error::GateError;
use crate::service::script;
use std::future::Future;
use std::time::Duration;
use tokio::process::Child;
use tracing::{debug, error, info};

/// Fixed locale every child process inherits, regardless of the caller's
/// environment.
pub const CHILD_LOCALE: &str = "ja_JP.UTF-8";

/// Database-facing side of the pipeline. The MySQL implementation lives in
/// `db::mysql`; tests substitute their own.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Readiness gate: resolve once the database answers a liveness probe,
    /// or fail after the attempt budget is exhausted.
    fn await_ready(
        &self,
        interval: Duration,
        max_attempts: usize,
    ) -> impl Future<Output = Result<(), GateError>>;

    /// Apply the idempotent seed DDL.
    fn provision(&self) -> impl Future<Output = Result<(), GateError>>;

    /// Set the session character encoding. The only best-effort operation in
    /// the sequence.
    fn configure_session(&self) -> impl Future<Output = Result<(), GateError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    NormalizeEnv,
    StartServer,
    AwaitDatabase,
    ProvisionSchema,
    ConfigureSession,
    RunScript,
    Handoff,
}

impl Step {
    pub const SEQUENCE: [Step; 7] = [
        Step::NormalizeEnv,
        Step::StartServer,
        Step::AwaitDatabase,
        Step::ProvisionSchema,
        Step::ConfigureSession,
        Step::RunScript,
        Step::Handoff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::NormalizeEnv => "normalize-env",
            Step::StartServer => "start-server",
            Step::AwaitDatabase => "await-database",
            Step::ProvisionSchema => "provision-schema",
            Step::ConfigureSession => "configure-session",
            Step::RunScript => "run-script",
            Step::Handoff => "handoff",
        }
    }

    /// Whether a failure of this step aborts the whole sequence.
    pub fn fatal(self) -> bool {
        !matches!(self, Step::ConfigureSession)
    }
}

pub struct Orchestrator<B> {
    backend: B,
    script: Vec<String>,
    handoff: Vec<String>,
    interval: Duration,
    max_attempts: usize,
    server_cmd: Option<Vec<String>>,
    child_env: Vec<(String, String)>,
    server: Option<Child>,
    handoff_code: i32,
}

impl<B: Backend> Orchestrator<B> {
    pub fn new(backend: B, script: Vec<String>) -> Self {
        Self {
            backend,
            script,
            handoff: Vec::new(),
            interval: Duration::from_secs(1),
            max_attempts: 60,
            server_cmd: None,
            child_env: Vec::new(),
            server: None,
            handoff_code: 0,
        }
    }

    /// Trailing argv to execute after a fully successful sequence.
    pub fn with_handoff(mut self, handoff: Vec<String>) -> Self {
        self.handoff = handoff;
        self
    }

    pub fn with_probe_budget(mut self, interval: Duration, max_attempts: usize) -> Self {
        self.interval = interval;
        self.max_attempts = max_attempts;
        self
    }

    /// Database server argv for the single-container variant.
    pub fn with_server_command(mut self, cmd: Option<Vec<String>>) -> Self {
        self.server_cmd = cmd;
        self
    }

    /// Extra environment handed to every child (connection URL and the like).
    pub fn with_child_env(mut self, env: Vec<(String, String)>) -> Self {
        self.child_env = env;
        self
    }

    /// Drive the sequence to completion. Returns the process exit code to
    /// report (the pass-through command's when one ran, zero otherwise).
    pub async fn run(mut self) -> Result<i32, GateError> {
        for step in Step::SEQUENCE {
            if let Err(err) = self.execute(step).await {
                if step.fatal() {
                    error!(step = step.name(), error = %err, "startup sequence aborted");
                    return Err(err);
                }
                debug!(step = step.name(), error = %err, "best-effort step failed; continuing");
            }
        }
        if let Some(server) = &self.server {
            debug!(pid = server.id(), "leaving the database server running");
        }
        Ok(self.handoff_code)
    }

    async fn execute(&mut self, step: Step) -> Result<(), GateError> {
        match step {
            Step::NormalizeEnv => {
                for key in ["LANG", "LANGUAGE", "LC_ALL"] {
                    self.child_env.push((key.to_string(), CHILD_LOCALE.to_string()));
                }
                Ok(())
            }
            Step::StartServer => {
                let Some(cmd) = self.server_cmd.clone() else {
                    debug!("no server command configured; relying on external orchestration");
                    return Ok(());
                };
                let child = script::spawn_supervised(&cmd, &self.child_env)?;
                info!(pid = child.id(), "database server started");
                self.server = Some(child);
                Ok(())
            }
            Step::AwaitDatabase => {
                self.backend
                    .await_ready(self.interval, self.max_attempts)
                    .await?;
                info!("database is ready");
                Ok(())
            }
            Step::ProvisionSchema => self.backend.provision().await,
            Step::ConfigureSession => self.backend.configure_session().await,
            Step::RunScript => {
                if self.script.is_empty() {
                    return Err(GateError::EmptyCommand { step: step.name() });
                }
                let status = script::run_to_completion(&self.script, &self.child_env).await?;
                if status.success() {
                    info!("collection script completed");
                    Ok(())
                } else {
                    Err(GateError::ScriptFailed {
                        code: script::exit_code(status, -1),
                    })
                }
            }
            Step::Handoff => {
                if self.handoff.is_empty() {
                    return Ok(());
                }
                info!(command = ?self.handoff, "handing off to pass-through command");
                let status = script::run_to_completion(&self.handoff, &self.child_env).await?;
                self.handoff_code = script::exit_code(status, 1);
                Ok(())
            }
        }
    }
}
