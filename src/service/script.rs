//! Child process plumbing for the startup pipeline.
//!
//! Children run with inherited stdio so their output lands in the container
//! log stream, and with an explicit environment set layered on top of the
//! parent's.

use std::io;
use std::process::ExitStatus;
use tokio::process::{Child, Command};

fn build(argv: &[String], envs: &[(String, String)]) -> io::Result<Command> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command line"))?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    Ok(cmd)
}

/// Run `argv` in the foreground and wait for it to exit.
pub async fn run_to_completion(
    argv: &[String],
    envs: &[(String, String)],
) -> io::Result<ExitStatus> {
    build(argv, envs)?.status().await
}

/// Spawn `argv` as a supervised background child (the database server in the
/// single-container variant). The caller keeps the handle; the child is not
/// killed on drop so it outlives the pipeline and dies with the container.
pub fn spawn_supervised(argv: &[String], envs: &[(String, String)]) -> io::Result<Child> {
    build(argv, envs)?.spawn()
}

/// Exit code of a finished child; a signal death reports as `fallback`.
pub fn exit_code(status: ExitStatus, fallback: i32) -> i32 {
    status.code().unwrap_or(fallback)
}
