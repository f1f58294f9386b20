// src/system/executor.rs

use crate::{
    models::ProcessHandle,
    system::terminator::{ProcessTerminator, TerminateError, TerminationReport},
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
    #[error("Command '{command}' was interrupted.")]
    Interrupted { command: String },
    #[error("Command '{command}' was still running {grace_ms} ms after being signalled.")]
    TimedOut { command: String, grace_ms: u128 },
}

/// Runs a build command to completion, or until `cancelled` resolves.
///
/// On cancellation the whole process tree is signalled through `terminator`
/// (on a blocking thread, since tree discovery queries the OS), then the root
/// gets `grace` to exit. Past that the tree is killed outright, the root is
/// reaped and `TimedOut` returned.
pub async fn run_cancellable<F>(
    argv: &[String],
    cwd: &Path,
    terminator: Arc<dyn ProcessTerminator>,
    grace: Duration,
    cancelled: F,
) -> Result<(), ExecutionError>
where
    F: Future<Output = ()>,
{
    let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;
    let command_line = argv.join(" ");

    let mut child = Command::new(program)
        .args(args)
        .current_dir(dunce::simplified(cwd))
        .spawn()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;
    log::debug!("Spawned '{}' (PID: {:?})", command_line, child.id());

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;
            if !status.success() {
                return Err(ExecutionError::NonZeroExitStatus(command_line));
            }
            Ok(())
        }
        () = cancelled => {
            let Some(handle) = ProcessHandle::from_tokio_child(&child) else {
                // Already reaped; nothing left to stop.
                return Err(ExecutionError::Interrupted { command: command_line });
            };
            log::debug!("Cancellation requested, terminating process tree (PID: {})...", handle.pid());

            let first_pass = Arc::clone(&terminator);
            log_outcome(tokio::task::spawn_blocking(move || first_pass.terminate(&handle)).await);

            if tokio::time::timeout(grace, child.wait()).await.is_ok() {
                return Err(ExecutionError::Interrupted { command: command_line });
            }

            log::warn!(
                "'{}' still running after {} ms, killing its process tree",
                command_line,
                grace.as_millis()
            );
            log_outcome(tokio::task::spawn_blocking(move || terminator.kill(&handle)).await);
            if let Err(e) = child.start_kill() {
                log::debug!("Root already gone after tree kill: {}", e);
            }
            if let Err(e) = child.wait().await {
                log::warn!("Failed to reap '{}': {}", command_line, e);
            }

            Err(ExecutionError::TimedOut {
                command: command_line,
                grace_ms: grace.as_millis(),
            })
        }
    }
}

fn log_outcome(outcome: Result<Result<TerminationReport, TerminateError>, tokio::task::JoinError>) {
    match outcome {
        Ok(Ok(report)) => log::debug!(
            "Signalled {:?}; already gone {:?}",
            report.signalled,
            report.already_exited
        ),
        Ok(Err(e)) => {
            for failure in &e.report.failures {
                log::warn!("{}", failure);
            }
        }
        Err(e) => log::warn!("Termination task failed: {}", e),
    }
}
