//! Subprocess execution for provisioning steps.
//!
//! Every external effect in hpcsmith goes through one of two wrappers so
//! the caller states whether a non-zero exit is fatal (`run`) or expected
//! and tolerable (`run_unchecked`).

use std::path::Path;
use thiserror::Error;
use tokio::process::Command;

/// Error type for external command execution.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to launch {command}: {error}")]
    Launch { command: String, error: String },
    #[error("{command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// Build a [`Command`] from a program and its arguments.
pub fn command(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd
}

/// Execute a command and return stdout as a string.
///
/// Non-zero exit is an error carrying the command's stderr.
pub async fn run(cmd: &mut Command, name: &str) -> Result<String, CommandError> {
    tracing::debug!(command = name, "running");

    let output = cmd.output().await.map_err(|e| CommandError::Launch {
        command: name.to_string(),
        error: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CommandError::Failed {
            command: name.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Execute a command and return stdout, treating non-zero exit as OK.
///
/// Used for best-effort steps (service stops, purges, deletions) where
/// already-absent is not a failure. Launch errors still surface.
pub async fn run_unchecked(cmd: &mut Command, name: &str) -> Result<String, CommandError> {
    tracing::debug!(command = name, "running (unchecked)");

    let output = cmd.output().await.map_err(|e| CommandError::Launch {
        command: name.to_string(),
        error: e.to_string(),
    })?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Execute a command for its exit status alone.
pub async fn status_ok(cmd: &mut Command, name: &str) -> bool {
    cmd.output()
        .await
        .map(|output| output.status.success())
        .unwrap_or_else(|e| {
            tracing::debug!(command = name, error = %e, "status probe failed to launch");
            false
        })
}

/// Check whether an executable of the given name resolves on `$PATH`.
pub fn command_exists(name: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };

    std::env::split_paths(&path).any(|dir| {
        let candidate = dir.join(name);
        candidate.is_file() && is_executable(&candidate)
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
