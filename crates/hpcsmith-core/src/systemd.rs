//! Thin wrappers over `systemctl`.
//!
//! Query helpers return plain booleans so decision code stays free of
//! error plumbing; a unit the service manager cannot report on is treated
//! as inactive/unregistered. Mutating helpers come in fatal and
//! best-effort flavors.

use crate::command::{CommandError, command, run, run_unchecked, status_ok};

/// True if the service manager reports the unit as currently running.
pub async fn unit_active(unit: &str) -> bool {
    status_ok(&mut command("systemctl", &["is-active", "--quiet", unit]), "systemctl is-active")
        .await
}

/// True if the unit appears in the service manager's unit-file listing.
///
/// Covers units that are installed but not running.
pub async fn unit_registered(unit: &str) -> bool {
    match run(&mut command("systemctl", &["list-unit-files"]), "systemctl list-unit-files").await {
        Ok(listing) => listing.contains(unit),
        Err(e) => {
            tracing::debug!(unit, error = %e, "unit-file listing unavailable");
            false
        }
    }
}

/// Stop a unit, ignoring failures (already stopped, never installed).
pub async fn stop_unit(unit: &str) {
    let _ = run_unchecked(&mut command("systemctl", &["stop", unit]), "systemctl stop").await;
}

/// Disable a unit, ignoring failures.
pub async fn disable_unit(unit: &str) {
    let _ =
        run_unchecked(&mut command("systemctl", &["disable", unit]), "systemctl disable").await;
}

/// Start a unit; failure is an error.
pub async fn start_unit(unit: &str) -> Result<(), CommandError> {
    run(&mut command("systemctl", &["start", unit]), "systemctl start").await?;
    Ok(())
}

/// Restart a unit; failure is an error.
pub async fn restart_unit(unit: &str) -> Result<(), CommandError> {
    run(&mut command("systemctl", &["restart", unit]), "systemctl restart").await?;
    Ok(())
}

/// Enable a unit; failure is an error.
pub async fn enable_unit(unit: &str) -> Result<(), CommandError> {
    run(&mut command("systemctl", &["enable", unit]), "systemctl enable").await?;
    Ok(())
}

/// Reload unit definitions; failure is an error.
pub async fn daemon_reload() -> Result<(), CommandError> {
    run(&mut command("systemctl", &["daemon-reload"]), "systemctl daemon-reload").await?;
    Ok(())
}

/// Reload unit definitions, ignoring failures.
pub async fn daemon_reload_unchecked() {
    let _ = run_unchecked(&mut command("systemctl", &["daemon-reload"]), "systemctl daemon-reload")
        .await;
}

/// Re-execute the service manager, ignoring failures.
pub async fn daemon_reexec_unchecked() {
    let _ = run_unchecked(&mut command("systemctl", &["daemon-reexec"]), "systemctl daemon-reexec")
        .await;
}
