//! The setup pipeline.
//!
//! Privilege gate, OS detection, the Slurm status state machine, then
//! the user toolchain, finishing with a non-fatal scheduler probe.

use hpcsmith_cli::Component;
use hpcsmith_core::command::{command, run as run_command};
use hpcsmith_core::{ToolchainConfig, require_root, systemd};
use hpcsmith_modules::{GccInstaller, OpenMpiInstaller, PythonInstaller};
use hpcsmith_slurm::status::{MUNGE_UNIT, QUERY_COMMAND};
use hpcsmith_slurm::{LiveHost, SlurmInstaller, SlurmPaths, SlurmStatus, StatusProber};
use hpcsmith_system::SystemInfo;
use miette::{IntoDiagnostic, Result, miette};
use std::time::Duration;

/// Munge gets this many chances to come up before setup aborts.
const MUNGE_RESTART_ATTEMPTS: u32 = 3;

/// Grace period before probing a freshly started scheduler.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Run the full setup flow.
pub async fn run(config: &ToolchainConfig, with_gcc: bool) -> Result<()> {
    println!("===== HPC toolchain setup =====");

    require_root("Setup").into_diagnostic()?;
    let system = detect_system()?;
    let paths = SlurmPaths::default();

    install_slurm_if_needed(config, &system, &paths).await?;
    verify_munge().await?;

    println!("Setting up Python...");
    PythonInstaller::new(config, system.package_manager)
        .install()
        .await
        .into_diagnostic()?;

    println!("Setting up OpenMPI...");
    OpenMpiInstaller::new(config, system.package_manager)
        .install()
        .await
        .into_diagnostic()?;

    if with_gcc {
        println!("Setting up GCC...");
        GccInstaller::new(config, system.package_manager)
            .install()
            .await
            .into_diagnostic()?;
    }

    verify_slurm().await;

    println!("===== Setup complete =====");
    Ok(())
}

/// Install or remove-and-reinstall a single component.
pub async fn install_component(config: &ToolchainConfig, component: Component) -> Result<()> {
    require_root("Component installation").into_diagnostic()?;
    let system = detect_system()?;

    match component {
        Component::Slurm => {
            let paths = SlurmPaths::default();
            install_slurm_if_needed(config, &system, &paths).await?;
            verify_munge().await?;
            verify_slurm().await;
        }
        Component::Python => {
            PythonInstaller::new(config, system.package_manager)
                .install()
                .await
                .into_diagnostic()?;
        }
        Component::Openmpi => {
            OpenMpiInstaller::new(config, system.package_manager)
                .install()
                .await
                .into_diagnostic()?;
        }
        Component::Gcc => {
            GccInstaller::new(config, system.package_manager)
                .install()
                .await
                .into_diagnostic()?;
        }
    }
    Ok(())
}

fn detect_system() -> Result<SystemInfo> {
    let system = hpcsmith_system::detect().into_diagnostic()?;
    println!(
        "Detected {} {} ({})",
        system.os.name.as_deref().unwrap_or("unknown"),
        system.os.version_id.as_deref().unwrap_or(""),
        system.package_manager.as_str()
    );
    Ok(system)
}

/// Run the status state machine and act on the verdict.
async fn install_slurm_if_needed(
    config: &ToolchainConfig,
    system: &SystemInfo,
    paths: &SlurmPaths,
) -> Result<()> {
    println!("Checking Slurm status...");
    let host = LiveHost;
    let status = StatusProber::new(&host, paths).check().await;

    match status {
        SlurmStatus::Installed => {
            println!("Slurm fully configured. Skipping installation.");
        }
        SlurmStatus::NotInstalled | SlurmStatus::BrokenCleaned => {
            println!("Installing Slurm {}...", config.slurm.version);
            SlurmInstaller::new(&config.slurm, paths, system.package_manager)
                .install()
                .await
                .into_diagnostic()?;
        }
    }
    Ok(())
}

/// Munge must be up before anything speaks to Slurm; restart it a
/// bounded number of times and give up loudly.
async fn verify_munge() -> Result<()> {
    println!("Verifying Munge...");

    for attempt in 1..=MUNGE_RESTART_ATTEMPTS {
        if systemd::unit_active(MUNGE_UNIT).await {
            println!("Munge running.");
            return Ok(());
        }
        tracing::warn!(attempt, "munge inactive; restarting");
        if let Err(e) = systemd::restart_unit("munge").await {
            tracing::warn!(attempt, error = %e, "munge restart failed");
        }
    }

    if systemd::unit_active(MUNGE_UNIT).await {
        println!("Munge running.");
        Ok(())
    } else {
        Err(miette!("Munge failed to start; stopping setup"))
    }
}

/// Final health probe. Reported but never fatal: a scheduler that is
/// installed yet still settling should not fail the whole run.
async fn verify_slurm() {
    println!("Verifying Slurm...");
    tokio::time::sleep(SETTLE_DELAY).await;

    match run_command(&mut command(QUERY_COMMAND, &[]), QUERY_COMMAND).await {
        Ok(output) => {
            println!("Slurm responding correctly.");
            print!("{output}");
        }
        Err(e) => {
            println!("Slurm installed but not responding: {e}");
        }
    }
}
