//! The cleanup pipeline.
//!
//! User-scope modules first (no privilege needed), then the
//! root-gated Slurm/Munge teardown.

use hpcsmith_cli::Component;
use hpcsmith_core::ToolchainConfig;
use hpcsmith_modules::{GCC, Module, ModuleRemover, OPENMPI, PYTHON};
use hpcsmith_slurm::{SlurmPaths, SlurmRemover};
use miette::{IntoDiagnostic, Result};

/// Run the full cleanup flow.
pub async fn run(config: &ToolchainConfig) -> Result<()> {
    println!("===== HPC toolchain cleanup =====");

    remove_user_modules(config)?;

    println!("Removing Slurm and Munge (system scope)...");
    let paths = SlurmPaths::default();
    SlurmRemover::new(&paths).remove().await.into_diagnostic()?;

    println!("===== Cleanup complete =====");
    println!("You may want to reboot and `source` your shell profile.");
    Ok(())
}

/// Remove a single component.
pub async fn remove_component(config: &ToolchainConfig, component: Component) -> Result<()> {
    match component {
        Component::Slurm => {
            let paths = SlurmPaths::default();
            SlurmRemover::new(&paths).remove().await.into_diagnostic()?;
        }
        Component::Python => remove_module(config, &PYTHON)?,
        Component::Openmpi => remove_module(config, &OPENMPI)?,
        Component::Gcc => remove_module(config, &GCC)?,
    }
    Ok(())
}

fn remove_user_modules(config: &ToolchainConfig) -> Result<()> {
    println!("Removing user-scope toolchain modules...");
    for module in [&PYTHON, &OPENMPI, &GCC] {
        remove_module(config, module)?;
    }
    Ok(())
}

fn remove_module(config: &ToolchainConfig, module: &Module) -> Result<()> {
    println!("Removing {}...", module.name);
    ModuleRemover::new(config).remove(module).into_diagnostic()
}
