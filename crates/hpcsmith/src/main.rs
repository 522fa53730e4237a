//! hpcsmith - single-node HPC toolchain provisioner.

mod cleanup;
mod setup;

use clap::Parser;
use hpcsmith_cli::{Args, Command};
use hpcsmith_core::ToolchainConfig;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = ToolchainConfig::load_or_default(args.config.as_deref()).into_diagnostic()?;

    match args.command {
        Command::Setup { with_gcc } => setup::run(&config, with_gcc).await,
        Command::Cleanup => cleanup::run(&config).await,
        Command::Install { component } => setup::install_component(&config, component).await,
        Command::Remove { component } => cleanup::remove_component(&config, component).await,
    }
}
