//! CLI argument parsing for hpcsmith.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "hpcsmith")]
#[command(about = "Provision a single-node Slurm + MPI toolchain")]
pub struct Args {
    /// JSON config overriding the default toolchain layout
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision Slurm, Munge, Python and OpenMPI on this host (root)
    Setup {
        /// Also build GCC into the user toolchain
        #[arg(long)]
        with_gcc: bool,
    },
    /// Remove the user toolchain, then Slurm and Munge system-wide (root)
    Cleanup,
    /// Install a single component
    Install {
        #[arg(value_enum)]
        component: Component,
    },
    /// Remove a single component
    Remove {
        #[arg(value_enum)]
        component: Component,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    Slurm,
    Python,
    Openmpi,
    Gcc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_flags() {
        let args = Args::try_parse_from(["hpcsmith", "setup", "--with-gcc"]).unwrap();
        match args.command {
            Command::Setup { with_gcc } => assert!(with_gcc),
            other => panic!("expected setup, got {other:?}"),
        }
    }

    #[test]
    fn test_component_values() {
        let args = Args::try_parse_from(["hpcsmith", "install", "openmpi"]).unwrap();
        match args.command {
            Command::Install { component } => assert_eq!(component, Component::Openmpi),
            other => panic!("expected install, got {other:?}"),
        }

        assert!(Args::try_parse_from(["hpcsmith", "install", "fortran"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let args =
            Args::try_parse_from(["hpcsmith", "cleanup", "--config", "/etc/hpcsmith.json"])
                .unwrap();
        assert_eq!(args.config.as_deref().map(|p| p.as_str()), Some("/etc/hpcsmith.json"));
    }
}
