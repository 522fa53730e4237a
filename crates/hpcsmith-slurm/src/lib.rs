//! Slurm integration for hpcsmith.
//!
//! Detect the health of an existing deployment, repair broken runtime
//! state, install from source, and tear everything back down.

pub mod conf;
pub mod install;
pub mod paths;
pub mod remove;
pub mod status;

pub use conf::ConfContext;
pub use install::{InstallError, SlurmInstaller};
pub use paths::SlurmPaths;
pub use remove::SlurmRemover;
pub use status::{HostProbe, LiveHost, SlurmStatus, StatusProber};
