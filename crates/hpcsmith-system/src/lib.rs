//! OS and host detection for hpcsmith.
//!
//! Answers two questions the orchestrators gate on: which package manager
//! drives this host, and how big is the node we are configuring.

pub mod host;
pub mod os;
pub mod pkg;

pub use host::{HostError, cpu_count, hostname};
pub use os::{DetectError, OsRelease, PackageManager, SystemInfo, detect};
pub use pkg::{install_packages, purge_packages};
