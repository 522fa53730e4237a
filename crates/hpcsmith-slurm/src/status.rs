//! Slurm environment status detection.
//!
//! Classifies the host before setup decides between a fresh install, a
//! repair-then-install, and a no-op. Detecting a partial install has a
//! side effect: stale runtime state is wiped before the verdict is
//! returned, so a `BrokenCleaned` result always means remediation has
//! already run.

use crate::paths::SlurmPaths;
use hpcsmith_core::{command_exists, fsutil, systemd};

pub const SLURMCTLD_UNIT: &str = "slurmctld.service";
pub const SLURMD_UNIT: &str = "slurmd.service";
pub const MUNGE_UNIT: &str = "munge.service";

/// Client utility whose presence marks Slurm as installed.
pub const QUERY_COMMAND: &str = "sinfo";

/// Classification of the host's Slurm deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlurmStatus {
    /// No Slurm command on the search path.
    NotInstalled,
    /// Partial install detected; runtime leftovers were just wiped.
    BrokenCleaned,
    /// slurmctld is active.
    Installed,
}

/// Host probes the status check depends on.
///
/// The production implementation shells out to systemd; tests substitute
/// a scripted fake.
#[allow(async_fn_in_trait)]
pub trait HostProbe {
    /// True if an executable of that name resolves on the search path.
    fn command_exists(&self, name: &str) -> bool;
    /// True if the service manager reports the unit as running.
    async fn unit_active(&self, unit: &str) -> bool;
    /// True if the unit appears in the unit-file listing.
    async fn unit_registered(&self, unit: &str) -> bool;
    /// Stop a unit, ignoring failures.
    async fn stop_unit(&self, unit: &str);
}

/// Probe implementation backed by `$PATH` and systemctl.
pub struct LiveHost;

impl HostProbe for LiveHost {
    fn command_exists(&self, name: &str) -> bool {
        command_exists(name)
    }

    async fn unit_active(&self, unit: &str) -> bool {
        systemd::unit_active(unit).await
    }

    async fn unit_registered(&self, unit: &str) -> bool {
        systemd::unit_registered(unit).await
    }

    async fn stop_unit(&self, unit: &str) {
        systemd::stop_unit(unit).await;
    }
}

/// Decision procedure over the host probes.
pub struct StatusProber<'a, H: HostProbe> {
    host: &'a H,
    paths: &'a SlurmPaths,
}

impl<'a, H: HostProbe> StatusProber<'a, H> {
    pub fn new(host: &'a H, paths: &'a SlurmPaths) -> Self {
        Self { host, paths }
    }

    /// Classify the deployment, repairing broken runtime state on the way.
    ///
    /// First match wins:
    /// 1. no query command → `NotInstalled`, nothing touched;
    /// 2. slurmctld unit missing → repair → `BrokenCleaned`;
    /// 3. munge inactive → repair → `BrokenCleaned`;
    /// 4. slurmctld active → `Installed`;
    /// 5. installed but inactive → repair → `BrokenCleaned`.
    pub async fn check(&self) -> SlurmStatus {
        if !self.host.command_exists(QUERY_COMMAND) {
            tracing::info!("no {QUERY_COMMAND} on PATH; Slurm not installed");
            return SlurmStatus::NotInstalled;
        }

        if !self.host.unit_registered(SLURMCTLD_UNIT).await {
            self.clean_broken_state("service unit missing").await;
            return SlurmStatus::BrokenCleaned;
        }

        if !self.host.unit_active(MUNGE_UNIT).await {
            self.clean_broken_state("munge not running").await;
            return SlurmStatus::BrokenCleaned;
        }

        if self.host.unit_active(SLURMCTLD_UNIT).await {
            tracing::info!("slurmctld active; Slurm is healthy");
            return SlurmStatus::Installed;
        }

        self.clean_broken_state("slurmctld installed but inactive").await;
        SlurmStatus::BrokenCleaned
    }

    /// Stop the daemons and wipe stale runtime directories.
    ///
    /// Touches pid/spool state only, never packages or configuration, and
    /// tolerates every failure so a re-run converges to the same state.
    async fn clean_broken_state(&self, reason: &str) {
        tracing::warn!(reason, "broken Slurm environment; clearing runtime leftovers");

        for unit in [SLURMCTLD_UNIT, SLURMD_UNIT, MUNGE_UNIT] {
            self.host.stop_unit(unit).await;
        }

        for dir in self.paths.repair_targets() {
            if fsutil::remove_tree(dir) {
                tracing::info!(%dir, "removed stale runtime directory");
            }
        }
    }
}
