//! Full system-scope removal of Slurm and Munge.
//!
//! Everything here is best-effort except the privilege gate: stopping a
//! service that never ran or purging a package that was never installed
//! leaves the host in the desired end state either way.

use crate::paths::SlurmPaths;
use hpcsmith_core::command::{command, run_unchecked};
use hpcsmith_core::privilege::{PrivilegeError, require_root};
use hpcsmith_core::{fsutil, systemd};
use hpcsmith_system::os::PackageManager;
use hpcsmith_system::purge_packages;

/// Units stopped and disabled before anything is deleted.
pub const REMOVAL_UNITS: &[&str] = &["slurmctld", "slurmd", "slurmdbd", "munge"];

/// System accounts deleted at the end.
const REMOVAL_USERS: &[&str] = &["slurm", "munge"];

const APT_PURGE: &[&str] = &["slurm-wlm", "munge", "slurmctld", "slurmd", "slurmdbd"];
const DNF_REMOVE: &[&str] = &["slurm", "munge", "slurm-slurmctld", "slurm-slurmd", "slurm-slurmdbd"];

/// Tears down services, packages, directories, and users.
pub struct SlurmRemover<'a> {
    paths: &'a SlurmPaths,
}

impl<'a> SlurmRemover<'a> {
    pub fn new(paths: &'a SlurmPaths) -> Self {
        Self { paths }
    }

    /// Remove the whole deployment. Requires root; performs no side
    /// effects without it.
    pub async fn remove(&self) -> Result<(), PrivilegeError> {
        require_root("Slurm removal")?;

        self.stop_services().await;

        match PackageManager::first_available() {
            Some(manager) => self.remove_packages(manager).await,
            None => {
                tracing::warn!("no supported package manager found; skipping package removal");
            }
        }

        self.remove_directories();
        self.remove_users().await;
        systemd::daemon_reload_unchecked().await;

        tracing::info!("Slurm and Munge removed");
        Ok(())
    }

    async fn stop_services(&self) {
        for unit in REMOVAL_UNITS {
            systemd::stop_unit(unit).await;
            systemd::disable_unit(unit).await;
        }
    }

    async fn remove_packages(&self, manager: PackageManager) {
        tracing::info!(manager = manager.as_str(), "purging Slurm and Munge packages");

        let packages = match manager {
            PackageManager::Apt => APT_PURGE,
            PackageManager::Dnf => DNF_REMOVE,
        };
        purge_packages(manager, packages).await;
    }

    fn remove_directories(&self) {
        for dir in self.paths.purge_targets() {
            if fsutil::remove_tree(dir) {
                tracing::info!(%dir, "removed");
            }
        }
    }

    async fn remove_users(&self) {
        for user in REMOVAL_USERS {
            let _ = run_unchecked(&mut command("userdel", &[user]), "userdel").await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_remove_directories_sweeps_config_and_state() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        let paths = SlurmPaths::under(&root);

        for dir in paths.purge_targets() {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(paths.conf_dir.join("slurm.conf"), b"ClusterName=x").unwrap();
        // unrelated sibling must survive
        let keep = root.join("etc/ssh");
        std::fs::create_dir_all(&keep).unwrap();

        let remover = SlurmRemover::new(&paths);
        remover.remove_directories();

        for dir in paths.purge_targets() {
            assert!(!dir.exists(), "{dir} should be gone");
        }
        assert!(keep.exists());

        // second sweep over an already-clean tree is fine
        remover.remove_directories();
    }
}
