//! Filesystem locations of a Slurm + Munge deployment.

use camino::{Utf8Path, Utf8PathBuf};

/// Every directory hpcsmith creates, repairs, or purges for Slurm and
/// Munge. Kept in one struct so the probers and removers can be pointed
/// at a sandbox.
#[derive(Debug, Clone)]
pub struct SlurmPaths {
    /// Slurm configuration directory (`slurm.conf` lives here).
    pub conf_dir: Utf8PathBuf,
    /// Legacy runtime spool root wiped during broken-state repair.
    pub runtime_spool: Utf8PathBuf,
    /// slurmctld state save location.
    pub ctld_spool: Utf8PathBuf,
    /// slurmd spool directory.
    pub d_spool: Utf8PathBuf,
    /// Daemon log directory.
    pub log_dir: Utf8PathBuf,
    /// Pid-file directory.
    pub run_dir: Utf8PathBuf,
    /// Munge configuration (key) directory.
    pub munge_conf_dir: Utf8PathBuf,
    /// Munge state directory.
    pub munge_lib_dir: Utf8PathBuf,
    /// Munge log directory.
    pub munge_log_dir: Utf8PathBuf,
    /// Munge socket/pid directory wiped during broken-state repair.
    pub munge_run_dir: Utf8PathBuf,
}

impl Default for SlurmPaths {
    fn default() -> Self {
        Self::under(Utf8Path::new("/"))
    }
}

impl SlurmPaths {
    /// Standard layout relocated under the given root.
    pub fn under(root: &Utf8Path) -> Self {
        Self {
            conf_dir: root.join("etc/slurm"),
            runtime_spool: root.join("var/spool/slurm"),
            ctld_spool: root.join("var/spool/slurmctld"),
            d_spool: root.join("var/spool/slurmd"),
            log_dir: root.join("var/log/slurm"),
            run_dir: root.join("run/slurm"),
            munge_conf_dir: root.join("etc/munge"),
            munge_lib_dir: root.join("var/lib/munge"),
            munge_log_dir: root.join("var/log/munge"),
            munge_run_dir: root.join("run/munge"),
        }
    }

    /// Directories wiped when repairing a broken install. Runtime state
    /// only — never configuration or packages.
    pub fn repair_targets(&self) -> [&Utf8Path; 2] {
        [&self.runtime_spool, &self.munge_run_dir]
    }

    /// Directories created (and owned by the slurm user) at install time.
    pub fn service_dirs(&self) -> [&Utf8Path; 4] {
        [&self.ctld_spool, &self.d_spool, &self.log_dir, &self.run_dir]
    }

    /// Everything deleted during a full uninstall.
    pub fn purge_targets(&self) -> [&Utf8Path; 7] {
        [
            &self.conf_dir,
            &self.munge_conf_dir,
            &self.munge_lib_dir,
            &self.munge_log_dir,
            &self.munge_run_dir,
            &self.ctld_spool,
            &self.d_spool,
        ]
    }

    /// Path of the rendered configuration file.
    pub fn conf_file(&self) -> Utf8PathBuf {
        self.conf_dir.join("slurm.conf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let paths = SlurmPaths::default();
        assert_eq!(paths.conf_dir, Utf8PathBuf::from("/etc/slurm"));
        assert_eq!(paths.runtime_spool, Utf8PathBuf::from("/var/spool/slurm"));
        assert_eq!(paths.munge_run_dir, Utf8PathBuf::from("/run/munge"));
        assert_eq!(paths.conf_file(), Utf8PathBuf::from("/etc/slurm/slurm.conf"));
    }

    #[test]
    fn test_repair_targets_are_runtime_only() {
        let paths = SlurmPaths::default();
        let targets = paths.repair_targets();
        assert!(!targets.contains(&paths.conf_dir.as_path()));
        assert!(!targets.contains(&paths.munge_conf_dir.as_path()));
    }
}
