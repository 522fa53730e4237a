//! User-scope OpenMPI build at a pinned release.

use crate::builder::{ModuleError, SourceRelease, configure_make_install, verify_binary};
use crate::module::OPENMPI;
use crate::profile;
use hpcsmith_core::config::ToolchainConfig;
use hpcsmith_system::install_packages;
use hpcsmith_system::os::PackageManager;

const APT_DEPS: &[&str] = &["build-essential", "gcc", "g++", "make", "wget", "curl"];
const DNF_DEPS: &[&str] = &["gcc", "gcc-c++", "make", "wget", "curl"];

pub struct OpenMpiInstaller<'a> {
    config: &'a ToolchainConfig,
    package_manager: PackageManager,
}

impl<'a> OpenMpiInstaller<'a> {
    pub fn new(config: &'a ToolchainConfig, package_manager: PackageManager) -> Self {
        Self {
            config,
            package_manager,
        }
    }

    pub async fn install(&self) -> Result<(), ModuleError> {
        let install_dir = OPENMPI.install_dir(self.config);
        let mpirun = install_dir.join("bin/mpirun");

        if mpirun.exists() {
            let version = verify_binary(&mpirun, "openmpi").await?;
            tracing::info!(%version, "OpenMPI already installed");
            return Ok(());
        }

        let version = &self.config.openmpi.version;
        tracing::info!(%version, "building OpenMPI");

        let deps = match self.package_manager {
            PackageManager::Apt => APT_DEPS,
            PackageManager::Dnf => DNF_DEPS,
        };
        install_packages(self.package_manager, deps).await?;

        let archive = format!("openmpi-{version}.tar.gz");
        let release = SourceRelease {
            sources_dir: &self.config.sources_dir,
            url: format!(
                "https://download.open-mpi.org/release/open-mpi/v{}/{archive}",
                release_series(version)
            ),
            archive,
            unpacked_dir: format!("openmpi-{version}"),
        };
        let source_dir = release.fetch().await?;

        let prefix = format!("--prefix={install_dir}");
        configure_make_install(&source_dir, "./configure", &[prefix.as_str()]).await?;

        let needles = OPENMPI.profile_needles(self.config);
        profile::ensure_lines(
            &self.config.shell_profile,
            &needles[0],
            &OPENMPI.export_lines(self.config),
        )?;

        let installed = verify_binary(&mpirun, "openmpi").await?;
        tracing::info!(version = %installed, "OpenMPI installed");
        Ok(())
    }
}

/// Release series directory on the download server ("4.1.6" -> "4.1").
fn release_series(version: &str) -> String {
    version.split('.').take(2).collect::<Vec<_>>().join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_series() {
        assert_eq!(release_series("4.1.6"), "4.1");
        assert_eq!(release_series("5.0.3"), "5.0");
        assert_eq!(release_series("4.1"), "4.1");
    }
}
