//! User-scope CPython build, tracking the newest upstream release.

use crate::builder::{ModuleError, SourceRelease, configure_make_install, verify_binary};
use crate::module::PYTHON;
use crate::profile;
use crate::versions::{PYTHON_INDEX, latest_python_release};
use hpcsmith_core::config::ToolchainConfig;
use hpcsmith_system::install_packages;
use hpcsmith_system::os::PackageManager;

const APT_DEPS: &[&str] = &[
    "build-essential",
    "libssl-dev",
    "zlib1g-dev",
    "libncurses5-dev",
    "libncursesw5-dev",
    "libreadline-dev",
    "libsqlite3-dev",
    "libgdbm-dev",
    "libdb5.3-dev",
    "libbz2-dev",
    "libexpat1-dev",
    "liblzma-dev",
    "tk-dev",
    "wget",
    "curl",
];

const DNF_DEPS: &[&str] = &[
    "gcc",
    "make",
    "openssl-devel",
    "bzip2-devel",
    "libffi-devel",
    "zlib-devel",
    "readline-devel",
    "sqlite-devel",
    "xz-devel",
    "tk-devel",
    "wget",
    "curl",
];

pub struct PythonInstaller<'a> {
    config: &'a ToolchainConfig,
    package_manager: PackageManager,
}

impl<'a> PythonInstaller<'a> {
    pub fn new(config: &'a ToolchainConfig, package_manager: PackageManager) -> Self {
        Self {
            config,
            package_manager,
        }
    }

    pub async fn install(&self) -> Result<(), ModuleError> {
        let install_dir = PYTHON.install_dir(self.config);
        let python = install_dir.join("bin/python3");

        if python.exists() {
            let version = verify_binary(&python, "python").await?;
            tracing::info!(%version, "Python already installed");
            return Ok(());
        }

        let version = latest_python_release().await?;
        tracing::info!(%version, "building Python");

        let deps = match self.package_manager {
            PackageManager::Apt => APT_DEPS,
            PackageManager::Dnf => DNF_DEPS,
        };
        install_packages(self.package_manager, deps).await?;

        let archive = format!("Python-{version}.tar.xz");
        let release = SourceRelease {
            sources_dir: &self.config.sources_dir,
            url: format!("{PYTHON_INDEX}{version}/{archive}"),
            archive,
            unpacked_dir: format!("Python-{version}"),
        };
        let source_dir = release.fetch().await?;

        let prefix = format!("--prefix={install_dir}");
        configure_make_install(&source_dir, "./configure", &[prefix.as_str(), "--enable-optimizations"])
            .await?;

        let needles = PYTHON.profile_needles(self.config);
        profile::ensure_lines(
            &self.config.shell_profile,
            &needles[0],
            &PYTHON.export_lines(self.config),
        )?;

        let installed = verify_binary(&python, "python").await?;
        tracing::info!(version = %installed, "Python installed");
        Ok(())
    }
}
