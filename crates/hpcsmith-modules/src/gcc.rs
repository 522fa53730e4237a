//! User-scope GCC build, tracking the newest upstream release.
//!
//! The longest build of the three by a wide margin; GCC also wants an
//! out-of-tree build directory and its prerequisite libraries fetched
//! by the bundled contrib script.

use crate::builder::{ModuleError, SourceRelease, configure_make_install, verify_binary};
use crate::module::GCC;
use crate::profile;
use crate::versions::{GCC_INDEX, latest_gcc_release};
use hpcsmith_core::command::{command, run};
use hpcsmith_core::config::ToolchainConfig;
use hpcsmith_system::install_packages;
use hpcsmith_system::os::PackageManager;

const APT_DEPS: &[&str] = &[
    "build-essential",
    "libgmp-dev",
    "libmpfr-dev",
    "libmpc-dev",
    "wget",
    "curl",
];

const DNF_DEPS: &[&str] = &[
    "gcc",
    "gcc-c++",
    "make",
    "gmp-devel",
    "mpfr-devel",
    "libmpc-devel",
    "wget",
    "curl",
];

pub struct GccInstaller<'a> {
    config: &'a ToolchainConfig,
    package_manager: PackageManager,
}

impl<'a> GccInstaller<'a> {
    pub fn new(config: &'a ToolchainConfig, package_manager: PackageManager) -> Self {
        Self {
            config,
            package_manager,
        }
    }

    pub async fn install(&self) -> Result<(), ModuleError> {
        let install_dir = GCC.install_dir(self.config);
        let gcc = install_dir.join("bin/gcc");

        if gcc.exists() {
            let version = verify_binary(&gcc, "gcc").await?;
            tracing::info!(%version, "GCC already installed");
            return Ok(());
        }

        let version = latest_gcc_release().await?;
        tracing::info!(%version, "building GCC (this will take a while)");

        let deps = match self.package_manager {
            PackageManager::Apt => APT_DEPS,
            PackageManager::Dnf => DNF_DEPS,
        };
        install_packages(self.package_manager, deps).await?;

        let archive = format!("gcc-{version}.tar.gz");
        let release = SourceRelease {
            sources_dir: &self.config.sources_dir,
            url: format!("{GCC_INDEX}gcc-{version}/{archive}"),
            archive,
            unpacked_dir: format!("gcc-{version}"),
        };
        let source_dir = release.fetch().await?;

        if source_dir.join("contrib/download_prerequisites").exists() {
            let mut cmd = command("./contrib/download_prerequisites", &[]);
            cmd.current_dir(&source_dir);
            run(&mut cmd, "download_prerequisites").await?;
        }

        let build_dir = source_dir.join("build");
        std::fs::create_dir_all(&build_dir)?;

        let prefix = format!("--prefix={install_dir}");
        configure_make_install(
            &build_dir,
            "../configure",
            &[prefix.as_str(), "--enable-languages=c,c++", "--disable-multilib"],
        )
        .await?;

        let needles = GCC.profile_needles(self.config);
        profile::ensure_lines(
            &self.config.shell_profile,
            &needles[0],
            &GCC.export_lines(self.config),
        )?;

        let installed = verify_binary(&gcc, "gcc").await?;
        tracing::info!(version = %installed, "GCC installed");
        Ok(())
    }
}
