//! Source install of Slurm.
//!
//! Mirrors the upstream recipe: build dependencies from the OS package
//! manager, munge first, then configure/make/install from the release
//! tarball, a service user, runtime directories, a rendered slurm.conf,
//! and the shipped systemd units.

use crate::conf::{self, ConfContext, SLURM_USER};
use crate::paths::SlurmPaths;
use camino::{Utf8Path, Utf8PathBuf};
use hpcsmith_core::command::{CommandError, command, run, status_ok};
use hpcsmith_core::config::SlurmOptions;
use hpcsmith_core::systemd;
use hpcsmith_system::os::PackageManager;
use hpcsmith_system::{HostError, cpu_count, hostname, install_packages};
use thiserror::Error;

const DOWNLOAD_BASE: &str = "https://download.schedmd.com/slurm";
const UNIT_DIR: &str = "/etc/systemd/system";

const APT_PACKAGES: &[&str] = &[
    "build-essential",
    "munge",
    "libmunge-dev",
    "libssl-dev",
    "libpam0g-dev",
    "libmariadb-dev",
    "libjson-c-dev",
    "libhwloc-dev",
    "pkg-config",
    "bison",
    "flex",
    "mariadb-server",
    "curl",
    "wget",
];

const DNF_PACKAGES: &[&str] = &[
    "gcc",
    "gcc-c++",
    "make",
    "munge",
    "munge-devel",
    "openssl-devel",
    "pam-devel",
    "mariadb-devel",
    "json-c-devel",
    "hwloc-devel",
    "pkgconfig",
    "bison",
    "flex",
    "mariadb-server",
    "curl",
    "wget",
];

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("host lookup failed: {0}")]
    Host(#[from] HostError),
    #[error("filesystem step failed at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

impl InstallError {
    fn io(path: impl Into<Utf8PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        move |source| InstallError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Installs Slurm from the release tarball and brings the daemons up.
pub struct SlurmInstaller<'a> {
    options: &'a SlurmOptions,
    paths: &'a SlurmPaths,
    package_manager: PackageManager,
}

impl<'a> SlurmInstaller<'a> {
    pub fn new(
        options: &'a SlurmOptions,
        paths: &'a SlurmPaths,
        package_manager: PackageManager,
    ) -> Self {
        Self {
            options,
            paths,
            package_manager,
        }
    }

    /// Run the full install sequence. Every step is fatal on failure.
    pub async fn install(&self) -> Result<(), InstallError> {
        self.install_dependencies().await?;
        self.enable_munge().await?;
        let source_dir = self.download_and_build().await?;
        self.create_service_user().await?;
        self.create_directories().await?;
        self.write_conf().await?;
        self.install_unit_files(&source_dir).await?;
        self.start_services().await?;
        tracing::info!(version = %self.options.version, "Slurm installation complete");
        Ok(())
    }

    async fn install_dependencies(&self) -> Result<(), InstallError> {
        tracing::info!(manager = self.package_manager.as_str(), "installing build dependencies");

        let packages = match self.package_manager {
            PackageManager::Apt => APT_PACKAGES,
            PackageManager::Dnf => DNF_PACKAGES,
        };
        install_packages(self.package_manager, packages).await?;
        Ok(())
    }

    async fn enable_munge(&self) -> Result<(), InstallError> {
        systemd::enable_unit("munge").await?;
        systemd::restart_unit("munge").await?;
        Ok(())
    }

    /// Download, unpack, and build the release. Skips the download and
    /// the extraction when a previous run already produced them.
    async fn download_and_build(&self) -> Result<Utf8PathBuf, InstallError> {
        let version = &self.options.version;
        let build_dir = &self.options.build_dir;
        let tarball = format!("slurm-{version}.tar.bz2");
        let source_dir = build_dir.join(format!("slurm-{version}"));

        if !build_dir.join(&tarball).exists() {
            tracing::info!(%tarball, "downloading Slurm source");
            let url = format!("{DOWNLOAD_BASE}/{tarball}");
            let mut cmd = command("wget", &[url.as_str()]);
            cmd.current_dir(build_dir);
            run(&mut cmd, "wget").await?;
        }

        if !source_dir.exists() {
            let mut cmd = command("tar", &["-xjf", tarball.as_str()]);
            cmd.current_dir(build_dir);
            run(&mut cmd, "tar").await?;
        }

        tracing::info!(dir = %source_dir, "building Slurm");

        let sysconfdir = format!("--sysconfdir={}", self.paths.conf_dir);
        let mut configure = command(
            "./configure",
            &[sysconfdir.as_str(), "--without-cgroup", "--disable-cgroup"],
        );
        configure.current_dir(&source_dir);
        run(&mut configure, "configure").await?;

        let jobs = format!("-j{}", cpu_count());
        let mut make = command("make", &[jobs.as_str()]);
        make.current_dir(&source_dir);
        run(&mut make, "make").await?;

        let mut install = command("make", &["install"]);
        install.current_dir(&source_dir);
        run(&mut install, "make install").await?;

        Ok(source_dir)
    }

    async fn create_service_user(&self) -> Result<(), InstallError> {
        if status_ok(&mut command("id", &[SLURM_USER]), "id").await {
            return Ok(());
        }
        run(&mut command("useradd", &["-r", "-m", SLURM_USER]), "useradd").await?;
        Ok(())
    }

    async fn create_directories(&self) -> Result<(), InstallError> {
        std::fs::create_dir_all(&self.paths.conf_dir)
            .map_err(InstallError::io(self.paths.conf_dir.clone()))?;

        for dir in self.paths.service_dirs() {
            std::fs::create_dir_all(dir).map_err(InstallError::io(dir.to_owned()))?;
            let owner = format!("{SLURM_USER}:{SLURM_USER}");
            run(&mut command("chown", &["-R", owner.as_str(), dir.as_str()]), "chown").await?;
        }
        Ok(())
    }

    async fn write_conf(&self) -> Result<(), InstallError> {
        let control_host = hostname()?;
        let conf = conf::render(&ConfContext {
            cluster_name: &self.options.cluster_name,
            control_host: &control_host,
            cpus: cpu_count(),
            paths: self.paths,
        });

        let conf_file = self.paths.conf_file();
        std::fs::write(&conf_file, conf).map_err(InstallError::io(conf_file.clone()))?;
        set_mode(&conf_file, 0o644).map_err(InstallError::io(conf_file.clone()))?;

        let owner = format!("{SLURM_USER}:{SLURM_USER}");
        run(&mut command("chown", &[owner.as_str(), conf_file.as_str()]), "chown").await?;

        tracing::info!(path = %conf_file, "wrote slurm.conf");
        Ok(())
    }

    /// Copy the service units shipped in the source tree and reload systemd.
    async fn install_unit_files(&self, source_dir: &Utf8Path) -> Result<(), InstallError> {
        for unit in ["slurmctld.service", "slurmd.service"] {
            let from = source_dir.join("etc").join(unit);
            let to = Utf8Path::new(UNIT_DIR).join(unit);
            std::fs::copy(&from, &to).map_err(InstallError::io(from))?;
        }

        systemd::daemon_reload().await?;
        systemd::daemon_reexec_unchecked().await;
        Ok(())
    }

    async fn start_services(&self) -> Result<(), InstallError> {
        systemd::enable_unit("slurmctld").await?;
        systemd::enable_unit("slurmd").await?;
        systemd::restart_unit("munge").await?;
        systemd::start_unit("slurmctld").await?;
        systemd::start_unit("slurmd").await?;
        Ok(())
    }
}

fn set_mode(path: &Utf8Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_lists_cover_build_essentials() {
        // munge headers and a compiler are the two hard requirements
        assert!(APT_PACKAGES.contains(&"libmunge-dev"));
        assert!(APT_PACKAGES.contains(&"build-essential"));
        assert!(DNF_PACKAGES.contains(&"munge-devel"));
        assert!(DNF_PACKAGES.contains(&"gcc"));
    }
}
