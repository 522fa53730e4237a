//! Shared download / unpack / autotools plumbing for module builds.

use crate::versions::VersionError;
use camino::{Utf8Path, Utf8PathBuf};
use hpcsmith_core::command::{CommandError, command, run};
use hpcsmith_system::cpu_count;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{module} verification failed: {detail}")]
    Verify { module: &'static str, detail: String },
}

/// One upstream source release: where it comes from and what it unpacks to.
pub(crate) struct SourceRelease<'a> {
    pub sources_dir: &'a Utf8Path,
    pub url: String,
    pub archive: String,
    pub unpacked_dir: String,
}

impl SourceRelease<'_> {
    /// Download and unpack, skipping whatever a previous run left behind.
    /// Returns the unpacked source directory.
    pub async fn fetch(&self) -> Result<Utf8PathBuf, ModuleError> {
        std::fs::create_dir_all(self.sources_dir)?;

        if !self.sources_dir.join(&self.archive).exists() {
            tracing::info!(archive = %self.archive, "downloading source");
            let mut cmd = command("wget", &[self.url.as_str()]);
            cmd.current_dir(self.sources_dir);
            run(&mut cmd, "wget").await?;
        } else {
            tracing::info!(archive = %self.archive, "source already downloaded");
        }

        let source_dir = self.sources_dir.join(&self.unpacked_dir);
        if !source_dir.exists() {
            let mut cmd = command("tar", &["-xf", self.archive.as_str()]);
            cmd.current_dir(self.sources_dir);
            run(&mut cmd, "tar").await?;
        }

        Ok(source_dir)
    }
}

/// `<configure> <args...>` then `make -jN` then `make install`, all in `dir`.
pub(crate) async fn configure_make_install(
    dir: &Utf8Path,
    configure: &str,
    args: &[&str],
) -> Result<(), ModuleError> {
    let mut cmd = command(configure, args);
    cmd.current_dir(dir);
    run(&mut cmd, "configure").await?;

    let jobs = format!("-j{}", cpu_count());
    let mut make = command("make", &[jobs.as_str()]);
    make.current_dir(dir);
    run(&mut make, "make").await?;

    let mut install = command("make", &["install"]);
    install.current_dir(dir);
    run(&mut install, "make install").await?;

    Ok(())
}

/// Run `<binary> --version` and return the first line of its output.
pub(crate) async fn verify_binary(
    binary: &Utf8Path,
    module: &'static str,
) -> Result<String, ModuleError> {
    if !binary.exists() {
        return Err(ModuleError::Verify {
            module,
            detail: format!("{binary} not found"),
        });
    }

    let output = run(&mut command(binary.as_str(), &["--version"]), module)
        .await
        .map_err(|e| ModuleError::Verify {
            module,
            detail: e.to_string(),
        })?;

    Ok(output.lines().next().unwrap_or_default().to_string())
}
