//! Toolchain configuration.
//!
//! One explicit struct threaded through the orchestrators instead of
//! process-wide settings. Defaults mirror a stock single-node layout
//! under the invoking user's home; a JSON file can override any field.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },
}

/// Settings for the Slurm build.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SlurmOptions {
    /// Release to download from download.schedmd.com.
    pub version: String,
    /// Where the source tarball is unpacked and built.
    pub build_dir: Utf8PathBuf,
    /// ClusterName written into slurm.conf.
    pub cluster_name: String,
}

impl Default for SlurmOptions {
    fn default() -> Self {
        Self {
            version: "24.11.1".to_string(),
            build_dir: Utf8PathBuf::from("/root"),
            cluster_name: "cluster".to_string(),
        }
    }
}

/// Settings for the OpenMPI build.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OpenMpiOptions {
    /// Release to download; `OPENMPI_VERSION` in the environment overrides
    /// the built-in default.
    pub version: String,
}

impl Default for OpenMpiOptions {
    fn default() -> Self {
        Self {
            version: std::env::var("OPENMPI_VERSION").unwrap_or_else(|_| "4.1.6".to_string()),
        }
    }
}

/// Top-level configuration for setup and cleanup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Root for user-scope installs (`<install_root>/python`, ...).
    pub install_root: Utf8PathBuf,
    /// Where source tarballs are downloaded and unpacked.
    pub sources_dir: Utf8PathBuf,
    /// Shell profile that receives PATH/LD_LIBRARY_PATH exports.
    pub shell_profile: Utf8PathBuf,
    pub slurm: SlurmOptions,
    pub openmpi: OpenMpiOptions,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        let home = home_dir();
        Self {
            install_root: home.join("hpc"),
            sources_dir: home.join("hpc_sources"),
            shell_profile: home.join(".bashrc"),
            slurm: SlurmOptions::default(),
            openmpi: OpenMpiOptions::default(),
        }
    }
}

impl ToolchainConfig {
    /// Load from a JSON file, or fall back to defaults when no path is given.
    pub fn load_or_default(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_owned(),
                    source,
                })?;
                serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_owned(),
                    source,
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Install directory for a named user-scope module.
    pub fn module_dir(&self, module: &str) -> Utf8PathBuf {
        self.install_root.join(module)
    }
}

/// The invoking user's home directory.
fn home_dir() -> Utf8PathBuf {
    std::env::var("HOME")
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|_| Utf8PathBuf::from("/root"))
}
