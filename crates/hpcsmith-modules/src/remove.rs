//! User-scope module removal.
//!
//! One remover for all three modules: delete the install prefix, sweep
//! matching sources and archives, strip the profile exports. Never
//! touches anything outside the configured user paths and never needs
//! root.

use crate::builder::ModuleError;
use crate::module::Module;
use crate::profile;
use hpcsmith_core::config::ToolchainConfig;
use hpcsmith_core::fsutil;

pub struct ModuleRemover<'a> {
    config: &'a ToolchainConfig,
}

impl<'a> ModuleRemover<'a> {
    pub fn new(config: &'a ToolchainConfig) -> Self {
        Self { config }
    }

    /// Remove a module's installation, sources, and profile exports.
    /// Every step tolerates absence.
    pub fn remove(&self, module: &Module) -> Result<(), ModuleError> {
        self.remove_installation(module);
        self.remove_sources(module)?;

        let stripped =
            profile::strip_lines(&self.config.shell_profile, &module.profile_needles(self.config))?;
        if stripped {
            tracing::info!(module = module.name, "removed profile exports");
        }

        Ok(())
    }

    fn remove_installation(&self, module: &Module) {
        let install_dir = module.install_dir(self.config);
        if fsutil::remove_tree(&install_dir) {
            tracing::info!(module = module.name, dir = %install_dir, "removed installation");
        } else {
            tracing::debug!(module = module.name, "installation not present");
        }
    }

    /// Sweep source folders and archives whose names carry the module's
    /// version prefix. Unrelated entries are left alone.
    fn remove_sources(&self, module: &Module) -> Result<(), ModuleError> {
        let sources_dir = &self.config.sources_dir;
        if !sources_dir.exists() {
            return Ok(());
        }

        for entry in sources_dir.read_dir_utf8()? {
            let entry = entry?;
            let name = entry.file_name();
            if !name.starts_with(module.source_prefix) {
                continue;
            }

            if entry.file_type()?.is_dir() {
                if fsutil::remove_tree(entry.path()) {
                    tracing::info!(folder = name, "removed source folder");
                }
            } else if module.archive_suffixes.iter().any(|s| name.ends_with(s))
                && fsutil::remove_file(entry.path())
            {
                tracing::info!(archive = name, "removed source archive");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{OPENMPI, PYTHON};
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn sandbox_config(temp: &TempDir) -> ToolchainConfig {
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        ToolchainConfig {
            install_root: root.join("hpc"),
            sources_dir: root.join("hpc_sources"),
            shell_profile: root.join(".bashrc"),
            ..ToolchainConfig::default()
        }
    }

    fn populate_python(config: &ToolchainConfig) {
        let install = config.module_dir("python");
        std::fs::create_dir_all(install.join("bin")).unwrap();
        std::fs::write(install.join("bin/python3"), b"").unwrap();

        std::fs::create_dir_all(config.sources_dir.join("Python-3.13.1")).unwrap();
        std::fs::write(config.sources_dir.join("Python-3.13.1.tar.xz"), b"").unwrap();
        // a neighbor that must survive a python sweep
        std::fs::write(config.sources_dir.join("openmpi-4.1.6.tar.gz"), b"").unwrap();

        std::fs::write(
            &config.shell_profile,
            format!(
                "alias ll='ls -l'\nexport PATH=\"{}/bin:$PATH\"\n",
                config.module_dir("python")
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_remove_python_sweeps_only_python() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(&temp);
        populate_python(&config);

        ModuleRemover::new(&config).remove(&PYTHON).unwrap();

        assert!(!config.module_dir("python").exists());
        assert!(!config.sources_dir.join("Python-3.13.1").exists());
        assert!(!config.sources_dir.join("Python-3.13.1.tar.xz").exists());
        assert!(config.sources_dir.join("openmpi-4.1.6.tar.gz").exists());

        let bashrc = std::fs::read_to_string(&config.shell_profile).unwrap();
        assert_eq!(bashrc, "alias ll='ls -l'\n");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(&temp);
        populate_python(&config);

        let remover = ModuleRemover::new(&config);
        remover.remove(&PYTHON).unwrap();
        remover.remove(&PYTHON).unwrap();

        assert!(!config.module_dir("python").exists());
    }

    #[test]
    fn test_remove_on_pristine_home_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(&temp);

        // no install dir, no sources dir, no profile
        ModuleRemover::new(&config).remove(&OPENMPI).unwrap();
    }

    #[test]
    fn test_remove_openmpi_strips_both_exports() {
        let temp = TempDir::new().unwrap();
        let config = sandbox_config(&temp);
        let dir = config.module_dir("openmpi");
        std::fs::write(
            &config.shell_profile,
            format!(
                "export PATH=\"{dir}/bin:$PATH\"\nexport LD_LIBRARY_PATH=\"{dir}/lib:$LD_LIBRARY_PATH\"\nexport EDITOR=vim\n"
            ),
        )
        .unwrap();

        ModuleRemover::new(&config).remove(&OPENMPI).unwrap();

        let bashrc = std::fs::read_to_string(&config.shell_profile).unwrap();
        assert_eq!(bashrc, "export EDITOR=vim\n");
    }
}
