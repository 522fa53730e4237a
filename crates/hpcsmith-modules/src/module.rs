//! Descriptors for the user-scope toolchain modules.

use camino::Utf8PathBuf;
use hpcsmith_core::config::ToolchainConfig;

/// A buildable toolchain module: where it installs, how its source
/// artifacts are named, and what it exports into the shell profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Module {
    /// Subdirectory under the install root.
    pub name: &'static str,
    /// Prefix of source folders and archives under the sources dir.
    pub source_prefix: &'static str,
    /// Archive filename suffixes belonging to this module.
    pub archive_suffixes: &'static [&'static str],
    /// Whether the module also exports its lib dir via LD_LIBRARY_PATH.
    pub exports_lib_path: bool,
}

pub const PYTHON: Module = Module {
    name: "python",
    source_prefix: "Python-",
    archive_suffixes: &[".tar.xz"],
    exports_lib_path: false,
};

pub const OPENMPI: Module = Module {
    name: "openmpi",
    source_prefix: "openmpi-",
    archive_suffixes: &[".tar.gz"],
    exports_lib_path: true,
};

pub const GCC: Module = Module {
    name: "gcc",
    source_prefix: "gcc-",
    archive_suffixes: &[".tar.gz"],
    exports_lib_path: false,
};

impl Module {
    /// Install prefix for this module.
    pub fn install_dir(&self, config: &ToolchainConfig) -> Utf8PathBuf {
        config.module_dir(self.name)
    }

    /// Substrings identifying this module's lines in the shell profile.
    pub fn profile_needles(&self, config: &ToolchainConfig) -> Vec<String> {
        let dir = self.install_dir(config);
        let mut needles = vec![format!("{dir}/bin")];
        if self.exports_lib_path {
            needles.push(format!("{dir}/lib"));
        }
        needles
    }

    /// Export lines appended to the shell profile after an install.
    pub fn export_lines(&self, config: &ToolchainConfig) -> Vec<String> {
        let dir = self.install_dir(config);
        let mut lines = vec![format!(r#"export PATH="{dir}/bin:$PATH""#)];
        if self.exports_lib_path {
            lines.push(format!(
                r#"export LD_LIBRARY_PATH="{dir}/lib:$LD_LIBRARY_PATH""#
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ToolchainConfig {
        ToolchainConfig {
            install_root: Utf8PathBuf::from("/home/u/hpc"),
            ..ToolchainConfig::default()
        }
    }

    #[test]
    fn test_python_exports_path_only() {
        let config = config();
        let lines = PYTHON.export_lines(&config);
        assert_eq!(lines, vec![r#"export PATH="/home/u/hpc/python/bin:$PATH""#]);
        assert_eq!(PYTHON.profile_needles(&config), vec!["/home/u/hpc/python/bin"]);
    }

    #[test]
    fn test_openmpi_exports_lib_path_too() {
        let config = config();
        let lines = OPENMPI.export_lines(&config);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("LD_LIBRARY_PATH"));
        assert!(lines[1].contains("/home/u/hpc/openmpi/lib"));
        assert_eq!(
            OPENMPI.profile_needles(&config),
            vec!["/home/u/hpc/openmpi/bin", "/home/u/hpc/openmpi/lib"]
        );
    }
}
