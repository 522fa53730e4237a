//! Distribution detection via `/etc/os-release`.

use hpcsmith_core::command_exists;
use thiserror::Error;

const OS_RELEASE: &str = "/etc/os-release";

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("cannot detect OS: {path}: {source}")]
    Unreadable {
        path: &'static str,
        source: std::io::Error,
    },
    #[error("unsupported distribution: {0}")]
    Unsupported(String),
}

/// Package manager driving system-scope installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
}

impl PackageManager {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
        }
    }

    /// Map an os-release `ID` to its package manager.
    pub fn for_distro(id: &str) -> Option<Self> {
        match id {
            "ubuntu" | "debian" => Some(PackageManager::Apt),
            "centos" | "rhel" | "fedora" | "rocky" | "almalinux" => Some(PackageManager::Dnf),
            _ => None,
        }
    }

    /// First supported manager present on `$PATH`, if any.
    ///
    /// Used during cleanup, where the host may be in a state os-release
    /// detection would reject.
    pub fn first_available() -> Option<Self> {
        if command_exists("apt") {
            Some(PackageManager::Apt)
        } else if command_exists("dnf") {
            Some(PackageManager::Dnf)
        } else {
            None
        }
    }
}

/// Fields read from `/etc/os-release`.
#[derive(Debug, Clone, Default)]
pub struct OsRelease {
    pub name: Option<String>,
    pub version_id: Option<String>,
    pub id: Option<String>,
}

/// Detected distribution plus its package manager.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: OsRelease,
    pub package_manager: PackageManager,
}

/// Parse os-release content into its interesting fields.
///
/// Lines are `KEY=value`; values may be double-quoted.
pub fn parse_os_release(content: &str) -> OsRelease {
    let mut release = OsRelease::default();

    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').to_string();

        match key.trim() {
            "NAME" => release.name = Some(value),
            "VERSION_ID" => release.version_id = Some(value),
            "ID" => release.id = Some(value),
            _ => {}
        }
    }

    release
}

/// Detect the running distribution and its package manager.
pub fn detect() -> Result<SystemInfo, DetectError> {
    let content = std::fs::read_to_string(OS_RELEASE).map_err(|source| DetectError::Unreadable {
        path: OS_RELEASE,
        source,
    })?;

    let os = parse_os_release(&content);
    let id = os.id.clone().unwrap_or_default();

    let package_manager =
        PackageManager::for_distro(&id).ok_or_else(|| DetectError::Unsupported(id))?;

    tracing::debug!(
        name = os.name.as_deref().unwrap_or("unknown"),
        version = os.version_id.as_deref().unwrap_or("unknown"),
        manager = package_manager.as_str(),
        "detected distribution"
    );

    Ok(SystemInfo { os, package_manager })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UBUNTU: &str = r#"PRETTY_NAME="Ubuntu 24.04.1 LTS"
NAME="Ubuntu"
VERSION_ID="24.04"
VERSION="24.04.1 LTS (Noble Numbat)"
ID=ubuntu
ID_LIKE=debian
"#;

    const ROCKY: &str = r#"NAME="Rocky Linux"
VERSION="9.4 (Blue Onyx)"
ID="rocky"
VERSION_ID="9.4"
"#;

    #[test]
    fn test_parse_quoted_and_bare_values() {
        let os = parse_os_release(UBUNTU);
        assert_eq!(os.name.as_deref(), Some("Ubuntu"));
        assert_eq!(os.version_id.as_deref(), Some("24.04"));
        assert_eq!(os.id.as_deref(), Some("ubuntu"));

        let os = parse_os_release(ROCKY);
        assert_eq!(os.id.as_deref(), Some("rocky"));
    }

    #[test]
    fn test_parse_ignores_malformed_lines() {
        let os = parse_os_release("garbage\nID=debian\n# comment");
        assert_eq!(os.id.as_deref(), Some("debian"));
        assert!(os.name.is_none());
    }

    #[test]
    fn test_manager_for_distro() {
        assert_eq!(PackageManager::for_distro("ubuntu"), Some(PackageManager::Apt));
        assert_eq!(PackageManager::for_distro("debian"), Some(PackageManager::Apt));
        assert_eq!(PackageManager::for_distro("rocky"), Some(PackageManager::Dnf));
        assert_eq!(PackageManager::for_distro("fedora"), Some(PackageManager::Dnf));
        assert_eq!(PackageManager::for_distro("arch"), None);
        assert_eq!(PackageManager::for_distro(""), None);
    }
}
