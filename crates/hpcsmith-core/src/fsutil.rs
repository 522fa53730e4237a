//! Best-effort filesystem removal.
//!
//! Cleanup paths treat already-absent as success, so these helpers report
//! whether anything was removed instead of erroring.

use camino::Utf8Path;

/// Recursively delete a directory tree if it exists.
///
/// Returns true when something was removed. Errors other than not-found
/// are logged and swallowed.
pub fn remove_tree(path: &Utf8Path) -> bool {
    match std::fs::remove_dir_all(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(%path, error = %e, "failed to remove directory");
            false
        }
    }
}

/// Delete a single file if it exists.
pub fn remove_file(path: &Utf8Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(%path, error = %e, "failed to remove file");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_remove_tree_absent_then_present() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        let dir = root.join("spool");

        assert!(!remove_tree(&dir));

        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested/pidfile"), b"1234").unwrap();
        assert!(remove_tree(&dir));
        assert!(!dir.exists());

        // second pass is a no-op
        assert!(!remove_tree(&dir));
    }

    #[test]
    fn test_remove_file() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        let file = root.join("archive.tar.gz");

        assert!(!remove_file(&file));
        std::fs::write(&file, b"x").unwrap();
        assert!(remove_file(&file));
        assert!(!file.exists());
    }
}
