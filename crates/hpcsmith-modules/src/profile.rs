//! Shell-profile editing.
//!
//! Exports are guarded by a marker substring so repeated installs never
//! stack duplicate lines, and removal filters by substring so unrelated
//! user content is preserved byte for byte.

use camino::Utf8Path;
use std::io::Write;

/// Append the given lines unless the marker substring is already present.
///
/// Creates the profile if it does not exist. Returns true when lines
/// were appended.
pub fn ensure_lines<S: AsRef<str>>(
    profile: &Utf8Path,
    marker: &str,
    lines: &[S],
) -> std::io::Result<bool> {
    let content = match std::fs::read_to_string(profile) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    if content.contains(marker) {
        return Ok(false);
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(profile)?;
    writeln!(file)?;
    for line in lines {
        writeln!(file, "{}", line.as_ref())?;
    }
    Ok(true)
}

/// Drop every line containing any of the given substrings.
///
/// A missing profile is fine. Returns true when the file was rewritten.
pub fn strip_lines<S: AsRef<str>>(profile: &Utf8Path, needles: &[S]) -> std::io::Result<bool> {
    let content = match std::fs::read_to_string(profile) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let kept: Vec<&str> = content
        .lines()
        .filter(|line| !needles.iter().any(|needle| line.contains(needle.as_ref())))
        .collect();

    if kept.len() == content.lines().count() {
        return Ok(false);
    }

    let mut rewritten = kept.join("\n");
    if !rewritten.is_empty() {
        rewritten.push('\n');
    }
    std::fs::write(profile, rewritten)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn profile_in(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp.path().join(".bashrc")).unwrap()
    }

    #[test]
    fn test_ensure_creates_and_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let profile = profile_in(&temp);
        let lines = [r#"export PATH="/home/u/hpc/python/bin:$PATH""#];

        assert!(ensure_lines(&profile, "hpc/python/bin", &lines).unwrap());
        assert!(!ensure_lines(&profile, "hpc/python/bin", &lines).unwrap());

        let content = std::fs::read_to_string(&profile).unwrap();
        assert_eq!(content.matches("hpc/python/bin").count(), 1);
    }

    #[test]
    fn test_ensure_preserves_existing_content() {
        let temp = TempDir::new().unwrap();
        let profile = profile_in(&temp);
        std::fs::write(&profile, "alias ll='ls -l'\n").unwrap();

        ensure_lines(&profile, "hpc/openmpi/bin", &["export PATH=..."]).unwrap();

        let content = std::fs::read_to_string(&profile).unwrap();
        assert!(content.starts_with("alias ll='ls -l'\n"));
        assert!(content.contains("export PATH=..."));
    }

    #[test]
    fn test_strip_removes_only_matching_lines() {
        let temp = TempDir::new().unwrap();
        let profile = profile_in(&temp);
        std::fs::write(
            &profile,
            "alias ll='ls -l'\n\
             export PATH=\"/home/u/hpc/openmpi/bin:$PATH\"\n\
             export LD_LIBRARY_PATH=\"/home/u/hpc/openmpi/lib:$LD_LIBRARY_PATH\"\n\
             export EDITOR=vim\n",
        )
        .unwrap();

        let changed =
            strip_lines(&profile, &["/home/u/hpc/openmpi/bin", "/home/u/hpc/openmpi/lib"]).unwrap();
        assert!(changed);

        let content = std::fs::read_to_string(&profile).unwrap();
        assert_eq!(content, "alias ll='ls -l'\nexport EDITOR=vim\n");
    }

    #[test]
    fn test_strip_missing_profile_is_ok() {
        let temp = TempDir::new().unwrap();
        let profile = profile_in(&temp);
        assert!(!strip_lines(&profile, &["anything"]).unwrap());
    }

    #[test]
    fn test_strip_without_matches_leaves_file_alone() {
        let temp = TempDir::new().unwrap();
        let profile = profile_in(&temp);
        std::fs::write(&profile, "export EDITOR=vim\n").unwrap();

        assert!(!strip_lines(&profile, &["hpc/gcc/bin"]).unwrap());
        assert_eq!(std::fs::read_to_string(&profile).unwrap(), "export EDITOR=vim\n");
    }
}
