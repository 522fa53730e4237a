//! Effective-uid privilege gate.

use nix::unistd::Uid;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("{task} requires root; rerun with sudo")]
pub struct PrivilegeError {
    task: String,
}

/// True if the process runs with an effective uid of 0.
pub fn is_root() -> bool {
    Uid::effective().is_root()
}

/// Gate a system-scope task on root privilege.
pub fn require_root(task: &str) -> Result<(), PrivilegeError> {
    if is_root() {
        Ok(())
    } else {
        Err(PrivilegeError {
            task: task.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_the_task() {
        let err = PrivilegeError {
            task: "Slurm removal".to_string(),
        };
        assert_eq!(err.to_string(), "Slurm removal requires root; rerun with sudo");
    }
}
