//! Local host facts used when rendering the node entry in slurm.conf.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("cannot resolve hostname: {0}")]
    Hostname(std::io::Error),
}

/// Number of logical CPUs on this host, at least 1.
pub fn cpu_count() -> usize {
    std::thread::available_parallelism().map(usize::from).unwrap_or(1)
}

/// The local hostname.
pub fn hostname() -> Result<String, HostError> {
    let name = hostname::get().map_err(HostError::Hostname)?;
    Ok(name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_count_is_positive() {
        assert!(cpu_count() >= 1);
    }

    #[test]
    fn test_hostname_is_nonempty() {
        assert!(!hostname().unwrap().is_empty());
    }
}
