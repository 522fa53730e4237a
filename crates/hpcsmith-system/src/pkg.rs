//! Package installation and removal via the detected manager.

use crate::os::PackageManager;
use hpcsmith_core::command::{CommandError, command, run, run_unchecked};

/// Install packages, refreshing the index first where the manager needs it.
pub async fn install_packages(
    manager: PackageManager,
    packages: &[&str],
) -> Result<(), CommandError> {
    match manager {
        PackageManager::Apt => {
            run(&mut command("apt", &["update"]), "apt update").await?;
            let mut args = vec!["install", "-y"];
            args.extend_from_slice(packages);
            run(&mut command("apt", &args), "apt install").await?;
        }
        PackageManager::Dnf => {
            let mut args = vec!["install", "-y"];
            args.extend_from_slice(packages);
            run(&mut command("dnf", &args), "dnf install").await?;
        }
    }
    Ok(())
}

/// Purge packages, best-effort: missing packages are not an error.
pub async fn purge_packages(manager: PackageManager, packages: &[&str]) {
    match manager {
        PackageManager::Apt => {
            let mut args = vec!["purge", "-y"];
            args.extend_from_slice(packages);
            let _ = run_unchecked(&mut command("apt", &args), "apt purge").await;
            let _ =
                run_unchecked(&mut command("apt", &["autoremove", "-y"]), "apt autoremove").await;
        }
        PackageManager::Dnf => {
            let mut args = vec!["remove", "-y"];
            args.extend_from_slice(packages);
            let _ = run_unchecked(&mut command("dnf", &args), "dnf remove").await;
        }
    }
}
