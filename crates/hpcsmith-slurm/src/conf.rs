//! slurm.conf rendering for a single-node deployment.

use crate::paths::SlurmPaths;

/// Service account the daemons run as.
pub const SLURM_USER: &str = "slurm";

/// Inputs for rendering slurm.conf.
#[derive(Debug)]
pub struct ConfContext<'a> {
    pub cluster_name: &'a str,
    /// Hostname acting as both controller and the single compute node.
    pub control_host: &'a str,
    /// Logical CPUs advertised for the node entry.
    pub cpus: usize,
    pub paths: &'a SlurmPaths,
}

/// Render a complete single-node slurm.conf.
///
/// Cgroup tracking is disabled so the configuration works in containers
/// and minimal VMs; the whole host becomes one node in one default
/// partition.
pub fn render(ctx: &ConfContext) -> String {
    let ConfContext {
        cluster_name,
        control_host,
        cpus,
        paths,
    } = ctx;

    format!(
        r#"ClusterName={cluster_name}
SlurmctldHost={control_host}

SlurmUser={SLURM_USER}
StateSaveLocation={state_save}
SlurmdSpoolDir={spool_dir}

AuthType=auth/munge
ProctrackType=proctrack/linuxproc
TaskPlugin=task/none
JobAcctGatherType=jobacct_gather/none
CgroupPlugin=disabled

SlurmctldPidFile={run_dir}/slurmctld.pid
SlurmdPidFile={run_dir}/slurmd.pid

SlurmctldLogFile={log_dir}/slurmctld.log
SlurmdLogFile={log_dir}/slurmd.log

SelectType=select/cons_tres
SchedulerType=sched/backfill

NodeName={control_host} CPUs={cpus} State=UNKNOWN
PartitionName=debug Nodes={control_host} Default=YES MaxTime=INFINITE State=UP
"#,
        state_save = paths.ctld_spool,
        spool_dir = paths.d_spool,
        run_dir = paths.run_dir,
        log_dir = paths.log_dir,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_node_conf() {
        let paths = SlurmPaths::default();
        let conf = render(&ConfContext {
            cluster_name: "cluster",
            control_host: "node01",
            cpus: 8,
            paths: &paths,
        });

        assert!(conf.contains("ClusterName=cluster"));
        assert!(conf.contains("SlurmctldHost=node01"));
        assert!(conf.contains("SlurmUser=slurm"));
        assert!(conf.contains("StateSaveLocation=/var/spool/slurmctld"));
        assert!(conf.contains("SlurmdSpoolDir=/var/spool/slurmd"));
        assert!(conf.contains("AuthType=auth/munge"));
        assert!(conf.contains("SlurmctldPidFile=/run/slurm/slurmctld.pid"));
        assert!(conf.contains("NodeName=node01 CPUs=8 State=UNKNOWN"));
        assert!(conf.contains("PartitionName=debug Nodes=node01 Default=YES"));
    }

    #[test]
    fn test_render_follows_relocated_paths() {
        let paths = SlurmPaths::under(camino::Utf8Path::new("/sandbox"));
        let conf = render(&ConfContext {
            cluster_name: "bench",
            control_host: "h",
            cpus: 1,
            paths: &paths,
        });

        assert!(conf.contains("StateSaveLocation=/sandbox/var/spool/slurmctld"));
        assert!(conf.contains("SlurmdLogFile=/sandbox/var/log/slurm/slurmd.log"));
    }
}
