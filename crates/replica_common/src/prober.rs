//! Connectivity prober - one trivial query against one node.

use crate::config::{ProbeConfig, ToolingConfig};
use crate::node::NodeProfile;
use crate::result::{Clock, ExecutionResult};
use crate::tooling::{locate, run_bounded, RunOutcome};
use tokio::process::Command;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Prober {
    tooling: ToolingConfig,
    probe: ProbeConfig,
}

impl Prober {
    pub fn new(tooling: ToolingConfig, probe: ProbeConfig) -> Self {
        Self { tooling, probe }
    }

    /// Client arguments for `node`, in batch/no-header mode
    pub fn client_args(&self, node: &NodeProfile) -> Vec<String> {
        vec![
            format!("--host={}", node.host),
            format!("--port={}", node.port),
            format!("--user={}", node.user),
            format!("--password={}", node.password),
            "--batch".to_string(),
            "--skip-column-names".to_string(),
            format!("--ssl-mode={}", self.tooling.ssl_mode),
            "-e".to_string(),
            self.probe.query.clone(),
        ]
    }

    pub async fn probe(&self, node: &NodeProfile) -> ExecutionResult {
        let clock = Clock::start();

        if locate(&self.tooling.mysql_bin).is_none() {
            warn!("Probe skipped: '{}' not found", self.tooling.mysql_bin);
            return ExecutionResult::missing_tooling(
                format!("MySQL client '{}' is not installed.", self.tooling.mysql_bin),
                &clock,
            );
        }

        debug!("Probing {} as {}", node.endpoint(), node.user);
        let mut command = Command::new(&self.tooling.mysql_bin);
        command.args(self.client_args(node));

        let result = match run_bounded(command, self.probe.timeout()).await {
            RunOutcome::Completed { code, stdout, stderr } => {
                ExecutionResult::completed(code, stdout, stderr, &clock)
            }
            // Output from a probe that never finished is not trusted
            RunOutcome::TimedOut { .. } => ExecutionResult::timed_out(
                String::new(),
                format!(
                    "Connection test timed out after {}s; check network and database status.",
                    self.probe.timeout_secs
                ),
                &clock,
            ),
            RunOutcome::SpawnFailed(e) => ExecutionResult::spawn_failed(
                format!("Failed to start '{}': {}", self.tooling.mysql_bin, e),
                &clock,
            ),
        };

        info!(
            "Probe {} ({}): {}",
            node.name,
            node.endpoint(),
            result.classification
        );
        result
    }
}
