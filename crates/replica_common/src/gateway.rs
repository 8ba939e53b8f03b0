//! Executor gateway - the only place that launches the replication executor.
//!
//! The resolved configuration reaches the executor through its environment
//! only, never argv, so credentials do not show up in process listings.
//! Nothing here retries: a half-applied replication change needs a human.

use crate::config::{ExecutorConfig, ToolingConfig};
use crate::node::NodeProfile;
use crate::resolver::ResolvedConfig;
use crate::result::{Clock, ExecutionResult};
use crate::tooling::{locate, missing_tools, run_bounded, RunOutcome};
use std::collections::BTreeMap;
use tokio::process::Command;
use tracing::{error, info, warn};

pub const KEY_ACTION: &str = "ACTION";
pub const KEY_DATA_STRATEGY: &str = "DATA_STRATEGY";
pub const KEY_MS_MASTER: &str = "MS_MASTER";

/// Keys that must not leak in from the parent environment when unset
const SETUP_ONLY_KEYS: [&str; 2] = [KEY_DATA_STRATEGY, KEY_MS_MASTER];

fn flag(value: bool) -> String {
    let v = if value { "1" } else { "0" };
    v.to_string()
}

fn insert_node(env: &mut BTreeMap<&'static str, String>, keys: &NodeKeys, node: &NodeProfile) {
    env.insert(keys.host, node.host.clone());
    env.insert(keys.port, node.port.to_string());
    env.insert(keys.user, node.user.clone());
    env.insert(keys.pass, node.password.clone());
    env.insert(keys.server_id, node.server_id.to_string());
    env.insert(keys.auto_inc_increment, node.auto_increment_increment.to_string());
    env.insert(keys.auto_inc_offset, node.auto_increment_offset.to_string());
}

struct NodeKeys {
    host: &'static str,
    port: &'static str,
    user: &'static str,
    pass: &'static str,
    server_id: &'static str,
    auto_inc_increment: &'static str,
    auto_inc_offset: &'static str,
}

const NODE_A_KEYS: NodeKeys = NodeKeys {
    host: "A_HOST",
    port: "A_PORT",
    user: "A_ROOT_USER",
    pass: "A_ROOT_PASS",
    server_id: "A_SERVER_ID",
    auto_inc_increment: "A_AUTO_INC_INCREMENT",
    auto_inc_offset: "A_AUTO_INC_OFFSET",
};

const NODE_B_KEYS: NodeKeys = NodeKeys {
    host: "B_HOST",
    port: "B_PORT",
    user: "B_ROOT_USER",
    pass: "B_ROOT_PASS",
    server_id: "B_SERVER_ID",
    auto_inc_increment: "B_AUTO_INC_INCREMENT",
    auto_inc_offset: "B_AUTO_INC_OFFSET",
};

/// Flatten a resolved configuration into the executor's environment keys
pub fn env_pairs(config: &ResolvedConfig) -> BTreeMap<&'static str, String> {
    let mut env = BTreeMap::new();
    insert_node(&mut env, &NODE_A_KEYS, &config.node_a);
    insert_node(&mut env, &NODE_B_KEYS, &config.node_b);

    env.insert("REPL_USER", config.repl_user.clone());
    env.insert("REPL_PASS", config.repl_pass.clone());
    env.insert("DANGEROUS_RESET_MASTER", flag(config.dangerous_reset));
    env.insert("ENABLE_SET_PERSIST", flag(config.enable_persist));
    env.insert(KEY_ACTION, config.action.wire_name().to_string());

    if let Some(strategy) = config.data_strategy() {
        env.insert(KEY_DATA_STRATEGY, strategy.wire_name().to_string());
    }
    if let Some(master) = config.ms_master() {
        env.insert(KEY_MS_MASTER, master.wire_name().to_string());
    }
    env
}

/// Launches the executor script as a bounded subprocess
#[derive(Debug, Clone)]
pub struct ExecutorGateway {
    executor: ExecutorConfig,
    tooling: ToolingConfig,
}

impl ExecutorGateway {
    pub fn new(executor: ExecutorConfig, tooling: ToolingConfig) -> Self {
        Self { executor, tooling }
    }

    pub async fn execute(&self, config: &ResolvedConfig) -> ExecutionResult {
        let clock = Clock::start();
        let script = &self.executor.script_path;

        if !script.is_file() {
            error!("Executor script not found: {}", script.display());
            return ExecutionResult::missing_executor(
                format!("Executor script not found: {}", script.display()),
                &clock,
            );
        }

        if locate(&self.executor.interpreter).is_none() {
            error!("Executor interpreter not found: {}", self.executor.interpreter);
            return ExecutionResult::missing_tooling(
                format!(
                    "Executor interpreter '{}' not found; install it or set executor.interpreter.",
                    self.executor.interpreter
                ),
                &clock,
            );
        }

        let missing = missing_tools(&[self.tooling.mysql_bin.as_str(), self.tooling.mysqldump_bin.as_str()]);
        if !missing.is_empty() {
            error!("Required client tools missing: {}", missing.join(", "));
            return ExecutionResult::missing_tooling(
                format!(
                    "Required MySQL client tools not found: {}. Install the mysql client package.",
                    missing.join(", ")
                ),
                &clock,
            );
        }

        let mut command = Command::new(&self.executor.interpreter);
        command.arg(script);
        for key in SETUP_ONLY_KEYS {
            command.env_remove(key);
        }
        command.envs(env_pairs(config));

        info!(
            "Running {} for {} <-> {} (limit {}s)",
            config.action,
            config.node_a.endpoint(),
            config.node_b.endpoint(),
            self.executor.timeout_secs
        );

        let result = match run_bounded(command, self.executor.timeout()).await {
            RunOutcome::Completed { code, stdout, stderr } => {
                ExecutionResult::completed(code, stdout, stderr, &clock)
            }
            RunOutcome::TimedOut { partial_stdout } => ExecutionResult::timed_out(
                partial_stdout,
                format!(
                    "Execution timed out after {}s; check database network and data volume.",
                    self.executor.timeout_secs
                ),
                &clock,
            ),
            RunOutcome::SpawnFailed(e) => ExecutionResult::spawn_failed(
                format!("Failed to start executor with '{}': {}", self.executor.interpreter, e),
                &clock,
            ),
        };

        if result.ok {
            info!("{} finished in {}ms", config.action, result.duration_ms);
        } else {
            warn!(
                "{} failed: {} (exit {})",
                config.action, result.classification, result.exit_code
            );
        }
        result
    }
}
