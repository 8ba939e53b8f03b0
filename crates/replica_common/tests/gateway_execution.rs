//! Executor gateway against fake executor scripts

mod common;

use common::*;
use replica_common::config::ToolingConfig;
use replica_common::resolver::resolve;
use replica_common::{
    ActionOptions, Classification, ExecutorGateway, NodeDraft, NodeProfile, ResolvedConfig,
    TopologyAction,
};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn node(id: &str, host: &str, server_id: u32) -> NodeProfile {
    NodeDraft::new(id, host, 3306, "root", &format!("{}-pw", id), server_id)
        .into_profile(id.to_string())
        .unwrap()
}

fn resolved(action: TopologyAction, options: ActionOptions) -> ResolvedConfig {
    let (a, b) = (node("a", "10.0.0.1", 1), node("b", "10.0.0.2", 2));
    resolve(Some(&a), Some(&b), action, &options).unwrap()
}

fn setup_options() -> ActionOptions {
    ActionOptions {
        data_strategy: Some("keepB".to_string()),
        dangerous_reset: Some(true),
        enable_persist: Some(false),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_missing_executor_never_spawns() {
    let dir = TempDir::new().unwrap();
    let gateway = ExecutorGateway::new(
        executor(dir.path().join("absent.sh"), 30),
        present_tooling(),
    );

    let result = gateway.execute(&resolved(TopologyAction::MmSetup, setup_options())).await;

    assert_eq!(result.classification, Classification::MissingExecutor);
    assert!(!result.ok);
    assert!(result.stdout.is_empty());
    assert!(result.stderr.contains("absent.sh"));
}

#[tokio::test]
async fn test_missing_tooling_never_spawns() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    let script = write_script(dir.path(), "x.sh", &format!("touch {}", marker.display()));
    let tooling = ToolingConfig {
        mysqldump_bin: "replica-no-such-mysqldump".to_string(),
        ..present_tooling()
    };
    let gateway = ExecutorGateway::new(executor(script, 30), tooling);

    let result = gateway.execute(&resolved(TopologyAction::MmStatus, ActionOptions::default())).await;

    assert_eq!(result.classification, Classification::MissingTooling);
    assert!(result.stderr.contains("replica-no-such-mysqldump"));
    assert!(!marker.exists());
}

#[tokio::test]
async fn test_missing_interpreter_is_missing_tooling() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    let script = write_script(dir.path(), "x.sh", &format!("touch {}", marker.display()));
    let mut executor = executor(script, 30);
    executor.interpreter = "replica-no-such-shell".to_string();
    let gateway = ExecutorGateway::new(executor, present_tooling());

    let result = gateway.execute(&resolved(TopologyAction::MmStatus, ActionOptions::default())).await;

    assert_eq!(result.classification, Classification::MissingTooling);
    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("replica-no-such-shell"));
    assert!(!marker.exists());
}

#[tokio::test]
async fn test_configuration_arrives_through_environment() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dump.sh", ENV_DUMP_SCRIPT);
    let gateway = ExecutorGateway::new(executor(script, 30), present_tooling());

    let result = gateway.execute(&resolved(TopologyAction::MmSetup, setup_options())).await;
    assert_eq!(result.classification, Classification::Success, "stderr: {}", result.stderr);

    let env = parse_env(&result.stdout);
    assert_eq!(env_value(&env, "ACTION"), Some("setup"));
    assert_eq!(env_value(&env, "DATA_STRATEGY"), Some("keepB"));
    assert_eq!(env_value(&env, "A_ROOT_PASS"), Some("a-pw"));
    assert_eq!(env_value(&env, "B_HOST"), Some("10.0.0.2"));
    assert_eq!(env_value(&env, "DANGEROUS_RESET_MASTER"), Some("1"));
    assert_eq!(env_value(&env, "ENABLE_SET_PERSIST"), Some("0"));
    assert_eq!(env_value(&env, "REPL_USER"), Some("repl"));
    assert_eq!(env_value(&env, "MS_MASTER"), None);
}

#[tokio::test]
async fn test_credentials_not_in_arguments() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "args.sh", r#"echo "argc=$#""#);
    let gateway = ExecutorGateway::new(executor(script, 30), present_tooling());

    let result = gateway.execute(&resolved(TopologyAction::MmSetup, setup_options())).await;
    assert_eq!(result.stdout.trim(), "argc=0");
}

#[tokio::test]
async fn test_nonzero_exit_is_executor_failure() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "fail.sh", "echo 'replication error' >&2; exit 4");
    let gateway = ExecutorGateway::new(executor(script, 30), present_tooling());

    let result = gateway.execute(&resolved(TopologyAction::MsStatus, ActionOptions::default())).await;

    assert_eq!(result.classification, Classification::ExecutorFailure);
    assert_eq!(result.exit_code, 4);
    assert_eq!(result.stderr.trim(), "replication error");
}

#[tokio::test]
async fn test_timeout_preserves_partial_stdout() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "slow.sh", "echo 'dumping A'; echo 'noise' >&2; sleep 30; echo done");
    let gateway = ExecutorGateway::new(executor(script, 1), present_tooling());

    let started = Instant::now();
    let result = gateway.execute(&resolved(TopologyAction::MmSetup, setup_options())).await;

    assert!(started.elapsed() < Duration::from_secs(15));
    assert_eq!(result.classification, Classification::Timeout);
    assert!(!result.ok);
    assert_eq!(result.stdout, "dumping A\n");
    assert!(result.stderr.contains("timed out"));
    assert!(!result.stderr.contains("noise"));
}

#[tokio::test]
async fn test_stale_setup_keys_removed_from_inherited_env() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "dump.sh", ENV_DUMP_SCRIPT);
    let gateway = ExecutorGateway::new(executor(script, 30), present_tooling());

    std::env::set_var("DATA_STRATEGY", "clean");
    std::env::set_var("MS_MASTER", "B");
    let result = gateway.execute(&resolved(TopologyAction::MsBreak, setup_options())).await;
    std::env::remove_var("DATA_STRATEGY");
    std::env::remove_var("MS_MASTER");

    let env = parse_env(&result.stdout);
    assert_eq!(env_value(&env, "ACTION"), Some("break_ms"));
    assert_eq!(env_value(&env, "DATA_STRATEGY"), None);
    assert_eq!(env_value(&env, "MS_MASTER"), None);
}
