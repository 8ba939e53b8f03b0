//! Fixtures shared by the integration tests: fake executors and clients.

#![allow(dead_code)]

use replica_common::config::{ExecutorConfig, ProbeConfig, ReplicaConfig, ToolingConfig};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Executor script that prints the replication keys it received, sorted
pub const ENV_DUMP_SCRIPT: &str = r#"
env | grep -E '^(A_|B_|REPL_|DANGEROUS_RESET_MASTER|ENABLE_SET_PERSIST|ACTION|DATA_STRATEGY|MS_MASTER)' | sort
"#;

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Tooling that always resolves (`sh` stands in for the MySQL clients)
pub fn present_tooling() -> ToolingConfig {
    ToolingConfig {
        mysql_bin: "sh".to_string(),
        mysqldump_bin: "sh".to_string(),
        ssl_mode: "PREFERRED".to_string(),
    }
}

pub fn executor(script: PathBuf, timeout_secs: u64) -> ExecutorConfig {
    ExecutorConfig {
        script_path: script,
        interpreter: "sh".to_string(),
        timeout_secs,
    }
}

/// Full config rooted in `dir` with the given executor script body
pub fn config_with_script(dir: &TempDir, body: &str) -> ReplicaConfig {
    let script = write_script(dir.path(), "replication.sh", body);
    ReplicaConfig {
        data_file: dir.path().join("data").join("nodes.json"),
        executor: executor(script, 30),
        tooling: present_tooling(),
        probe: ProbeConfig::default(),
        ..Default::default()
    }
}

/// Parse `KEY=value` lines into pairs
pub fn parse_env(stdout: &str) -> Vec<(String, String)> {
    stdout
        .lines()
        .filter_map(|l| l.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn env_value<'a>(env: &'a [(String, String)], key: &str) -> Option<&'a str> {
    env.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}
