//! Replica configuration.
//!
//! TOML file, looked up in order: explicit path, `$REPLICA_CONFIG`,
//! `~/.config/replica/config.toml`, `/etc/replica/config.toml`. Missing
//! keys fall back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment override for the client SSL mode
pub const SSL_MODE_ENV: &str = "MYSQL_SSL_MODE";

/// Environment override for the config file location
pub const CONFIG_ENV: &str = "REPLICA_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaConfig {
    /// Node registry document
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub tooling: ToolingConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub replication: ReplicationDefaults,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/nodes.json")
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            executor: ExecutorConfig::default(),
            tooling: ToolingConfig::default(),
            probe: ProbeConfig::default(),
            replication: ReplicationDefaults::default(),
        }
    }
}

/// External replication executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Script performing the replication commands
    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,

    /// Program the script is handed to
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Hard wall-clock limit (full resyncs of large datasets can be slow)
    #[serde(default = "default_executor_timeout")]
    pub timeout_secs: u64,
}

fn default_script_path() -> PathBuf {
    PathBuf::from("scripts/mysql_replication.sh")
}

fn default_interpreter() -> String {
    "bash".to_string()
}

fn default_executor_timeout() -> u64 {
    3600
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            script_path: default_script_path(),
            interpreter: default_interpreter(),
            timeout_secs: default_executor_timeout(),
        }
    }
}

impl ExecutorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// MySQL client tools the executor and prober depend on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolingConfig {
    #[serde(default = "default_mysql_bin")]
    pub mysql_bin: String,

    #[serde(default = "default_mysqldump_bin")]
    pub mysqldump_bin: String,

    /// Passed as --ssl-mode to the client; MYSQL_SSL_MODE overrides it
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

fn default_mysql_bin() -> String {
    "mysql".to_string()
}

fn default_mysqldump_bin() -> String {
    "mysqldump".to_string()
}

fn default_ssl_mode() -> String {
    "PREFERRED".to_string()
}

impl Default for ToolingConfig {
    fn default() -> Self {
        Self {
            mysql_bin: default_mysql_bin(),
            mysqldump_bin: default_mysqldump_bin(),
            ssl_mode: default_ssl_mode(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_probe_query")]
    pub query: String,
}

fn default_probe_timeout() -> u64 {
    30
}

fn default_probe_query() -> String {
    "SELECT 1;".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
            query: default_probe_query(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Replication account used when the caller does not name one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationDefaults {
    #[serde(default = "default_repl_user")]
    pub user: String,

    #[serde(default = "default_repl_pass")]
    pub password: String,
}

fn default_repl_user() -> String {
    crate::DEFAULT_REPL_USER.to_string()
}

fn default_repl_pass() -> String {
    crate::DEFAULT_REPL_PASS.to_string()
}

impl Default for ReplicationDefaults {
    fn default() -> Self {
        Self {
            user: default_repl_user(),
            password: default_repl_pass(),
        }
    }
}

impl ReplicaConfig {
    /// ~/.config/replica/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Some(Path::new(&xdg).join("replica").join("config.toml"));
        }
        std::env::var("HOME")
            .ok()
            .map(|home| Path::new(&home).join(".config").join("replica").join("config.toml"))
    }

    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/replica/config.toml")
    }

    /// Load configuration, then apply environment overrides.
    ///
    /// An explicitly named file (argument or `$REPLICA_CONFIG`) must exist;
    /// the default locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::load_from(&path)?,
            None => {
                let candidates = Self::user_config_path()
                    .into_iter()
                    .chain(std::iter::once(Self::system_config_path()));
                let mut found = None;
                for path in candidates {
                    if path.exists() {
                        found = Some(Self::load_from(&path)?);
                        break;
                    }
                }
                found.unwrap_or_default()
            }
        };

        if let Ok(mode) = std::env::var(SSL_MODE_ENV) {
            if !mode.trim().is_empty() {
                config.tooling.ssl_mode = mode.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
