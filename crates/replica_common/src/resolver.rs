//! Topology action resolver.
//!
//! Turns two node profiles, an action and the caller's options into the
//! exact configuration the executor receives. Validation failures are
//! returned as values and never reach the executor.

use crate::action::{DataStrategy, MsMaster, TopologyAction, TopologyMode, Verb};
use crate::error::ValidationError;
use crate::node::NodeProfile;
use crate::{DEFAULT_REPL_PASS, DEFAULT_REPL_USER};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Caller-supplied options, unvalidated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionOptions {
    /// keepA | keepB | clean (master-master setup only)
    pub data_strategy: Option<String>,
    /// A | B (master-slave setup only)
    pub ms_master: Option<String>,
    pub dangerous_reset: Option<bool>,
    pub enable_persist: Option<bool>,
    pub repl_user: Option<String>,
    pub repl_pass: Option<String>,
}

/// Setup-only choice; exactly one kind per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupChoice {
    DataStrategy(DataStrategy),
    MsMaster(MsMaster),
}

/// Non-fatal findings about the node pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveWarning {
    /// Both nodes have the same server_id in a master-master pair
    SharedServerId(u32),
    /// A and B are the same registry entry
    SameNode(String),
}

impl std::fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveWarning::SharedServerId(id) => {
                write!(f, "nodes A and B share server_id {}; master-master replication needs distinct ids", id)
            }
            ResolveWarning::SameNode(id) => write!(f, "node A and node B are the same node ({})", id),
        }
    }
}

/// Fully resolved executor configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub action: TopologyAction,
    pub node_a: NodeProfile,
    pub node_b: NodeProfile,
    pub repl_user: String,
    pub repl_pass: String,
    pub dangerous_reset: bool,
    pub enable_persist: bool,
    /// Present only for setup actions
    pub setup: Option<SetupChoice>,
    pub warnings: Vec<ResolveWarning>,
}

impl ResolvedConfig {
    pub fn data_strategy(&self) -> Option<DataStrategy> {
        match self.setup {
            Some(SetupChoice::DataStrategy(s)) => Some(s),
            _ => None,
        }
    }

    pub fn ms_master(&self) -> Option<MsMaster> {
        match self.setup {
            Some(SetupChoice::MsMaster(m)) => Some(m),
            _ => None,
        }
    }
}

pub fn resolve(
    node_a: Option<&NodeProfile>,
    node_b: Option<&NodeProfile>,
    action: TopologyAction,
    options: &ActionOptions,
) -> Result<ResolvedConfig, ValidationError> {
    let node_a = node_a.ok_or(ValidationError::MissingNode("A"))?;
    let node_b = node_b.ok_or(ValidationError::MissingNode("B"))?;

    let setup = match (action.mode(), action.verb()) {
        (TopologyMode::MasterMaster, Verb::Setup) => {
            let raw = options
                .data_strategy
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .ok_or(ValidationError::MissingDataStrategy)?;
            Some(SetupChoice::DataStrategy(raw.parse()?))
        }
        (TopologyMode::MasterSlave, Verb::Setup) => {
            let raw = options
                .ms_master
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .ok_or(ValidationError::MissingMsMaster)?;
            Some(SetupChoice::MsMaster(raw.parse()?))
        }
        // Status and Break never carry setup intent
        _ => None,
    };

    let dangerous_reset = require_switch(options.dangerous_reset, "dangerous_reset", action)?;
    let enable_persist = require_switch(options.enable_persist, "enable_persist", action)?;

    let mut warnings = Vec::new();
    if node_a.id == node_b.id {
        warnings.push(ResolveWarning::SameNode(node_a.id.clone()));
    }
    if action.mode() == TopologyMode::MasterMaster && node_a.server_id == node_b.server_id {
        warnings.push(ResolveWarning::SharedServerId(node_a.server_id));
    }
    for w in &warnings {
        warn!("{}: {}", action, w);
    }

    Ok(ResolvedConfig {
        action,
        node_a: node_a.clone(),
        node_b: node_b.clone(),
        repl_user: non_blank(options.repl_user.as_deref()).unwrap_or(DEFAULT_REPL_USER).to_string(),
        repl_pass: non_blank(options.repl_pass.as_deref()).unwrap_or(DEFAULT_REPL_PASS).to_string(),
        dangerous_reset,
        enable_persist,
        setup,
        warnings,
    })
}

/// Setup and Break touch irreversible state, so their switches must be
/// explicit. Status falls back to off.
fn require_switch(
    value: Option<bool>,
    name: &'static str,
    action: TopologyAction,
) -> Result<bool, ValidationError> {
    match (value, action.verb()) {
        (Some(v), _) => Ok(v),
        (None, Verb::Status) => Ok(false),
        (None, Verb::Setup) => Err(ValidationError::MissingSwitch(name, "setup")),
        (None, Verb::Break) => Err(ValidationError::MissingSwitch(name, "break")),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
