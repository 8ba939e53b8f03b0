//! Rendering of nodes and execution results.
//!
//! Passwords are never printed; JSON output drops them entirely.

use owo_colors::OwoColorize;
use replica_common::{Classification, ExecutionResult, NodeProfile};
use serde::Serialize;
use std::fmt::Write as _;

/// Node as shown to the user (no password)
#[derive(Debug, Serialize)]
pub struct NodeView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub user: &'a str,
    pub server_id: u32,
    pub auto_increment_increment: u32,
    pub auto_increment_offset: u32,
}

impl<'a> From<&'a NodeProfile> for NodeView<'a> {
    fn from(n: &'a NodeProfile) -> Self {
        Self {
            id: &n.id,
            name: &n.name,
            host: &n.host,
            port: n.port,
            user: &n.user,
            server_id: n.server_id,
            auto_increment_increment: n.auto_increment_increment,
            auto_increment_offset: n.auto_increment_offset,
        }
    }
}

pub fn nodes_json(nodes: &[NodeProfile]) -> serde_json::Result<String> {
    let views: Vec<NodeView> = nodes.iter().map(NodeView::from).collect();
    serde_json::to_string_pretty(&views)
}

pub fn node_json(node: &NodeProfile) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&NodeView::from(node))
}

pub fn nodes_table(nodes: &[NodeProfile]) -> String {
    if nodes.is_empty() {
        return "No nodes registered. Add one with `replicactl node add`.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:<16}  {:<24}  {:<12}  {:>9}  {:>7}",
        "ID", "NAME", "ENDPOINT", "USER", "SERVER_ID", "AUTO_INC"
    );
    for n in nodes {
        let _ = writeln!(
            out,
            "{:<36}  {:<16}  {:<24}  {:<12}  {:>9}  {:>7}",
            n.id,
            n.name,
            n.endpoint(),
            n.user,
            n.server_id,
            format!("{}/{}", n.auto_increment_increment, n.auto_increment_offset)
        );
    }
    out
}

pub fn node_detail(n: &NodeProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", n.name.bold());
    let _ = writeln!(out, "  id:        {}", n.id);
    let _ = writeln!(out, "  endpoint:  {}", n.endpoint());
    let _ = writeln!(out, "  user:      {}", n.user);
    let _ = writeln!(out, "  password:  ********");
    let _ = writeln!(out, "  server_id: {}", n.server_id);
    let _ = writeln!(
        out,
        "  auto_increment_increment/offset: {}/{}",
        n.auto_increment_increment, n.auto_increment_offset
    );
    out
}

fn headline(classification: Classification) -> String {
    let label = match classification {
        Classification::Success => "OK".to_string(),
        Classification::ResolutionError => "REJECTED".to_string(),
        Classification::MissingExecutor => "MISSING EXECUTOR".to_string(),
        Classification::MissingTooling => "MISSING TOOLING".to_string(),
        Classification::Timeout => "TIMEOUT".to_string(),
        Classification::ExecutorFailure => "FAILED".to_string(),
    };
    if classification.is_success() {
        label.green().bold().to_string()
    } else {
        label.red().bold().to_string()
    }
}

/// Human-readable result block
pub fn result_text(title: &str, result: &ExecutionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} (exit {}, {}ms)",
        headline(result.classification),
        title,
        result.exit_code,
        result.duration_ms
    );
    for w in &result.warnings {
        let _ = writeln!(out, "{} {}", "warning:".yellow(), w);
    }
    if !result.stdout.trim().is_empty() {
        let _ = writeln!(out, "{}", "--- stdout ---".dimmed());
        let _ = writeln!(out, "{}", result.stdout.trim_end());
    }
    if !result.stderr.trim().is_empty() {
        let _ = writeln!(out, "{}", "--- stderr ---".dimmed());
        let _ = writeln!(out, "{}", result.stderr.trim_end());
    }
    out
}
