//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap. Keeps argument parsing separate
//! from execution logic.

use clap::{Args, Parser, Subcommand, ValueEnum};
use replica_common::{ActionOptions, NodeDraft, Verb};
use std::path::PathBuf;

/// MySQL master-master / master-slave replication control
#[derive(Parser, Debug)]
#[command(name = "replicactl")]
#[command(about = "Manage MySQL replication between pairs of registered nodes", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (overrides $REPLICA_CONFIG and the default locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Node registry file (overrides data_file from the config)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage registered nodes
    Node {
        #[command(subcommand)]
        action: NodeCommands,
    },

    /// Master-master (bidirectional) replication
    Mm {
        verb: VerbArg,

        #[command(flatten)]
        pair: PairArgs,

        /// Authoritative data before setup: keepA, keepB or clean
        #[arg(long)]
        data_strategy: Option<String>,
    },

    /// Master-slave (unidirectional) replication
    Ms {
        verb: VerbArg,

        #[command(flatten)]
        pair: PairArgs,

        /// Which node becomes master on setup: A or B
        #[arg(long)]
        master: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// List registered nodes
    List {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show one node
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// Register a new node
    Add(NodeFields),

    /// Replace every field of an existing node
    Edit {
        id: String,
        #[command(flatten)]
        fields: NodeFields,
    },

    /// Remove a node (no-op if absent)
    Delete { id: String },

    /// Run a connectivity check against a node
    Test {
        id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct NodeFields {
    /// Display name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub host: String,

    #[arg(long, default_value_t = 3306)]
    pub port: u16,

    #[arg(long)]
    pub user: String,

    #[arg(long)]
    pub password: String,

    /// MySQL server_id (must differ between the two nodes of a pair)
    #[arg(long)]
    pub server_id: u32,

    #[arg(long, default_value_t = 2)]
    pub auto_inc_increment: u32,

    #[arg(long, default_value_t = 1)]
    pub auto_inc_offset: u32,
}

impl NodeFields {
    pub fn into_draft(self) -> NodeDraft {
        NodeDraft::new(
            &self.name,
            &self.host,
            self.port,
            &self.user,
            &self.password,
            self.server_id,
        )
        .with_auto_increment(self.auto_inc_increment, self.auto_inc_offset)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbArg {
    Setup,
    Status,
    Break,
}

impl From<VerbArg> for Verb {
    fn from(v: VerbArg) -> Self {
        match v {
            VerbArg::Setup => Verb::Setup,
            VerbArg::Status => Verb::Status,
            VerbArg::Break => Verb::Break,
        }
    }
}

/// Node pair and switches shared by mm and ms
#[derive(Args, Debug, Clone)]
pub struct PairArgs {
    /// Registry id of node A
    #[arg(long = "node-a")]
    pub node_a: String,

    /// Registry id of node B
    #[arg(long = "node-b")]
    pub node_b: String,

    /// Allow resetting binary-log/master state (true|false; required for setup and break)
    #[arg(long)]
    pub dangerous_reset: Option<bool>,

    /// Persist configuration changes with SET PERSIST (true|false; required for setup and break)
    #[arg(long)]
    pub enable_persist: Option<bool>,

    /// Replication account name
    #[arg(long)]
    pub repl_user: Option<String>,

    /// Replication account password
    #[arg(long)]
    pub repl_pass: Option<String>,

    /// Output JSON only
    #[arg(long)]
    pub json: bool,
}

impl PairArgs {
    pub fn options(&self, data_strategy: Option<String>, ms_master: Option<String>) -> ActionOptions {
        ActionOptions {
            data_strategy,
            ms_master,
            dangerous_reset: self.dangerous_reset,
            enable_persist: self.enable_persist,
            repl_user: self.repl_user.clone(),
            repl_pass: self.repl_pass.clone(),
        }
    }
}
