//! Shared core for the replica control plane.
//!
//! Holds the node registry, the topology action resolver, the executor
//! gateway, the connectivity prober and the result classifier. The CLI
//! (replicactl) is a thin caller on top of [`orchestrator::Orchestrator`].

pub mod action;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gateway;
pub mod node;
pub mod orchestrator;
pub mod prober;
pub mod registry;
pub mod resolver;
pub mod result;
pub mod tooling;

pub use action::{DataStrategy, MsMaster, TopologyAction, TopologyMode, Verb};
pub use classifier::Classification;
pub use config::ReplicaConfig;
pub use error::{ReplicaError, ValidationError};
pub use gateway::ExecutorGateway;
pub use node::{NodeDraft, NodeProfile};
pub use orchestrator::{Orchestrator, TopologyCommand};
pub use prober::Prober;
pub use registry::NodeRegistry;
pub use resolver::{ActionOptions, ResolveWarning, ResolvedConfig};
pub use result::ExecutionResult;

/// Default replication account name when the caller supplies none
pub const DEFAULT_REPL_USER: &str = "repl";

/// Default replication account password when the caller supplies none
pub const DEFAULT_REPL_PASS: &str = "repl_password";
