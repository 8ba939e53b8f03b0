//! Error types for the replica core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplicaError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid node profile: {0}")]
    InvalidNode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReplicaError {
    pub fn code(&self) -> &'static str {
        match self {
            ReplicaError::NodeNotFound(_) => "not_found",
            ReplicaError::InvalidNode(_) => "invalid_node",
            ReplicaError::Io(_) => "io",
            ReplicaError::Json(_) => "json",
        }
    }
}

/// Rejection produced by the resolver before anything reaches the executor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("data strategy is required for master-master setup (keepA, keepB or clean)")]
    MissingDataStrategy,

    #[error("invalid data strategy '{0}': expected keepA, keepB or clean")]
    InvalidDataStrategy(String),

    #[error("master selection is required for master-slave setup (A or B)")]
    MissingMsMaster,

    #[error("invalid master selection '{0}': expected A or B")]
    InvalidMsMaster(String),

    #[error("'{0}' must be set explicitly for {1}")]
    MissingSwitch(&'static str, &'static str),

    #[error("node {0} is missing")]
    MissingNode(&'static str),

    #[error("unknown action '{0}'")]
    UnknownAction(String),
}
