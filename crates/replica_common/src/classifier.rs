//! Result classification.
//!
//! Callers branch on [`Classification`], never on exit codes or stderr text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to an operation, as far as callers are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Success,
    MissingExecutor,
    MissingTooling,
    Timeout,
    ExecutorFailure,
    /// Rejected before reaching the executor
    ResolutionError,
}

impl Classification {
    pub fn is_success(&self) -> bool {
        matches!(self, Classification::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Success => "success",
            Classification::MissingExecutor => "missing_executor",
            Classification::MissingTooling => "missing_tooling",
            Classification::Timeout => "timeout",
            Classification::ExecutorFailure => "executor_failure",
            Classification::ResolutionError => "resolution_error",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw outcome of a gateway or probe call, before classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The process ran to completion; `None` when killed by a signal
    Exited(Option<i32>),
    ExecutorMissing,
    ToolingMissing,
    TimedOut,
    /// The process could not be started at all
    SpawnFailed,
    /// The request never passed validation
    Rejected,
}

impl Outcome {
    /// Exit code reported to callers. Synthetic failures use 1, signals -1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Exited(Some(code)) => *code,
            Outcome::Exited(None) => -1,
            _ => 1,
        }
    }
}

pub fn classify(outcome: &Outcome) -> Classification {
    match outcome {
        Outcome::Exited(Some(0)) => Classification::Success,
        Outcome::Exited(_) | Outcome::SpawnFailed => Classification::ExecutorFailure,
        Outcome::ExecutorMissing => Classification::MissingExecutor,
        Outcome::ToolingMissing => Classification::MissingTooling,
        Outcome::TimedOut => Classification::Timeout,
        Outcome::Rejected => Classification::ResolutionError,
    }
}
