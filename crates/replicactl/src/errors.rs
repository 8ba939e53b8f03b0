//! Exit codes for replicactl
//!
//! Each result classification has its own exit status so scripts can branch
//! without parsing output.

use replica_common::{Classification, ReplicaError};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors (I/O, config)
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Executor or client ran and exited non-zero
pub const EXIT_EXECUTOR_FAILURE: i32 = 2;

/// Request rejected before execution
pub const EXIT_RESOLUTION_ERROR: i32 = 65;

/// Referenced node id is not registered
pub const EXIT_NOT_FOUND: i32 = 66;

/// Executor script is missing
pub const EXIT_MISSING_EXECUTOR: i32 = 69;

/// mysql / mysqldump not installed
pub const EXIT_MISSING_TOOLING: i32 = 72;

/// Operation exceeded its time limit
pub const EXIT_TIMEOUT: i32 = 124;

pub fn exit_code_for(classification: Classification) -> i32 {
    match classification {
        Classification::Success => EXIT_SUCCESS,
        Classification::ExecutorFailure => EXIT_EXECUTOR_FAILURE,
        Classification::ResolutionError => EXIT_RESOLUTION_ERROR,
        Classification::MissingExecutor => EXIT_MISSING_EXECUTOR,
        Classification::MissingTooling => EXIT_MISSING_TOOLING,
        Classification::Timeout => EXIT_TIMEOUT,
    }
}

/// Exit code for an error that escaped a command
pub fn exit_code_for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ReplicaError>() {
        Some(ReplicaError::NodeNotFound(_)) => EXIT_NOT_FOUND,
        Some(ReplicaError::InvalidNode(_)) => EXIT_RESOLUTION_ERROR,
        _ => EXIT_GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifications_have_distinct_codes() {
        let all = [
            Classification::Success,
            Classification::ExecutorFailure,
            Classification::ResolutionError,
            Classification::MissingExecutor,
            Classification::MissingTooling,
            Classification::Timeout,
        ];
        let mut codes: Vec<i32> = all.iter().map(|c| exit_code_for(*c)).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
        assert!(!codes.contains(&EXIT_NOT_FOUND));
    }

    #[test]
    fn test_not_found_error_code() {
        let err = anyhow::Error::new(ReplicaError::NodeNotFound("x".to_string()));
        assert_eq!(exit_code_for_error(&err), EXIT_NOT_FOUND);

        let other = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code_for_error(&other), EXIT_GENERAL_ERROR);
    }
}
