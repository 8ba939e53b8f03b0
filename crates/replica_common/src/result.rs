//! Structured result of a topology action or connectivity probe.

use crate::classifier::{classify, Classification, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// 0 means success by convention
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub ok: bool,
    pub classification: Classification,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Resolver warnings that did not block the operation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExecutionResult {
    fn from_outcome(outcome: Outcome, stdout: String, stderr: String, started: &Clock) -> Self {
        let classification = classify(&outcome);
        Self {
            exit_code: outcome.exit_code(),
            stdout,
            stderr,
            ok: classification.is_success(),
            classification,
            started_at: started.at,
            duration_ms: started.elapsed_ms(),
            warnings: Vec::new(),
        }
    }

    /// The process ran; `code` is `None` when it was killed by a signal
    pub fn completed(code: Option<i32>, stdout: String, stderr: String, started: &Clock) -> Self {
        Self::from_outcome(Outcome::Exited(code), stdout, stderr, started)
    }

    pub fn missing_executor(message: String, started: &Clock) -> Self {
        Self::from_outcome(Outcome::ExecutorMissing, String::new(), message, started)
    }

    pub fn missing_tooling(message: String, started: &Clock) -> Self {
        Self::from_outcome(Outcome::ToolingMissing, String::new(), message, started)
    }

    /// Timed out; whatever stdout was captured is kept, stderr is replaced
    pub fn timed_out(partial_stdout: String, message: String, started: &Clock) -> Self {
        Self::from_outcome(Outcome::TimedOut, partial_stdout, message, started)
    }

    pub fn spawn_failed(message: String, started: &Clock) -> Self {
        Self::from_outcome(Outcome::SpawnFailed, String::new(), message, started)
    }

    /// Rejected by the resolver; the executor was never involved
    pub fn rejected(message: String) -> Self {
        Self::from_outcome(Outcome::Rejected, String::new(), message, &Clock::start())
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Wall-clock start marker for timing results
#[derive(Debug, Clone)]
pub struct Clock {
    at: DateTime<Utc>,
    instant: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            at: Utc::now(),
            instant: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.instant.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_ok_follows_exit_code() {
        let clock = Clock::start();
        let ok = ExecutionResult::completed(Some(0), "1\n".to_string(), String::new(), &clock);
        assert!(ok.ok);
        assert_eq!(ok.classification, Classification::Success);

        let failed = ExecutionResult::completed(Some(2), String::new(), "boom".to_string(), &clock);
        assert!(!failed.ok);
        assert_eq!(failed.exit_code, 2);
        assert_eq!(failed.classification, Classification::ExecutorFailure);
    }

    #[test]
    fn test_timed_out_keeps_partial_stdout() {
        let r = ExecutionResult::timed_out("step 1\n".to_string(), "timed out".to_string(), &Clock::start());
        assert!(!r.ok);
        assert_eq!(r.stdout, "step 1\n");
        assert_eq!(r.stderr, "timed out");
        assert_eq!(r.classification, Classification::Timeout);
    }

    #[test]
    fn test_warnings_omitted_from_json_when_empty() {
        let r = ExecutionResult::rejected("bad".to_string());
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("warnings").is_none());
        assert_eq!(json["classification"], "resolution_error");
    }
}
