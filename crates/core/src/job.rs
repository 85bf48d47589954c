//! Generation job model and its state machine.
//!
//! A job moves `Queued -> Running -> {Done | Failed}`. Both terminal
//! states are final; a failed job is never re-queued.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{JobId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of jobs queued by a plain `generate` when no count was chosen.
pub const DEFAULT_ENQUEUE_COUNT: u32 = 1;

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a single job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// `Done` and `Failed` are final.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Self::Queued, Self::Running)
                | (Self::Running, Self::Done)
                | (Self::Running, Self::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One queued invocation of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
}

impl Job {
    /// A freshly enqueued job.
    pub fn queued(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
        }
    }

    /// Apply a status transition, rejecting moves the state machine forbids.
    pub fn transition(&mut self, next: JobStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Build a job id from an enqueue timestamp and a queue-wide sequence number.
///
/// The sequence keeps ids unique when several batches land in the same
/// millisecond.
pub fn job_id(at: Timestamp, seq: u64) -> JobId {
    format!("{}-{}", at.timestamp_millis(), seq)
}

/// Largest number of jobs a single enqueue may add.
pub const MAX_ENQUEUE_COUNT: u32 = 1000;

/// Validate the number of jobs requested by a single enqueue.
pub fn validate_enqueue_count(count: u32) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::Validation(
            "Job count must be a positive integer".to_string(),
        ));
    }
    if count > MAX_ENQUEUE_COUNT {
        return Err(CoreError::Validation(format!(
            "Job count must be at most {MAX_ENQUEUE_COUNT}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
