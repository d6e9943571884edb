//! Job domain types
//!
//! The runner treats the workload as an opaque collaborator behind the
//! [`Job`] trait: a single entry point taking a work limit and reporting
//! success or failure. Everything the runner does with a job outcome flows
//! through [`JobError`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wire tag identifying a job-level failure, as opposed to an
/// infrastructure-level one. Fixed regardless of the underlying error.
pub const JOB_ERROR_TYPE: &str = "JobError";

/// Cap on the amount of work a single job execution may attempt.
///
/// This bounds items processed, not wall-clock time. The default is
/// [`WorkLimit::Unbounded`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkLimit {
    /// Process at most this many items.
    Bounded(u64),
    /// No cap; the job decides when it is done.
    #[default]
    Unbounded,
}

impl WorkLimit {
    /// Returns true if `processed` items have exhausted the limit.
    pub fn is_reached(&self, processed: u64) -> bool {
        match self {
            WorkLimit::Bounded(max) => processed >= *max,
            WorkLimit::Unbounded => false,
        }
    }
}

impl fmt::Display for WorkLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkLimit::Bounded(max) => write!(f, "{}", max),
            WorkLimit::Unbounded => write!(f, "unbounded"),
        }
    }
}

impl FromStr for WorkLimit {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(WorkLimit::Bounded)
    }
}

/// Failure of the opaque job body.
///
/// Always recoverable at the adapter boundary: reported over HTTP in
/// custom-runtime mode, surfaced as a nonzero exit code otherwise.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct JobError {
    pub message: String,
}

impl JobError {
    /// Creates a job error from any displayable source.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for JobError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` flattens the context chain into one line.
        Self::new(format!("{:#}", err))
    }
}

/// The capability the real workload must satisfy.
///
/// Implementations may fail by returning an error; they must not terminate
/// the process themselves. The runner owns all reporting and exit policy.
#[async_trait]
pub trait Job: Send + Sync {
    /// Runs the workload, attempting at most `limit` items.
    async fn run(&self, limit: WorkLimit) -> anyhow::Result<()>;
}
