//! Job executor
//!
//! A stateless adapter around the opaque [`Job`] collaborator. It owns the
//! clearly delimited console markers for start, success, and failure, and it
//! never swallows an error: a failed job is logged and handed back to the
//! caller, which decides how the outcome is reported.

use omnirun_core::domain::job::{Job, JobError, WorkLimit};
use std::sync::Arc;
use tracing::{error, info};

/// Executes the job collaborator and captures its outcome
#[derive(Clone)]
pub struct JobExecutor {
    job: Arc<dyn Job>,
}

impl JobExecutor {
    /// Creates a new executor around the given job
    pub fn new(job: Arc<dyn Job>) -> Self {
        Self { job }
    }

    /// Runs the job once with the given work limit
    ///
    /// Holds no state between calls and performs no environment detection.
    pub async fn execute(&self, limit: WorkLimit) -> Result<(), JobError> {
        info!("--- Starting job execution (limit: {}) ---", limit);

        match self.job.run(limit).await {
            Ok(()) => {
                info!("--- Job execution completed successfully ---");
                Ok(())
            }
            Err(err) => {
                error!("--- Job execution failed ---");
                error!("{:#}", err);
                Err(JobError::from(err))
            }
        }
    }
}
