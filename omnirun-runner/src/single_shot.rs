//! Single-shot adapter
//!
//! The non-custom-runtime path: run the job exactly once and let the process
//! exit code carry the outcome. No HTTP, no retry, no loop: under an
//! orchestrator or on a developer machine the exit status is the only
//! success/failure signal anyone reads.

use omnirun_core::domain::job::WorkLimit;
use tracing::{error, info};

use crate::executor::JobExecutor;

/// Exit status for a successful run.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status for a failed run.
pub const EXIT_FAILURE: u8 = 1;

/// Runs the job once and returns the process exit status
///
/// Returns the raw status rather than exiting so `main` owns process
/// termination and tests can assert on the mapping.
pub async fn run_once(executor: &JobExecutor, limit: WorkLimit) -> u8 {
    match executor.execute(limit).await {
        Ok(()) => {
            info!("exiting with status {}", EXIT_SUCCESS);
            EXIT_SUCCESS
        }
        Err(err) => {
            error!("job failed: {}", err);
            info!("exiting with status {}", EXIT_FAILURE);
            EXIT_FAILURE
        }
    }
}
