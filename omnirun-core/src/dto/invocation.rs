//! Invocation report bodies

use crate::domain::job::{JOB_ERROR_TYPE, JobError};
use serde::{Deserialize, Serialize};

/// Body posted to `.../invocation/{requestId}/response` on success.
///
/// Serializes to `{"success": true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub success: bool,
}

impl InvocationResponse {
    pub fn succeeded() -> Self {
        Self { success: true }
    }
}

/// Body posted to `.../invocation/{requestId}/error` on job failure.
///
/// `error_type` is always [`JOB_ERROR_TYPE`]: the control plane only needs
/// to know this was a job-level failure, not what kind of error the job
/// body raised internally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationError {
    pub error_message: String,
    pub error_type: String,
}

impl From<&JobError> for InvocationError {
    fn from(err: &JobError) -> Self {
        Self {
            error_message: err.message.clone(),
            error_type: JOB_ERROR_TYPE.to_string(),
        }
    }
}
