//! Invocation lifecycle endpoints

use crate::error::Result;
use crate::{ClientError, REQUEST_ID_HEADER, RuntimeClient};
use omnirun_core::domain::job::JobError;
use omnirun_core::dto::invocation::{InvocationError, InvocationResponse};
use tracing::debug;

/// One platform-assigned unit of work, spanning a poll-execute-report cycle.
///
/// The request id is opaque and assigned by the control plane; it is the
/// only handle through which the outcome can be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub request_id: String,
}

impl RuntimeClient {
    /// Fetch the next invocation from the control plane
    ///
    /// This is a blocking long poll: the call suspends until the platform
    /// has a unit of work to hand out. No client-side timeout applies.
    ///
    /// # Errors
    /// * [`ClientError::Transport`] if the round-trip fails; the caller has
    ///   no well-defined invocation to recover and should terminate
    /// * [`ClientError::Protocol`] if the request-id header is missing or
    ///   unreadable; reporting is impossible without it
    pub async fn next_invocation(&self) -> Result<Invocation> {
        let url = format!("{}/invocation/next", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .ok_or_else(|| {
                ClientError::Protocol(format!("response missing {} header", REQUEST_ID_HEADER))
            })?
            .to_str()
            .map_err(|_| {
                ClientError::Protocol(format!("{} header is not valid UTF-8", REQUEST_ID_HEADER))
            })?
            .to_string();

        debug!(%request_id, "received invocation");

        Ok(Invocation { request_id })
    }

    /// Report a successful invocation
    ///
    /// Posts `{"success": true}` to `.../invocation/{request_id}/response`.
    /// Delivery is fire-and-forget from this client's perspective; retrying
    /// belongs to the platform.
    pub async fn report_success(&self, request_id: &str) -> Result<()> {
        let url = format!("{}/invocation/{}/response", self.base_url, request_id);
        let response = self
            .client
            .post(&url)
            .json(&InvocationResponse::succeeded())
            .send()
            .await?;

        debug!(%request_id, "reported success");

        self.handle_empty_response(response).await
    }

    /// Report a failed invocation
    ///
    /// Posts `{"errorMessage", "errorType": "JobError"}` to
    /// `.../invocation/{request_id}/error`. The error type tag is fixed:
    /// the platform only distinguishes job-level from infrastructure-level
    /// failures.
    pub async fn report_error(&self, request_id: &str, error: &JobError) -> Result<()> {
        let url = format!("{}/invocation/{}/error", self.base_url, request_id);
        let response = self
            .client
            .post(&url)
            .json(&InvocationError::from(error))
            .send()
            .await?;

        debug!(%request_id, "reported error");

        self.handle_empty_response(response).await
    }
}
