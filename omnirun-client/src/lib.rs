//! Omnirun Runtime Client
//!
//! A typed HTTP client for the serverless custom-runtime control plane:
//! the local endpoint through which the hosting platform hands out units of
//! work and collects their results.
//!
//! The protocol is deliberately small: one blocking long-poll to fetch the
//! next invocation, and one report POST (success or error) per invocation.
//!
//! # Example
//!
//! ```no_run
//! use omnirun_client::RuntimeClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RuntimeClient::new("127.0.0.1:9001");
//!
//!     let invocation = client.next_invocation().await?;
//!     client.report_success(&invocation.request_id).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
mod invocations;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use invocations::Invocation;

use reqwest::Client;

/// Response header carrying the platform-assigned invocation id.
pub const REQUEST_ID_HEADER: &str = "lambda-runtime-aws-request-id";

/// Version segment of the runtime API paths.
const RUNTIME_API_VERSION: &str = "2018-06-01";

/// HTTP client for the runtime control-plane API
///
/// Holds the versioned base URL derived from the control plane's
/// `host:port` address and a shared connection pool.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    /// Versioned base URL, e.g. "http://127.0.0.1:9001/2018-06-01/runtime"
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl RuntimeClient {
    /// Create a new runtime client
    ///
    /// The default HTTP client carries no request timeout: the `next`
    /// endpoint blocks until the platform has work, and the platform
    /// guarantees an eventual response.
    ///
    /// # Arguments
    /// * `control_plane` - `host:port` of the control plane, as injected by
    ///   the serverless host
    pub fn new(control_plane: impl AsRef<str>) -> Self {
        Self::with_client(control_plane, Client::new())
    }

    /// Create a new runtime client with a custom HTTP client
    ///
    /// This allows configuring proxies, TLS settings, etc. Avoid setting a
    /// request timeout; it would cut the long poll short.
    pub fn with_client(control_plane: impl AsRef<str>, client: Client) -> Self {
        let addr = control_plane.as_ref().trim_end_matches('/');
        Self {
            base_url: format!("http://{}/{}/runtime", addr, RUNTIME_API_VERSION),
            client,
        }
    }

    /// Get the versioned base URL of the control plane
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle a report response that carries no useful body
    ///
    /// Checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
