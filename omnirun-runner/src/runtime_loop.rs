//! Runtime loop
//!
//! The poll/execute/report cycle against the custom-runtime control plane.
//! Strictly sequential: at most one invocation is in flight, and invocation
//! N is reported before the poll for N+1 begins. The job body runs only
//! after a successful poll, never during process startup, so a failing job
//! is always an invocation-phase failure rather than an init-phase one.

use anyhow::{Context, Result};
use omnirun_client::RuntimeClient;
use omnirun_core::domain::job::WorkLimit;
use std::convert::Infallible;
use tracing::{info, warn};

use crate::executor::JobExecutor;

/// Long-polling client for the runtime control plane
pub struct RuntimeLoop {
    client: RuntimeClient,
    executor: JobExecutor,
    work_limit: WorkLimit,
}

impl RuntimeLoop {
    /// Creates a new runtime loop
    pub fn new(client: RuntimeClient, executor: JobExecutor, work_limit: WorkLimit) -> Self {
        Self {
            client,
            executor,
            work_limit,
        }
    }

    /// Runs the loop until a fatal infrastructure error
    ///
    /// The only normal exit is the process being terminated by the host, so
    /// success is [`Infallible`]. An error return means either the poll
    /// transport failed or the control plane broke protocol; in both cases
    /// there is no well-defined invocation to recover and the caller should
    /// let the process die and the host restart it.
    ///
    /// A job failure never exits the loop: it is converted into an error
    /// report for that invocation. A failed report is logged and the loop
    /// proceeds: redelivery is the platform's responsibility, and one
    /// invocation's reporting failure must not halt the ones after it.
    pub async fn run(&self) -> Result<Infallible> {
        info!(
            "Starting runtime loop (control plane: {})",
            self.client.base_url()
        );

        loop {
            let invocation = self
                .client
                .next_invocation()
                .await
                .context("failed to fetch next invocation")?;

            info!(request_id = %invocation.request_id, "invocation received");

            // Failure boundary: the job outcome becomes a reporting action.
            let outcome = self.executor.execute(self.work_limit).await;

            let report = match &outcome {
                Ok(()) => self.client.report_success(&invocation.request_id).await,
                Err(err) => self.client.report_error(&invocation.request_id, err).await,
            };

            if let Err(err) = report {
                warn!(
                    request_id = %invocation.request_id,
                    "failed to report invocation outcome: {}", err
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::Json;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use omnirun_client::REQUEST_ID_HEADER;
    use omnirun_core::domain::job::Job;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// In-process control plane: serves queued request ids (hanging like the
    /// real long poll once empty) and records every report call.
    #[derive(Debug, Default)]
    struct ControlPlane {
        pending: VecDeque<&'static str>,
        responses: Vec<(String, serde_json::Value)>,
        errors: Vec<(String, serde_json::Value)>,
        omit_request_id: bool,
        reject_reports: bool,
    }

    type Shared = Arc<Mutex<ControlPlane>>;

    async fn next_handler(State(state): State<Shared>) -> axum::response::Response {
        let (id, omit) = {
            let mut state = state.lock().unwrap();
            (state.pending.pop_front(), state.omit_request_id)
        };
        match id {
            Some(id) if !omit => {
                (StatusCode::OK, [(REQUEST_ID_HEADER, id)], "{}").into_response()
            }
            Some(_) => (StatusCode::OK, "{}").into_response(),
            // No work: block like the real long poll.
            None => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    async fn serve(state: Shared) -> String {
        let app = axum::Router::new()
            .route("/2018-06-01/runtime/invocation/next", get(next_handler))
            .route(
                "/2018-06-01/runtime/invocation/{id}/response",
                post(
                    |State(state): State<Shared>,
                     Path(id): Path<String>,
                     Json(body): Json<serde_json::Value>| async move {
                        let mut state = state.lock().unwrap();
                        state.responses.push((id, body));
                        if state.reject_reports {
                            StatusCode::INTERNAL_SERVER_ERROR
                        } else {
                            StatusCode::OK
                        }
                    },
                ),
            )
            .route(
                "/2018-06-01/runtime/invocation/{id}/error",
                post(
                    |State(state): State<Shared>,
                     Path(id): Path<String>,
                     Json(body): Json<serde_json::Value>| async move {
                        let mut state = state.lock().unwrap();
                        state.errors.push((id, body));
                        if state.reject_reports {
                            StatusCode::INTERNAL_SERVER_ERROR
                        } else {
                            StatusCode::OK
                        }
                    },
                ),
            )
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub serve");
        });
        addr.to_string()
    }

    struct StaticJob {
        fail_with: Option<&'static str>,
    }

    #[async_trait]
    impl Job for StaticJob {
        async fn run(&self, _limit: WorkLimit) -> anyhow::Result<()> {
            match self.fail_with {
                Some(message) => Err(anyhow::anyhow!(message)),
                None => Ok(()),
            }
        }
    }

    fn loop_against(addr: &str, fail_with: Option<&'static str>) -> RuntimeLoop {
        let executor = JobExecutor::new(Arc::new(StaticJob { fail_with }));
        RuntimeLoop::new(RuntimeClient::new(addr), executor, WorkLimit::Unbounded)
    }

    /// Polls the predicate until it holds or a generous deadline passes.
    async fn wait_for(state: &Shared, predicate: impl Fn(&ControlPlane) -> bool) {
        for _ in 0..500 {
            if predicate(&state.lock().unwrap()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached: {:?}", state.lock().unwrap());
    }

    #[tokio::test]
    async fn test_success_is_reported_then_loop_polls_again() {
        let state: Shared = Default::default();
        state.lock().unwrap().pending.push_back("abc123");
        let addr = serve(Arc::clone(&state)).await;

        let runtime_loop = loop_against(&addr, None);
        let handle = tokio::spawn(async move { runtime_loop.run().await });

        wait_for(&state, |cp| cp.responses.len() == 1).await;

        {
            let cp = state.lock().unwrap();
            assert_eq!(
                cp.responses,
                vec![("abc123".to_string(), serde_json::json!({"success": true}))]
            );
            assert!(cp.errors.is_empty());
        }

        // The loop is back on the long poll, not exited.
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_job_failure_is_reported_and_loop_survives() {
        let state: Shared = Default::default();
        state.lock().unwrap().pending.push_back("abc123");
        let addr = serve(Arc::clone(&state)).await;

        let runtime_loop = loop_against(&addr, Some("bad input"));
        let handle = tokio::spawn(async move { runtime_loop.run().await });

        wait_for(&state, |cp| cp.errors.len() == 1).await;

        {
            let cp = state.lock().unwrap();
            assert_eq!(
                cp.errors,
                vec![(
                    "abc123".to_string(),
                    serde_json::json!({"errorMessage": "bad input", "errorType": "JobError"})
                )]
            );
            assert!(cp.responses.is_empty());
        }

        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_each_invocation_gets_exactly_one_report_in_order() {
        let state: Shared = Default::default();
        {
            let mut cp = state.lock().unwrap();
            cp.pending.push_back("req-1");
            cp.pending.push_back("req-2");
        }
        let addr = serve(Arc::clone(&state)).await;

        let runtime_loop = loop_against(&addr, None);
        let handle = tokio::spawn(async move { runtime_loop.run().await });

        wait_for(&state, |cp| cp.responses.len() == 2).await;

        {
            let cp = state.lock().unwrap();
            let ids: Vec<&str> = cp.responses.iter().map(|(id, _)| id.as_str()).collect();
            assert_eq!(ids, vec!["req-1", "req-2"]);
            assert!(cp.errors.is_empty());
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_rejected_report_does_not_stop_the_loop() {
        let state: Shared = Default::default();
        {
            let mut cp = state.lock().unwrap();
            cp.pending.push_back("req-1");
            cp.pending.push_back("req-2");
            cp.reject_reports = true;
        }
        let addr = serve(Arc::clone(&state)).await;

        let runtime_loop = loop_against(&addr, None);
        let handle = tokio::spawn(async move { runtime_loop.run().await });

        // Both invocations are attempted even though every report fails.
        wait_for(&state, |cp| cp.responses.len() == 2).await;

        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_missing_request_id_is_fatal_with_no_report() {
        let state: Shared = Default::default();
        {
            let mut cp = state.lock().unwrap();
            cp.pending.push_back("abc123");
            cp.omit_request_id = true;
        }
        let addr = serve(Arc::clone(&state)).await;

        let runtime_loop = loop_against(&addr, None);
        let result = tokio::time::timeout(Duration::from_secs(5), runtime_loop.run())
            .await
            .expect("loop should exit promptly on protocol violation");
        assert!(result.is_err());

        let cp = state.lock().unwrap();
        assert!(cp.responses.is_empty());
        assert!(cp.errors.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_control_plane_is_fatal() {
        // Nothing is listening on this port.
        let runtime_loop = loop_against("127.0.0.1:1", None);
        let result = tokio::time::timeout(Duration::from_secs(5), runtime_loop.run())
            .await
            .expect("loop should exit promptly on transport failure");
        assert!(result.is_err());
    }
}
