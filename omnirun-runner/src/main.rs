//! Omnirun Runner
//!
//! A deployment-agnostic job runner: the same binary runs identically under
//! a serverless custom runtime, a container orchestrator, or a local shell.
//!
//! Architecture:
//! - Configuration: environment mode and job bounds, read once at startup
//! - Executor: stateless boundary around the opaque job collaborator
//! - Runtime loop: poll/execute/report against the control plane
//! - Single-shot adapter: run once, signal the outcome via the exit code
//!
//! The environment decides the path exactly once: if the serverless host
//! injected a control-plane address, the runner owns the long-poll loop;
//! otherwise it executes the job a single time and exits.

mod config;
mod executor;
mod jobs;
mod runtime_loop;
mod single_shot;

use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::executor::JobExecutor;
use crate::jobs::ScanJob;
use crate::runtime_loop::RuntimeLoop;
use omnirun_client::RuntimeClient;
use omnirun_core::domain::environment::EnvironmentMode;
use omnirun_core::domain::job::Job;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omnirun_runner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Omnirun Runner");

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Loaded configuration: work_limit={}, scan_root={}",
        config.work_limit,
        config.scan_root.display()
    );

    let job: Arc<dyn Job> = Arc::new(ScanJob::new(config.scan_root.clone()));
    let executor = JobExecutor::new(job);

    match &config.mode {
        EnvironmentMode::CustomRuntime { control_plane } => {
            info!("Custom runtime detected (control plane: {})", control_plane);

            let client = RuntimeClient::new(control_plane);
            let runtime_loop = RuntimeLoop::new(client, executor, config.work_limit);

            // Only a fatal infrastructure error ends the loop; the host is
            // responsible for restarting the process.
            let err = match runtime_loop.run().await {
                Ok(never) => match never {},
                Err(err) => err,
            };
            error!("Runtime loop terminated: {:#}", err);
            ExitCode::FAILURE
        }
        EnvironmentMode::OrchestratedOrLocal => {
            info!("No control plane detected; running the job once");

            let status = single_shot::run_once(&executor, config.work_limit).await;
            ExitCode::from(status)
        }
    }
}

/// Loads configuration from environment variables and validates it
fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
