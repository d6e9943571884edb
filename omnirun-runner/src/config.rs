//! Runner configuration
//!
//! Everything the runner needs is read from environment variables once at
//! startup: the host environment mode and the bounds handed to the job.
//! Nothing here is re-read mid-run.

use anyhow::Context;
use omnirun_core::domain::environment::EnvironmentMode;
use omnirun_core::domain::job::WorkLimit;
use std::path::PathBuf;

/// Optional cap on items the job may process per execution (decimal).
/// Unset means unbounded.
pub const MAX_ITEMS_VAR: &str = "JOB_MAX_ITEMS";

/// Root directory handed to the built-in scan workload.
pub const SCAN_ROOT_VAR: &str = "JOB_SCAN_ROOT";

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Where this process is running, decided once at startup
    pub mode: EnvironmentMode,

    /// Cap on items the job may process per execution
    pub work_limit: WorkLimit,

    /// Root directory for the built-in scan workload
    pub scan_root: PathBuf,
}

impl Config {
    /// Creates a configuration with defaults for the given mode
    pub fn new(mode: EnvironmentMode) -> Self {
        Self {
            mode,
            work_limit: WorkLimit::default(),
            scan_root: PathBuf::from("."),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - AWS_LAMBDA_RUNTIME_API (optional; presence selects custom-runtime
    ///   mode, value is the control plane's host:port)
    /// - JOB_MAX_ITEMS (optional, decimal, default: unbounded)
    /// - JOB_SCAN_ROOT (optional, default: ".")
    ///
    /// An unparsable JOB_MAX_ITEMS is a startup error rather than a silent
    /// fallback to unbounded.
    pub fn from_env() -> anyhow::Result<Self> {
        let mode = EnvironmentMode::detect();

        let work_limit = match std::env::var(MAX_ITEMS_VAR) {
            Ok(raw) => raw
                .parse::<WorkLimit>()
                .with_context(|| format!("invalid {} value {:?}", MAX_ITEMS_VAR, raw))?,
            Err(_) => WorkLimit::Unbounded,
        };

        let scan_root = std::env::var(SCAN_ROOT_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            mode,
            work_limit,
            scan_root,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(addr) = self.mode.control_plane() {
            if addr.is_empty() {
                anyhow::bail!("control plane address cannot be empty");
            }
        }

        if self.work_limit == WorkLimit::Bounded(0) {
            anyhow::bail!("{} must be greater than 0", MAX_ITEMS_VAR);
        }

        if self.scan_root.as_os_str().is_empty() {
            anyhow::bail!("{} cannot be empty", SCAN_ROOT_VAR);
        }

        Ok(())
    }
}
