//! Host environment classification
//!
//! The runner behaves differently under a serverless custom runtime (poll a
//! control plane forever) than under an orchestrator or a local shell (run
//! once, exit with a status code). The mode is decided exactly once at
//! startup and threaded explicitly into whichever adapter is constructed;
//! it is never re-read mid-run.

/// Environment variable injected by the serverless host, holding the
/// `host:port` of the runtime control plane. Only ever set by that host,
/// which makes it an unambiguous zero-configuration discriminator.
pub const RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";

/// Where this process is running, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentMode {
    /// Hosted under a serverless custom runtime; the process owns the
    /// poll/execute/report loop against the given control-plane address.
    CustomRuntime { control_plane: String },
    /// Container orchestrator or a developer machine; run the job once and
    /// signal the outcome through the process exit code.
    OrchestratedOrLocal,
}

impl EnvironmentMode {
    /// Classifies the environment from the control-plane address variable,
    /// if any. A missing or empty value means there is no control plane to
    /// talk to.
    pub fn from_control_plane(addr: Option<&str>) -> Self {
        match addr {
            Some(addr) if !addr.is_empty() => EnvironmentMode::CustomRuntime {
                control_plane: addr.to_string(),
            },
            _ => EnvironmentMode::OrchestratedOrLocal,
        }
    }

    /// Reads [`RUNTIME_API_VAR`] from the process environment and
    /// classifies it. Side-effect free; call once at startup.
    pub fn detect() -> Self {
        Self::from_control_plane(std::env::var(RUNTIME_API_VAR).ok().as_deref())
    }

    /// Returns the control-plane address, if running under a custom runtime.
    pub fn control_plane(&self) -> Option<&str> {
        match self {
            EnvironmentMode::CustomRuntime { control_plane } => Some(control_plane),
            EnvironmentMode::OrchestratedOrLocal => None,
        }
    }
}
