//! The injectable run mechanism.
//!
//! Everything that actually touches a remote host (SSH, inventory, task
//! execution, fact gathering) lives behind [`RunbookRunner`]. The
//! transport only assembles inputs and interprets the raw status.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::facts::RawFactPayload;
use crate::observer::RunObserver;
use crate::oscmd::OsCmd;

/// Engine-level options for a run, derived from
/// [`TransportConfig`](crate::config::TransportConfig).
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Remote user the engine connects as
    pub remote_user: String,
    /// Parallel connection slots the engine may use
    pub forks: usize,
    /// Connect timeout per host
    pub connect_timeout: Duration,
}

/// Parameters for one run of a runbook against a single host.
pub struct RunRequest<'a> {
    /// Target host (IP or hostname)
    pub host: &'a str,
    /// Private key file the engine authenticates with
    pub key_path: &'a Path,
    /// Runbook file to execute
    pub runbook: &'a Path,
    /// Per-OS command strategy, absent for read-only runs
    pub oscmd: Option<&'a dyn OsCmd>,
    /// Variables injected into the run
    pub variables: &'a HashMap<String, String>,
    /// Engine-level options
    pub options: &'a RunOptions,
}

/// Raw result of a runbook run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Engine status: 0 success, nonzero failure. Infrastructure problems
    /// (unreachable host, auth failure) surface here as a nonzero status,
    /// not as a distinct error.
    pub status: i32,
    /// Raw facts gathered for the target host during the run
    pub facts: RawFactPayload,
}

/// The external automation run mechanism.
///
/// A run blocks (awaits) until the target host's result is available and
/// emits one [`TaskOutcome`](crate::observer::TaskOutcome) per task to the
/// observer while in flight. Observer calls may arrive on any thread the
/// engine uses.
#[async_trait]
pub trait RunbookRunner: Send + Sync {
    async fn run(
        &self,
        request: RunRequest<'_>,
        observer: &dyn RunObserver,
    ) -> Result<RunReport, TransportError>;
}
