//! Task outcome observation.
//!
//! The automation engine emits one outcome event per task per host while a
//! run is in flight. Observers are passive sinks: callable from whatever
//! thread the engine uses, never blocking the run, never aborting it.

use tokio::sync::mpsc;

/// Per-task outcome status reported by the automation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully
    Ok,
    /// Task failed on the host
    Failed,
    /// Task was skipped by a condition
    Skipped,
    /// Host could not be reached
    Unreachable,
}

/// One task outcome event for one host.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    /// Target host the task ran against
    pub host: String,
    /// Task name as reported by the engine
    pub task: String,
    /// Outcome status
    pub status: TaskStatus,
    /// Failure detail (e.g. an exception message), when the engine has one
    pub detail: Option<String>,
}

/// Passive sink for task outcome events emitted during a run.
pub trait RunObserver: Send + Sync {
    fn on_task_outcome(&self, outcome: &TaskOutcome);
}

/// Observer that forwards task outcomes to the tracing logger.
///
/// Exactly one log call is made per event: `info` for ok, `warn` for
/// failed, skipped and unreachable. Failed events carry their detail.
#[derive(Debug, Default)]
pub struct LogForward;

impl RunObserver for LogForward {
    fn on_task_outcome(&self, outcome: &TaskOutcome) {
        match outcome.status {
            TaskStatus::Ok => {
                tracing::info!("[LogForward] {}: task '{}' ok", outcome.host, outcome.task);
            }
            TaskStatus::Failed => {
                tracing::warn!(
                    "[LogForward] {}: task '{}' failed: {}",
                    outcome.host,
                    outcome.task,
                    outcome.detail.as_deref().unwrap_or("no detail"),
                );
            }
            TaskStatus::Skipped => {
                tracing::warn!(
                    "[LogForward] {}: task '{}' skipped",
                    outcome.host,
                    outcome.task,
                );
            }
            TaskStatus::Unreachable => {
                tracing::warn!(
                    "[LogForward] {}: host unreachable during task '{}'",
                    outcome.host,
                    outcome.task,
                );
            }
        }
    }
}

/// Observer that forwards task outcomes into an mpsc channel.
///
/// For callers that want a programmatic stream of outcomes instead of log
/// lines. Uses `try_send` so a slow or closed receiver never blocks the
/// run; overflowed events are dropped.
pub struct ChannelObserver {
    sender: mpsc::Sender<TaskOutcome>,
}

impl ChannelObserver {
    pub fn new(sender: mpsc::Sender<TaskOutcome>) -> Self {
        Self { sender }
    }
}

impl RunObserver for ChannelObserver {
    fn on_task_outcome(&self, outcome: &TaskOutcome) {
        let _ = self.sender.try_send(outcome.clone());
    }
}
