//! Admin script queue with a single-flight heavy-job slot.
//!
//! Light jobs start immediately. Heavy jobs contend for one process-wide
//! slot: a one-permit [`Semaphore`] whose owned permit moves into the job
//! task and is released when the task ends, whatever the outcome. A heavy
//! job that finds the slot taken is recorded as `queued` and left there;
//! nothing promotes it automatically. [`ScriptQueue::start_queued`] is the
//! manual re-trigger.
//!
//! The slot lives in memory only. Execution records are the durable part.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::task::TaskTracker;

use super::executor::{ScriptError, ScriptExecutor, ScriptInput, ScriptOutput};
use super::registry::{JobClass, ScriptJob, ScriptRegistry};
use super::status::{ExecutionResult, ExecutionStatus, NewExecution, ScriptExecution};
use crate::error::CoreError;
use crate::store::ExecutionStore;
use crate::types::DbId;

/// Stored stdout is cut to this many bytes.
pub const MAX_OUTPUT_LOG_BYTES: usize = 10_000;

/// Stored stderr / failure text is cut to this many bytes.
pub const MAX_ERROR_MESSAGE_BYTES: usize = 5_000;

/// Default wall-clock ceiling per job.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Result of [`ScriptQueue::enqueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Enqueued {
    pub execution_id: DbId,
    /// `true` when a heavy job found the slot busy and was only recorded.
    pub queued: bool,
}

/// Truncate to at most `max` bytes without splitting a character.
pub fn truncate_utf8(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

pub struct ScriptQueue<E> {
    registry: Arc<ScriptRegistry>,
    executor: Arc<E>,
    store: Arc<dyn ExecutionStore>,
    heavy_slot: Arc<Semaphore>,
    tracker: TaskTracker,
    timeout: Duration,
    working_directory: Option<String>,
}

impl<E> Clone for ScriptQueue<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            executor: Arc::clone(&self.executor),
            store: Arc::clone(&self.store),
            heavy_slot: Arc::clone(&self.heavy_slot),
            tracker: self.tracker.clone(),
            timeout: self.timeout,
            working_directory: self.working_directory.clone(),
        }
    }
}

impl<E: ScriptExecutor> ScriptQueue<E> {
    pub fn new(registry: ScriptRegistry, executor: E, store: Arc<dyn ExecutionStore>) -> Self {
        Self {
            registry: Arc::new(registry),
            executor: Arc::new(executor),
            store,
            heavy_slot: Arc::new(Semaphore::new(1)),
            tracker: TaskTracker::new(),
            timeout: DEFAULT_SCRIPT_TIMEOUT,
            working_directory: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory jobs run in (the project root holding the `scripts` package).
    pub fn with_working_directory(mut self, dir: Option<String>) -> Self {
        self.working_directory = dir;
        self
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    /// Whether a heavy job currently holds the slot.
    pub fn heavy_slot_busy(&self) -> bool {
        self.heavy_slot.available_permits() == 0
    }

    /// Record a run of `script_name` and start it if allowed.
    ///
    /// Returns immediately; the job runs in the background. Unknown names are
    /// rejected with [`CoreError::UnknownScript`].
    pub async fn enqueue(&self, script_name: &str, triggered_by: &str) -> Result<Enqueued, CoreError> {
        let job = self
            .registry
            .get(script_name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownScript(script_name.to_string()))?;

        let permit = match job.class {
            JobClass::Light => None,
            JobClass::Heavy => match Arc::clone(&self.heavy_slot).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    let record = self
                        .store
                        .create_execution(&NewExecution {
                            script_name: job.name.clone(),
                            triggered_by: triggered_by.to_string(),
                            status: ExecutionStatus::Queued,
                        })
                        .await?;
                    tracing::info!(
                        execution_id = record.id,
                        script = %job.name,
                        "Heavy script queued, another heavy script is running",
                    );
                    return Ok(Enqueued {
                        execution_id: record.id,
                        queued: true,
                    });
                }
            },
        };

        // Dropping `permit` on an error here frees the slot again.
        let record = self
            .store
            .create_execution(&NewExecution {
                script_name: job.name.clone(),
                triggered_by: triggered_by.to_string(),
                status: ExecutionStatus::Running,
            })
            .await?;

        self.spawn(job, record.id, permit);
        Ok(Enqueued {
            execution_id: record.id,
            queued: false,
        })
    }

    /// Start a previously queued run, if its slot is free.
    pub async fn start_queued(&self, execution_id: DbId) -> Result<ScriptExecution, CoreError> {
        let record = self.status(execution_id).await?;
        if record.status != ExecutionStatus::Queued {
            return Err(CoreError::Conflict(format!(
                "Execution {execution_id} is {}, not queued",
                record.status.as_str()
            )));
        }

        let job = self
            .registry
            .get(&record.script_name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownScript(record.script_name.clone()))?;

        let permit = match job.class {
            JobClass::Light => None,
            JobClass::Heavy => Some(
                Arc::clone(&self.heavy_slot)
                    .try_acquire_owned()
                    .map_err(|_| CoreError::HeavySlotBusy)?,
            ),
        };

        self.store.mark_running(execution_id).await?;
        self.spawn(job, execution_id, permit);
        self.status(execution_id).await
    }

    pub async fn status(&self, execution_id: DbId) -> Result<ScriptExecution, CoreError> {
        self.store
            .find_execution(execution_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ScriptExecution",
                id: execution_id,
            })
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<ScriptExecution>, CoreError> {
        self.store.recent_executions(limit).await
    }

    /// Wait for every job started so far to finish.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    fn spawn(&self, job: ScriptJob, execution_id: DbId, permit: Option<OwnedSemaphorePermit>) {
        let executor = Arc::clone(&self.executor);
        let store = Arc::clone(&self.store);
        let input = ScriptInput {
            env_vars: vec![],
            working_directory: self.working_directory.clone(),
            timeout: self.timeout,
        };

        self.tracker.spawn(async move {
            let _permit = permit;
            let started = Instant::now();
            let outcome = executor.execute(&job, input.clone()).await;
            let result = execution_result(outcome, input.timeout, started.elapsed());

            match result.status {
                ExecutionStatus::Success => {
                    tracing::info!(execution_id, script = %job.name, "Script completed")
                }
                _ => tracing::error!(
                    execution_id,
                    script = %job.name,
                    error = result.error_message.as_deref().unwrap_or(""),
                    "Script failed",
                ),
            }

            if let Err(e) = store.finish(execution_id, &result).await {
                tracing::error!(execution_id, error = %e, "Failed to record script result");
            }
            if job.class == JobClass::Heavy {
                tracing::info!(script = %job.name, "Heavy script slot released");
            }
        });
    }
}

/// Map a run outcome onto the persisted terminal state.
fn execution_result(
    outcome: Result<ScriptOutput, ScriptError>,
    timeout: Duration,
    elapsed: Duration,
) -> ExecutionResult {
    let duration_seconds = elapsed.as_secs() as i64;
    match outcome {
        Ok(output) => {
            let succeeded = output.succeeded();
            ExecutionResult {
                status: if succeeded {
                    ExecutionStatus::Success
                } else {
                    ExecutionStatus::Failed
                },
                exit_code: Some(output.exit_code),
                output_log: Some(truncate_utf8(&output.stdout, MAX_OUTPUT_LOG_BYTES).to_string()),
                error_message: (!succeeded)
                    .then(|| truncate_utf8(&output.stderr, MAX_ERROR_MESSAGE_BYTES).to_string()),
                duration_seconds,
            }
        }
        Err(ScriptError::Timeout { .. }) => ExecutionResult {
            status: ExecutionStatus::Failed,
            exit_code: None,
            output_log: None,
            error_message: Some(timeout_message(timeout)),
            duration_seconds,
        },
        Err(e) => ExecutionResult {
            status: ExecutionStatus::Failed,
            exit_code: None,
            output_log: None,
            error_message: Some(truncate_utf8(&e.to_string(), MAX_ERROR_MESSAGE_BYTES).to_string()),
            duration_seconds,
        },
    }
}

fn timeout_message(timeout: Duration) -> String {
    let secs = timeout.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        let hours = secs / 3600;
        let unit = if hours == 1 { "hour" } else { "hours" };
        format!("Script execution timeout (>{hours} {unit})")
    } else {
        format!("Script execution timeout (>{}s)", timeout.as_secs_f64())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
