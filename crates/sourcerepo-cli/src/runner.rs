//! Runs a reconciliation off the async runtime, with an optional deadline.

use std::time::Duration;

use sourcerepo_core::{BootstrapError, BootstrapRequest, BootstrapResult};
use sourcerepo_git::{Bootstrapper, VcsEngine};
use tracing::info;

/// Errors that make the binary exit unsuccessfully.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Credential decoding or construction failed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    /// The caller-side deadline expired.
    #[error("reconciliation did not finish within {seconds}s")]
    DeadlineExceeded { seconds: u64 },

    /// The blocking task panicked or was cancelled.
    #[error("reconciliation task failed: {0}")]
    Task(String),
}

impl RunError {
    /// Returns true if the blocking reconciliation may still be running.
    pub fn leaves_task_running(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

/// Reconciles `request` on a blocking thread.
///
/// The core has no cancellation of its own; when `deadline` expires the
/// blocking thread keeps running and the caller is expected to exit.
pub async fn reconcile<E>(
    bootstrapper: Bootstrapper<E>,
    request: BootstrapRequest,
    deadline: Option<Duration>,
) -> Result<BootstrapResult, RunError>
where
    E: VcsEngine + Send + 'static,
{
    info!("Reconciling {}", request.endpoint());

    let task = tokio::task::spawn_blocking(move || bootstrapper.run(&request));

    let joined = match deadline {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| RunError::DeadlineExceeded {
                seconds: limit.as_secs(),
            })?,
        None => task.await,
    };

    let result = joined.map_err(|e| RunError::Task(e.to_string()))??;
    Ok(result)
}
