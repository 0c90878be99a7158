//! Bounded fixed-interval polling for long-running operations.

use chalkboard_error::{ChalkboardResult, FlowError, FlowErrorKind, GeminiError, GeminiErrorKind};
use chalkboard_interface::{MediaPayload, OperationHandle, VideoGeneration};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Waits for a long-running operation by re-fetching its status at a fixed
/// interval.
///
/// The loop terminates in exactly three ways:
/// - the status reports `done` with no error: the produced media is returned;
/// - the status carries a populated error field: the job's error is returned;
/// - the configured bound (deadline or attempt count) is exceeded: a timeout
///   error is returned.
///
/// The completion flag and error field are the only success/failure signals;
/// the poller never gives up on a job that is still plainly running unless
/// the bound is hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
    timeout: Duration,
    max_attempts: usize,
}

impl Default for Poller {
    /// Check every 5 seconds, give up after 10 minutes or 120 checks.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
            max_attempts: 120,
        }
    }
}

impl Poller {
    /// Create a poller with an explicit interval and bound.
    pub fn new(interval: Duration, timeout: Duration, max_attempts: usize) -> Self {
        Self {
            interval,
            timeout,
            max_attempts,
        }
    }

    /// The fixed delay between status checks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll the operation until it completes, fails, or the bound is hit.
    ///
    /// # Errors
    ///
    /// - The job's own error field, if the completed job reports one
    /// - `PollTimeout` if the deadline or attempt bound is exceeded
    /// - Any transport error from the status checks
    #[instrument(skip(self, driver), fields(operation = %handle.name))]
    pub async fn wait<D>(
        &self,
        driver: &D,
        handle: &OperationHandle,
    ) -> ChalkboardResult<MediaPayload>
    where
        D: VideoGeneration + ?Sized,
    {
        let started = Instant::now();
        let mut attempts = 0usize;

        loop {
            if attempts >= self.max_attempts || started.elapsed() >= self.timeout {
                return Err(FlowError::new(FlowErrorKind::PollTimeout {
                    attempts,
                    elapsed_secs: started.elapsed().as_secs(),
                })
                .into());
            }

            tokio::time::sleep(self.interval).await;
            attempts += 1;

            let status = driver.check_operation(handle).await?;
            debug!(attempts, done = status.done, "Operation status checked");

            if let Some(message) = status.error {
                return Err(GeminiError::new(GeminiErrorKind::OperationFailed {
                    operation: handle.name.clone(),
                    message,
                })
                .into());
            }

            if status.done {
                return status.video.ok_or_else(|| {
                    GeminiError::new(GeminiErrorKind::MissingOutput("video".to_string())).into()
                });
            }
        }
    }
}
