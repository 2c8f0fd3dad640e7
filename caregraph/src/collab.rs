//! Deadline and retry policy for collaborator calls.
//!
//! Retrieval, live search, generation and identity lookup all go through
//! [`CallPolicy::call`]: each attempt runs under `tokio::time::timeout` and a failed or
//! timed-out attempt is retried up to `retries` more times. Callers turn the final error
//! into a soft failure.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AgentError;

/// Default per-attempt deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 1;

/// Per-attempt timeout plus bounded retry count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }
}

impl CallPolicy {
    pub fn new(timeout: Duration, retries: u32) -> Self {
        Self { timeout, retries }
    }

    /// Runs `f` until it succeeds or `1 + retries` attempts are used.
    ///
    /// The last attempt's failure is returned: `AgentError::Timeout` when it hit the
    /// deadline, `AgentError::ExecutionFailed` carrying the collaborator error otherwise.
    pub async fn call<T, E, F, Fut>(&self, label: &str, mut f: F) -> Result<T, AgentError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let attempts = self.retries.saturating_add(1);
        let mut last = AgentError::ExecutionFailed(format!("{}: no attempt made", label));
        for attempt in 1..=attempts {
            match tokio::time::timeout(self.timeout, f()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => {
                    warn!(collaborator = label, attempt, error = %e, "collaborator call failed");
                    last = AgentError::ExecutionFailed(format!("{}: {}", label, e));
                }
                Err(_) => {
                    warn!(
                        collaborator = label,
                        attempt,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "collaborator call timed out"
                    );
                    last = AgentError::Timeout(format!(
                        "{} did not respond within {}ms",
                        label,
                        self.timeout.as_millis()
                    ));
                }
            }
        }
        Err(last)
    }
}
