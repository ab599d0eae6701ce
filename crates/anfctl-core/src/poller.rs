//! Resource readiness polling
//!
//! Management API create and delete calls return before the backend has
//! finished, and there is no push notification when a resource appears or
//! disappears. This module waits for that transition by fetching the resource
//! at a fixed interval until it reaches the wanted presence state or the
//! attempt budget runs out.
//!
//! Only [`CoreError::NotFound`] is treated as "not there (yet)". Any other
//! fetch error aborts the wait immediately.
//!
//! # Example
//!
//! ```rust,ignore
//! use anfctl_core::poller::{PollSettings, ResourcePoller};
//! use std::time::Duration;
//!
//! let poller = ResourcePoller::new(PollSettings::new(5, Duration::from_secs(10)));
//! let volume = poller
//!     .wait_until_present("volume 'anftestvolume'", || api.get_volume(&handle))
//!     .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};

/// Default number of fetch attempts per wait
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default pause between fetch attempts
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Attempt budget and pacing for a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Maximum number of fetch calls. Zero behaves like one.
    pub max_attempts: u32,
    /// Pause between consecutive fetch calls
    pub interval: Duration,
}

impl PollSettings {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Effective attempt count; a wait always fetches at least once
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INTERVAL)
    }
}

/// The presence state a wait is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Resource exists
    Present,
    /// Resource does not exist
    Absent,
}

/// Result of a poll that did not hit a fatal error
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// The resource was returned by the fetch
    Found(T),
    /// The fetch reported the resource as not found
    NotFound,
    /// The attempt budget ran out before the target state was seen
    TimedOut {
        attempts: u32,
        /// Last resource observed, when waiting for absence
        last_seen: Option<T>,
    },
}

/// Progress events emitted while polling
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// A fetch is about to be made
    Attempt {
        resource: String,
        attempt: u32,
        max_attempts: u32,
    },
    /// Target state not reached yet, sleeping before the next attempt
    Waiting {
        resource: String,
        attempt: u32,
        next_in: Duration,
    },
    /// Target state reached
    Satisfied { resource: String, attempts: u32 },
    /// Budget exhausted
    Exhausted { resource: String, attempts: u32 },
}

/// Callback type for poll progress
///
/// The CLI uses this to drive a spinner.
pub type PollCallback = Box<dyn Fn(PollEvent) + Send + Sync>;

/// Fixed-interval poller for a single wait at a time
///
/// A poller holds no state between calls, so the same instance can be reused
/// for any number of waits, or shared between concurrent ones.
#[derive(Default)]
pub struct ResourcePoller {
    settings: PollSettings,
    cancel: Option<CancellationToken>,
    on_progress: Option<PollCallback>,
}

impl std::fmt::Debug for ResourcePoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePoller")
            .field("settings", &self.settings)
            .field("cancellable", &self.cancel.is_some())
            .field("has_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl ResourcePoller {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            cancel: None,
            on_progress: None,
        }
    }

    /// Abort waits at the next sleep once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Report every attempt to `callback`
    pub fn with_progress(mut self, callback: PollCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Fail with [`CoreError::WaitCancelled`] if the cancellation token fired
    ///
    /// Workflows call this before every create, change or delete request so
    /// that nothing new is sent once the caller asked to stop, even when no
    /// wait has slept since.
    pub fn check_cancelled(&self, resource: &str) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => {
                info!(resource, "Cancelled before sending request");
                Err(CoreError::WaitCancelled {
                    resource: resource.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Wait until `fetch` returns the resource
    ///
    /// Returns the resource from the first successful fetch. Fails with
    /// [`CoreError::WaitTimedOut`] after the budget is spent on not-found
    /// results, or with the fetch error itself for anything else.
    pub async fn wait_until_present<T, F, Fut>(&self, resource: &str, fetch: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.poll(resource, Presence::Present, fetch).await? {
            PollOutcome::Found(found) => Ok(found),
            PollOutcome::NotFound | PollOutcome::TimedOut { .. } => Err(self.timed_out(resource)),
        }
    }

    /// Wait until `fetch` reports the resource as not found
    ///
    /// A successful fetch means the resource is still there. Fails with
    /// [`CoreError::WaitTimedOut`] if it is still there after the last attempt.
    pub async fn wait_until_absent<T, F, Fut>(&self, resource: &str, fetch: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.poll(resource, Presence::Absent, fetch).await? {
            PollOutcome::NotFound => Ok(()),
            PollOutcome::Found(_) | PollOutcome::TimedOut { .. } => Err(self.timed_out(resource)),
        }
    }

    /// Poll until `target` is observed or the budget is spent
    ///
    /// `Err` is reserved for fatal fetch errors and cancellation; running out
    /// of attempts is reported as [`PollOutcome::TimedOut`].
    pub async fn poll<T, F, Fut>(
        &self,
        resource: &str,
        target: Presence,
        mut fetch: F,
    ) -> Result<PollOutcome<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.settings.attempts();
        let mut last_seen = None;

        for attempt in 1..=max_attempts {
            self.emit(PollEvent::Attempt {
                resource: resource.to_string(),
                attempt,
                max_attempts,
            });
            debug!(resource, attempt, max_attempts, ?target, "Polling resource");

            match (fetch().await, target) {
                (Ok(found), Presence::Present) => {
                    self.satisfied(resource, attempt);
                    return Ok(PollOutcome::Found(found));
                }
                (Err(e), Presence::Absent) if e.is_not_found() => {
                    self.satisfied(resource, attempt);
                    return Ok(PollOutcome::NotFound);
                }
                (Ok(still_there), Presence::Absent) => last_seen = Some(still_there),
                (Err(e), Presence::Present) if e.is_not_found() => {}
                (Err(e), _) => {
                    warn!(resource, attempt, error = %e, "Fatal error while polling");
                    return Err(e);
                }
            }

            if attempt < max_attempts {
                self.pause(resource, attempt).await?;
            }
        }

        warn!(resource, attempts = max_attempts, ?target, "Polling budget exhausted");
        self.emit(PollEvent::Exhausted {
            resource: resource.to_string(),
            attempts: max_attempts,
        });
        Ok(PollOutcome::TimedOut {
            attempts: max_attempts,
            last_seen,
        })
    }

    async fn pause(&self, resource: &str, attempt: u32) -> Result<()> {
        let interval = self.settings.interval;
        self.emit(PollEvent::Waiting {
            resource: resource.to_string(),
            attempt,
            next_in: interval,
        });

        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!(resource, attempt, "Wait cancelled");
                    Err(CoreError::WaitCancelled {
                        resource: resource.to_string(),
                    })
                }
                _ = tokio::time::sleep(interval) => Ok(()),
            },
            None => {
                tokio::time::sleep(interval).await;
                Ok(())
            }
        }
    }

    fn satisfied(&self, resource: &str, attempts: u32) {
        debug!(resource, attempts, "Resource reached target state");
        self.emit(PollEvent::Satisfied {
            resource: resource.to_string(),
            attempts,
        });
    }

    fn timed_out(&self, resource: &str) -> CoreError {
        CoreError::WaitTimedOut {
            resource: resource.to_string(),
            attempts: self.settings.attempts(),
        }
    }

    fn emit(&self, event: PollEvent) {
        if let Some(cb) = &self.on_progress {
            cb(event);
        }
    }
}

/// Wait until `fetch` returns the resource, using a one-off poller
pub async fn wait_until_present<T, F, Fut>(
    resource: &str,
    settings: PollSettings,
    fetch: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    ResourcePoller::new(settings)
        .wait_until_present(resource, fetch)
        .await
}

/// Wait until `fetch` reports not found, using a one-off poller
pub async fn wait_until_absent<T, F, Fut>(
    resource: &str,
    settings: PollSettings,
    fetch: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    ResourcePoller::new(settings)
        .wait_until_absent(resource, fetch)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PollSettings::default();
        assert_eq!(settings.max_attempts, 5);
        assert_eq!(settings.interval, Duration::from_secs(10));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let settings = PollSettings::new(0, Duration::ZERO);
        assert_eq!(settings.attempts(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_fetches_once() {
        let poller = ResourcePoller::new(PollSettings::new(0, Duration::ZERO));
        let found = poller
            .wait_until_present("thing", || async { Ok::<_, CoreError>(7) })
            .await
            .unwrap();
        assert_eq!(found, 7);
    }

    #[test]
    fn test_debug_hides_callback() {
        let poller = ResourcePoller::default().with_progress(Box::new(|_| {}));
        let debug = format!("{poller:?}");
        assert!(debug.contains("has_progress: true"));
        assert!(debug.contains("cancellable: false"));
    }

    #[test]
    fn test_check_cancelled_follows_token() {
        let token = CancellationToken::new();
        let poller = ResourcePoller::default().with_cancellation(token.clone());
        assert!(poller.check_cancelled("account 'a'").is_ok());

        token.cancel();
        let err = poller.check_cancelled("account 'a'").unwrap_err();
        assert!(err.is_cancelled());

        assert!(ResourcePoller::default().check_cancelled("account 'a'").is_ok());
    }
}
