//! Dedicated server installations.
//!
//! Installing an operating system on a dedicated server starts a job that runs
//! for minutes. [`wait_for_installation`] polls the job until it finishes,
//! fails, the request is cancelled or the configured timeout runs out.
//! Progress is only logged, never kept.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::config::ProviderConfig;
use crate::context::Context;
use crate::domain::JobStatus;
use crate::error::{Cancelled, RepositoryError};

/// Shortest delay between two polls; shorter intervals are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Stands in for a deadline too far away to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// One installation job of a dedicated server.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallationJob {
    /// Job id.
    pub id: String,
    /// Server the job runs on.
    pub server_id: String,
    /// Current status.
    pub status: JobStatus,
    /// Completion in percent, when reported.
    pub percentage: Option<i64>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl InstallationJob {
    /// A job with only its ids and status.
    pub fn new(id: impl Into<String>, server_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            server_id: server_id.into(),
            status,
            percentage: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Where the current state of an installation job comes from.
#[async_trait]
pub trait InstallationJobSource: Send + Sync {
    /// Fetch the job `job_id` of server `server_id`.
    async fn get_job(
        &self,
        server_id: &str,
        job_id: &str,
        ctx: &Context,
    ) -> Result<InstallationJob, RepositoryError>;
}

/// How long and how often to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallationSettings {
    /// Give up after this long.
    pub timeout: Duration,
    /// Delay between two polls.
    pub poll_interval: Duration,
}

impl Default for InstallationSettings {
    fn default() -> Self {
        Self::from(&ProviderConfig::default())
    }
}

impl From<&ProviderConfig> for InstallationSettings {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            timeout: config.installation_timeout(),
            poll_interval: config.installation_poll_interval(),
        }
    }
}

/// Why an installation wait ended without success.
#[derive(Debug, Error)]
pub enum InstallationError {
    /// The job reached a terminal status other than `FINISHED`.
    #[error("installation job {job_id} of server {server_id} ended with status {status}")]
    Failed {
        /// Server id.
        server_id: String,
        /// Job id.
        job_id: String,
        /// The terminal status.
        status: JobStatus,
    },

    /// The request was cancelled while waiting.
    #[error("waiting for installation job {job_id}: {source}")]
    Cancelled {
        /// Job id.
        job_id: String,
        /// The cancellation.
        #[source]
        source: Cancelled,
    },

    /// The job was still running when the timeout ran out.
    #[error("installation job {job_id} did not finish within {timeout:?}")]
    Timeout {
        /// Job id.
        job_id: String,
        /// The configured timeout.
        timeout: Duration,
    },

    /// Fetching the job failed.
    #[error("wait_for_installation: {0}")]
    Fetch(#[source] RepositoryError),
}

impl InstallationError {
    /// Whether the wait was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Poll the job until it is `FINISHED`.
///
/// The first poll happens immediately, the next ones every
/// `settings.poll_interval`, but never more often than [`MIN_POLL_INTERVAL`].
/// A fetch still in flight when the timeout expires or the request is
/// cancelled is abandoned.
#[instrument(skip(source, settings, ctx), name = "dedicated_server.wait_for_installation")]
pub async fn wait_for_installation(
    source: &dyn InstallationJobSource,
    server_id: &str,
    job_id: &str,
    settings: &InstallationSettings,
    ctx: &Context,
) -> Result<InstallationJob, InstallationError> {
    let now = Instant::now();
    let deadline = now
        .checked_add(settings.timeout)
        .unwrap_or_else(|| now + FAR_FUTURE);
    let timeout = || InstallationError::Timeout {
        job_id: job_id.to_string(),
        timeout: settings.timeout,
    };
    let cancelled = || InstallationError::Cancelled {
        job_id: job_id.to_string(),
        source: Cancelled,
    };

    let mut ticks = tokio::time::interval(settings.poll_interval.max(MIN_POLL_INTERVAL));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(cancelled()),
            _ = tokio::time::sleep_until(deadline) => return Err(timeout()),
            _ = ticks.tick() => {},
        }

        let job = match tokio::time::timeout_at(deadline, source.get_job(server_id, job_id, ctx)).await {
            Err(_) => return Err(timeout()),
            Ok(Err(err)) if err.is_cancelled() => return Err(cancelled()),
            Ok(Err(err)) => return Err(InstallationError::Fetch(err)),
            Ok(Ok(job)) => job,
        };
        debug!(status = %job.status, percentage = ?job.percentage, "polled installation job");

        match job.status {
            JobStatus::Finished => {
                info!("installation finished");
                return Ok(job);
            },
            status if status.is_terminal() => {
                warn!(%status, "installation did not finish");
                return Err(InstallationError::Failed {
                    server_id: server_id.to_string(),
                    job_id: job_id.to_string(),
                    status,
                });
            },
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpResponse;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const SERVER_ID: &str = "12345";
    const JOB_ID: &str = "bcf2bedf-8450-4b22-86a8-f30aeb3a38f9";

    /// Replays `statuses`, then keeps returning the last one.
    struct ScriptedSource {
        statuses: Mutex<VecDeque<JobStatus>>,
        last: JobStatus,
        failure: Option<u16>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(statuses: &[JobStatus]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                last: statuses.last().copied().unwrap_or(JobStatus::Active),
                failure: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                failure: Some(status),
                ..Self::new(&[])
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InstallationJobSource for ScriptedSource {
        async fn get_job(
            &self,
            server_id: &str,
            job_id: &str,
            ctx: &Context,
        ) -> Result<InstallationJob, RepositoryError> {
            ctx.check()
                .map_err(|e| RepositoryError::new(format!("get_job {job_id:?}"), e))?;
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.failure {
                return Err(RepositoryError::new(format!("get_job {job_id:?}"), "request failed")
                    .with_response(HttpResponse::new(status, "")));
            }
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or(self.last);
            Ok(InstallationJob::new(job_id, server_id, status))
        }
    }

    fn settings(timeout: u64, poll_interval: u64) -> InstallationSettings {
        InstallationSettings {
            timeout: Duration::from_secs(timeout),
            poll_interval: Duration::from_secs(poll_interval),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_until_finished() {
        let source = ScriptedSource::new(&[JobStatus::Active, JobStatus::Active, JobStatus::Finished]);
        let started = Instant::now();

        let job = wait_for_installation(&source, SERVER_ID, JOB_ID, &settings(3600, 30), &Context::new())
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Finished);
        assert_eq!(source.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_terminal_status_fails() {
        let source = ScriptedSource::new(&[JobStatus::Active, JobStatus::Canceled]);

        let err = wait_for_installation(&source, SERVER_ID, JOB_ID, &settings(3600, 30), &Context::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InstallationError::Failed { status: JobStatus::Canceled, .. }
        ));
        assert_eq!(
            err.to_string(),
            format!("installation job {JOB_ID} of server {SERVER_ID} ended with status CANCELED")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let source = ScriptedSource::new(&[JobStatus::Active]);
        let started = Instant::now();

        let err = wait_for_installation(&source, SERVER_ID, JOB_ID, &settings(100, 30), &Context::new())
            .await
            .unwrap_err();

        assert!(matches!(err, InstallationError::Timeout { .. }));
        assert_eq!(source.calls(), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_polling() {
        let source = ScriptedSource::new(&[JobStatus::Active]);
        let ctx = Context::new();

        let cancel = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(45)).await;
            cancel.cancel();
        });

        let err = wait_for_installation(&source, SERVER_ID, JOB_ID, &settings(3600, 30), &ctx)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_never_polls() {
        let source = ScriptedSource::new(&[JobStatus::Finished]);
        let ctx = Context::new();
        ctx.cancel();

        let err = wait_for_installation(&source, SERVER_ID, JOB_ID, &settings(3600, 30), &ctx)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_is_wrapped() {
        let source = ScriptedSource::failing(500);

        let err = wait_for_installation(&source, SERVER_ID, JOB_ID, &settings(3600, 30), &Context::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("wait_for_installation: get_job {JOB_ID:?}: request failed")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_timeout_still_polls() {
        let config = ProviderConfig {
            installation_timeout_seconds: i64::MAX,
            ..Default::default()
        };
        let source = ScriptedSource::new(&[JobStatus::Finished]);

        let job = wait_for_installation(
            &source,
            SERVER_ID,
            JOB_ID,
            &InstallationSettings::from(&config),
            &Context::new(),
        )
        .await
        .unwrap();

        assert_eq!(job.status, JobStatus::Finished);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_poll_interval_is_raised() {
        let source = ScriptedSource::new(&[JobStatus::Active, JobStatus::Finished]);
        let started = Instant::now();
        let settings = InstallationSettings {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::ZERO,
        };

        let job = wait_for_installation(&source, SERVER_ID, JOB_ID, &settings, &Context::new())
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Finished);
        assert_eq!(source.calls(), 2);
        assert_eq!(started.elapsed(), MIN_POLL_INTERVAL);
    }

    #[test]
    fn test_settings_from_config() {
        let config = ProviderConfig {
            installation_timeout_seconds: 120,
            installation_poll_interval_seconds: 10,
            ..Default::default()
        };
        assert_eq!(InstallationSettings::from(&config), settings(120, 10));
        assert_eq!(InstallationSettings::default(), settings(3600, 30));
    }
}
