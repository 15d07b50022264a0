//! Application orchestrator: drives each posting through navigation,
//! duplicate check, eligibility, session restore and the apply click.
//!
//! Jobs run strictly one after another on a single page. A failing job
//! becomes a skipped outcome; only login, page acquisition and counter
//! errors abort the run.

mod apply;
mod settings;
mod stage;

#[cfg(test)]
mod tests;

pub use settings::OrchestratorSettings;
pub use stage::JobStage;

use std::sync::Arc;

use crate::driver::{AuthError, AutomationDriver, Credentials, DriverError, SessionProvider};
use crate::model::{ApplicationOutcome, JobPosting, SkipReason};
use crate::quota::{ApplicationCounterStore, CounterError, RateLimiter};
use crate::report::{dispatch, OutcomeAggregator, ReportSink, RunSummary};
use crate::scoring::EligibilityEngine;

/// Unexpected driver failure inside one job. Recorded as `"Error: <message>"`.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct JobError {
    pub stage: JobStage,
    #[source]
    pub source: DriverError,
}

impl JobError {
    fn at(stage: JobStage) -> impl FnOnce(DriverError) -> JobError {
        move |source| JobError { stage, source }
    }
}

/// Failure that aborts the whole run. The counter is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("application counter: {0}")]
    Counter(#[from] CounterError),
    #[error("login failed: {0}")]
    Auth(#[from] AuthError),
    #[error("could not acquire browser page: {0}")]
    Page(#[source] DriverError),
    #[error("could not capture session: {0}")]
    Session(#[source] DriverError),
}

pub struct Orchestrator<D, S, C> {
    driver: D,
    sessions: S,
    counter: C,
    engine: EligibilityEngine,
    limiter: RateLimiter,
    settings: OrchestratorSettings,
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl<D, S, C> Orchestrator<D, S, C>
where
    D: AutomationDriver,
    S: SessionProvider,
    C: ApplicationCounterStore,
{
    pub fn new(driver: D, sessions: S, counter: C, engine: EligibilityEngine) -> Self {
        Self {
            driver,
            sessions,
            counter,
            engine,
            limiter: RateLimiter::default(),
            settings: OrchestratorSettings::default(),
            sinks: Vec::new(),
        }
    }

    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Process `jobs` in order and return one outcome per input posting.
    ///
    /// When the quota is already used up every posting is skipped with
    /// `"Application limit reached"` and neither the driver nor the sinks are
    /// touched. Otherwise the counter is committed once with the number of
    /// confirmed applications and the summary is handed to every sink. A
    /// failed commit is reported only after the sinks have the summary.
    pub async fn run(
        &self,
        jobs: Vec<JobPosting>,
        credentials: &Credentials,
    ) -> Result<RunSummary, RunError> {
        let counter = self.counter.load()?;
        let remaining = self.limiter.remaining(&counter);
        let mut outcomes = OutcomeAggregator::new();

        if remaining == 0 {
            tracing::info!(
                max = self.limiter.global_max(),
                applied = counter.successfully_applied,
                "application limit reached, skipping all postings"
            );
            for job in jobs {
                outcomes.record(ApplicationOutcome::skipped(job, SkipReason::QuotaReached));
            }
            return Ok(outcomes.finish(counter.successfully_applied));
        }

        self.driver.open_page().await.map_err(RunError::Page)?;
        let mut session = self.sessions.login(credentials).await?;
        if session.is_empty() {
            session = self.driver.capture_session().await.map_err(RunError::Session)?;
        }

        let total = jobs.len();
        tracing::info!(total, remaining, "starting run");
        for (index, job) in jobs.into_iter().enumerate() {
            if outcomes.applied_count() >= remaining as usize {
                outcomes.record(ApplicationOutcome::skipped(job, SkipReason::QuotaReached));
                continue;
            }
            tracing::info!(n = index + 1, total, job = %job, "processing posting");
            let outcome = match self.process_job(&job, &session).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(job = %job, stage = %e.stage, error = %e, "job failed");
                    ApplicationOutcome::skipped(job, SkipReason::Error(e.to_string()))
                }
            };
            match outcome.reason() {
                Some(reason) => tracing::info!(link = %outcome.job().link, %reason, "skipped"),
                None => tracing::info!(link = %outcome.job().link, "applied"),
            }
            outcomes.record(outcome);
        }

        let applied = outcomes.applied_count() as u32;
        let mut commit_error = None;
        let mut lifetime = counter.successfully_applied;
        if applied > 0 {
            match self.counter.commit(applied) {
                Ok(committed) => lifetime = committed.successfully_applied,
                Err(e) => {
                    tracing::error!(applied, error = %e, "could not commit application counter");
                    commit_error = Some(e);
                }
            }
        }
        let summary = outcomes.finish(lifetime);
        tracing::info!(
            applied = summary.applied.len(),
            skipped = summary.skipped.len(),
            lifetime,
            "run complete"
        );
        dispatch(&self.sinks, &summary).await;
        match commit_error {
            Some(e) => Err(RunError::Counter(e)),
            None => Ok(summary),
        }
    }
}
