//! Per-posting apply sequence.

use crate::driver::{
    probe_flag, ApplyStatus, AutomationDriver, PageProbe, SessionData, SessionProvider,
    WaitOptions,
};
use crate::model::{ApplicationOutcome, ExtractedJobInfo, JobPosting, SkipReason};
use crate::quota::ApplicationCounterStore;
use crate::scoring::{EligibilityVerdict, ScoreResult};
use crate::wait::poll_until;

use super::{JobError, JobStage, Orchestrator};

const NOT_COMPLETED: &str = "Application did not complete successfully";

fn enter(job: &JobPosting, stage: JobStage) {
    tracing::debug!(link = %job.link, %stage, "stage");
}

impl<D, S, C> Orchestrator<D, S, C>
where
    D: AutomationDriver,
    S: SessionProvider,
    C: ApplicationCounterStore,
{
    pub(super) async fn process_job(
        &self,
        job: &JobPosting,
        session: &SessionData,
    ) -> Result<ApplicationOutcome, JobError> {
        let settings = &self.settings;
        let platform = &settings.platform;
        enter(job, JobStage::Start);

        if let Err(e) = self.driver.navigate(&job.link, &settings.navigation).await {
            tracing::warn!(link = %job.link, error = %e, "navigation failed");
            return Ok(ApplicationOutcome::skipped(job.clone(), SkipReason::NavigationFailed));
        }
        enter(job, JobStage::Navigated);

        match self
            .driver
            .wait_for_selector(
                &platform.content_selector,
                WaitOptions::attached(settings.content_timeout),
            )
            .await
        {
            Ok(()) => enter(job, JobStage::ContentReady),
            Err(e) if e.is_timeout() => {
                tracing::warn!(link = %job.link, error = %e, "job content not found, continuing")
            }
            Err(e) => return Err(JobError::at(JobStage::ContentReady)(e)),
        }

        enter(job, JobStage::DuplicateCheck);
        let already_applied = probe_flag(&self.driver, PageProbe::AppliedMarker)
            .await
            .map_err(JobError::at(JobStage::DuplicateCheck))?;
        if already_applied {
            return Ok(ApplicationOutcome::skipped(job.clone(), SkipReason::AlreadyApplied));
        }

        enter(job, JobStage::TitleFilter);
        let details = match self.driver.evaluate(PageProbe::JobDetails).await {
            Ok(value) => ExtractedJobInfo::from_value(value),
            Err(e) => Err(e.into()),
        };
        let assessment = self.engine.assess(&job.title, details);
        enter(job, JobStage::Scored);
        let score = match assessment.verdict {
            EligibilityVerdict::NotEligible { score, reason } => {
                return Ok(ApplicationOutcome::skipped_with_score(
                    job.clone(),
                    SkipReason::NotEligible(reason),
                    score,
                ));
            }
            EligibilityVerdict::Eligible { score } => score,
        };

        self.driver
            .restore_session(session)
            .await
            .map_err(JobError::at(JobStage::SessionRestored))?;
        if let Err(e) = self.driver.navigate(&job.link, &settings.navigation).await {
            tracing::warn!(link = %job.link, error = %e, "re-navigation failed");
            return Ok(skip(job, SkipReason::NavigationFailed, score));
        }
        enter(job, JobStage::SessionRestored);

        enter(job, JobStage::RedirectCheck);
        let external = probe_flag(&self.driver, PageProbe::ExternalApply)
            .await
            .map_err(JobError::at(JobStage::RedirectCheck))?;
        if external {
            return Ok(skip(job, SkipReason::CompanyRedirect, score));
        }

        if let Err(e) = self
            .driver
            .wait_for_selector(
                &platform.apply_selector,
                WaitOptions::visible(settings.apply_control_timeout),
            )
            .await
        {
            tracing::info!(link = %job.link, error = %e, "apply control not found");
            return Ok(skip(job, SkipReason::NoApplyControl, score));
        }

        enter(job, JobStage::ApplyAttempt);
        if let Err(reason) = self.click_apply().await {
            return Ok(skip(job, reason, score));
        }

        let body = self
            .driver
            .evaluate(PageProbe::BodyText)
            .await
            .map_err(JobError::at(JobStage::ApplyAttempt))?;
        let confirmed = body
            .as_str()
            .is_some_and(|text| text.contains(platform.confirmation_phrase.as_str()));
        if confirmed {
            enter(job, JobStage::Confirmed);
            Ok(ApplicationOutcome::applied(job.clone(), score))
        } else {
            enter(job, JobStage::NotConfirmed);
            Ok(skip(job, SkipReason::ConfirmationMissing, score))
        }
    }

    /// Click the apply control and wait for the page to react.
    async fn click_apply(&self) -> Result<(), SkipReason> {
        let selector = self.settings.platform.apply_selector.as_str();
        if let Err(dom_err) = self.driver.dom_click(selector).await {
            tracing::debug!(error = %dom_err, "in-page click failed, trying physical click");
            if let Err(e) = self.driver.click(selector).await {
                return Err(SkipReason::ApplyFailed(e.to_string()));
            }
        }

        let state = poll_until(
            self.settings.confirmation,
            || self.read_click_state(),
            |s: &ClickState| s.marked,
        )
        .await?;

        if !state.marked && state.control_visible {
            return Err(SkipReason::ApplyFailed(NOT_COMPLETED.to_string()));
        }
        Ok(())
    }

    /// One post-click observation: the already-applied marker, else the
    /// configured success text in the page body.
    async fn read_click_state(&self) -> Result<ClickState, SkipReason> {
        let value = self
            .driver
            .evaluate(PageProbe::ApplyStatus)
            .await
            .map_err(|e| SkipReason::ApplyFailed(e.to_string()))?;
        let status: ApplyStatus = serde_json::from_value(value)
            .map_err(|e| SkipReason::ApplyFailed(format!("unreadable apply status: {e}")))?;
        if status.applied_marker {
            return Ok(ClickState {
                marked: true,
                control_visible: status.control_visible,
            });
        }

        let marker = self.settings.platform.success_marker.as_str();
        let body = self
            .driver
            .evaluate(PageProbe::BodyText)
            .await
            .map_err(|e| SkipReason::ApplyFailed(e.to_string()))?;
        let marked =
            !marker.is_empty() && body.as_str().is_some_and(|text| text.contains(marker));
        Ok(ClickState {
            marked,
            control_visible: status.control_visible,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct ClickState {
    marked: bool,
    control_visible: bool,
}

fn skip(job: &JobPosting, reason: SkipReason, score: ScoreResult) -> ApplicationOutcome {
    ApplicationOutcome::skipped_with_score(job.clone(), reason, score)
}
