use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::JobPosting;
use crate::scoring::{IneligibleReason, ScoreResult};

/// Why a posting ended in the skipped list. `Display` is the machine-readable
/// reason recorded by reporting sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum SkipReason {
    QuotaReached,
    NavigationFailed,
    AlreadyApplied,
    NotEligible(IneligibleReason),
    CompanyRedirect,
    NoApplyControl,
    ApplyFailed(String),
    ConfirmationMissing,
    Error(String),
}

impl SkipReason {
    /// Skips worth a manual look: the platform refused the click or sent us elsewhere.
    pub fn needs_follow_up(&self) -> bool {
        matches!(self, SkipReason::ApplyFailed(_) | SkipReason::CompanyRedirect)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::QuotaReached => write!(f, "Application limit reached"),
            SkipReason::NavigationFailed => write!(f, "Navigation failed"),
            SkipReason::AlreadyApplied => write!(f, "Already applied"),
            SkipReason::NotEligible(reason) => write!(f, "{}", reason),
            SkipReason::CompanyRedirect => write!(f, "Company website redirect"),
            SkipReason::NoApplyControl => write!(f, "No apply button found"),
            SkipReason::ApplyFailed(msg) => write!(f, "Apply failed: {}", msg),
            SkipReason::ConfirmationMissing => {
                write!(f, "Application confirmation not found - clicked successfully")
            }
            SkipReason::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl From<SkipReason> for String {
    fn from(reason: SkipReason) -> Self {
        reason.to_string()
    }
}

/// Terminal state of one posting in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplicationOutcome {
    Applied {
        job: JobPosting,
        applied_at: DateTime<Utc>,
        score: ScoreResult,
    },
    Skipped {
        job: JobPosting,
        reason: SkipReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<ScoreResult>,
    },
}

impl ApplicationOutcome {
    pub fn applied(job: JobPosting, score: ScoreResult) -> Self {
        ApplicationOutcome::Applied {
            job,
            applied_at: Utc::now(),
            score,
        }
    }

    pub fn skipped(job: JobPosting, reason: SkipReason) -> Self {
        ApplicationOutcome::Skipped {
            job,
            reason,
            score: None,
        }
    }

    pub fn skipped_with_score(job: JobPosting, reason: SkipReason, score: ScoreResult) -> Self {
        ApplicationOutcome::Skipped {
            job,
            reason,
            score: Some(score),
        }
    }

    pub fn job(&self) -> &JobPosting {
        match self {
            ApplicationOutcome::Applied { job, .. } | ApplicationOutcome::Skipped { job, .. } => {
                job
            }
        }
    }

    pub fn score(&self) -> Option<&ScoreResult> {
        match self {
            ApplicationOutcome::Applied { score, .. } => Some(score),
            ApplicationOutcome::Skipped { score, .. } => score.as_ref(),
        }
    }

    pub fn reason(&self) -> Option<&SkipReason> {
        match self {
            ApplicationOutcome::Applied { .. } => None,
            ApplicationOutcome::Skipped { reason, .. } => Some(reason),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ApplicationOutcome::Applied { .. })
    }
}
