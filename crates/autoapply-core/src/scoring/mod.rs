//! Eligibility scoring: weighted skill matching, applicant cap and the
//! combined title/score/fallback decision.

mod engine;
mod scorer;

pub use engine::{Assessment, EligibilityEngine};
pub use scorer::EligibilityScorer;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Skill-match result for one posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Sum of full and half skill-set weights (bonuses excluded).
    pub total_score: f64,
    pub max_possible_score: f64,
    pub bonus_score: f64,
    /// `(total + bonus) / (max + triplet count) * 100`, clamped to `[0, 100]`.
    pub match_percentage: f64,
    /// Set names in model order; half matches carry a `" (related)"` suffix.
    pub matched_skills: Vec<String>,
}

impl ScoreResult {
    /// Score reported when the page could not be read.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Why a posting is not worth applying to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum IneligibleReason {
    TitleNotSuitable,
    CombinedRoleLacksBackend,
    ScoreBelowThreshold,
    ApplicantLimitExceeded,
    DetailsUnavailable,
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IneligibleReason::TitleNotSuitable => "Job title not suitable",
            IneligibleReason::CombinedRoleLacksBackend => "Fullstack job lacks backend requirement",
            IneligibleReason::ScoreBelowThreshold => "Match score below threshold",
            IneligibleReason::ApplicantLimitExceeded => "Applicant limit exceeded",
            IneligibleReason::DetailsUnavailable => "Job details unavailable",
        };
        f.write_str(text)
    }
}

impl From<IneligibleReason> for String {
    fn from(reason: IneligibleReason) -> Self {
        reason.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EligibilityVerdict {
    Eligible { score: ScoreResult },
    NotEligible { score: ScoreResult, reason: IneligibleReason },
}

impl EligibilityVerdict {
    pub fn score(&self) -> &ScoreResult {
        match self {
            EligibilityVerdict::Eligible { score } | EligibilityVerdict::NotEligible { score, .. } => {
                score
            }
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityVerdict::Eligible { .. })
    }

    pub fn into_score(self) -> ScoreResult {
        match self {
            EligibilityVerdict::Eligible { score } | EligibilityVerdict::NotEligible { score, .. } => {
                score
            }
        }
    }
}

/// Decision when job details cannot be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Treat as eligible with an empty score.
    #[default]
    Permissive,
    /// Skip with [`IneligibleReason::DetailsUnavailable`].
    Conservative,
}
