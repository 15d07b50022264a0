use crate::filter::{TitleCheck, TitleFilter};
use crate::model::{ExtractedJobInfo, ExtractionError};
use crate::skills::{ModelError, SkillModel};

use super::{EligibilityScorer, EligibilityVerdict, FallbackPolicy, IneligibleReason, ScoreResult};

/// Verdict plus the extraction failure it fell back from, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub verdict: EligibilityVerdict,
    pub degraded: Option<String>,
}

impl Assessment {
    fn clean(verdict: EligibilityVerdict) -> Self {
        Self {
            verdict,
            degraded: None,
        }
    }
}

/// Title gate, role gate, scorer and extraction fallback in one decision.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    scorer: EligibilityScorer,
    filter: TitleFilter,
    fallback: FallbackPolicy,
}

impl EligibilityEngine {
    pub fn new(model: SkillModel, fallback: FallbackPolicy) -> Result<Self, ModelError> {
        model.validate()?;
        let filter = TitleFilter::new(&model.title)?;
        Ok(Self {
            scorer: EligibilityScorer::new(model),
            filter,
            fallback,
        })
    }

    pub fn scorer(&self) -> &EligibilityScorer {
        &self.scorer
    }

    pub fn filter(&self) -> &TitleFilter {
        &self.filter
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Decide on a posting. The score is always computed when details are
    /// available so rejected postings still report it.
    pub fn assess(
        &self,
        title: &str,
        details: Result<ExtractedJobInfo, ExtractionError>,
    ) -> Assessment {
        let title_check = self.filter.check_title(title);
        if let TitleCheck::Denied(term) = &title_check {
            tracing::debug!(title, term = %term, "title hit denylist");
        }

        let info = match details {
            Ok(info) => info,
            Err(e) => return self.fall_back(title, title_check, e),
        };

        let score = self.scorer.score(&info);
        tracing::debug!(
            title,
            match_percentage = score.match_percentage,
            matched = ?score.matched_skills,
            applicants = ?info.applicants_count,
            openings = info.openings_count,
            applicant_limit = self.scorer.applicant_limit(info.openings_count),
            "scored posting"
        );

        if !title_check.passed() {
            return Assessment::clean(EligibilityVerdict::NotEligible {
                score,
                reason: IneligibleReason::TitleNotSuitable,
            });
        }
        if !self.filter.role_requirements_met(title, &info) {
            return Assessment::clean(EligibilityVerdict::NotEligible {
                score,
                reason: IneligibleReason::CombinedRoleLacksBackend,
            });
        }
        Assessment::clean(self.scorer.decide(score, &info))
    }

    fn fall_back(&self, title: &str, title_check: TitleCheck, e: ExtractionError) -> Assessment {
        let degraded = Some(e.to_string());
        if !title_check.passed() {
            return Assessment {
                verdict: EligibilityVerdict::NotEligible {
                    score: ScoreResult::empty(),
                    reason: IneligibleReason::TitleNotSuitable,
                },
                degraded,
            };
        }
        let verdict = match self.fallback {
            FallbackPolicy::Permissive => {
                tracing::warn!(title, error = %e, "job details unavailable, treating as eligible");
                EligibilityVerdict::Eligible {
                    score: ScoreResult::empty(),
                }
            }
            FallbackPolicy::Conservative => {
                tracing::warn!(title, error = %e, "job details unavailable, skipping");
                EligibilityVerdict::NotEligible {
                    score: ScoreResult::empty(),
                    reason: IneligibleReason::DetailsUnavailable,
                }
            }
        };
        Assessment { verdict, degraded }
    }
}
