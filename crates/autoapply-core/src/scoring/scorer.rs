use crate::model::ExtractedJobInfo;
use crate::skills::{chips_have_any, text_has_any, SkillModel, TRIPLET_BONUS};

use super::{EligibilityVerdict, IneligibleReason, ScoreResult};

/// Scores extracted job details against a [`SkillModel`].
#[derive(Debug, Clone)]
pub struct EligibilityScorer {
    model: SkillModel,
}

impl EligibilityScorer {
    pub fn new(model: SkillModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &SkillModel {
        &self.model
    }

    pub fn score(&self, info: &ExtractedJobInfo) -> ScoreResult {
        let description = info.description.as_str();
        let mut total_score = 0.0;
        let mut max_possible_score = 0.0;
        let mut matched_skills = Vec::new();

        for set in &self.model.skill_sets {
            max_possible_score += set.weight;
            let primary = text_has_any(description, &set.primary_terms)
                || chips_have_any(&info.skill_chips, &set.primary_terms);
            if primary {
                total_score += set.weight;
                matched_skills.push(set.name.clone());
                continue;
            }
            let related = text_has_any(description, &set.related_terms)
                || chips_have_any(&info.skill_chips, &set.related_terms);
            if related {
                total_score += set.weight * 0.5;
                matched_skills.push(format!("{} (related)", set.name));
            }
        }

        let mut bonus_score = 0.0;
        for rule in &self.model.bonus_keywords {
            let keyword = rule.keyword.trim().to_lowercase();
            if !keyword.is_empty() && description.contains(&keyword) {
                tracing::trace!(keyword = %keyword, bonus = rule.bonus, "bonus keyword matched");
                bonus_score += rule.bonus;
            }
        }
        for triplet in &self.model.bonus_triplets {
            let all = triplet
                .iter()
                .all(|term| description.contains(term.trim().to_lowercase().as_str()));
            if all {
                tracing::trace!(?triplet, "keyword triplet matched");
                bonus_score += TRIPLET_BONUS;
            }
        }

        let denominator =
            max_possible_score + self.model.bonus_triplets.len() as f64 * TRIPLET_BONUS;
        let match_percentage = if denominator > 0.0 {
            ((total_score + bonus_score) / denominator * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        ScoreResult {
            total_score,
            max_possible_score,
            bonus_score,
            match_percentage,
            matched_skills,
        }
    }

    pub fn applicant_limit(&self, openings: u32) -> u32 {
        self.model.applicant_limit(openings)
    }

    /// Apply the score threshold and applicant cap. Unknown applicants pass the cap.
    pub fn decide(&self, score: ScoreResult, info: &ExtractedJobInfo) -> EligibilityVerdict {
        if score.match_percentage < self.model.min_match_percentage {
            return EligibilityVerdict::NotEligible {
                score,
                reason: IneligibleReason::ScoreBelowThreshold,
            };
        }
        let limit = self.applicant_limit(info.openings_count);
        match info.applicants_count {
            Some(applicants) if applicants >= limit => EligibilityVerdict::NotEligible {
                score,
                reason: IneligibleReason::ApplicantLimitExceeded,
            },
            _ => EligibilityVerdict::Eligible { score },
        }
    }

    /// Score and decide, ignoring the title.
    pub fn verdict(&self, info: &ExtractedJobInfo) -> EligibilityVerdict {
        let score = self.score(info);
        self.decide(score, info)
    }
}
