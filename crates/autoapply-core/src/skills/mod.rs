//! Skill model: weighted skill sets, bonus rules, thresholds and title rules.
//!
//! The model is configuration data. A TOML document can replace the built-in
//! model (see [`SkillModel::load_from_path`]) so scoring criteria change
//! without a rebuild.

mod defaults;
mod matching;

pub use matching::{chips_have_any, contains_term, text_has_any};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weighted skill definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    pub name: String,
    /// Full weight when any of these appear.
    pub primary_terms: Vec<String>,
    /// Half weight when no primary term matched but one of these did.
    #[serde(default)]
    pub related_terms: Vec<String>,
    pub weight: f64,
}

/// Single keyword that adds a fixed bonus when present in the description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusKeyword {
    pub keyword: String,
    pub bonus: f64,
}

/// Title and generalist-role rules applied before the apply decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleRules {
    /// Regex (case-insensitive) the title must match.
    pub role_pattern: String,
    /// Substrings (case-insensitive) that reject a title outright.
    pub denylist: Vec<String>,
    /// Regex (case-insensitive) marking a combined front/back-end role.
    pub combined_role_pattern: String,
    /// A combined role must mention one of these in description or chips.
    pub backend_keywords: Vec<String>,
}

impl Default for TitleRules {
    fn default() -> Self {
        defaults::title_rules()
    }
}

/// Full scoring model.
///
/// Field order matters for TOML output: plain values precede the tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillModel {
    #[serde(default = "default_min_match_percentage")]
    pub min_match_percentage: f64,
    #[serde(default = "default_applicants_per_opening")]
    pub applicants_per_opening: u32,
    #[serde(default = "default_min_applicant_limit")]
    pub min_applicant_limit: u32,
    /// Each triplet adds [`TRIPLET_BONUS`] when all three terms appear.
    #[serde(default)]
    pub bonus_triplets: Vec<[String; 3]>,
    pub skill_sets: Vec<SkillSet>,
    #[serde(default)]
    pub bonus_keywords: Vec<BonusKeyword>,
    #[serde(default)]
    pub title: TitleRules,
}

/// Bonus awarded per matching keyword triplet.
pub const TRIPLET_BONUS: f64 = 1.0;

fn default_min_match_percentage() -> f64 {
    50.0
}

fn default_applicants_per_opening() -> u32 {
    350
}

fn default_min_applicant_limit() -> u32 {
    100
}

/// Rejected model document.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model has no skill sets")]
    Empty,
    #[error("skill set {name:?} has non-positive weight {weight}")]
    InvalidWeight { name: String, weight: f64 },
    #[error("skill set {0:?} has no primary terms")]
    NoPrimaryTerms(String),
    #[error("bonus keyword {keyword:?} has negative bonus {bonus}")]
    NegativeBonus { keyword: String, bonus: f64 },
    #[error("bonus triplet {0:?} has a blank term")]
    BlankTripletTerm([String; 3]),
    #[error("min_match_percentage {0} outside 0..=100")]
    Threshold(f64),
    #[error("invalid title pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Default for SkillModel {
    fn default() -> Self {
        defaults::frontend_model()
    }
}

impl SkillModel {
    /// Check the invariants the scorer relies on (bounded, non-negative scores).
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.skill_sets.is_empty() {
            return Err(ModelError::Empty);
        }
        for set in &self.skill_sets {
            if !(set.weight.is_finite() && set.weight > 0.0) {
                return Err(ModelError::InvalidWeight {
                    name: set.name.clone(),
                    weight: set.weight,
                });
            }
            if set.primary_terms.iter().all(|t| t.trim().is_empty()) {
                return Err(ModelError::NoPrimaryTerms(set.name.clone()));
            }
        }
        for rule in &self.bonus_keywords {
            if !(rule.bonus.is_finite() && rule.bonus >= 0.0) {
                return Err(ModelError::NegativeBonus {
                    keyword: rule.keyword.clone(),
                    bonus: rule.bonus,
                });
            }
        }
        if let Some(triplet) = self
            .bonus_triplets
            .iter()
            .find(|t| t.iter().any(|term| term.trim().is_empty()))
        {
            return Err(ModelError::BlankTripletTerm(triplet.clone()));
        }
        if !(0.0..=100.0).contains(&self.min_match_percentage) {
            return Err(ModelError::Threshold(self.min_match_percentage));
        }
        regex::Regex::new(&self.title.role_pattern)?;
        regex::Regex::new(&self.title.combined_role_pattern)?;
        Ok(())
    }

    /// Parse and validate a TOML model document.
    pub fn from_toml_str(doc: &str) -> anyhow::Result<Self> {
        let model: SkillModel = toml::from_str(doc).context("parse skill model")?;
        model.validate()?;
        Ok(model)
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let doc = std::fs::read_to_string(path)
            .with_context(|| format!("read skill model: {}", path.display()))?;
        Self::from_toml_str(&doc).with_context(|| format!("load skill model: {}", path.display()))
    }

    /// Built-in model unless `path` names a document.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// `max(applicants_per_opening * openings, min_applicant_limit)`.
    pub fn applicant_limit(&self, openings: u32) -> u32 {
        self.applicants_per_opening
            .saturating_mul(openings)
            .max(self.min_applicant_limit)
    }
}
