//! Title gate and combined-role (fullstack) gate.

use regex::{Regex, RegexBuilder};

use crate::model::ExtractedJobInfo;
use crate::skills::{chips_have_any, text_has_any, ModelError, TitleRules};

/// Result of the title gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleCheck {
    Passed,
    /// Title names neither of the accepted roles.
    NotARole,
    /// Title contains this denylisted term.
    Denied(String),
}

impl TitleCheck {
    pub fn passed(&self) -> bool {
        matches!(self, TitleCheck::Passed)
    }
}

/// Compiled [`TitleRules`].
#[derive(Debug, Clone)]
pub struct TitleFilter {
    role: Regex,
    combined_role: Regex,
    denylist: Vec<String>,
    backend_keywords: Vec<String>,
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl TitleFilter {
    pub fn new(rules: &TitleRules) -> Result<Self, ModelError> {
        Ok(Self {
            role: case_insensitive(&rules.role_pattern)?,
            combined_role: case_insensitive(&rules.combined_role_pattern)?,
            denylist: rules
                .denylist
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            backend_keywords: rules.backend_keywords.clone(),
        })
    }

    pub fn check_title(&self, title: &str) -> TitleCheck {
        if !self.role.is_match(title) {
            return TitleCheck::NotARole;
        }
        let lower = title.to_lowercase();
        match self.denylist.iter().find(|term| lower.contains(term.as_str())) {
            Some(term) => TitleCheck::Denied(term.clone()),
            None => TitleCheck::Passed,
        }
    }

    pub fn is_combined_role(&self, title: &str) -> bool {
        self.combined_role.is_match(title)
    }

    /// A combined role passes only when description or chips mention a backend keyword.
    /// Any other title passes unconditionally.
    pub fn role_requirements_met(&self, title: &str, info: &ExtractedJobInfo) -> bool {
        if !self.is_combined_role(title) {
            return true;
        }
        text_has_any(&info.description, &self.backend_keywords)
            || chips_have_any(&info.skill_chips, &self.backend_keywords)
    }
}
