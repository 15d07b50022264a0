//! Per-page job snapshot produced by the driver and normalized here.

use serde::{Deserialize, Serialize};

use crate::driver::DriverError;

/// Why the job details could not be turned into an [`ExtractedJobInfo`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("page evaluation failed: {0}")]
    Driver(#[from] DriverError),
    #[error("malformed job details: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid {field} count: {value:?}")]
    InvalidCount { field: &'static str, value: String },
}

/// A count as read from the page: drivers report either the stat text or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountField {
    Number(u64),
    Text(String),
}

/// Job details exactly as the driver read them from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJobDetails {
    #[serde(default)]
    pub skill_chips: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub applicants: Option<CountField>,
    #[serde(default)]
    pub openings: Option<CountField>,
}

/// Normalized snapshot consumed once by the scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedJobInfo {
    /// Lower-cased, trimmed chip texts.
    pub skill_chips: Vec<String>,
    /// Lower-cased description text.
    pub description: String,
    /// `None` when the page shows no applicant stat.
    pub applicants_count: Option<u32>,
    pub openings_count: u32,
}

impl ExtractedJobInfo {
    pub fn new(
        skill_chips: impl IntoIterator<Item = impl AsRef<str>>,
        description: &str,
        applicants_count: Option<u32>,
        openings_count: u32,
    ) -> Self {
        Self {
            skill_chips: skill_chips
                .into_iter()
                .map(|chip| chip.as_ref().trim().to_lowercase())
                .filter(|chip| !chip.is_empty())
                .collect(),
            description: description.to_lowercase(),
            applicants_count,
            openings_count,
        }
    }

    /// Normalize raw driver output. Missing openings default to one.
    pub fn from_raw(raw: RawJobDetails) -> Result<Self, ExtractionError> {
        let applicants_count = raw
            .applicants
            .as_ref()
            .map(|count| parse_count("applicants", count))
            .transpose()?;
        let openings_count = raw
            .openings
            .as_ref()
            .map(|count| parse_count("openings", count))
            .transpose()?
            .unwrap_or(1);
        Ok(Self::new(
            &raw.skill_chips,
            &raw.description,
            applicants_count,
            openings_count,
        ))
    }

    /// Decode the JSON returned by a job-details probe.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ExtractionError> {
        let raw: RawJobDetails = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }
}

/// Parse a stat like `"1,234"` or `"100+"`: separators dropped, leading digits taken.
fn parse_count(field: &'static str, count: &CountField) -> Result<u32, ExtractionError> {
    let invalid = || ExtractionError::InvalidCount {
        field,
        value: match count {
            CountField::Number(n) => n.to_string(),
            CountField::Text(t) => t.clone(),
        },
    };
    match count {
        CountField::Number(n) => u32::try_from(*n).map_err(|_| invalid()),
        CountField::Text(text) => {
            let digits: String = text
                .trim()
                .chars()
                .filter(|c| *c != ',')
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u32>().map_err(|_| invalid())
        }
    }
}
