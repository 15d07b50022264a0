use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A job posting handed to the orchestrator. Identity is the link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub link: String,
}

impl JobPosting {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            link: link.into(),
        }
    }

    /// Location for display; the platform often omits it.
    pub fn location_or_na(&self) -> &str {
        if self.location.trim().is_empty() {
            "N/A"
        } else {
            &self.location
        }
    }
}

impl PartialEq for JobPosting {
    fn eq(&self, other: &Self) -> bool {
        self.link == other.link
    }
}

impl Eq for JobPosting {}

impl Hash for JobPosting {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.link.hash(state);
    }
}

impl fmt::Display for JobPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.title, self.company)
    }
}
