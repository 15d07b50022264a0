//! Paged collection of postings from the platform's search results.

mod collect;
pub mod fixture;
mod query;

pub use collect::{collect_postings, page_delay, ListingError};
pub use query::{search_url, total_pages, SearchQuery, FALLBACK_PAGES, POSTINGS_PER_PAGE};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::driver::DriverError;
use crate::model::JobPosting;

/// One loaded search-results page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingPage {
    pub postings: Vec<JobPosting>,
    /// Result-count header text, e.g. `"1 - 20 of 2790"`.
    pub count_text: Option<String>,
}

/// Loads search-result pages. Implementations navigate and wait for the result list.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn load(&self, url: &str) -> Result<ListingPage, DriverError>;
}
