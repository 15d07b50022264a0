use std::collections::HashSet;
use std::time::Duration;

use super::query::{search_url, total_pages, SearchQuery};
use super::ListingSource;
use crate::config::PacingConfig;
use crate::driver::DriverError;
use crate::model::JobPosting;
use crate::retry::{run_with_retry, RetryPolicy};

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("first results page failed to load: {0}")]
    FirstPage(#[source] DriverError),
}

/// Random delay in `[min, max]` milliseconds.
pub fn page_delay(pacing: &PacingConfig) -> Duration {
    let min = pacing.min_page_delay_ms.min(pacing.max_page_delay_ms);
    let max = pacing.min_page_delay_ms.max(pacing.max_page_delay_ms);
    let span = u128::from(max - min) + 1;
    let jitter = uuid::Uuid::new_v4().as_u128() % span;
    Duration::from_millis(min + jitter as u64)
}

/// Collect postings from up to `max_pages` result pages.
///
/// The first page is retried per `retry` and is fatal when it never loads; it
/// also yields the result count that bounds the page range. Later pages are
/// retried then skipped. An empty page is re-read once after the retry delay
/// and otherwise ends collection. Postings are de-duplicated by link.
pub async fn collect_postings<L: ListingSource + ?Sized>(
    source: &L,
    base_url: &str,
    query: &SearchQuery,
    max_pages: u32,
    retry: &RetryPolicy,
    pacing: &PacingConfig,
) -> Result<Vec<JobPosting>, ListingError> {
    let first_url = search_url(base_url, query, 1)?;
    tracing::info!(url = %first_url, "loading first results page");
    let first = run_with_retry(retry, |_| source.load(first_url.as_str()))
        .await
        .map_err(ListingError::FirstPage)?;

    let available = total_pages(first.count_text.as_deref());
    let pages = max_pages.min(available).max(1);
    tracing::info!(available, pages, "collecting result pages");

    let mut seen = HashSet::new();
    let mut postings = Vec::new();
    let mut first = Some(first);

    for page in 1..=pages {
        let url = search_url(base_url, query, page)?;
        let loaded = match first.take() {
            Some(p) => p,
            None => match run_with_retry(retry, |_| source.load(url.as_str())).await {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(page, error = %e, "skipping results page after failed attempts");
                    continue;
                }
            },
        };

        let mut found = loaded.postings;
        if found.is_empty() {
            tracing::debug!(page, "no postings on page, re-reading once");
            tokio::time::sleep(retry.base_delay).await;
            found = match source.load(url.as_str()).await {
                Ok(p) => p.postings,
                Err(e) => {
                    tracing::warn!(page, error = %e, "re-read failed");
                    Vec::new()
                }
            };
            if found.is_empty() {
                tracing::info!(page, "no postings after re-read, assuming end of results");
                break;
            }
        }

        let before = postings.len();
        for posting in found {
            if seen.insert(posting.link.clone()) {
                postings.push(posting);
            }
        }
        tracing::info!(page, new = postings.len() - before, "collected page");

        if page < pages {
            let delay = page_delay(pacing);
            tracing::debug!(?delay, "waiting before next page");
            tokio::time::sleep(delay).await;
        }
    }

    Ok(postings)
}
