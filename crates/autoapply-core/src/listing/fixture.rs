//! Listing source backed by recorded result pages, for offline collection.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use url::Url;

use super::{ListingPage, ListingSource};
use crate::driver::DriverError;

/// Serves `pages[n - 1]` for the `n`th results page of any search. Pages past
/// the end come back empty, which ends collection.
pub struct FixtureListing {
    pages: Vec<ListingPage>,
    loads: Mutex<Vec<u32>>,
}

impl FixtureListing {
    pub fn new(pages: Vec<ListingPage>) -> Self {
        Self {
            pages,
            loads: Mutex::new(Vec::new()),
        }
    }

    /// Load a JSON array of `{postings, count_text}` pages.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read listing pages: {}", path.display()))?;
        let pages: Vec<ListingPage> = serde_json::from_str(&data)
            .with_context(|| format!("parse listing pages: {}", path.display()))?;
        Ok(Self::new(pages))
    }

    /// Page numbers requested so far, in order.
    pub fn loads(&self) -> Vec<u32> {
        self.loads.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Page number encoded in a `/{slug}-jobs[-N]` results path.
fn page_number(url: &str) -> Result<u32, DriverError> {
    let parsed = Url::parse(url).map_err(|e| DriverError::Network(format!("{url}: {e}")))?;
    let last = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    match last.rsplit_once("-jobs") {
        Some((_, "")) => Ok(1),
        Some((_, suffix)) => suffix
            .strip_prefix('-')
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| DriverError::Network(format!("not a results page: {url}"))),
        None => Err(DriverError::Network(format!("not a results page: {url}"))),
    }
}

#[async_trait]
impl ListingSource for FixtureListing {
    async fn load(&self, url: &str) -> Result<ListingPage, DriverError> {
        let n = page_number(url)?;
        self.loads.lock().unwrap_or_else(|e| e.into_inner()).push(n);
        let index = n.saturating_sub(1) as usize;
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PacingConfig, RetryConfig};
    use crate::listing::{collect_postings, SearchQuery};
    use crate::model::JobPosting;

    fn page(links: &[u32], count: Option<&str>) -> ListingPage {
        ListingPage {
            postings: links
                .iter()
                .map(|n| JobPosting::new("React Developer", "Acme", "", format!("https://jobs.test/{n}")))
                .collect(),
            count_text: count.map(str::to_string),
        }
    }

    #[test]
    fn page_numbers_from_results_paths() {
        assert_eq!(page_number("https://www.naukri.com/react-jobs?k=react").unwrap(), 1);
        assert_eq!(page_number("https://www.naukri.com/react-jobs-7?k=react").unwrap(), 7);
        assert_eq!(
            page_number("https://www.naukri.com/react-native-jobs-2").unwrap(),
            2
        );
        assert!(page_number("https://www.naukri.com/login").is_err());
    }

    #[test]
    fn pages_document_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.json");
        std::fs::write(
            &path,
            r#"[{"postings": [{"title": "React Developer", "company": "Acme",
                 "location": "Remote", "link": "https://jobs.test/1"}],
                 "count_text": "1 - 20 of 21"},
                {"postings": []}]"#,
        )
        .unwrap();
        let source = FixtureListing::load(&path).unwrap();
        assert_eq!(source.pages.len(), 2);
        assert_eq!(source.pages[0].count_text.as_deref(), Some("1 - 20 of 21"));
        assert!(source.pages[1].count_text.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn collects_through_configured_retry_and_pacing() {
        let source = FixtureListing::new(vec![
            page(&[1, 2], Some("1 - 20 of 60")),
            page(&[2, 3], None),
        ]);
        let got = collect_postings(
            &source,
            "https://www.naukri.com",
            &SearchQuery::new("react"),
            10,
            &RetryConfig::default().policy(),
            &PacingConfig::default(),
        )
        .await
        .unwrap();
        let links: Vec<_> = got.iter().map(|p| p.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://jobs.test/1", "https://jobs.test/2", "https://jobs.test/3"]
        );
        // Page 3 is empty: read, re-read once, then collection stops.
        assert_eq!(source.loads(), vec![1, 2, 3, 3]);
    }
}
