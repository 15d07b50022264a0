use serde::{Deserialize, Serialize};
use url::Url;

/// Postings the platform shows per results page.
pub const POSTINGS_PER_PAGE: u32 = 20;

/// Page count assumed when the result count cannot be read.
pub const FALLBACK_PAGES: u32 = 50;

/// Search filters. Unset filters are left out of the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub keywords: String,
    /// Years of experience.
    pub experience: Option<u32>,
    /// Maximum posting age in days.
    pub job_age: Option<u32>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub salary: Option<String>,
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            ..Self::default()
        }
    }

    fn slug(&self) -> String {
        self.keywords
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
    }
}

/// `{base}/{slug}-jobs[-{page}]?k=...`; page 1 has no page suffix.
pub fn search_url(base: &str, query: &SearchQuery, page: u32) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    let path = if page > 1 {
        format!("/{}-jobs-{}", query.slug(), page)
    } else {
        format!("/{}-jobs", query.slug())
    };
    url.set_path(&path);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.append_pair("k", &query.keywords.replace('-', " "));
        pairs.append_pair("nignbevent_src", "jobsearchDeskGNB");
        if let Some(exp) = query.experience {
            pairs.append_pair("experience", &exp.to_string());
        }
        if let Some(age) = query.job_age {
            pairs.append_pair("jobAge", &age.to_string());
        }
        if let Some(location) = &query.location {
            pairs.append_pair("location", location);
        }
        if let Some(mode) = &query.work_mode {
            pairs.append_pair("workType", mode);
        }
        if let Some(salary) = &query.salary {
            pairs.append_pair("salary", salary);
        }
    }
    Ok(url)
}

/// Pages available from a count header like `"81 - 100 of 2790"`.
/// Falls back to [`FALLBACK_PAGES`] when missing, unparsable or zero.
pub fn total_pages(count_text: Option<&str>) -> u32 {
    let total = count_text.and_then(|text| {
        let (_, after) = text.split_once("of")?;
        let digits: String = after
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == ',')
            .filter(|c| *c != ',')
            .collect();
        digits.parse::<u32>().ok()
    });
    match total {
        Some(n) if n > 0 => n.div_ceil(POSTINGS_PER_PAGE),
        _ => FALLBACK_PAGES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.naukri.com";

    #[test]
    fn first_page_has_no_suffix() {
        let url = search_url(BASE, &SearchQuery::new("React Developer"), 1).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.naukri.com/react-developer-jobs?k=React+Developer&nignbevent_src=jobsearchDeskGNB"
        );
    }

    #[test]
    fn later_pages_and_filters() {
        let query = SearchQuery {
            keywords: "react-js  frontend".to_string(),
            experience: Some(3),
            job_age: Some(7),
            location: Some("Bengaluru".to_string()),
            work_mode: Some("2".to_string()),
            salary: None,
        };
        let url = search_url(BASE, &query, 4).unwrap();
        assert_eq!(url.path(), "/react-js-frontend-jobs-4");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("k".to_string(), "react js  frontend".to_string()));
        assert!(pairs.contains(&("experience".to_string(), "3".to_string())));
        assert!(pairs.contains(&("jobAge".to_string(), "7".to_string())));
        assert!(pairs.contains(&("location".to_string(), "Bengaluru".to_string())));
        assert!(pairs.contains(&("workType".to_string(), "2".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "salary"));
    }

    #[test]
    fn bad_base_is_an_error() {
        assert!(search_url("not a url", &SearchQuery::new("x"), 1).is_err());
    }

    #[test]
    fn total_pages_from_count_text() {
        assert_eq!(total_pages(Some("81 - 100 of 2790")), 140);
        assert_eq!(total_pages(Some("1 - 20 of 2,790")), 140);
        assert_eq!(total_pages(Some("1 - 7 of 7")), 1);
        assert_eq!(total_pages(Some("1 - 20 of 40")), 2);
        assert_eq!(total_pages(Some("no results")), FALLBACK_PAGES);
        assert_eq!(total_pages(Some("0 of 0")), FALLBACK_PAGES);
        assert_eq!(total_pages(None), FALLBACK_PAGES);
    }
}
