//! `autoapply search-url <keywords>` – build a results-page URL.

use anyhow::Result;
use autoapply_core::config::AutoApplyConfig;
use autoapply_core::listing::{search_url, SearchQuery};

#[derive(Debug)]
pub struct SearchUrlArgs {
    pub keywords: String,
    pub page: u32,
    pub experience: Option<u32>,
    pub job_age: Option<u32>,
    pub location: Option<String>,
    pub work_mode: Option<String>,
    pub salary: Option<String>,
}

pub fn run_search_url(cfg: &AutoApplyConfig, args: SearchUrlArgs) -> Result<()> {
    let query = SearchQuery {
        keywords: args.keywords,
        experience: args.experience,
        job_age: args.job_age,
        location: args.location,
        work_mode: args.work_mode,
        salary: args.salary,
    };
    let url = search_url(&cfg.platform.base_url, &query, args.page.max(1))?;
    println!("{url}");
    Ok(())
}
