//! `autoapply collect <keywords>` – page through recorded search results.

use anyhow::{Context, Result};
use autoapply_core::config::AutoApplyConfig;
use autoapply_core::listing::fixture::FixtureListing;
use autoapply_core::listing::{collect_postings, SearchQuery};
use std::path::PathBuf;

#[derive(Debug)]
pub struct CollectArgs {
    pub keywords: String,
    pub listing: PathBuf,
    pub max_pages: u32,
    pub experience: Option<u32>,
    pub job_age: Option<u32>,
    pub location: Option<String>,
    pub output: Option<PathBuf>,
}

pub async fn run_collect(cfg: &AutoApplyConfig, args: CollectArgs) -> Result<()> {
    let source = FixtureListing::load(&args.listing)?;
    let query = SearchQuery {
        experience: args.experience,
        job_age: args.job_age,
        location: args.location,
        ..SearchQuery::new(args.keywords)
    };
    let postings = collect_postings(
        &source,
        &cfg.platform.base_url,
        &query,
        args.max_pages.max(1),
        &cfg.retry.policy(),
        &cfg.pacing,
    )
    .await?;

    let json = serde_json::to_string_pretty(&postings)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("write postings: {}", path.display()))?;
            eprintln!("Collected {} postings into {}", postings.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
