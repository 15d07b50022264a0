//! `autoapply simulate` – run the orchestrator end to end on recorded fixtures.

use anyhow::{Context, Result};
use autoapply_core::config::AutoApplyConfig;
use autoapply_core::driver::fixture::{FixtureDriver, StaticSessionProvider};
use autoapply_core::driver::{Credentials, SessionData};
use autoapply_core::model::JobPosting;
use autoapply_core::orchestrator::{Orchestrator, OrchestratorSettings};
use autoapply_core::quota::{
    ApplicationCounterStore, JsonCounterStore, MemoryCounterStore, RateLimiter,
};
use autoapply_core::report::{OutcomeLedger, RunSummary, TracingSink};
use std::path::PathBuf;
use std::sync::Arc;

use super::load_engine;

#[derive(Debug)]
pub struct SimulateArgs {
    pub jobs: PathBuf,
    pub pages: PathBuf,
    pub counter: Option<PathBuf>,
    pub ledger: Option<PathBuf>,
}

pub async fn run_simulate(cfg: &AutoApplyConfig, args: SimulateArgs) -> Result<()> {
    let data = std::fs::read_to_string(&args.jobs)
        .with_context(|| format!("read jobs: {}", args.jobs.display()))?;
    let jobs: Vec<JobPosting> = serde_json::from_str(&data)
        .with_context(|| format!("parse jobs: {}", args.jobs.display()))?;
    let pages = FixtureDriver::load_pages(&args.pages)?;

    let summary = match &args.counter {
        Some(path) => simulate_with(cfg, &args, jobs, pages, JsonCounterStore::new(path)).await?,
        None => simulate_with(cfg, &args, jobs, pages, MemoryCounterStore::default()).await?,
    };
    print_summary(&summary);
    Ok(())
}

async fn simulate_with<C: ApplicationCounterStore>(
    cfg: &AutoApplyConfig,
    args: &SimulateArgs,
    jobs: Vec<JobPosting>,
    pages: std::collections::HashMap<String, autoapply_core::driver::fixture::PageFixture>,
    counter: C,
) -> Result<RunSummary> {
    let mut orch = Orchestrator::new(
        FixtureDriver::with_platform(pages, &cfg.platform),
        StaticSessionProvider::new(SessionData::default()),
        counter,
        load_engine(cfg)?,
    )
    .with_settings(OrchestratorSettings::from_config(cfg))
    .with_limiter(RateLimiter::new(cfg.limits.max_applications))
    .with_sink(Arc::new(TracingSink));
    if let Some(path) = &args.ledger {
        orch = orch.with_sink(Arc::new(OutcomeLedger::open_at(path).await?));
    }

    let credentials =
        Credentials::from_env().unwrap_or_else(|_| Credentials::new("simulator", ""));
    Ok(orch.run(jobs, &credentials).await?)
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Applied {} of {} postings (lifetime total {}).",
        summary.total_applied_count,
        summary.len(),
        summary.lifetime_applied
    );
    for row in summary.applied_rows() {
        let pct = row.match_percentage.unwrap_or_default();
        println!("  applied  {:>5.1}%  {} at {}", pct, row.title, row.company);
    }
    for row in summary.skipped_rows() {
        println!(
            "  skipped  {}  {} at {}",
            row.reason.unwrap_or_default(),
            row.title,
            row.company
        );
    }
    let follow_ups = summary.follow_ups();
    if !follow_ups.is_empty() {
        println!("Needs follow-up:");
        for outcome in follow_ups {
            println!("  {}", outcome.job().link);
        }
    }
}
