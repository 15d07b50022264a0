//! Tests for report aggregation and sinks (ledger uses the in-memory DB).

use std::sync::Arc;

use async_trait::async_trait;

use super::*;
use crate::model::{ApplicationOutcome, JobPosting, SkipReason};
use crate::scoring::ScoreResult;

fn job(n: u32) -> JobPosting {
    JobPosting::new(
        format!("React Developer {n}"),
        "Acme",
        "",
        format!("https://jobs.test/{n}"),
    )
}

fn score(pct: f64) -> ScoreResult {
    ScoreResult {
        match_percentage: pct,
        matched_skills: vec!["React".to_string()],
        ..ScoreResult::default()
    }
}

fn summary() -> RunSummary {
    let mut agg = OutcomeAggregator::new();
    agg.record(ApplicationOutcome::applied(job(1), score(80.0)));
    agg.record(ApplicationOutcome::skipped(job(2), SkipReason::AlreadyApplied));
    agg.record(ApplicationOutcome::skipped(job(3), SkipReason::CompanyRedirect));
    agg.record(ApplicationOutcome::skipped_with_score(
        job(4),
        SkipReason::ApplyFailed("Application did not complete successfully".into()),
        score(64.0),
    ));
    assert_eq!(agg.applied_count(), 1);
    agg.finish(11)
}

#[test]
fn aggregator_partitions_outcomes_in_order() {
    let s = summary();
    assert_eq!(s.applied.len(), 1);
    assert_eq!(s.skipped.len(), 3);
    assert_eq!(s.len(), 4);
    assert_eq!(s.total_applied_count, 1);
    assert_eq!(s.lifetime_applied, 11);
    let links: Vec<_> = s.skipped.iter().map(|o| o.job().link.clone()).collect();
    assert_eq!(
        links,
        vec!["https://jobs.test/2", "https://jobs.test/3", "https://jobs.test/4"]
    );
}

#[test]
fn rows_carry_reason_and_score() {
    let s = summary();
    let applied = &s.applied_rows()[0];
    assert_eq!(applied.reason, None);
    assert_eq!(applied.match_percentage, Some(80.0));
    assert_eq!(applied.location, "N/A");

    let skipped = s.skipped_rows();
    assert_eq!(skipped[0].reason.as_deref(), Some("Already applied"));
    assert_eq!(skipped[0].match_percentage, None);
    assert_eq!(skipped[2].matched_skills, Some(vec!["React".to_string()]));
}

#[test]
fn follow_ups_are_redirects_and_apply_failures() {
    let s = summary();
    let links: Vec<_> = s.follow_ups().iter().map(|o| o.job().link.as_str()).collect();
    assert_eq!(links, vec!["https://jobs.test/3", "https://jobs.test/4"]);
}

#[tokio::test]
async fn ledger_records_and_lists_newest_first() {
    let ledger = OutcomeLedger::open_memory().await.unwrap();
    let s = summary();
    assert_eq!(ledger.record(&s).await.unwrap(), 4);

    let rows = ledger.recent(10).await.unwrap();
    assert_eq!(rows.len(), 4);
    // Same timestamp within a run; id breaks the tie.
    assert_eq!(rows[0].link, "https://jobs.test/4");
    assert_eq!(rows[0].status, "skipped");
    assert_eq!(rows[0].matched_skills, vec!["React".to_string()]);
    assert_eq!(rows[3].status, "applied");
    assert_eq!(rows[3].run_id, s.run_id());

    assert_eq!(ledger.recent(2).await.unwrap().len(), 2);
    assert!(ledger.was_applied("https://jobs.test/1").await.unwrap());
    assert!(!ledger.was_applied("https://jobs.test/2").await.unwrap());
}

#[tokio::test]
async fn ledger_on_disk_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested dir").join("outcomes.db");
    {
        let ledger = OutcomeLedger::open_at(&path).await.unwrap();
        ledger.deliver(&summary()).await.unwrap();
    }
    let ledger = OutcomeLedger::open_at(&path).await.unwrap();
    assert_eq!(ledger.recent(100).await.unwrap().len(), 4);
}

struct FailingSink;

#[async_trait]
impl ReportSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn deliver(&self, _summary: &RunSummary) -> Result<(), SinkError> {
        Err(SinkError::Other(anyhow::anyhow!("disk full")))
    }
}

#[tokio::test]
async fn dispatch_counts_failures_without_stopping() {
    let ledger = OutcomeLedger::open_memory().await.unwrap();
    let sinks: Vec<Arc<dyn ReportSink>> = vec![
        Arc::new(FailingSink),
        Arc::new(TracingSink),
        Arc::new(ledger.clone()),
    ];
    let failed = dispatch(&sinks, &summary()).await;
    assert_eq!(failed, 1);
    assert_eq!(ledger.recent(10).await.unwrap().len(), 4);
}
