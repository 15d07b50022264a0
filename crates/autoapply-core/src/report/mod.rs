//! Outcome aggregation, run summary and reporting sinks.

mod ledger;
mod tracing_sink;

#[cfg(test)]
mod tests;

pub use ledger::{LedgerEntry, OutcomeLedger};
pub use tracing_sink::TracingSink;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ApplicationOutcome;

/// Flat per-job view handed to sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub title: String,
    pub company: String,
    pub location: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_skills: Option<Vec<String>>,
}

impl From<&ApplicationOutcome> for ReportRow {
    fn from(outcome: &ApplicationOutcome) -> Self {
        let job = outcome.job();
        let score = outcome.score();
        ReportRow {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location_or_na().to_string(),
            link: job.link.clone(),
            reason: outcome.reason().map(|r| r.to_string()),
            match_percentage: score.map(|s| s.match_percentage),
            matched_skills: score.map(|s| s.matched_skills.clone()),
        }
    }
}

/// Everything one run produced. Every input posting appears exactly once in
/// `applied` or `skipped`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub applied: Vec<ApplicationOutcome>,
    pub skipped: Vec<ApplicationOutcome>,
    /// Applications confirmed in this run.
    pub total_applied_count: u32,
    /// Counter value after this run's commit.
    pub lifetime_applied: u32,
}

impl RunSummary {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn len(&self) -> usize {
        self.applied.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &ApplicationOutcome> {
        self.applied.iter().chain(self.skipped.iter())
    }

    pub fn applied_rows(&self) -> Vec<ReportRow> {
        self.applied.iter().map(ReportRow::from).collect()
    }

    pub fn skipped_rows(&self) -> Vec<ReportRow> {
        self.skipped.iter().map(ReportRow::from).collect()
    }

    /// Skips that need manual action (apply failures, company-site redirects).
    pub fn follow_ups(&self) -> Vec<&ApplicationOutcome> {
        self.skipped
            .iter()
            .filter(|o| o.reason().is_some_and(|r| r.needs_follow_up()))
            .collect()
    }
}

/// Accumulates outcomes in job order during a run.
#[derive(Debug)]
pub struct OutcomeAggregator {
    run_id: String,
    started_at: DateTime<Utc>,
    applied: Vec<ApplicationOutcome>,
    skipped: Vec<ApplicationOutcome>,
}

impl Default for OutcomeAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeAggregator {
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            applied: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: ApplicationOutcome) {
        if outcome.is_applied() {
            self.applied.push(outcome);
        } else {
            self.skipped.push(outcome);
        }
    }

    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn finish(self, lifetime_applied: u32) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            started_at: self.started_at,
            total_applied_count: self.applied.len() as u32,
            applied: self.applied,
            skipped: self.skipped,
            lifetime_applied,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("ledger: {0}")]
    Ledger(#[from] sqlx::Error),
    #[error("serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Receives the run summary once per run.
#[async_trait]
pub trait ReportSink: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, summary: &RunSummary) -> Result<(), SinkError>;
}

/// Deliver to every sink. Failures are logged, never propagated; returns how many failed.
pub async fn dispatch(sinks: &[Arc<dyn ReportSink>], summary: &RunSummary) -> usize {
    let mut failed = 0;
    for sink in sinks {
        if let Err(e) = sink.deliver(summary).await {
            tracing::warn!(sink = sink.name(), error = %e, "report sink failed");
            failed += 1;
        }
    }
    failed
}
