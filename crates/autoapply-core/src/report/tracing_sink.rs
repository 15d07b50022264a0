use async_trait::async_trait;

use super::{ReportSink, RunSummary, SinkError};

/// Logs the run summary and each posting that needs manual follow-up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl ReportSink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn deliver(&self, summary: &RunSummary) -> Result<(), SinkError> {
        tracing::info!(
            run = %summary.run_id(),
            skipped = summary.skipped.len(),
            applied_this_run = summary.total_applied_count,
            lifetime_applied = summary.lifetime_applied,
            "run finished"
        );
        for outcome in summary.follow_ups() {
            let job = outcome.job();
            tracing::warn!(
                title = %job.title,
                company = %job.company,
                link = %job.link,
                reason = %outcome.reason().map(|r| r.to_string()).unwrap_or_default(),
                "needs follow-up"
            );
        }
        Ok(())
    }
}
