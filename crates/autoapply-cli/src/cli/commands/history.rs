//! `autoapply history` – recent ledger rows, or one link's applied state.

use anyhow::Result;
use autoapply_core::report::OutcomeLedger;
use std::path::PathBuf;

#[derive(Debug)]
pub struct HistoryArgs {
    pub limit: u32,
    pub link: Option<String>,
    pub ledger: Option<PathBuf>,
}

pub async fn run_history(args: HistoryArgs) -> Result<()> {
    let ledger = match &args.ledger {
        Some(path) => OutcomeLedger::open_at(path).await?,
        None => OutcomeLedger::open_default().await?,
    };

    if let Some(link) = &args.link {
        if ledger.was_applied(link).await? {
            println!("applied: {link}");
        } else {
            println!("not applied: {link}");
        }
        return Ok(());
    }

    let rows = ledger.recent(args.limit).await?;
    if rows.is_empty() {
        println!("No outcomes recorded.");
        return Ok(());
    }
    println!(
        "{:<20} {:<8} {:>6}  {:<40} {}",
        "RECORDED", "STATUS", "MATCH", "TITLE", "REASON"
    );
    for r in rows {
        let pct = r
            .match_percentage
            .map(|p| format!("{p:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<8} {:>6}  {:<40} {}",
            r.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            r.status,
            pct,
            format!("{} ({})", r.title, r.company),
            r.reason.unwrap_or_default()
        );
    }
    Ok(())
}
