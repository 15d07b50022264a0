//! SQLite ledger of per-job outcomes, one row per posting per run.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

use super::{ReportRow, ReportSink, RunSummary, SinkError};

/// Percent-encode a path for a sqlite:// URI.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// One stored outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: i64,
    pub run_id: String,
    pub link: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// `applied` or `skipped`.
    pub status: String,
    pub reason: Option<String>,
    pub match_percentage: Option<f64>,
    pub matched_skills: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Handle to the outcome ledger at `~/.local/state/autoapply/outcomes.db`.
#[derive(Clone)]
pub struct OutcomeLedger {
    pool: Pool<Sqlite>,
}

impl OutcomeLedger {
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("autoapply")?;
        let db_path = xdg_dirs.get_state_home().join("autoapply").join("outcomes.db");
        Self::open_at(db_path).await
    }

    /// Open (or create) the ledger at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let ledger = OutcomeLedger { pool };
        ledger.migrate().await?;
        Ok(ledger)
    }

    #[cfg(test)]
    pub(crate) async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let ledger = OutcomeLedger { pool };
        ledger.migrate().await?;
        Ok(ledger)
    }

    async fn migrate(&self) -> Result<()> {
        // matched_skills is a JSON array; recorded_at is Unix seconds.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS outcomes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_id TEXT NOT NULL,
                link TEXT NOT NULL,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT NOT NULL,
                status TEXT NOT NULL,
                reason TEXT,
                match_percentage REAL,
                matched_skills TEXT NOT NULL DEFAULT '[]',
                recorded_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS outcomes_link ON outcomes (link)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert one row per outcome in a single transaction. Returns rows written.
    pub async fn record(&self, summary: &RunSummary) -> Result<u64, SinkError> {
        let run_id = summary.run_id().to_string();
        let now = Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;
        for outcome in summary.outcomes() {
            let row = ReportRow::from(outcome);
            let status = if outcome.is_applied() { "applied" } else { "skipped" };
            let skills = serde_json::to_string(&row.matched_skills.unwrap_or_default())?;
            sqlx::query(
                r#"
                INSERT INTO outcomes (
                    run_id, link, title, company, location,
                    status, reason, match_percentage, matched_skills, recorded_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&run_id)
            .bind(&row.link)
            .bind(&row.title)
            .bind(&row.company)
            .bind(&row.location)
            .bind(status)
            .bind(&row.reason)
            .bind(row.match_percentage)
            .bind(skills)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            written += 1;
        }
        tx.commit().await?;
        Ok(written)
    }

    /// Most recent rows first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, run_id, link, title, company, location, status,
                   reason, match_percentage, matched_skills, recorded_at
            FROM outcomes
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let skills_json: String = row.get("matched_skills");
            let recorded_at: i64 = row.get("recorded_at");
            out.push(LedgerEntry {
                id: row.get("id"),
                run_id: row.get("run_id"),
                link: row.get("link"),
                title: row.get("title"),
                company: row.get("company"),
                location: row.get("location"),
                status: row.get("status"),
                reason: row.get("reason"),
                match_percentage: row.get("match_percentage"),
                matched_skills: serde_json::from_str(&skills_json).unwrap_or_default(),
                recorded_at: Utc
                    .timestamp_opt(recorded_at, 0)
                    .single()
                    .unwrap_or_default(),
            });
        }
        Ok(out)
    }

    /// Whether any run ever recorded `link` as applied.
    pub async fn was_applied(&self, link: &str) -> Result<bool> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) AS n FROM outcomes WHERE link = ?1 AND status = 'applied'"#,
        )
        .bind(link)
        .fetch_one(&self.pool)
        .await?;
        let n: i64 = row.get("n");
        Ok(n > 0)
    }
}

#[async_trait]
impl ReportSink for OutcomeLedger {
    fn name(&self) -> &str {
        "ledger"
    }

    async fn deliver(&self, summary: &RunSummary) -> Result<(), SinkError> {
        let written = self.record(summary).await?;
        tracing::debug!(rows = written, run = %summary.run_id(), "ledger updated");
        Ok(())
    }
}
