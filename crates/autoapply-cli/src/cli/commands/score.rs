//! `autoapply score --title <t> --details <file>` – score recorded job details.

use anyhow::{Context, Result};
use autoapply_core::config::AutoApplyConfig;
use autoapply_core::model::ExtractedJobInfo;
use autoapply_core::scoring::EligibilityVerdict;
use std::path::Path;

use super::load_engine;

pub fn run_score(cfg: &AutoApplyConfig, title: &str, details: &Path) -> Result<()> {
    let engine = load_engine(cfg)?;
    let data = std::fs::read_to_string(details)
        .with_context(|| format!("read job details: {}", details.display()))?;
    let value: serde_json::Value = serde_json::from_str(&data)
        .with_context(|| format!("parse job details: {}", details.display()))?;
    let info = ExtractedJobInfo::from_value(value);
    let limit = info
        .as_ref()
        .ok()
        .map(|i| engine.scorer().applicant_limit(i.openings_count));

    let assessment = engine.assess(title, info);
    let score = assessment.verdict.score();
    match &assessment.verdict {
        EligibilityVerdict::Eligible { .. } => println!("verdict:   eligible"),
        EligibilityVerdict::NotEligible { reason, .. } => {
            println!("verdict:   not eligible ({reason})")
        }
    }
    println!("match:     {:.1}%", score.match_percentage);
    println!(
        "score:     {} / {} (+{} bonus)",
        score.total_score, score.max_possible_score, score.bonus_score
    );
    if !score.matched_skills.is_empty() {
        println!("matched:   {}", score.matched_skills.join(", "));
    }
    if let Some(limit) = limit {
        println!("applicant limit: {limit}");
    }
    if let Some(degraded) = &assessment.degraded {
        println!("details unavailable: {degraded}");
    }
    Ok(())
}
