//! CLI command handlers, one file per command.

mod check_title;
mod collect;
mod history;
mod model;
mod quota;
mod score;
mod search_url;
mod simulate;

pub use check_title::run_check_title;
pub use collect::{run_collect, CollectArgs};
pub use history::{run_history, HistoryArgs};
pub use model::run_model;
pub use quota::run_quota;
pub use score::run_score;
pub use search_url::{run_search_url, SearchUrlArgs};
pub use simulate::{run_simulate, SimulateArgs};

use anyhow::Result;
use autoapply_core::config::AutoApplyConfig;
use autoapply_core::scoring::EligibilityEngine;
use autoapply_core::skills::SkillModel;

/// Skill model named in the config, or the built-in one.
fn load_model(cfg: &AutoApplyConfig) -> Result<SkillModel> {
    SkillModel::load_or_default(cfg.eligibility.model.as_deref())
}

fn load_engine(cfg: &AutoApplyConfig) -> Result<EligibilityEngine> {
    let model = load_model(cfg)?;
    Ok(EligibilityEngine::new(model, cfg.eligibility.fallback)?)
}
