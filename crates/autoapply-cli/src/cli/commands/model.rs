//! `autoapply model` – export the active skill model as TOML.

use anyhow::{Context, Result};
use autoapply_core::config::AutoApplyConfig;
use std::path::Path;

use super::load_model;

pub fn run_model(cfg: &AutoApplyConfig, output: Option<&Path>) -> Result<()> {
    let doc = load_model(cfg)?.to_toml_string()?;
    match output {
        Some(path) => {
            std::fs::write(path, doc)
                .with_context(|| format!("write model: {}", path.display()))?;
            println!("Wrote skill model to {}", path.display());
        }
        None => print!("{doc}"),
    }
    Ok(())
}
