//! `autoapply quota` – show applied / max / remaining.

use anyhow::Result;
use autoapply_core::config::AutoApplyConfig;
use autoapply_core::quota::{ApplicationCounterStore, JsonCounterStore, RateLimiter};
use std::path::PathBuf;

pub fn run_quota(cfg: &AutoApplyConfig, counter: Option<PathBuf>) -> Result<()> {
    let store = match counter {
        Some(path) => JsonCounterStore::new(path),
        None => JsonCounterStore::open_default()?,
    };
    let limiter = RateLimiter::new(cfg.limits.max_applications);
    let current = store.load()?;
    println!("counter:   {}", store.path().display());
    println!("applied:   {}", current.successfully_applied);
    println!("max:       {}", limiter.global_max());
    println!("remaining: {}", limiter.remaining(&current));
    if limiter.is_exhausted(&current) {
        println!("application limit reached: runs will skip every posting");
    }
    Ok(())
}
