//! `autoapply check-title <title>` – run the title and role gates.

use anyhow::Result;
use autoapply_core::config::AutoApplyConfig;
use autoapply_core::filter::TitleCheck;
use autoapply_core::model::ExtractedJobInfo;

use super::load_engine;

pub fn run_check_title(cfg: &AutoApplyConfig, title: &str, description: Option<&str>) -> Result<()> {
    let engine = load_engine(cfg)?;
    let filter = engine.filter();
    match filter.check_title(title) {
        TitleCheck::Passed => println!("title:  ok"),
        TitleCheck::NotARole => println!("title:  rejected (not a developer/engineer role)"),
        TitleCheck::Denied(term) => println!("title:  rejected (contains {term:?})"),
    }
    if filter.is_combined_role(title) {
        match description {
            Some(text) => {
                let info = ExtractedJobInfo::new(Vec::<String>::new(), text, None, 1);
                if filter.role_requirements_met(title, &info) {
                    println!("role:   fullstack, backend requirement present");
                } else {
                    println!("role:   fullstack, lacks backend requirement");
                }
            }
            None => println!("role:   fullstack (pass --description to check backend keywords)"),
        }
    }
    Ok(())
}
