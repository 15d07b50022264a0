pub mod config;
pub mod logging;

pub mod driver;
pub mod filter;
pub mod listing;
pub mod model;
pub mod orchestrator;
pub mod quota;
pub mod report;
pub mod retry;
pub mod scoring;
pub mod skills;
pub mod wait;
