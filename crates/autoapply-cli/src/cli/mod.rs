//! CLI for the autoapply engine.

mod commands;

use anyhow::Result;
use autoapply_core::config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{
    run_check_title, run_collect, run_history, run_model, run_quota, run_score, run_search_url,
    run_simulate, CollectArgs, HistoryArgs, SearchUrlArgs, SimulateArgs,
};

/// Top-level CLI for autoapply.
#[derive(Debug, Parser)]
#[command(name = "autoapply")]
#[command(about = "autoapply: score job postings and drive applications", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/autoapply/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Score recorded job details (JSON) and print the verdict.
    Score {
        /// Posting title, used by the title and role gates.
        #[arg(long)]
        title: String,
        /// JSON file with {skillChips, description, applicants?, openings?}.
        #[arg(long, value_name = "FILE")]
        details: PathBuf,
    },

    /// Run the title and fullstack-role gates on a title.
    CheckTitle {
        title: String,
        /// Description text for the fullstack backend check.
        #[arg(long)]
        description: Option<String>,
    },

    /// Show applied / max / remaining from the application counter.
    Quota {
        /// Counter file (defaults to the XDG state path).
        #[arg(long, value_name = "FILE")]
        counter: Option<PathBuf>,
    },

    /// Dry-run the orchestrator against recorded page fixtures.
    Simulate {
        /// JSON array of postings.
        #[arg(long, value_name = "FILE")]
        jobs: PathBuf,
        /// JSON map of link -> page fixture.
        #[arg(long, value_name = "FILE")]
        pages: PathBuf,
        /// Persist the counter to this file (default: in-memory, starting at zero).
        #[arg(long, value_name = "FILE")]
        counter: Option<PathBuf>,
        /// Record outcomes in this ledger database (default: not recorded).
        #[arg(long, value_name = "FILE")]
        ledger: Option<PathBuf>,
    },

    /// Collect postings from recorded search-result pages.
    Collect {
        keywords: String,
        /// JSON array of result pages, each {postings, count_text}.
        #[arg(long, value_name = "FILE")]
        listing: PathBuf,
        #[arg(long, default_value = "5", value_name = "N")]
        max_pages: u32,
        #[arg(long, value_name = "YEARS")]
        experience: Option<u32>,
        #[arg(long, value_name = "DAYS")]
        job_age: Option<u32>,
        #[arg(long)]
        location: Option<String>,
        /// Write the postings (a `simulate --jobs` document) here instead of stdout.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print recent outcomes from the ledger, newest first.
    History {
        #[arg(long, default_value = "20", value_name = "N")]
        limit: u32,
        /// Only report whether this posting link was ever applied to.
        #[arg(long, value_name = "URL")]
        link: Option<String>,
        /// Ledger database (defaults to the XDG state path).
        #[arg(long, value_name = "FILE")]
        ledger: Option<PathBuf>,
    },

    /// Export the skill model (built-in or configured) as TOML.
    Model {
        /// Write to this file instead of stdout.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Build a search-results URL.
    SearchUrl {
        keywords: String,
        #[arg(long, default_value = "1", value_name = "N")]
        page: u32,
        #[arg(long, value_name = "YEARS")]
        experience: Option<u32>,
        #[arg(long, value_name = "DAYS")]
        job_age: Option<u32>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        work_mode: Option<String>,
        #[arg(long)]
        salary: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Score { title, details } => run_score(&cfg, &title, &details)?,
            CliCommand::CheckTitle { title, description } => {
                run_check_title(&cfg, &title, description.as_deref())?
            }
            CliCommand::Quota { counter } => run_quota(&cfg, counter)?,
            CliCommand::Simulate {
                jobs,
                pages,
                counter,
                ledger,
            } => {
                run_simulate(
                    &cfg,
                    SimulateArgs {
                        jobs,
                        pages,
                        counter,
                        ledger,
                    },
                )
                .await?
            }
            CliCommand::Collect {
                keywords,
                listing,
                max_pages,
                experience,
                job_age,
                location,
                output,
            } => {
                run_collect(
                    &cfg,
                    CollectArgs {
                        keywords,
                        listing,
                        max_pages,
                        experience,
                        job_age,
                        location,
                        output,
                    },
                )
                .await?
            }
            CliCommand::History {
                limit,
                link,
                ledger,
            } => run_history(HistoryArgs { limit, link, ledger }).await?,
            CliCommand::Model { output } => run_model(&cfg, output.as_deref())?,
            CliCommand::SearchUrl {
                keywords,
                page,
                experience,
                job_age,
                location,
                work_mode,
                salary,
            } => run_search_url(
                &cfg,
                SearchUrlArgs {
                    keywords,
                    page,
                    experience,
                    job_age,
                    location,
                    work_mode,
                    salary,
                },
            )?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
