//! Parse tests for the simulate and collect subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_simulate_defaults() {
    match parse(&["autoapply", "simulate", "--jobs", "jobs.json", "--pages", "pages.json"]) {
        CliCommand::Simulate {
            jobs,
            pages,
            counter,
            ledger,
        } => {
            assert_eq!(jobs, PathBuf::from("jobs.json"));
            assert_eq!(pages, PathBuf::from("pages.json"));
            assert!(counter.is_none());
            assert!(ledger.is_none());
        }
        _ => panic!("expected Simulate"),
    }
}

#[test]
fn cli_parse_simulate_counter_and_ledger() {
    match parse(&[
        "autoapply",
        "simulate",
        "--jobs",
        "j.json",
        "--pages",
        "p.json",
        "--counter",
        "/tmp/counter.json",
        "--ledger",
        "/tmp/sim.db",
    ]) {
        CliCommand::Simulate {
            counter, ledger, ..
        } => {
            assert_eq!(counter, Some(PathBuf::from("/tmp/counter.json")));
            assert_eq!(ledger, Some(PathBuf::from("/tmp/sim.db")));
        }
        _ => panic!("expected Simulate"),
    }
}

#[test]
fn cli_simulate_requires_pages() {
    assert!(Cli::try_parse_from(["autoapply", "simulate", "--jobs", "j.json"]).is_err());
}

#[test]
fn cli_parse_collect() {
    match parse(&[
        "autoapply",
        "collect",
        "react developer",
        "--listing",
        "listing.json",
        "--max-pages",
        "3",
        "--job-age",
        "7",
        "--output",
        "jobs.json",
    ]) {
        CliCommand::Collect {
            keywords,
            listing,
            max_pages,
            experience,
            job_age,
            location,
            output,
        } => {
            assert_eq!(keywords, "react developer");
            assert_eq!(listing, PathBuf::from("listing.json"));
            assert_eq!(max_pages, 3);
            assert!(experience.is_none());
            assert_eq!(job_age, Some(7));
            assert!(location.is_none());
            assert_eq!(output, Some(PathBuf::from("jobs.json")));
        }
        _ => panic!("expected Collect"),
    }
}

#[test]
fn cli_collect_defaults_and_requires_listing() {
    match parse(&["autoapply", "collect", "react", "--listing", "l.json"]) {
        CliCommand::Collect {
            max_pages, output, ..
        } => {
            assert_eq!(max_pages, 5);
            assert!(output.is_none());
        }
        _ => panic!("expected Collect"),
    }
    assert!(Cli::try_parse_from(["autoapply", "collect", "react"]).is_err());
}
