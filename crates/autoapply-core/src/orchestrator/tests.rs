//! Orchestrator tests against the fixture driver and in-memory counter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use super::*;
use crate::driver::fixture::{ClickOutcome, DriverCall, FixtureDriver, PageFixture, StaticSessionProvider};
use crate::driver::{Cookie, PageProbe, SessionData};
use crate::quota::{ApplicationCounter, MemoryCounterStore};
use crate::report::SinkError;
use crate::scoring::FallbackPolicy;
use crate::skills::SkillModel;

type TestOrchestrator = Orchestrator<FixtureDriver, StaticSessionProvider, MemoryCounterStore>;

fn react_details(applicants: &str) -> serde_json::Value {
    json!({
        "skillChips": ["React", "Redux"],
        "description": "Build UIs with React Hooks.",
        "applicants": applicants,
        "openings": "1",
    })
}

fn eligible_page() -> PageFixture {
    PageFixture::with_details(react_details("50"))
}

fn job(n: u32) -> JobPosting {
    JobPosting::new("React Developer", "Acme", "Remote", link(n))
}

fn link(n: u32) -> String {
    format!("https://jobs.test/{n}")
}

fn session() -> SessionData {
    SessionData {
        cookies: vec![Cookie {
            name: "auth".into(),
            value: "token".into(),
            domain: "jobs.test".into(),
            path: "/".into(),
        }],
        ..SessionData::default()
    }
}

fn orchestrator_with(
    pages: Vec<(u32, PageFixture)>,
    applied_so_far: u32,
    fallback: FallbackPolicy,
) -> TestOrchestrator {
    let pages: HashMap<String, PageFixture> =
        pages.into_iter().map(|(n, p)| (link(n), p)).collect();
    Orchestrator::new(
        FixtureDriver::new(pages),
        StaticSessionProvider::new(session()).only_for("me"),
        MemoryCounterStore::new(applied_so_far),
        EligibilityEngine::new(SkillModel::default(), fallback).unwrap(),
    )
}

fn orchestrator(pages: Vec<(u32, PageFixture)>) -> TestOrchestrator {
    orchestrator_with(pages, 0, FallbackPolicy::Permissive)
}

fn creds() -> Credentials {
    Credentials::new("me", "secret")
}

fn reasons(summary: &RunSummary) -> Vec<String> {
    summary
        .skipped
        .iter()
        .filter_map(|o| o.reason().map(|r| r.to_string()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn eligible_posting_is_applied_and_counted() {
    let orch = orchestrator(vec![(1, eligible_page())]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();

    assert_eq!(summary.applied.len(), 1);
    assert!(summary.skipped.is_empty());
    assert_eq!(summary.total_applied_count, 1);
    assert_eq!(summary.lifetime_applied, 1);
    assert_eq!(orch.counter().commits(), vec![1]);
    assert!(summary.applied[0].score().unwrap().match_percentage >= 50.0);

    let calls = orch.driver().calls();
    assert_eq!(calls[0], DriverCall::OpenPage);
    assert!(calls.contains(&DriverCall::RestoreSession));
    assert_eq!(orch.driver().restored_session(), Some(session()));
    let navigations = calls
        .iter()
        .filter(|c| matches!(c, DriverCall::Navigate(_)))
        .count();
    assert_eq!(navigations, 2);
}

#[tokio::test(start_paused = true)]
async fn exhausted_quota_skips_everything_without_driver() {
    let orch = orchestrator_with(vec![(1, eligible_page())], 50, FallbackPolicy::Permissive);
    let summary = orch.run(vec![job(1), job(2)], &creds()).await.unwrap();

    assert!(summary.applied.is_empty());
    assert_eq!(summary.skipped.len(), 2);
    assert_eq!(reasons(&summary), vec!["Application limit reached"; 2]);
    assert!(orch.driver().calls().is_empty());
    assert!(orch.counter().commits().is_empty());
    assert_eq!(summary.lifetime_applied, 50);
}

#[tokio::test(start_paused = true)]
async fn quota_reached_mid_run_skips_the_rest() {
    let orch = orchestrator_with(
        vec![(1, eligible_page()), (2, eligible_page()), (3, eligible_page())],
        49,
        FallbackPolicy::Permissive,
    );
    let summary = orch
        .run(vec![job(1), job(2), job(3)], &creds())
        .await
        .unwrap();

    assert_eq!(summary.applied.len(), 1);
    assert_eq!(reasons(&summary), vec!["Application limit reached"; 2]);
    assert_eq!(orch.counter().commits(), vec![1]);
    assert_eq!(summary.lifetime_applied, 50);
    assert!(!orch
        .driver()
        .calls()
        .contains(&DriverCall::Navigate(link(2))));
}

#[tokio::test(start_paused = true)]
async fn applicant_cap_breach_is_skipped_with_score() {
    let orch = orchestrator(vec![(1, PageFixture::with_details(react_details("500")))]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();

    assert_eq!(reasons(&summary), vec!["Applicant limit exceeded"]);
    assert!(summary.skipped[0].score().unwrap().match_percentage >= 50.0);
    assert!(orch.counter().commits().is_empty());
    assert!(!orch.driver().calls().contains(&DriverCall::RestoreSession));
}

#[tokio::test(start_paused = true)]
async fn duplicate_marker_short_circuits_before_details() {
    let page = PageFixture {
        already_applied: true,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();

    assert_eq!(reasons(&summary), vec!["Already applied"]);
    assert!(summary.skipped[0].score().is_none());
    assert!(!orch
        .driver()
        .calls()
        .contains(&DriverCall::Evaluate(PageProbe::JobDetails)));
}

#[tokio::test(start_paused = true)]
async fn unreachable_page_is_navigation_failure() {
    let page = PageFixture {
        reachable: false,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page), (2, eligible_page())]);
    let summary = orch.run(vec![job(1), job(2)], &creds()).await.unwrap();

    assert_eq!(reasons(&summary), vec!["Navigation failed"]);
    assert_eq!(summary.applied.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn renavigation_failure_keeps_score() {
    let page = PageFixture {
        fail_renavigation: true,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();

    assert_eq!(reasons(&summary), vec!["Navigation failed"]);
    assert!(summary.skipped[0].score().is_some());
}

#[tokio::test(start_paused = true)]
async fn missing_content_still_proceeds() {
    let page = PageFixture {
        content_ready: false,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(summary.applied.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn title_and_role_gates() {
    let fullstack = JobPosting::new("Fullstack Developer", "Acme", "", link(2));
    let senior = JobPosting::new("Senior Java Developer", "Acme", "", link(1));
    let orch = orchestrator(vec![(1, eligible_page()), (2, eligible_page())]);
    let summary = orch.run(vec![senior, fullstack], &creds()).await.unwrap();
    assert_eq!(
        reasons(&summary),
        vec!["Job title not suitable", "Fullstack job lacks backend requirement"]
    );
}

#[tokio::test(start_paused = true)]
async fn company_redirect_is_skipped() {
    let page = PageFixture {
        external_apply: true,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(reasons(&summary), vec!["Company website redirect"]);
    assert_eq!(summary.follow_ups().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn missing_apply_control() {
    let page = PageFixture {
        apply_control: false,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(reasons(&summary), vec!["No apply button found"]);
}

#[tokio::test(start_paused = true)]
async fn physical_click_is_the_fallback() {
    let page = PageFixture {
        dom_click_fails: true,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(summary.applied.len(), 1);
    let calls = orch.driver().calls();
    assert!(calls.iter().any(|c| matches!(c, DriverCall::Click(_))));
}

#[tokio::test(start_paused = true)]
async fn both_clicks_failing_is_apply_failure() {
    let page = PageFixture {
        dom_click_fails: true,
        click_fails: true,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    let reason = &reasons(&summary)[0];
    assert!(reason.starts_with("Apply failed: "), "{reason}");
}

#[tokio::test(start_paused = true)]
async fn unchanged_page_after_click() {
    let page = PageFixture {
        click_outcome: ClickOutcome::NoChange,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(
        reasons(&summary),
        vec!["Apply failed: Application did not complete successfully"]
    );
    // Polled until the confirmation budget ran out.
    let polls = orch
        .driver()
        .calls()
        .iter()
        .filter(|c| **c == DriverCall::Evaluate(PageProbe::ApplyStatus))
        .count();
    assert!(polls > 1);
}

#[tokio::test(start_paused = true)]
async fn success_text_must_match_configured_marker() {
    let mut settings = OrchestratorSettings::default();
    settings.platform.success_marker = "Thanks for your application".to_string();
    let orch = orchestrator(vec![(1, eligible_page())]).with_settings(settings);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(
        reasons(&summary),
        vec!["Apply failed: Application did not complete successfully"]
    );
    assert!(orch
        .driver()
        .calls()
        .contains(&DriverCall::Evaluate(PageProbe::BodyText)));
}

#[tokio::test(start_paused = true)]
async fn garbled_apply_status_is_apply_failure() {
    let page = PageFixture {
        click_outcome: ClickOutcome::NoChange,
        garbled_apply_status: true,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page)]);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    let reason = &reasons(&summary)[0];
    assert!(
        reason.starts_with("Apply failed: unreadable apply status"),
        "{reason}"
    );
    assert!(summary.applied.is_empty());
}

#[tokio::test(start_paused = true)]
async fn marker_without_confirmation_phrase() {
    for outcome in [ClickOutcome::Marked, ClickOutcome::Vanished] {
        let page = PageFixture {
            click_outcome: outcome,
            ..eligible_page()
        };
        let orch = orchestrator(vec![(1, page)]);
        let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
        assert_eq!(
            reasons(&summary),
            vec!["Application confirmation not found - clicked successfully"]
        );
        assert!(orch.counter().commits().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn unreadable_details_follow_fallback_policy() {
    let page = PageFixture::default();
    let orch = orchestrator_with(vec![(1, page.clone())], 0, FallbackPolicy::Permissive);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(summary.applied.len(), 1);
    assert_eq!(summary.applied[0].score().unwrap().match_percentage, 0.0);

    let orch = orchestrator_with(vec![(1, page)], 0, FallbackPolicy::Conservative);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(reasons(&summary), vec!["Job details unavailable"]);
}

#[tokio::test(start_paused = true)]
async fn malformed_details_use_fallback() {
    let page = PageFixture::with_details(json!({"applicants": "lots"}));
    let orch = orchestrator_with(vec![(1, page)], 0, FallbackPolicy::Conservative);
    let summary = orch.run(vec![job(1)], &creds()).await.unwrap();
    assert_eq!(reasons(&summary), vec!["Job details unavailable"]);
}

#[tokio::test(start_paused = true)]
async fn unexpected_driver_error_becomes_error_skip() {
    let page = PageFixture {
        marker_probe_fails: true,
        ..eligible_page()
    };
    let orch = orchestrator(vec![(1, page), (2, eligible_page())]);
    let summary = orch.run(vec![job(1), job(2)], &creds()).await.unwrap();
    assert_eq!(
        reasons(&summary),
        vec!["Error: script error: execution context was destroyed"]
    );
    assert_eq!(summary.applied.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rejected_login_aborts_run() {
    let orch = orchestrator(vec![(1, eligible_page())]);
    let err = orch
        .run(vec![job(1)], &Credentials::new("intruder", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Auth(_)));
    assert!(orch.counter().commits().is_empty());
}

#[tokio::test(start_paused = true)]
async fn page_acquisition_failure_aborts_run() {
    let orch = Orchestrator::new(
        FixtureDriver::new(HashMap::new()).failing_open_page(),
        StaticSessionProvider::new(session()),
        MemoryCounterStore::new(0),
        EligibilityEngine::new(SkillModel::default(), FallbackPolicy::Permissive).unwrap(),
    );
    let err = orch.run(vec![job(1)], &creds()).await.unwrap_err();
    assert!(matches!(err, RunError::Page(_)));
}

#[derive(Default)]
struct RecordingSink {
    seen: Mutex<Vec<(usize, usize)>>,
}

#[async_trait]
impl ReportSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, summary: &RunSummary) -> Result<(), SinkError> {
        self.seen
            .lock()
            .unwrap()
            .push((summary.applied.len(), summary.skipped.len()));
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn sinks_receive_the_summary_once() {
    let sink = Arc::new(RecordingSink::default());
    let orch = orchestrator(vec![(1, eligible_page()), (2, PageFixture::with_details(react_details("900")))])
        .with_sink(sink.clone());
    orch.run(vec![job(1), job(2)], &creds()).await.unwrap();
    assert_eq!(*sink.seen.lock().unwrap(), vec![(1, 1)]);
}

/// Loads fine, refuses every commit.
struct ReadOnlyCounter;

impl ApplicationCounterStore for ReadOnlyCounter {
    fn load(&self) -> Result<ApplicationCounter, CounterError> {
        Ok(ApplicationCounter::new(3))
    }

    fn commit(&self, _delta: u32) -> Result<ApplicationCounter, CounterError> {
        Err(CounterError::Io {
            path: "/readonly/application_counter.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn failed_commit_still_reaches_sinks() {
    let sink = Arc::new(RecordingSink::default());
    let pages = HashMap::from([(link(1), eligible_page())]);
    let orch = Orchestrator::new(
        FixtureDriver::new(pages),
        StaticSessionProvider::new(session()),
        ReadOnlyCounter,
        EligibilityEngine::new(SkillModel::default(), FallbackPolicy::Permissive).unwrap(),
    )
    .with_sink(sink.clone());
    let err = orch.run(vec![job(1)], &creds()).await.unwrap_err();
    assert!(matches!(err, RunError::Counter(CounterError::Io { .. })));
    assert_eq!(*sink.seen.lock().unwrap(), vec![(1, 0)]);
}
