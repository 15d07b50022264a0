use std::fmt;

/// Position of a posting in the apply sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Start,
    Navigated,
    ContentReady,
    DuplicateCheck,
    TitleFilter,
    Scored,
    SessionRestored,
    RedirectCheck,
    ApplyAttempt,
    Confirmed,
    NotConfirmed,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStage::Start => "start",
            JobStage::Navigated => "navigated",
            JobStage::ContentReady => "content-ready",
            JobStage::DuplicateCheck => "duplicate-check",
            JobStage::TitleFilter => "title-filter",
            JobStage::Scored => "scored",
            JobStage::SessionRestored => "session-restored",
            JobStage::RedirectCheck => "redirect-check",
            JobStage::ApplyAttempt => "apply-attempt",
            JobStage::Confirmed => "confirmed",
            JobStage::NotConfirmed => "not-confirmed",
        };
        f.write_str(name)
    }
}
