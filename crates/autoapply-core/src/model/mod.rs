//! Core data model: postings in, page snapshots, outcomes out.

mod extract;
mod outcome;
mod posting;

pub use extract::{CountField, ExtractedJobInfo, ExtractionError, RawJobDetails};
pub use outcome::{ApplicationOutcome, SkipReason};
pub use posting::JobPosting;
