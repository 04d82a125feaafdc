//! Changelog generation pipeline
//!
//! Cutoff -> completed issues -> day buckets -> generated blocks -> merged
//! document. Nothing is written until every block has been generated and the
//! operator has approved the preview.

pub mod config;
pub mod cutoff;
pub mod error;
pub mod grouping;
pub mod pipeline;
pub mod source;

pub use config::Settings;
pub use cutoff::{resolve_cutoff, Cutoff, CutoffSource};
pub use error::{ChangelogError, Result};
pub use grouping::{day_key, group_by_day};
pub use pipeline::{Pipeline, ReviewGate, RunOptions, RunOutcome};
pub use source::IssueSource;
