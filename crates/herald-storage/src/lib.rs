pub mod document;
pub mod models;

pub use document::{ChangelogDocument, DocumentError, Marker};
pub use models::{ContentBlock, DayBucket, WorkItem, DAY_KEY_FORMAT};
