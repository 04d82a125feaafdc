mod http;
pub mod linear;
pub mod traits;

pub use linear::{LinearClient, LINEAR_API_URL};
pub use traits::{CompletedIssuesQuery, IssuePage, IssueTracker, Team, TrackerIssue};
