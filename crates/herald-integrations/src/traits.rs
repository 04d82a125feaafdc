use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue as returned by the tracker, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerIssue {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Filter for completed, labelled issues of one team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedIssuesQuery {
    pub team_id: String,
    pub label: String,
    /// Exclusive lower bound on completion time
    pub completed_after: DateTime<Utc>,
    pub page_size: u32,
}

/// One page of query results
#[derive(Debug, Clone, Default)]
pub struct IssuePage {
    pub issues: Vec<TrackerIssue>,
    /// The tracker holds more matches than fit in this page
    pub has_more: bool,
}

/// Team (workspace) visible to the configured credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub key: String,
}

/// Read access to an issue tracker
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch a single page of issues matching `query`
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response cannot be parsed
    async fn completed_issues(&self, query: &CompletedIssuesQuery) -> Result<IssuePage>;

    /// List the teams the credentials can see
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails
    async fn list_teams(&self) -> Result<Vec<Team>>;

    /// Get the system name
    #[must_use]
    fn system_name(&self) -> &'static str;
}
