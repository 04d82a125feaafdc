//! Linear GraphQL client
//!
//! Only the two read paths the changelog needs: completed issues for a
//! team/label window, and the list of teams. Personal API keys go in the
//! `Authorization` header as-is (no `Bearer` prefix).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::http::{build_client, ResponseExt};
use crate::traits::{CompletedIssuesQuery, IssuePage, IssueTracker, Team, TrackerIssue};

pub const LINEAR_API_URL: &str = "https://api.linear.app/graphql";

const COMPLETED_ISSUES_QUERY: &str = r"
query CompletedIssues($teamId: ID!, $label: String!, $after: DateTimeOrDuration!, $first: Int!) {
  issues(
    filter: {
      team: { id: { eq: $teamId } }
      labels: { name: { eq: $label } }
      completedAt: { gt: $after }
    }
    first: $first
  ) {
    nodes { id title description url completedAt }
    pageInfo { hasNextPage }
  }
}";

const TEAMS_QUERY: &str = "{ teams { nodes { id name key } } }";

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct IssuesData {
    issues: IssueConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueConnection {
    nodes: Vec<IssueNode>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    url: String,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TeamsData {
    teams: TeamConnection,
}

#[derive(Debug, Deserialize)]
struct TeamConnection {
    nodes: Vec<Team>,
}

// ============================================================================
// Linear Client
// ============================================================================

/// Linear API client
pub struct LinearClient {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl LinearClient {
    /// Create a new Linear client
    ///
    /// # Arguments
    /// * `api_key` - Linear personal API key
    /// * `api_url` - Optional GraphQL endpoint override (defaults to [`LINEAR_API_URL`])
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(api_key: String, api_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = build_client(timeout)?;
        let api_url = api_url.unwrap_or_else(|| LINEAR_API_URL.to_string());

        Ok(Self {
            api_key,
            api_url,
            client,
        })
    }

    async fn graphql<T>(&self, query: &str, variables: serde_json::Value) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        log::debug!("POST {}", self.api_url);

        self.client
            .post(&self.api_url)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .context("Failed to send request to Linear API")?
            .graphql_data("Linear")
            .await
    }
}

#[async_trait]
impl IssueTracker for LinearClient {
    async fn completed_issues(&self, query: &CompletedIssuesQuery) -> Result<IssuePage> {
        let variables = json!({
            "teamId": query.team_id,
            "label": query.label,
            "after": query.completed_after.to_rfc3339_opts(SecondsFormat::Millis, true),
            "first": query.page_size,
        });

        log::debug!(
            "Fetching Linear issues: team={} label={} after={}",
            query.team_id,
            query.label,
            query.completed_after
        );

        let data: IssuesData = self.graphql(COMPLETED_ISSUES_QUERY, variables).await?;

        let issues = data
            .issues
            .nodes
            .into_iter()
            .map(|node| TrackerIssue {
                id: node.id,
                title: node.title,
                description: node.description,
                url: node.url,
                completed_at: node.completed_at,
            })
            .collect();

        Ok(IssuePage {
            issues,
            has_more: data.issues.page_info.has_next_page,
        })
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let data: TeamsData = self.graphql(TEAMS_QUERY, json!({})).await?;
        Ok(data.teams.nodes)
    }

    fn system_name(&self) -> &'static str {
        "linear"
    }
}

// ============================================================================
// Tests
// ============================================================================
