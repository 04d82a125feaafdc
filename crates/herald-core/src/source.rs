use herald_integrations::{CompletedIssuesQuery, IssueTracker, TrackerIssue};
use herald_storage::WorkItem;

use crate::cutoff::Cutoff;
use crate::error::{ChangelogError, Result};

/// Completed, labelled work of one team, read from an issue tracker
pub struct IssueSource {
    tracker: Box<dyn IssueTracker>,
    team_id: String,
    label: String,
    page_size: u32,
}

impl IssueSource {
    #[must_use]
    pub fn new(tracker: Box<dyn IssueTracker>, team_id: String, label: String, page_size: u32) -> Self {
        Self {
            tracker,
            team_id,
            label,
            page_size,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fetch work completed strictly after `cutoff`, oldest first
    ///
    /// Only the first page is read. If the tracker has more matches a warning
    /// is logged and the rest are left for a later run.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if the tracker request fails
    pub async fn fetch_since(&self, cutoff: &Cutoff) -> Result<Vec<WorkItem>> {
        let query = CompletedIssuesQuery {
            team_id: self.team_id.clone(),
            label: self.label.clone(),
            completed_after: cutoff.instant,
            page_size: self.page_size,
        };

        let page = self
            .tracker
            .completed_issues(&query)
            .await
            .map_err(|e| ChangelogError::SourceUnavailable {
                system: self.tracker.system_name().to_string(),
                message: format!("{e:#}"),
            })?;

        if page.has_more {
            log::warn!(
                "More than {} issues matched; only the first page is included. Re-run with a later --since to pick up the rest.",
                self.page_size
            );
        }

        Ok(normalize(page.issues, cutoff))
    }
}

/// Drop incomplete or already-covered issues and sort by completion time
#[must_use]
pub fn normalize(issues: Vec<TrackerIssue>, cutoff: &Cutoff) -> Vec<WorkItem> {
    let mut items: Vec<WorkItem> = issues
        .into_iter()
        .filter_map(|issue| {
            let completed_at = issue.completed_at?;
            if completed_at <= cutoff.instant {
                log::debug!("Skipping {} completed at {completed_at}", issue.id);
                return None;
            }
            Some(WorkItem::new(
                issue.id,
                issue.title,
                issue.description,
                issue.url,
                completed_at,
            ))
        })
        .collect();

    items.sort_by_key(|item| item.completed_at);
    items
}
