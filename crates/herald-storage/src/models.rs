use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format of a day key, also used in `<Update label="...">` markers
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Completed issue, normalized from the issue tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub completed_at: DateTime<Utc>,
}

impl WorkItem {
    #[must_use]
    pub fn new(
        id: String,
        title: String,
        description: Option<String>,
        url: String,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            url,
            completed_at,
        }
    }
}

/// Work items completed on the same calendar day, in completion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub day: NaiveDate,
    pub items: Vec<WorkItem>,
}

impl DayBucket {
    #[must_use]
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            items: Vec::new(),
        }
    }

    /// Day key in `YYYY-MM-DD` form
    #[must_use]
    pub fn day_key(&self) -> String {
        self.day.format(DAY_KEY_FORMAT).to_string()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Rendered `<Update>` block for one day, ready to be spliced into the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    day: NaiveDate,
    markup: String,
}

impl ContentBlock {
    #[must_use]
    pub fn new(day: NaiveDate, markup: String) -> Self {
        Self { day, markup }
    }

    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    #[must_use]
    pub fn day_key(&self) -> String {
        self.day.format(DAY_KEY_FORMAT).to_string()
    }

    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }
}
