use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use herald_storage::{ChangelogDocument, DAY_KEY_FORMAT};

use crate::error::{ChangelogError, Result};

/// Where a cutoff came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffSource {
    /// `--since` on the command line
    Override,
    /// Newest `<Update>` marker in the changelog
    Document,
}

impl fmt::Display for CutoffSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => f.write_str("--since"),
            Self::Document => f.write_str("last changelog entry"),
        }
    }
}

/// Exclusive lower bound on issue completion time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    pub instant: DateTime<Utc>,
    pub source: CutoffSource,
}

impl Cutoff {
    #[must_use]
    pub fn from_date(date: NaiveDate, source: CutoffSource) -> Self {
        Self {
            instant: date.and_time(chrono::NaiveTime::MIN).and_utc(),
            source,
        }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.instant.date_naive()
    }
}

/// Parse a strict `YYYY-MM-DD` override
///
/// # Errors
///
/// Returns [`ChangelogError::InvalidDateFormat`] for anything else
pub fn parse_override(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let invalid = || ChangelogError::InvalidDateFormat {
        input: input.to_string(),
    };

    // chrono accepts unpadded fields, the label format does not
    if trimmed.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, DAY_KEY_FORMAT).map_err(|_| invalid())
}

/// Decide where the new-work window starts
///
/// An override wins and the document is not consulted for it. Otherwise the
/// newest marker's date is used, at midnight UTC.
///
/// # Errors
///
/// Returns `InvalidDateFormat` for a bad override, `NoExistingEntries` when
/// the document has no marker and `MalformedDocument` for an impossible
/// marker date
pub fn resolve_cutoff(since: Option<&str>, document: &ChangelogDocument) -> Result<Cutoff> {
    if let Some(input) = since {
        let date = parse_override(input)?;
        return Ok(Cutoff::from_date(date, CutoffSource::Override));
    }

    match document.newest_marker()? {
        Some(marker) => Ok(Cutoff::from_date(marker.date, CutoffSource::Document)),
        None => Err(ChangelogError::NoExistingEntries {
            path: document.path().display().to_string(),
        }),
    }
}
