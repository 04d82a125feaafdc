//! Persisted changelog document
//!
//! The document is free-form MDX holding a sequence of
//! `<Update label="YYYY-MM-DD">` blocks, newest first. Anything above the first
//! block (front matter, intro text) is preserved verbatim.
//!
//! New blocks are always spliced in directly above the first existing marker,
//! so existing entries are never rewritten.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::models::{ContentBlock, DAY_KEY_FORMAT};

/// Errors from reading, scanning or writing the changelog document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("no <Update label=\"YYYY-MM-DD\"> entry found in {path}")]
    MissingMarker { path: String },

    #[error("entry label \"{label}\" in {path} is not a valid calendar date")]
    InvalidMarkerDate { path: String, label: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The newest dated entry in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub date: NaiveDate,
    /// Byte offset of the `<Update` tag
    pub offset: usize,
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<Update\s+label="([0-9]{4}-[0-9]{2}-[0-9]{2})""#).expect("marker pattern is valid")
    })
}

/// Changelog document held in memory for the duration of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    path: PathBuf,
    text: String,
}

impl ChangelogDocument {
    /// Wrap already-loaded text
    #[must_use]
    pub fn new(path: PathBuf, text: String) -> Self {
        Self { path, text }
    }

    /// Read the document from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("Loaded {} ({} bytes)", path.display(), text.len());
        Ok(Self::new(path.to_path_buf(), text))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Find the first (newest) dated entry: its date and where it starts
    ///
    /// Returns `Ok(None)` when the document has no entries at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the first marker's label is not a real calendar date
    pub fn newest_marker(&self) -> Result<Option<Marker>, DocumentError> {
        let Some(caps) = marker_pattern().captures(&self.text) else {
            return Ok(None);
        };
        let (Some(tag), Some(label)) = (caps.get(0), caps.get(1)) else {
            return Ok(None);
        };

        let date = NaiveDate::parse_from_str(label.as_str(), DAY_KEY_FORMAT).map_err(|_| {
            DocumentError::InvalidMarkerDate {
                path: self.path.display().to_string(),
                label: label.as_str().to_string(),
            }
        })?;

        Ok(Some(Marker {
            date,
            offset: tag.start(),
        }))
    }

    /// Produce the document with `blocks` inserted above the newest entry
    ///
    /// `blocks` are given oldest-to-newest and land newest-first, separated by
    /// blank lines. Every byte outside the insertion point is preserved. An
    /// empty `blocks` slice returns the document unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no entry to insert above
    pub fn merge(&self, blocks: &[ContentBlock]) -> Result<Self, DocumentError> {
        if blocks.is_empty() {
            return Ok(self.clone());
        }

        let marker = self
            .newest_marker()?
            .ok_or_else(|| DocumentError::MissingMarker {
                path: self.path.display().to_string(),
            })?;

        let inserted = blocks
            .iter()
            .rev()
            .map(ContentBlock::markup)
            .collect::<Vec<_>>()
            .join("\n\n");

        let (head, tail) = self.text.split_at(marker.offset);
        let mut text = String::with_capacity(self.text.len() + inserted.len() + 2);
        text.push_str(head);
        text.push_str(&inserted);
        text.push_str("\n\n");
        text.push_str(tail);

        Ok(Self::new(self.path.clone(), text))
    }

    /// Write the document back to its path in one atomic replace
    ///
    /// Symlinks are followed so the link target is replaced, and the existing
    /// file's permissions carry over to the new contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed
    pub fn save(&self) -> Result<(), DocumentError> {
        let write_err = |source| DocumentError::Write {
            path: self.path.display().to_string(),
            source,
        };

        // a file that does not exist yet is created at the given path
        let target = std::fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(self.text.as_bytes()).map_err(write_err)?;
        if let Ok(existing) = std::fs::metadata(&target) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(write_err)?;
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&target).map_err(|e| write_err(e.error))?;

        log::debug!("Wrote {} ({} bytes)", self.path.display(), self.text.len());
        Ok(())
    }
}
