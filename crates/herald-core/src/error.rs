use herald_storage::DocumentError;
use thiserror::Error;

/// Fatal errors of a changelog run
///
/// None of these are retried. A run either writes every generated block in
/// one go or leaves the document untouched.
#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("invalid date \"{input}\", expected YYYY-MM-DD")]
    InvalidDateFormat { input: String },

    #[error(
        "no <Update label=\"YYYY-MM-DD\"> entries found in {path}; pass --since YYYY-MM-DD to choose a start date"
    )]
    NoExistingEntries { path: String },

    #[error("could not fetch issues from {system}: {message}")]
    SourceUnavailable { system: String, message: String },

    #[error("failed to generate changelog for {day}: {message}")]
    SynthesisFailed { day: String, message: String },

    #[error("malformed changelog document: {0}")]
    MalformedDocument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Document(DocumentError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<DocumentError> for ChangelogError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::MissingMarker { .. } | DocumentError::InvalidMarkerDate { .. } => {
                Self::MalformedDocument(err.to_string())
            }
            DocumentError::Read { .. } | DocumentError::Write { .. } => Self::Document(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChangelogError>;
