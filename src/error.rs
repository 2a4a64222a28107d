use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Why a blob could not be turned into a [`ContentEntry`](crate::ContentEntry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Fences missing, unmatched, or the metadata block is not a key/value mapping.
    #[error("malformed structure: {0}")]
    MalformedStructure(String),

    /// A required field is absent, or a present field has the wrong type.
    #[error("field `{key}`: {reason}")]
    FieldError { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedStructure,
    FieldError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedStructure => "malformed_structure",
            ErrorKind::FieldError => "field_error",
        }
    }
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ParseError::MalformedStructure(reason.into())
    }

    pub(crate) fn field(key: &'static str, reason: impl Into<String>) -> Self {
        ParseError::FieldError {
            key,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::MalformedStructure(_) => ErrorKind::MalformedStructure,
            ParseError::FieldError { .. } => ErrorKind::FieldError,
        }
    }

    /// The offending key, for field errors.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ParseError::MalformedStructure(_) => None,
            ParseError::FieldError { key, .. } => Some(key),
        }
    }
}

/// From `load_dir`, paths of per-file failures are relative to the article directory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("while reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("while parsing {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Why one post under an article directory was not loaded.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FailureCause {
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            FailureCause::Io(_) => None,
            FailureCause::Parse(e) => Some(e),
        }
    }

    pub(crate) fn at(self, path: PathBuf) -> LoadError {
        match self {
            FailureCause::Io(source) => LoadError::Io { path, source },
            FailureCause::Parse(source) => LoadError::Parse { path, source },
        }
    }
}
