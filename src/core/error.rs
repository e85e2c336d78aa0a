//! Error taxonomy for the incident core

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::yaml::diagnostics::YamlSyntaxError;

/// Everything that can go wrong while reading, changing or querying incidents
#[derive(Debug, Error, Diagnostic)]
pub enum TrackerError {
    #[error("no incident store at {}", .path.display())]
    #[diagnostic(code(irt::store::not_initialized), help("run `irt init` first"))]
    NotInitialized { path: PathBuf },

    #[error("incident store at {} is corrupt: {reason}", .path.display())]
    #[diagnostic(
        code(irt::store::corrupt),
        help("inspect or restore the file; it is never re-initialized automatically")
    )]
    CorruptStore {
        path: PathBuf,
        reason: String,
        #[related]
        syntax: Vec<YamlSyntaxError>,
    },

    #[error("no incident found matching '{0}'")]
    #[diagnostic(code(irt::store::not_found), help("use `irt list` to see ids and @N short ids"))]
    NotFound(String),

    #[error("'{reference}' is ambiguous, it matches {}", .matches.join(", "))]
    #[diagnostic(
        code(irt::store::ambiguous_id),
        help("type more characters of the id or use an @N short id")
    )]
    AmbiguousId {
        reference: String,
        matches: Vec<String>,
    },

    #[error("invalid {name}: '{value}'")]
    #[diagnostic(code(irt::incident::invalid_field), help("expected {expected}"))]
    InvalidField {
        name: &'static str,
        value: String,
        expected: String,
    },

    #[error("invalid {name} filter: '{value}'")]
    #[diagnostic(code(irt::query::invalid_filter), help("expected {expected}"))]
    InvalidFilter {
        name: &'static str,
        value: String,
        expected: String,
    },

    #[error("no changes supplied")]
    #[diagnostic(
        code(irt::incident::no_changes),
        help("pass at least one of --title, --category, --severity, --phase, --status, --owner, --notes, --replace-notes")
    )]
    NoChanges,

    #[error("failed to write {}", .path.display())]
    #[diagnostic(
        code(irt::store::persistence),
        help("the previous contents of the file were left in place")
    )]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackerError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TrackerError::CorruptStore {
            path: path.into(),
            reason: reason.into(),
            syntax: Vec::new(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
