//! Error types for heritage operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for heritage operations
///
/// Unclassifiable input (odd paths, missing identifiers, unparsable base
/// entries) is never an error; it simply produces no diagnostic.
#[derive(Debug, Error)]
pub enum HeritageError {
    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Source that could not be turned into a usable tree
    #[error("Parse error in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    /// A node handed to a tree edit is not part of the tree being edited
    #[error("Node {kind} at {offset} is not part of the edited tree")]
    NodeNotFound { kind: String, offset: usize },

    /// A diagnostic no longer points at a class declaration in the current tree
    #[error("Diagnostic at {offset} in '{path}' does not resolve to a class declaration")]
    StaleDiagnostic { path: PathBuf, offset: usize },

    /// The run was cancelled before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// A rule id that is not registered
    #[error("Unknown rule '{rule_id}'")]
    UnknownRule { rule_id: String },

    /// A fix could not be produced or applied
    #[error("Fix error: {message}")]
    FixError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Config,
    Parse,
    Tree,
    Fix,
    Cancelled,
    Rule,
}

impl HeritageError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            HeritageError::IoError { .. } => ErrorKind::Io,
            HeritageError::ConfigError { .. } => ErrorKind::Config,
            HeritageError::ParseError { .. } => ErrorKind::Parse,
            HeritageError::NodeNotFound { .. } => ErrorKind::Tree,
            HeritageError::StaleDiagnostic { .. } => ErrorKind::Fix,
            HeritageError::FixError { .. } => ErrorKind::Fix,
            HeritageError::Cancelled => ErrorKind::Cancelled,
            HeritageError::UnknownRule { .. } => ErrorKind::Rule,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Io | ErrorKind::Parse | ErrorKind::Fix | ErrorKind::Tree
        )
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn stale_diagnostic(path: impl Into<PathBuf>, offset: usize) -> Self {
        Self::StaleDiagnostic {
            path: path.into(),
            offset,
        }
    }

    pub fn unknown_rule(rule_id: impl Into<String>) -> Self {
        Self::UnknownRule {
            rule_id: rule_id.into(),
        }
    }

    /// Create a fix error
    pub fn fix_error(message: impl Into<String>) -> Self {
        Self::FixError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for HeritageError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
