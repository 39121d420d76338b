//! Diagnostic types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use crate::qualified_name::QualifiedName;

/// Represents a diagnostic message from linting
///
/// Diagnostics are produced once and never mutated; fixes locate their target
/// again from `location` in the current tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique identifier for the rule that generated this diagnostic
    pub rule_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Location in the source file
    pub location: Location,
    /// Values the message template was filled with, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    /// Optional error code
    pub code: Option<String>,
    /// Category of the diagnostic
    pub category: Option<String>,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional end position for ranges
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span
    pub length: usize,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            arguments: Vec::new(),
            code: None,
            category: None,
        }
    }

    /// Record the values substituted into the message template
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    /// Set the error code for this diagnostic
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the category for this diagnostic
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Byte range the diagnostic points at
    pub fn span(&self) -> Range<usize> {
        self.location.span()
    }
}

impl Location {
    /// Create a new location
    pub fn new(file: PathBuf, line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            end_line: None,
            end_column: None,
            offset,
            length,
        }
    }

    /// Byte range covered by this location
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// One selectable corrective action for a diagnostic
///
/// `target_namespace` is `None` when no import needs to be added.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixCandidate {
    /// Action title, also the equivalence key between candidates
    pub title: String,
    /// Name of the base class to inherit from
    pub target_class: String,
    /// Namespace to import, if not already visible
    pub target_namespace: Option<QualifiedName>,
}

impl FixCandidate {
    pub fn new(target_class: impl Into<String>, target_namespace: Option<QualifiedName>) -> Self {
        let target_class = target_class.into();
        Self {
            title: format!("Inherit from {target_class}"),
            target_class,
            target_namespace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display_and_span() {
        let location = Location::new(PathBuf::from("Controllers/A.cs"), 3, 14, 40, 11);
        assert_eq!(location.to_string(), "Controllers/A.cs:3:14");
        assert_eq!(location.span(), 40..51);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Hint);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_fix_candidate_title() {
        let candidate = FixCandidate::new("_BaseController", None);
        assert_eq!(candidate.title, "Inherit from _BaseController");
        assert_eq!(candidate.target_class, "_BaseController");
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let diagnostic = Diagnostic::new(
            "ControllerInheritance",
            Severity::Error,
            "FooController does not inherit from a valid base Controller.",
            Location::new(PathBuf::from("Controllers/FooController.cs"), 1, 7, 6, 13),
        )
        .with_arguments(["FooController", "base"])
        .with_code("ControllerInheritance");

        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["arguments"][1], "base");
        assert_eq!(json["location"]["offset"], 6);
    }
}
