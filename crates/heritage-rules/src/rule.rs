//! Rule and fix provider interfaces

use std::path::Path;

use heritage_core::cst::SyntaxToken;
use heritage_core::cst::ast::ClassDeclaration;
use heritage_core::{
    CancellationToken, Diagnostic, DocumentSet, FixCandidate, Location, Result, Severity,
    SourceMap, SourceTree,
};
use serde::Serialize;

/// Static description of a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub title: &'static str,
    /// Message template with positional `{0}`, `{1}`, ... placeholders
    pub message_format: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub default_severity: Severity,
    pub enabled_by_default: bool,
}

impl RuleMetadata {
    /// Fill the message template with `arguments`, in order
    pub fn format_message(&self, arguments: &[&str]) -> String {
        arguments
            .iter()
            .enumerate()
            .fold(self.message_format.to_string(), |message, (index, value)| {
                message.replace(&format!("{{{index}}}"), value)
            })
    }
}

/// What an analyzer knows about the file a declaration lives in
pub struct RuleContext<'a> {
    pub file: &'a Path,
    pub source: &'a str,
    pub source_map: &'a SourceMap,
}

impl<'a> RuleContext<'a> {
    pub fn new(file: &'a Path, source: &'a str, source_map: &'a SourceMap) -> Self {
        Self {
            file,
            source,
            source_map,
        }
    }

    /// Diagnostic location of a token in this file
    pub fn location(&self, token: &SyntaxToken) -> Location {
        self.source_map
            .token_to_diagnostic_location(token, self.source, self.file)
    }
}

/// A rule that inspects one class declaration at a time
///
/// Analyzers are pure: the same declaration in the same file always yields
/// the same result, so they can run on any number of files in parallel.
pub trait ClassAnalyzer: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Zero or one diagnostic for `class`; never fails on malformed input
    fn analyze(&self, class: &ClassDeclaration, ctx: &RuleContext<'_>) -> Option<Diagnostic>;
}

/// Read-only view handed to fix providers
pub struct FixContext<'a> {
    pub documents: &'a DocumentSet,
    pub cancel: &'a CancellationToken,
}

impl<'a> FixContext<'a> {
    pub fn new(documents: &'a DocumentSet, cancel: &'a CancellationToken) -> Self {
        Self { documents, cancel }
    }
}

/// Offers and applies fixes for diagnostics of some rules
pub trait FixProvider: Send + Sync {
    /// Rule ids whose diagnostics this provider can fix
    fn fixable_rule_ids(&self) -> &[&'static str];

    /// Candidate actions for `diagnostic`, in a stable order
    fn candidates(&self, diagnostic: &Diagnostic, ctx: &FixContext<'_>) -> Result<Vec<FixCandidate>>;

    /// Apply `candidate` to `tree`, returning the rewritten file
    fn apply(
        &self,
        tree: &SourceTree,
        diagnostic: &Diagnostic,
        candidate: &FixCandidate,
    ) -> Result<SourceTree>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_positional_arguments() {
        let metadata = RuleMetadata {
            id: "Test",
            title: "Test",
            message_format: "{0} does not inherit from a valid {1} Controller.",
            description: "",
            category: "Test",
            default_severity: Severity::Error,
            enabled_by_default: true,
        };
        assert_eq!(
            metadata.format_message(&["HomeController", "Api base"]),
            "HomeController does not inherit from a valid Api base Controller."
        );
    }
}
