//! Lint engine
//!
//! Runs every registered analyzer over every class declaration of a
//! [`DocumentSet`] and routes fix requests to the provider registered for
//! the diagnostic's rule.

use heritage_core::{
    CancellationToken, Diagnostic, DocumentSet, FixCandidate, HeritageConfig, HeritageError,
    Result, SourceMap, SourceTree,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::registry::RuleRegistry;
use crate::rule::{FixContext, RuleContext};

/// Analysis and fix entry point shared by the CLI and tests
#[derive(Debug, Clone)]
pub struct LintEngine {
    registry: RuleRegistry,
    cancel: CancellationToken,
}

impl LintEngine {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            cancel: CancellationToken::new(),
        }
    }

    /// Engine with the built-in rules configured from `config`
    pub fn from_config(config: &HeritageConfig) -> Self {
        Self::new(RuleRegistry::builtin(config))
    }

    /// Use `cancel` instead of the engine's own token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Diagnostics for one document, in declaration order
    pub fn analyze_document(&self, document: &SourceTree) -> Vec<Diagnostic> {
        let Some(root) = document.root() else {
            return Vec::new();
        };

        let source = document.text();
        let source_map = SourceMap::new(&source);
        let ctx = RuleContext::new(document.path(), &source, &source_map);

        let mut diagnostics = Vec::new();
        for class in root.class_declarations() {
            for analyzer in self.registry.analyzers() {
                if let Some(diagnostic) = analyzer.analyze(&class, &ctx) {
                    diagnostics.push(diagnostic);
                }
            }
        }
        diagnostics
    }

    /// Diagnostics for every document of `documents`
    ///
    /// Files are analyzed in parallel; the result is ordered by document
    /// order, then offset, then rule id, so it is identical between runs.
    /// Returns [`HeritageError::Cancelled`] if cancellation was requested.
    pub fn analyze(&self, documents: &DocumentSet) -> Result<Vec<Diagnostic>> {
        let per_file: Vec<Vec<Diagnostic>> = documents
            .as_slice()
            .par_iter()
            .map(|document| {
                self.cancel.check()?;
                Ok(self.analyze_document(document))
            })
            .collect::<Result<_>>()?;

        let mut diagnostics: Vec<Diagnostic> = per_file.into_iter().flatten().collect();
        diagnostics.sort_by(|a, b| {
            let a_key = (documents.index_of(&a.location.file), a.location.offset, &a.rule_id);
            let b_key = (documents.index_of(&b.location.file), b.location.offset, &b.rule_id);
            a_key.cmp(&b_key)
        });

        info!(
            "Analyzed {} files, {} diagnostics",
            documents.len(),
            diagnostics.len()
        );
        Ok(diagnostics)
    }

    /// Fix candidates for `diagnostic`
    ///
    /// Fails with [`HeritageError::UnknownRule`] if no provider fixes the
    /// diagnostic's rule.
    pub fn fixes_for(
        &self,
        documents: &DocumentSet,
        diagnostic: &Diagnostic,
    ) -> Result<Vec<FixCandidate>> {
        let provider = self.registry.fix_provider(&diagnostic.rule_id)?;
        let ctx = FixContext::new(documents, &self.cancel);
        let candidates = provider.candidates(diagnostic, &ctx)?;
        debug!(
            "{} candidates for {}",
            candidates.len(),
            diagnostic.location
        );
        Ok(candidates)
    }

    /// Apply `candidate` to the file `diagnostic` was raised against
    ///
    /// Returns the rewritten file, re-parsed from its printed text so spans
    /// are fresh; `documents` is left untouched. A rewrite whose text parses
    /// with more errors than the original is rejected with
    /// [`HeritageError::ParseError`].
    pub fn apply_fix(
        &self,
        documents: &DocumentSet,
        diagnostic: &Diagnostic,
        candidate: &FixCandidate,
    ) -> Result<SourceTree> {
        let provider = self.registry.fix_provider(&diagnostic.rule_id)?;
        let tree = documents.get(&diagnostic.location.file).ok_or_else(|| {
            HeritageError::stale_diagnostic(&diagnostic.location.file, diagnostic.location.offset)
        })?;

        let fixed = provider.apply(tree, diagnostic, candidate)?;
        let reparsed = SourceTree::parse(fixed.path(), &fixed.text());
        if reparsed.error_count() > tree.error_count() {
            return Err(HeritageError::parse_error(
                tree.path(),
                format!("'{}' produced unparsable output", candidate.title),
            ));
        }
        Ok(reparsed)
    }
}

impl Default for LintEngine {
    fn default() -> Self {
        Self::from_config(&HeritageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn documents() -> DocumentSet {
        DocumentSet::new([
            SourceTree::parse(
                "Web/Controllers/HomeController.cs",
                "class HomeController : Controller { }\nclass AboutController : IAbout { }",
            ),
            SourceTree::parse(
                "Web/Controllers/_BaseController.cs",
                "class _BaseController : Controller { }",
            ),
            SourceTree::parse("Web/Models/User.cs", "class User : Entity { }"),
        ])
    }

    #[test]
    fn analyzes_in_document_order() {
        let diagnostics = LintEngine::default().analyze(&documents()).unwrap();
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "HomeController does not inherit from a valid base Controller.",
                "AboutController does not inherit from a valid base Controller.",
            ]
        );
    }

    #[test]
    fn cancelled_analysis_fails() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let engine = LintEngine::default().with_cancellation(cancel);
        let err = engine.analyze(&documents()).unwrap_err();
        assert!(matches!(err, HeritageError::Cancelled));
    }

    #[test]
    fn empty_registry_reports_nothing() {
        let engine = LintEngine::new(RuleRegistry::new());
        assert!(engine.analyze(&documents()).unwrap().is_empty());
    }

    #[test]
    fn fix_round_trip() {
        let documents = documents();
        let engine = LintEngine::default();
        let diagnostics = engine.analyze(&documents).unwrap();
        let diagnostic = &diagnostics[0];

        let candidates = engine.fixes_for(&documents, diagnostic).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].target_class, "_BaseController");

        let fixed = engine.apply_fix(&documents, diagnostic, &candidates[0]).unwrap();
        assert_eq!(fixed.path(), Path::new("Web/Controllers/HomeController.cs"));
        assert!(fixed.text().starts_with("class HomeController : _BaseController, Controller { }"));
    }
}
