//! Base-class candidate scanner
//!
//! Looks through the documents in the flagged file's folder for classes
//! carrying the reserved prefix and turns each into a [`FixCandidate`].

use std::collections::{BTreeSet, HashSet};

use heritage_core::cst::ast::{AstNode, ClassDeclaration};
use heritage_core::cst::{SyntaxNode, find_enclosing};
use heritage_core::{
    CancellationToken, Diagnostic, FixCandidate, QualifiedName, Result, SourceTree,
    collect_imported_namespaces, enclosing_namespace,
};
use tracing::debug;

/// Namespaces whose classes `target` can name without a new import
///
/// That is the file's top-level imports plus the namespace enclosing the
/// class at `offset` and each of its parents.
pub fn visible_namespaces(target: &SourceTree, offset: usize) -> BTreeSet<QualifiedName> {
    let root = target.syntax();
    let mut visible = target
        .root()
        .map(|unit| collect_imported_namespaces(&unit))
        .unwrap_or_default();

    if let Some(namespace) = find_enclosing::<ClassDeclaration>(&root, offset)
        .and_then(|class| enclosing_namespace(class.syntax()))
    {
        visible.extend(namespace.prefixes());
    }
    visible
}

/// Candidates for `diagnostic`, raised against `target`, from `siblings`
///
/// Siblings are visited in the order supplied, classes in declaration order;
/// candidates with the same title are offered once. The flagged declaration
/// itself is never suggested. Cancellation is checked before each sibling.
pub fn scan_candidates<'a>(
    siblings: impl IntoIterator<Item = &'a SourceTree>,
    target: &SourceTree,
    diagnostic: &Diagnostic,
    reserved_prefix: &str,
    cancel: &CancellationToken,
) -> Result<Vec<FixCandidate>> {
    let visible = visible_namespaces(target, diagnostic.location.offset);
    let span = diagnostic.span();

    let mut candidates = Vec::new();
    let mut titles = HashSet::new();

    for sibling in siblings {
        cancel.check()?;

        let root = sibling.syntax();
        let is_target_file = sibling.path() == diagnostic.location.file;

        for class in prefixed_classes(&root, reserved_prefix) {
            let Some(identifier) = class.identifier() else {
                continue;
            };
            let range = identifier.text_range();
            if is_target_file
                && usize::from(range.start()) == span.start
                && usize::from(range.end()) == span.end
            {
                continue;
            }

            let namespace = enclosing_namespace(class.syntax()).filter(|ns| !visible.contains(ns));
            let candidate = FixCandidate::new(identifier.text(), namespace);
            if titles.insert(candidate.title.clone()) {
                debug!(
                    "Candidate {} from {}",
                    candidate.target_class,
                    sibling.path().display()
                );
                candidates.push(candidate);
            }
        }
    }

    Ok(candidates)
}

fn prefixed_classes<'p>(
    root: &SyntaxNode,
    reserved_prefix: &'p str,
) -> impl Iterator<Item = ClassDeclaration> + 'p {
    root.descendants()
        .filter_map(ClassDeclaration::cast)
        .filter(move |class| {
            class
                .identifier()
                .is_some_and(|ident| ident.text().starts_with(reserved_prefix))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use heritage_core::{DocumentSet, Location, Severity};
    use std::path::{Path, PathBuf};

    fn diagnostic_at(path: &str, source: &str, name: &str) -> Diagnostic {
        let offset = source.find(name).unwrap();
        Diagnostic::new(
            "ControllerInheritance",
            Severity::Error,
            "",
            Location::new(PathBuf::from(path), 1, 1, offset, name.len()),
        )
    }

    #[test]
    fn finds_prefixed_siblings_in_order() {
        let foo = "class FooController : IFoo { }";
        let set = DocumentSet::new([
            SourceTree::parse("Controllers/FooController.cs", foo),
            SourceTree::parse("Controllers/_BaseController.cs", "class _BaseController { }"),
            SourceTree::parse(
                "Controllers/_Bases.cs",
                "class _SecureController { } class Helper { } class _AuditController { }",
            ),
        ]);
        let path = Path::new("Controllers/FooController.cs");
        let diagnostic = diagnostic_at("Controllers/FooController.cs", foo, "FooController");

        let candidates = scan_candidates(
            set.siblings(path),
            set.get(path).unwrap(),
            &diagnostic,
            "_",
            &CancellationToken::new(),
        )
        .unwrap();

        let titles: Vec<_> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Inherit from _BaseController",
                "Inherit from _SecureController",
                "Inherit from _AuditController",
            ]
        );
        assert!(candidates.iter().all(|c| c.target_namespace.is_none()));
    }

    #[test]
    fn flagged_class_does_not_suggest_itself() {
        let source = "class _Weird : Controller2 { }\nclass _Other { }";
        let set = DocumentSet::new([SourceTree::parse("Controllers/A.cs", source)]);
        let path = Path::new("Controllers/A.cs");
        let diagnostic = diagnostic_at("Controllers/A.cs", source, "_Weird");

        let candidates = scan_candidates(
            set.siblings(path),
            set.get(path).unwrap(),
            &diagnostic,
            "_",
            &CancellationToken::new(),
        )
        .unwrap();

        let names: Vec<_> = candidates.iter().map(|c| c.target_class.as_str()).collect();
        assert_eq!(names, ["_Other"]);
    }

    #[test]
    fn cancelled_scan_returns_error() {
        let source = "class A : B { }";
        let set = DocumentSet::new([SourceTree::parse("Controllers/A.cs", source)]);
        let path = Path::new("Controllers/A.cs");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = scan_candidates(
            set.siblings(path),
            set.get(path).unwrap(),
            &diagnostic_at("Controllers/A.cs", source, "A"),
            "_",
            &cancel,
        );
        assert!(result.is_err());
    }

    #[test]
    fn visible_namespaces_include_enclosing_chain() {
        let source = "using System;\nnamespace Company.Web.Controllers { class A : B { } }";
        let tree = SourceTree::parse("Controllers/A.cs", source);
        let visible: Vec<String> = visible_namespaces(&tree, source.find("A :").unwrap())
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(
            visible,
            ["Company", "Company.Web", "Company.Web.Controllers", "System"]
        );
    }
}
