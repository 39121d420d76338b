//! Parsed source files and the sets they are analyzed in

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rowan::GreenNode;

use crate::cst::ast::{AstNode, CompilationUnit};
use crate::cst::{SyntaxNode, parse};

/// One parsed file: its path and immutable green tree
///
/// Green trees are `Send + Sync`, so a `SourceTree` can be shared freely
/// between worker threads; red views are created per use with [`syntax`].
///
/// [`syntax`]: SourceTree::syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    path: PathBuf,
    green: GreenNode,
    error_count: usize,
}

impl SourceTree {
    /// Parse `text` as the contents of `path`
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        let parse = parse(text);
        if !parse.errors().is_empty() {
            tracing::debug!(
                "{} parse errors in {}",
                parse.errors().len(),
                path.display()
            );
        }
        Self {
            path,
            error_count: parse.errors().len(),
            green: parse.into_green(),
        }
    }

    /// Wrap an already built tree, e.g. the output of a fix
    pub fn from_green(path: impl Into<PathBuf>, green: GreenNode) -> Self {
        Self {
            path: path.into(),
            green,
            error_count: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Fresh red tree for navigation
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn root(&self) -> Option<CompilationUnit> {
        CompilationUnit::cast(self.syntax())
    }

    /// Print the tree back to source text
    pub fn text(&self) -> String {
        self.syntax().text().to_string()
    }

    /// Directory containing the file
    pub fn folder(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Number of parse errors recorded when the tree was parsed
    pub fn error_count(&self) -> usize {
        self.error_count
    }
}

/// Ordered collection of source trees grouped by folder
///
/// Documents keep the order they were supplied in; replacing a document
/// keeps its position. Discovery supplies files sorted by path, so CLI runs
/// are stable. The set is read-only to analysis; only the caller replaces
/// documents after a fix.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<SourceTree>,
    index: HashMap<PathBuf, usize>,
}

impl DocumentSet {
    /// Build a set; later documents replace earlier ones with the same path
    pub fn new(documents: impl IntoIterator<Item = SourceTree>) -> Self {
        let mut set = Self::default();
        for document in documents {
            set.insert(document);
        }
        set
    }

    /// Append `document`, or replace the one with the same path in place
    pub fn insert(&mut self, document: SourceTree) {
        match self.index.get(document.path()) {
            Some(&index) => self.documents[index] = document,
            None => {
                self.index
                    .insert(document.path().to_path_buf(), self.documents.len());
                self.documents.push(document);
            }
        }
    }

    pub fn get(&self, path: &Path) -> Option<&SourceTree> {
        self.index_of(path).map(|index| &self.documents[index])
    }

    /// Position of `path` in iteration order
    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceTree> {
        self.documents.iter()
    }

    pub fn as_slice(&self) -> &[SourceTree] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in the same folder as `path` (including `path` itself), in order
    pub fn siblings<'a>(&'a self, path: &Path) -> impl Iterator<Item = &'a SourceTree> + 'a {
        let folder = path.parent().map(Path::to_path_buf);
        self.documents
            .iter()
            .filter(move |d| d.folder().map(Path::to_path_buf) == folder)
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a SourceTree;
    type IntoIter = std::slice::Iter<'a, SourceTree>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> DocumentSet {
        DocumentSet::new([
            SourceTree::parse("Web/Controllers/B.cs", "class B { }"),
            SourceTree::parse("Web/Models/M.cs", "class M { }"),
            SourceTree::parse("Web/Controllers/A.cs", "class A { }"),
        ])
    }

    #[test]
    fn documents_keep_supplied_order() {
        let set = set();
        let paths: Vec<_> = set.iter().map(|d| d.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("Web/Controllers/B.cs"),
                PathBuf::from("Web/Models/M.cs"),
                PathBuf::from("Web/Controllers/A.cs"),
            ]
        );
        assert_eq!(set.index_of(Path::new("Web/Controllers/A.cs")), Some(2));
        assert_eq!(set.index_of(Path::new("Web/Controllers/C.cs")), None);
    }

    #[test]
    fn siblings_share_the_folder() {
        let set = set();
        let siblings: Vec<_> = set
            .siblings(Path::new("Web/Controllers/B.cs"))
            .map(|d| d.path().to_path_buf())
            .collect();
        assert_eq!(
            siblings,
            [
                PathBuf::from("Web/Controllers/B.cs"),
                PathBuf::from("Web/Controllers/A.cs"),
            ]
        );
    }

    #[test]
    fn insert_replaces_same_path() {
        let mut set = set();
        set.insert(SourceTree::parse("Web/Controllers/A.cs", "class A2 { }"));
        assert_eq!(set.len(), 3);
        assert_eq!(set.index_of(Path::new("Web/Controllers/A.cs")), Some(2));
        assert_eq!(
            set.get(Path::new("Web/Controllers/A.cs")).map(|d| d.text()),
            Some("class A2 { }".to_string())
        );
    }

    #[test]
    fn text_is_lossless() {
        let source = "using System;\r\n\r\nclass A : B { } // end";
        let tree = SourceTree::parse("A.cs", source);
        assert_eq!(tree.text(), source);
        assert_eq!(tree.error_count(), 0);
        assert!(tree.root().is_some());
    }
}
