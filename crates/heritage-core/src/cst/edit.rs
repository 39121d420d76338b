//! Persistent tree edits
//!
//! Trees are never mutated. An edit rebuilds the green path from the replaced
//! node up to the root; every other subtree is shared with the old tree.

use rowan::{GreenNode, TextSize};

use super::SyntaxNode;
use super::ast::AstNode;
use crate::{HeritageError, Result};

/// Replace `old` (a node of `root`'s tree) with `new`, returning the new root
///
/// Fails with [`HeritageError::NodeNotFound`] when `old` is not reachable from
/// `root`. The original tree is left untouched either way.
pub fn replace_node(root: &SyntaxNode, old: &SyntaxNode, new: GreenNode) -> Result<SyntaxNode> {
    let old_root = old.ancestors().last();
    if old_root.as_ref() != Some(root) {
        return Err(HeritageError::NodeNotFound {
            kind: old.kind().to_string(),
            offset: old.text_range().start().into(),
        });
    }

    Ok(SyntaxNode::new_root(old.replace_with(new)))
}

/// Find the innermost `N` enclosing the token at `offset`
///
/// Returns `None` when `offset` lies outside the tree or outside any `N`.
pub fn find_enclosing<N: AstNode>(root: &SyntaxNode, offset: usize) -> Option<N> {
    let offset = TextSize::try_from(offset).ok()?;
    let range = root.text_range();
    if offset < range.start() || offset >= range.end() {
        return None;
    }

    let token = root.token_at_offset(offset).right_biased()?;
    token.parent_ancestors().find_map(N::cast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::SyntaxKind;
    use crate::cst::ast::ClassDeclaration;
    use crate::cst::parse;

    #[test]
    fn replace_rebuilds_only_the_path_to_root() {
        let source = "class A { }\nclass B { }\n";
        let root = parse(source).syntax();
        let first = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::ClassDeclaration)
            .unwrap();

        let replacement = parse("class Z { }").syntax().first_child().unwrap().green().into_owned();
        let new_root = replace_node(&root, &first, replacement).unwrap();

        assert_eq!(new_root.text().to_string(), "class Z { }\nclass B { }\n");
        assert_eq!(root.text().to_string(), source);

        let old_second = root.children().nth(1).unwrap();
        let new_second = new_root.children().nth(1).unwrap();
        assert!(std::ptr::eq(&*old_second.green(), &*new_second.green()));
    }

    #[test]
    fn replace_rejects_foreign_node() {
        let root = parse("class A { }").syntax();
        let other = parse("class A { }").syntax();
        let foreign = other.first_child().unwrap();

        let err = replace_node(&root, &foreign, foreign.green().into_owned()).unwrap_err();
        assert!(matches!(err, HeritageError::NodeNotFound { .. }));
    }

    #[test]
    fn find_enclosing_class() {
        let source = "namespace N { class Outer { class Inner : Base { } } }";
        let root = parse(source).syntax();

        let offset = source.find("Inner").unwrap();
        let class: ClassDeclaration = find_enclosing(&root, offset).unwrap();
        assert_eq!(class.name().as_deref(), Some("Inner"));

        let offset = source.find("Outer").unwrap();
        let class: ClassDeclaration = find_enclosing(&root, offset).unwrap();
        assert_eq!(class.name().as_deref(), Some("Outer"));
    }

    #[test]
    fn find_enclosing_outside_any_class() {
        let source = "using System;\nclass A { }";
        let root = parse(source).syntax();

        assert!(find_enclosing::<ClassDeclaration>(&root, 2).is_none());
        assert!(find_enclosing::<ClassDeclaration>(&root, source.len()).is_none());
        assert!(find_enclosing::<ClassDeclaration>(&root, 10_000).is_none());
    }
}
