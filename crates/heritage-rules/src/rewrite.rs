//! Rewrite engine for base-class fixes
//!
//! Produces a new tree for the one affected file: the chosen base class is
//! put first in the class's base list (creating the list if needed) and,
//! when required, an import directive for its namespace is appended after
//! the existing top-level imports. The input tree is never modified.

use heritage_core::cst::ast::{AstNode, ClassDeclaration, CompilationUnit};
use heritage_core::cst::{SyntaxElement, SyntaxKind, SyntaxNode, find_enclosing, replace_node};
use heritage_core::{
    Diagnostic, HeritageError, QualifiedName, Result, SourceTree, collect_imported_namespaces,
    synthesize_import_directive,
};
use rowan::{Direction, GreenNode, GreenToken, NodeOrToken};
use tracing::debug;

type GreenElement = NodeOrToken<GreenNode, GreenToken>;

fn token(kind: SyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

fn simple_base_type(name: &str) -> GreenElement {
    let identifier = GreenNode::new(
        SyntaxKind::IdentifierName.into(),
        vec![token(SyntaxKind::Ident, name)],
    );
    NodeOrToken::Node(GreenNode::new(
        SyntaxKind::SimpleBaseType.into(),
        vec![NodeOrToken::Node(identifier)],
    ))
}

/// Make `base_class` the first entry of the class at the diagnostic and
/// import `namespace` if given
///
/// Fails with [`HeritageError::StaleDiagnostic`] when the diagnostic offset no
/// longer falls inside a class declaration of `tree`.
pub fn apply_base_class_fix(
    tree: &SourceTree,
    diagnostic: &Diagnostic,
    base_class: &str,
    namespace: Option<&QualifiedName>,
    default_import_keyword: &str,
) -> Result<SourceTree> {
    if base_class.is_empty() {
        return Err(HeritageError::fix_error("Base class name is empty"));
    }

    let root = tree.syntax();
    let offset = diagnostic.location.offset;
    let class: ClassDeclaration = find_enclosing(&root, offset)
        .ok_or_else(|| HeritageError::stale_diagnostic(tree.path(), offset))?;

    let new_class = with_base_class(&class, base_class)?;
    let mut new_root = replace_node(&root, class.syntax(), new_class)?;

    if let Some(namespace) = namespace {
        new_root = with_import(&new_root, namespace, default_import_keyword)?;
    }

    debug!(
        "Rewrote {} to inherit from {}",
        class.name().unwrap_or_default(),
        base_class
    );
    Ok(SourceTree::from_green(tree.path(), new_root.green().into_owned()))
}

/// Class declaration green node with `base_class` at position 0 of its base list
fn with_base_class(class: &ClassDeclaration, base_class: &str) -> Result<GreenNode> {
    let green = class.syntax().green();

    if let Some(base_list) = class.base_list() {
        let list_green = base_list.syntax().green();
        let new_list = match base_list.entries().next() {
            Some(first) => {
                // `: IFoo` becomes `: _Base, IFoo`; trivia before the first entry stays put
                let index = first.index();
                list_green.splice_children(
                    index..index,
                    [
                        simple_base_type(base_class),
                        token(SyntaxKind::Comma, ","),
                        token(SyntaxKind::Whitespace, " "),
                    ],
                )
            }
            None => {
                let end = base_list.syntax().children_with_tokens().count();
                list_green.splice_children(
                    end..end,
                    [token(SyntaxKind::Whitespace, " "), simple_base_type(base_class)],
                )
            }
        };
        return Ok(green.replace_child(base_list.syntax().index(), NodeOrToken::Node(new_list)));
    }

    // No base list: insert ` : _Base` after the name, type parameters or primary constructor
    let anchor = header_end(class.syntax()).ok_or_else(|| {
        HeritageError::fix_error("Class declaration has no name to attach a base list to")
    })?;
    let base_list = GreenNode::new(
        SyntaxKind::BaseTypeList.into(),
        vec![
            token(SyntaxKind::Colon, ":"),
            token(SyntaxKind::Whitespace, " "),
            simple_base_type(base_class),
        ],
    );
    Ok(green.splice_children(
        anchor + 1..anchor + 1,
        [token(SyntaxKind::Whitespace, " "), NodeOrToken::Node(base_list)],
    ))
}

/// Child index of the last element of the class header before any base list
fn header_end(class: &SyntaxNode) -> Option<usize> {
    class
        .children_with_tokens()
        .filter(|element| match element {
            SyntaxElement::Token(token) => token.kind() == SyntaxKind::Ident,
            SyntaxElement::Node(node) => matches!(
                node.kind(),
                SyntaxKind::TypeParameterList | SyntaxKind::ParameterList
            ),
        })
        .map(|element| element.index())
        .last()
}

/// Root with an import for `namespace` on the line after the last top-level import
///
/// A namespace that is already imported is left alone. The new directive
/// copies the keyword of the first existing import and the file's line ending.
/// In a file without imports it goes below the leading comment header.
fn with_import(
    root: &SyntaxNode,
    namespace: &QualifiedName,
    default_keyword: &str,
) -> Result<SyntaxNode> {
    let unit = CompilationUnit::cast(root.clone())
        .ok_or_else(|| HeritageError::fix_error("Tree root is not a compilation unit"))?;

    if collect_imported_namespaces(&unit).contains(namespace) {
        debug!("{namespace} is already imported");
        return Ok(root.clone());
    }

    let imports: Vec<_> = unit.imports().collect();
    let keyword = imports
        .first()
        .and_then(|import| import.keyword())
        .map(|keyword| keyword.text().to_string())
        .unwrap_or_else(|| default_keyword.to_string());
    let newline = if root.text().contains_char('\r') {
        "\r\n"
    } else {
        "\n"
    };

    let directive = NodeOrToken::Node(synthesize_import_directive(namespace, &keyword));
    let green = root.green();
    let new_green = match imports.last() {
        Some(last) => match import_line_end(last.syntax()) {
            (index, true) => {
                let index = skip_closing_directives(root, index);
                green.splice_children(index..index, [directive, token(SyntaxKind::Newline, newline)])
            }
            (index, false) => {
                green.splice_children(index..index, [token(SyntaxKind::Newline, newline), directive])
            }
        },
        None => {
            let index = header_comment_end(root);
            green.splice_children(
                index..index,
                [
                    directive,
                    token(SyntaxKind::Newline, newline),
                    token(SyntaxKind::Newline, newline),
                ],
            )
        }
    };

    Ok(SyntaxNode::new_root(new_green))
}

/// Child index just past the line holding `import`, and whether a newline ends it
///
/// Comments trailing the import on its line stay on that line.
fn import_line_end(import: &SyntaxNode) -> (usize, bool) {
    let mut end = import.index() + 1;
    for element in import.siblings_with_tokens(Direction::Next).skip(1) {
        match element.kind() {
            SyntaxKind::Newline => return (element.index() + 1, true),
            SyntaxKind::LineComment | SyntaxKind::BlockComment => end = element.index() + 1,
            SyntaxKind::Whitespace => {}
            _ => break,
        }
    }
    (end, false)
}

/// Step over `#endif` / `#endregion` lines that close the import block at `index`
fn skip_closing_directives(root: &SyntaxNode, mut index: usize) -> usize {
    let elements: Vec<SyntaxElement> = root.children_with_tokens().collect();
    loop {
        let mut cursor = index;
        while elements.get(cursor).is_some_and(|e| e.kind() == SyntaxKind::Whitespace) {
            cursor += 1;
        }
        let Some(SyntaxElement::Token(directive)) = elements.get(cursor) else {
            return index;
        };
        if directive.kind() != SyntaxKind::PreprocessorDirective
            || !is_closing_directive(directive.text())
        {
            return index;
        }
        cursor += 1;
        match elements.get(cursor) {
            Some(element) if element.kind() == SyntaxKind::Newline => index = cursor + 1,
            // Directive on the last line; the import is appended behind it
            _ => return index,
        }
    }
}

fn is_closing_directive(text: &str) -> bool {
    let name = text.trim_start_matches('#').trim_start();
    name.starts_with("endif") || name.starts_with("endregion")
}

/// Child index just past the last newline of the file's leading comment block
///
/// Zero when the file does not open with a comment.
fn header_comment_end(root: &SyntaxNode) -> usize {
    let mut saw_comment = false;
    let mut end = 0;
    for element in root.children_with_tokens() {
        match element.kind() {
            SyntaxKind::LineComment | SyntaxKind::BlockComment => saw_comment = true,
            SyntaxKind::Newline if saw_comment => end = element.index() + 1,
            SyntaxKind::Whitespace | SyntaxKind::Newline => {}
            _ => break,
        }
    }
    end
}
