//! Dotted namespace names and their tree fragments
//!
//! Qualified names in the tree are left-deep: `A.B.C` is stored as
//! `QualifiedName(QualifiedName(A, B), C)`, so the outermost node holds the
//! rightmost segment. Both directions are iterative so namespace depth is not
//! bounded by the call stack.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rowan::{GreenNode, GreenToken, NodeOrToken};
use serde::{Deserialize, Serialize};

use crate::cst::SyntaxKind;
use crate::cst::SyntaxNode;
use crate::cst::ast::{AstNode, CompilationUnit, Name, NamespaceDeclaration};

/// A non-empty sequence of identifier segments such as `System.Net`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Build a name from segments; `None` if there are none or one is empty
    pub fn new<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self { segments })
    }

    /// Parse `A.B.C`; surrounding whitespace per segment is ignored
    pub fn from_dotted(dotted: &str) -> Option<Self> {
        Self::new(dotted.split('.').map(str::trim))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The rightmost segment
    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// `A`, `A.B`, `A.B.C` for `A.B.C`
    pub fn prefixes(&self) -> impl Iterator<Item = QualifiedName> + '_ {
        (1..=self.segments.len()).map(|n| Self {
            segments: self.segments[..n].to_vec(),
        })
    }

    /// `self` followed by the segments of `other`
    pub fn join(&self, other: &QualifiedName) -> QualifiedName {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for QualifiedName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dotted(s).ok_or_else(|| format!("'{s}' is not a qualified name"))
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_string()
    }
}

/// Read a name fragment into its segments
///
/// Walks the left spine down to the leftmost identifier, collecting right
/// segments on the way, then reverses them. Generic segments contribute their
/// identifier only. Returns `None` if any segment is missing.
pub fn parse_qualified_name(name: &Name) -> Option<QualifiedName> {
    let mut reversed = Vec::new();
    let mut current = name.clone();

    loop {
        match current {
            Name::Identifier(ident) => {
                reversed.push(ident.text()?);
                break;
            }
            Name::Generic(generic) => {
                reversed.push(generic.text()?);
                break;
            }
            Name::Qualified(qualified) => {
                reversed.push(qualified.right()?.simple_identifier()?);
                current = qualified.left()?;
            }
        }
    }

    reversed.reverse();
    QualifiedName::new(reversed)
}

/// Build the left-deep tree fragment for `name`
///
/// A single segment becomes a plain `IdentifierName`.
pub fn synthesize_import_fragment(name: &QualifiedName) -> GreenNode {
    let mut segments = name.segments().iter();
    let Some(first) = segments.next() else {
        return GreenNode::new(SyntaxKind::IdentifierName.into(), Vec::new());
    };

    let mut fragment = identifier_name(first);
    for segment in segments {
        fragment = GreenNode::new(
            SyntaxKind::QualifiedName.into(),
            vec![
                NodeOrToken::Node(fragment),
                NodeOrToken::Token(GreenToken::new(SyntaxKind::Dot.into(), ".")),
                NodeOrToken::Node(identifier_name(segment)),
            ],
        );
    }
    fragment
}

/// `using A.B;` (or `import A.B;`) with no surrounding trivia
///
/// `keyword` is used verbatim; anything other than `import` is given the
/// `using` token kind.
pub fn synthesize_import_directive(name: &QualifiedName, keyword: &str) -> GreenNode {
    let keyword_kind = match SyntaxKind::from_keyword(keyword) {
        Some(SyntaxKind::ImportKw) => SyntaxKind::ImportKw,
        _ => SyntaxKind::UsingKw,
    };

    GreenNode::new(
        SyntaxKind::ImportDirective.into(),
        vec![
            NodeOrToken::Token(GreenToken::new(keyword_kind.into(), keyword)),
            NodeOrToken::Token(GreenToken::new(SyntaxKind::Whitespace.into(), " ")),
            NodeOrToken::Node(synthesize_import_fragment(name)),
            NodeOrToken::Token(GreenToken::new(SyntaxKind::Semicolon.into(), ";")),
        ],
    )
}

fn identifier_name(text: &str) -> GreenNode {
    GreenNode::new(
        SyntaxKind::IdentifierName.into(),
        vec![NodeOrToken::Token(GreenToken::new(
            SyntaxKind::Ident.into(),
            text,
        ))],
    )
}

/// Namespaces imported by the top-level import directives of `unit`
///
/// Nested imports, `using static` and alias directives are not namespace
/// imports and are skipped, as are directives whose name does not parse.
pub fn collect_imported_namespaces(unit: &CompilationUnit) -> BTreeSet<QualifiedName> {
    unit.imports()
        .filter(|import| !import.is_static() && !import.is_alias())
        .filter_map(|import| parse_qualified_name(&import.name()?))
        .collect()
}

/// Full namespace enclosing `node`, joining nested namespace declarations
///
/// `None` for declarations in the global namespace or when a namespace name
/// cannot be read.
pub fn enclosing_namespace(node: &SyntaxNode) -> Option<QualifiedName> {
    let mut chain: Vec<QualifiedName> = Vec::new();
    for namespace in node.ancestors().filter_map(NamespaceDeclaration::cast) {
        chain.push(parse_qualified_name(&namespace.name()?)?);
    }

    let mut outermost_first = chain.into_iter().rev();
    let first = outermost_first.next()?;
    Some(outermost_first.fold(first, |acc, inner| acc.join(&inner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::ast::ClassDeclaration;
    use crate::cst::parse;

    fn fragment_as_name(fragment: GreenNode) -> Option<Name> {
        Name::cast(SyntaxNode::new_root(fragment))
    }

    fn q(dotted: &str) -> QualifiedName {
        QualifiedName::from_dotted(dotted).unwrap()
    }

    #[test]
    fn rejects_empty_names() {
        assert!(QualifiedName::from_dotted("").is_none());
        assert!(QualifiedName::from_dotted("A..B").is_none());
        assert!(QualifiedName::new(Vec::<String>::new()).is_none());
    }

    #[test]
    fn display_and_parse_agree() {
        let name = q("System.Net.Http");
        assert_eq!(name.to_string(), "System.Net.Http");
        assert_eq!("System.Net.Http".parse::<QualifiedName>().unwrap(), name);
        assert_eq!(name.segments(), ["System", "Net", "Http"]);
        assert_eq!(name.last(), "Http");
    }

    #[test]
    fn prefixes_grow_left_to_right() {
        let prefixes: Vec<String> = q("A.B.C").prefixes().map(|p| p.to_string()).collect();
        assert_eq!(prefixes, ["A", "A.B", "A.B.C"]);
    }

    #[test]
    fn synthesized_fragment_reads_back() {
        for dotted in ["System", "System.Net", "A.B.C.D.E.F", "Company.Product.Web.Controllers"] {
            let name = q(dotted);
            let fragment = synthesize_import_fragment(&name);
            let parsed = fragment_as_name(fragment).and_then(|n| parse_qualified_name(&n));
            assert_eq!(parsed, Some(name));
        }
    }

    #[test]
    fn synthesized_fragment_matches_parser_shape() {
        let name = q("A.B.C");
        let synthesized = SyntaxNode::new_root(synthesize_import_fragment(&name));

        let parsed = parse("using A.B.C;").syntax();
        let from_parser = parsed
            .descendants()
            .find(|n| n.kind() == SyntaxKind::QualifiedName)
            .unwrap();

        assert_eq!(synthesized.text().to_string(), "A.B.C");
        let kinds = |n: &SyntaxNode| n.descendants().map(|d| d.kind()).collect::<Vec<_>>();
        assert_eq!(kinds(&synthesized), kinds(&from_parser));
    }

    #[test]
    fn deep_names_do_not_recurse() {
        let segments: Vec<String> = (0..1_000).map(|i| format!("N{i}")).collect();
        let name = QualifiedName::new(segments).unwrap();
        let parsed = fragment_as_name(synthesize_import_fragment(&name))
            .and_then(|n| parse_qualified_name(&n));
        assert_eq!(parsed.map(|p| p.len()), Some(1_000));
    }

    #[test]
    fn single_segment_is_identifier_name() {
        let fragment = synthesize_import_fragment(&q("System"));
        assert_eq!(
            SyntaxNode::new_root(fragment).kind(),
            SyntaxKind::IdentifierName
        );
    }

    #[test]
    fn import_directive_text() {
        let directive = synthesize_import_directive(&q("Foo.Bar"), "import");
        assert_eq!(
            SyntaxNode::new_root(directive).text().to_string(),
            "import Foo.Bar;"
        );
        let directive = synthesize_import_directive(&q("Foo"), "using");
        assert_eq!(SyntaxNode::new_root(directive).text().to_string(), "using Foo;");
    }

    #[test]
    fn collects_only_top_level_namespace_imports() {
        let source = "using System;\nusing System.Net;\nusing static System.Math;\nusing Json = Newtonsoft.Json;\nnamespace App { using Hidden; }\n";
        let unit = CompilationUnit::cast(parse(source).syntax()).unwrap();

        let imported: Vec<String> = collect_imported_namespaces(&unit)
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(imported, ["System", "System.Net"]);
    }

    #[test]
    fn enclosing_namespace_joins_nested_blocks() {
        let source = "namespace Company.Web { namespace Controllers { class A { } } }\nclass Global { }";
        let root = parse(source).syntax();
        let classes: Vec<ClassDeclaration> =
            root.descendants().filter_map(ClassDeclaration::cast).collect();

        assert_eq!(
            enclosing_namespace(classes[0].syntax()),
            Some(q("Company.Web.Controllers"))
        );
        assert_eq!(enclosing_namespace(classes[1].syntax()), None);
    }

    #[test]
    fn enclosing_namespace_file_scoped() {
        let source = "using System;\nnamespace Company.Web;\n\npublic class _BaseController : Controller { }\n";
        let root = parse(source).syntax();
        let class = root.descendants().find_map(ClassDeclaration::cast).unwrap();
        assert_eq!(enclosing_namespace(class.syntax()), Some(q("Company.Web")));
    }

    #[test]
    fn serializes_as_dotted_string() {
        let json = serde_json::to_string(&q("A.B")).unwrap();
        assert_eq!(json, "\"A.B\"");
        let back: QualifiedName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q("A.B"));
        assert!(serde_json::from_str::<QualifiedName>("\"\"").is_err());
    }
}
