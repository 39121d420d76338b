//! Typed AST layer over the CST
//!
//! Thin, zero-cost wrappers over [`SyntaxNode`]s. Each wrapper implements
//! [`AstNode::cast`] to safely convert from a raw node.
//!
//! # Example
//!
//! ```rust
//! use heritage_core::cst::{parse, ast::{AstNode, CompilationUnit}};
//!
//! let unit = CompilationUnit::cast(parse("class Foo : Bar { }").syntax()).unwrap();
//! let class = unit.class_declarations().next().unwrap();
//!
//! assert_eq!(class.name().as_deref(), Some("Foo"));
//! assert_eq!(class.parent_name().as_deref(), Some("Bar"));
//! ```

use super::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// Find first child node of a specific kind
fn child_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Find first direct token of a specific kind
fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

// ============================================================================
// Compilation unit
// ============================================================================

ast_node!(
    /// Root of a parsed file
    CompilationUnit,
    CompilationUnit
);

impl CompilationUnit {
    /// Import directives that are direct children of the root
    pub fn imports(&self) -> impl Iterator<Item = ImportDirective> {
        self.syntax.children().filter_map(ImportDirective::cast)
    }

    /// Top-level namespace declarations
    pub fn namespaces(&self) -> impl Iterator<Item = NamespaceDeclaration> {
        self.syntax.children().filter_map(NamespaceDeclaration::cast)
    }

    /// Every class declaration in the file, in source order, including nested ones
    pub fn class_declarations(&self) -> impl Iterator<Item = ClassDeclaration> {
        self.syntax.descendants().filter_map(ClassDeclaration::cast)
    }
}

// ============================================================================
// Imports and namespaces
// ============================================================================

ast_node!(
    /// `using A.B;`, `using static A.B;`, `using X = A.B;` or `import A.B;`
    ImportDirective,
    ImportDirective
);

impl ImportDirective {
    /// The `using` / `import` keyword
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::UsingKw | SyntaxKind::ImportKw))
    }

    /// `using static ...`
    pub fn is_static(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::ModifierKw).is_some_and(|t| t.text() == "static")
    }

    /// `using Alias = ...`
    pub fn is_alias(&self) -> bool {
        child_of_kind(&self.syntax, SyntaxKind::NameEquals).is_some()
    }

    /// The imported name (not the alias)
    pub fn name(&self) -> Option<Name> {
        self.syntax.children().find_map(Name::cast)
    }
}

ast_node!(
    /// `namespace A.B { ... }` or file-scoped `namespace A.B;`
    NamespaceDeclaration,
    NamespaceDeclaration
);

impl NamespaceDeclaration {
    pub fn name(&self) -> Option<Name> {
        self.syntax.children().find_map(Name::cast)
    }

    pub fn is_file_scoped(&self) -> bool {
        token_of_kind(&self.syntax, SyntaxKind::LBrace).is_none()
            && token_of_kind(&self.syntax, SyntaxKind::Semicolon).is_some()
    }
}

// ============================================================================
// Class declaration
// ============================================================================

ast_node!(
    /// `[attrs] modifiers class Name<T>(params) : Base, IFace where ... { }`
    ClassDeclaration,
    ClassDeclaration
);

impl ClassDeclaration {
    /// The class name token
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    /// The class name
    pub fn name(&self) -> Option<String> {
        self.identifier().map(|t| t.text().to_string())
    }

    pub fn type_parameter_list(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::TypeParameterList)
    }

    /// Primary constructor parameters
    pub fn parameter_list(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::ParameterList)
    }

    pub fn base_list(&self) -> Option<BaseTypeList> {
        child_of_kind(&self.syntax, SyntaxKind::BaseTypeList).and_then(BaseTypeList::cast)
    }

    /// First base type reference, conventionally the parent class
    pub fn parent(&self) -> Option<SimpleBaseType> {
        self.base_list()?.types().next()
    }

    /// Name of the parent class when it is a simple (unqualified) name
    pub fn parent_name(&self) -> Option<String> {
        self.parent()?.ty()?.simple_identifier()
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::DeclarationList)
    }
}

ast_node!(
    /// `: Base, IFace<T>, Other(args)`
    BaseTypeList,
    BaseTypeList
);

impl BaseTypeList {
    pub fn colon_token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Colon)
    }

    /// Type references in order; entries that are not types are skipped
    pub fn types(&self) -> impl Iterator<Item = SimpleBaseType> {
        self.syntax.children().filter_map(SimpleBaseType::cast)
    }

    /// All entries in order, including unparsable ones
    pub fn entries(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| matches!(n.kind(), SyntaxKind::SimpleBaseType | SyntaxKind::Error))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

ast_node!(
    /// One type reference inside a base type list
    SimpleBaseType,
    SimpleBaseType
);

impl SimpleBaseType {
    pub fn ty(&self) -> Option<Name> {
        self.syntax.children().find_map(Name::cast)
    }
}

// ============================================================================
// Names
// ============================================================================

ast_node!(
    /// Plain identifier: `Controller`
    IdentifierName,
    IdentifierName
);

impl IdentifierName {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn text(&self) -> Option<String> {
        self.identifier().map(|t| t.text().to_string())
    }
}

ast_node!(
    /// Identifier with type arguments: `Controller<TModel>`
    GenericName,
    GenericName
);

impl GenericName {
    pub fn identifier(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::Ident)
    }

    pub fn text(&self) -> Option<String> {
        self.identifier().map(|t| t.text().to_string())
    }

    pub fn type_arguments(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::TypeArgumentList)
    }
}

ast_node!(
    /// Dotted name, left-deep: `A.B.C` is `QualifiedName(QualifiedName(A, B), C)`
    QualifiedName,
    QualifiedName
);

impl QualifiedName {
    /// Everything left of the last dot
    pub fn left(&self) -> Option<Name> {
        self.syntax.first_child().and_then(Name::cast)
    }

    /// The last segment
    pub fn right(&self) -> Option<Name> {
        let last = self.syntax.last_child()?;
        if self.syntax.first_child().as_ref() == Some(&last) {
            return None;
        }
        Name::cast(last)
    }
}

/// Any name shape that can appear in a type or namespace position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    Identifier(IdentifierName),
    Generic(GenericName),
    Qualified(QualifiedName),
}

impl Name {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::IdentifierName => IdentifierName::cast(node).map(Name::Identifier),
            SyntaxKind::GenericName => GenericName::cast(node).map(Name::Generic),
            SyntaxKind::QualifiedName => QualifiedName::cast(node).map(Name::Qualified),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Name::Identifier(n) => n.syntax(),
            Name::Generic(n) => n.syntax(),
            Name::Qualified(n) => n.syntax(),
        }
    }

    /// Identifier of a simple (unqualified) name; `None` for qualified names
    pub fn simple_identifier(&self) -> Option<String> {
        match self {
            Name::Identifier(n) => n.text(),
            Name::Generic(n) => n.text(),
            Name::Qualified(_) => None,
        }
    }
}
