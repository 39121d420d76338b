//! Syntax kind enumeration for the CST
//!
//! Every node and token in a heritage syntax tree carries one of these kinds.
//! Values are contiguous from zero so that `SyntaxKind::ALL[raw]` maps a raw
//! rowan kind back to the enum.

use std::fmt;

/// Syntax kind for tokens and nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // ==================
    // Trivia
    // ==================
    /// Spaces and tabs
    Whitespace = 0,
    /// `\n` or `\r\n`
    Newline,
    /// `// ...`
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// `#region`, `#if DEBUG`, ... up to the end of the line
    PreprocessorDirective,

    // ==================
    // Keywords
    // ==================
    /// `using`
    UsingKw,
    /// `import`
    ImportKw,
    /// `namespace`
    NamespaceKw,
    /// `class`
    ClassKw,
    /// `interface`
    InterfaceKw,
    /// `struct`
    StructKw,
    /// `record`
    RecordKw,
    /// `enum`
    EnumKw,
    /// `where` (constraint clauses)
    WhereKw,
    /// Declaration modifiers (`public`, `static`, `partial`, ...)
    ModifierKw,

    // ==================
    // Punctuation
    // ==================
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Semicolon,
    Comma,
    Dot,
    Colon,
    ColonColon,
    Eq,
    Arrow,
    /// Any other operator character
    Punct,

    // ==================
    // Literals & identifiers
    // ==================
    Ident,
    StringLit,
    CharLit,
    NumberLit,

    // ==================
    // Nodes
    // ==================
    CompilationUnit,
    ImportDirective,
    /// `Alias =` part of an aliasing import directive
    NameEquals,
    NamespaceDeclaration,
    ClassDeclaration,
    InterfaceDeclaration,
    StructDeclaration,
    RecordDeclaration,
    EnumDeclaration,
    TypeParameterList,
    ParameterList,
    BaseTypeList,
    SimpleBaseType,
    ArgumentList,
    QualifiedName,
    IdentifierName,
    GenericName,
    TypeArgumentList,
    AttributeList,
    ConstraintClause,
    DeclarationList,
    MemberDeclaration,

    // ==================
    // Special
    // ==================
    /// Unrecognized token or node wrapping unparsable input
    Error,
    /// End of input (never stored in a tree)
    Eof,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Every kind, indexed by its `u16` value.
    pub const ALL: &'static [SyntaxKind] = &[
        Whitespace,
        Newline,
        LineComment,
        BlockComment,
        PreprocessorDirective,
        UsingKw,
        ImportKw,
        NamespaceKw,
        ClassKw,
        InterfaceKw,
        StructKw,
        RecordKw,
        EnumKw,
        WhereKw,
        ModifierKw,
        LBrace,
        RBrace,
        LParen,
        RParen,
        LBracket,
        RBracket,
        Lt,
        Gt,
        Semicolon,
        Comma,
        Dot,
        Colon,
        ColonColon,
        Eq,
        Arrow,
        Punct,
        Ident,
        StringLit,
        CharLit,
        NumberLit,
        CompilationUnit,
        ImportDirective,
        NameEquals,
        NamespaceDeclaration,
        ClassDeclaration,
        InterfaceDeclaration,
        StructDeclaration,
        RecordDeclaration,
        EnumDeclaration,
        TypeParameterList,
        ParameterList,
        BaseTypeList,
        SimpleBaseType,
        ArgumentList,
        QualifiedName,
        IdentifierName,
        GenericName,
        TypeArgumentList,
        AttributeList,
        ConstraintClause,
        DeclarationList,
        MemberDeclaration,
        Error,
        Eof,
    ];

    /// Check if this kind is trivia (whitespace, newline, comment, directive)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Whitespace | Newline | LineComment | BlockComment | PreprocessorDirective
        )
    }

    /// Check if this kind is an interior node kind
    pub fn is_node(self) -> bool {
        (self as u16) >= (CompilationUnit as u16) && self != Eof
    }

    /// Classify an identifier-shaped word
    pub fn from_keyword(word: &str) -> Option<SyntaxKind> {
        let kind = match word {
            "using" => UsingKw,
            "import" => ImportKw,
            "namespace" => NamespaceKw,
            "class" => ClassKw,
            "interface" => InterfaceKw,
            "struct" => StructKw,
            "record" => RecordKw,
            "enum" => EnumKw,
            "where" => WhereKw,
            "public" | "private" | "protected" | "internal" | "static" | "abstract" | "sealed"
            | "partial" | "unsafe" | "new" | "readonly" | "file" | "virtual" | "override"
            | "extern" | "async" | "const" | "volatile" | "required" => ModifierKw,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_table_matches_discriminants() {
        for (index, kind) in SyntaxKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index, "{kind:?} is out of place");
        }
        assert_eq!(SyntaxKind::ALL.last(), Some(&Eof));
    }

    #[test]
    fn keywords_are_classified() {
        assert_eq!(SyntaxKind::from_keyword("class"), Some(ClassKw));
        assert_eq!(SyntaxKind::from_keyword("sealed"), Some(ModifierKw));
        assert_eq!(SyntaxKind::from_keyword("Controller"), None);
        assert!(Whitespace.is_trivia());
        assert!(PreprocessorDirective.is_trivia());
        assert!(!Ident.is_trivia());
        assert!(ClassDeclaration.is_node());
        assert!(!Eof.is_node());
    }
}
