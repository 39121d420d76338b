//! Hierarchical parser for C#-shaped compilation units
//!
//! Builds a lossless rowan tree with proper nodes for import directives,
//! namespaces and type declarations. Member bodies are not interpreted: they
//! are kept as opaque `MemberDeclaration` nodes. The parser never fails;
//! unexpected input is wrapped in `Error` nodes so that
//! `parse(source).text() == source` holds for every input.

use rowan::{GreenNode, GreenNodeBuilder};

use super::lexer::{CstToken, LexerError, lex_with_trivia};
use super::{SyntaxKind, SyntaxNode};

/// Kind of problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Lexer-level problem (unterminated literal, unknown character)
    Lexical,
    /// A required token was not found
    Expected(SyntaxKind),
    /// Input that does not fit the grammar
    Unexpected(SyntaxKind),
}

/// A recoverable parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub offset: usize,
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        Self {
            kind: ParseErrorKind::Lexical,
            message: err.message,
            offset: err.span.start,
        }
    }
}

/// Result of parsing one source text
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// The immutable green tree (cheap to clone, `Send + Sync`)
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Build a red tree for navigation
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_green(self) -> GreenNode {
        self.green
    }
}

/// Parse source text into a `CompilationUnit` tree
///
/// # Example
///
/// ```rust
/// use heritage_core::cst::parse;
///
/// let source = "using System;\nclass Foo : Bar { }\n";
/// let parse = parse(source);
/// assert_eq!(parse.syntax().text().to_string(), source);
/// ```
pub fn parse(source: &str) -> Parse {
    let (tokens, lex_errors) = lex_with_trivia(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_compilation_unit();

    let mut errors: Vec<ParseError> = lex_errors.into_iter().map(ParseError::from).collect();
    errors.extend(parser.errors);
    errors.sort_by_key(|e| e.offset);

    Parse {
        green: parser.builder.finish(),
        errors,
    }
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn parse_compilation_unit(&mut self) {
        self.builder.start_node(SyntaxKind::CompilationUnit.into());
        self.parse_members(false);
        debug_assert!(self.at_end());
        self.builder.finish_node();
    }

    /// Parse declarations until end of input, or until `}` when inside a block
    fn parse_members(&mut self, in_block: bool) {
        loop {
            self.bump_trivia();
            match self.current_kind() {
                SyntaxKind::Eof => break,
                SyntaxKind::RBrace if in_block => break,
                SyntaxKind::RBrace => {
                    self.error_here(ParseErrorKind::Unexpected(SyntaxKind::RBrace), "Unmatched '}'");
                    self.builder.start_node(SyntaxKind::Error.into());
                    self.bump();
                    self.builder.finish_node();
                }
                _ if self.at_import_directive() => self.parse_import_directive(),
                SyntaxKind::NamespaceKw => self.parse_namespace(),
                _ => self.parse_declaration(),
            }
        }
    }

    fn at_import_directive(&self) -> bool {
        match self.current_kind() {
            SyntaxKind::UsingKw => !matches!(self.nth_significant(1), SyntaxKind::LParen),
            SyntaxKind::ImportKw => true,
            SyntaxKind::Ident if self.current_text() == "global" => {
                self.nth_significant(1) == SyntaxKind::UsingKw
            }
            _ => false,
        }
    }

    /// `[global] using [static] [Alias =] Name;` or `import Name;`
    fn parse_import_directive(&mut self) {
        self.builder.start_node(SyntaxKind::ImportDirective.into());

        if self.at(SyntaxKind::Ident) {
            self.bump(); // global
            self.bump_trivia();
        }
        self.bump(); // using / import

        if self.peek_significant() == SyntaxKind::ModifierKw {
            self.bump_trivia();
            self.bump(); // static
        }

        if self.peek_significant() == SyntaxKind::Ident
            && self.nth_significant(1) == SyntaxKind::Eq
        {
            self.bump_trivia();
            self.builder.start_node(SyntaxKind::NameEquals.into());
            self.builder.start_node(SyntaxKind::IdentifierName.into());
            self.bump();
            self.builder.finish_node();
            self.bump_trivia();
            self.bump(); // =
            self.builder.finish_node();
        }

        if self.peek_significant() == SyntaxKind::Ident {
            self.bump_trivia();
            self.parse_name();
        } else {
            self.error_here(
                ParseErrorKind::Expected(SyntaxKind::Ident),
                "Expected a namespace name",
            );
        }

        self.expect(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    /// Block (`namespace A.B { ... }`) or file-scoped (`namespace A.B;`) namespace
    fn parse_namespace(&mut self) {
        self.builder.start_node(SyntaxKind::NamespaceDeclaration.into());
        self.bump(); // namespace

        if self.peek_significant() == SyntaxKind::Ident {
            self.bump_trivia();
            self.parse_name();
        } else {
            self.error_here(
                ParseErrorKind::Expected(SyntaxKind::Ident),
                "Expected a namespace name",
            );
        }

        match self.peek_significant() {
            SyntaxKind::LBrace => {
                self.bump_trivia();
                self.bump();
                self.parse_members(true);
                self.expect(SyntaxKind::RBrace);
                if self.peek_significant() == SyntaxKind::Semicolon {
                    self.bump_trivia();
                    self.bump();
                }
            }
            SyntaxKind::Semicolon => {
                self.bump_trivia();
                self.bump();
                self.parse_members(false);
            }
            _ => self.error_here(
                ParseErrorKind::Expected(SyntaxKind::LBrace),
                "Expected '{' or ';' after namespace name",
            ),
        }

        self.builder.finish_node();
    }

    /// Attributes and modifiers followed by a type declaration or an opaque member
    fn parse_declaration(&mut self) {
        let checkpoint = self.builder.checkpoint();
        let mut saw_prefix = false;

        loop {
            if saw_prefix && self.at_trivia() {
                self.bump_trivia();
            }
            match self.current_kind() {
                SyntaxKind::LBracket => {
                    self.parse_balanced_node(SyntaxKind::AttributeList, SyntaxKind::LBracket, SyntaxKind::RBracket);
                    saw_prefix = true;
                }
                SyntaxKind::ModifierKw => {
                    self.bump();
                    saw_prefix = true;
                }
                _ => break,
            }
        }

        let kind = match self.current_kind() {
            SyntaxKind::ClassKw => SyntaxKind::ClassDeclaration,
            SyntaxKind::InterfaceKw => SyntaxKind::InterfaceDeclaration,
            SyntaxKind::StructKw => SyntaxKind::StructDeclaration,
            SyntaxKind::RecordKw => SyntaxKind::RecordDeclaration,
            SyntaxKind::EnumKw => SyntaxKind::EnumDeclaration,
            _ => {
                self.builder.start_node_at(checkpoint, SyntaxKind::MemberDeclaration.into());
                self.parse_member_body();
                self.builder.finish_node();
                return;
            }
        };

        self.builder.start_node_at(checkpoint, kind.into());
        self.parse_type_declaration(kind);
        self.builder.finish_node();
    }

    /// `class Name<T>(params) : Base, IFace where T : new() { members }`
    fn parse_type_declaration(&mut self, kind: SyntaxKind) {
        self.bump(); // class / interface / struct / record / enum

        if kind == SyntaxKind::RecordDeclaration
            && matches!(self.peek_significant(), SyntaxKind::ClassKw | SyntaxKind::StructKw)
        {
            self.bump_trivia();
            self.bump();
        }

        if self.peek_significant() == SyntaxKind::Ident {
            self.bump_trivia();
            self.bump();
        } else {
            self.error_here(
                ParseErrorKind::Expected(SyntaxKind::Ident),
                "Expected a type name",
            );
        }

        if self.at(SyntaxKind::Lt) {
            self.parse_balanced_node(SyntaxKind::TypeParameterList, SyntaxKind::Lt, SyntaxKind::Gt);
        }

        if self.peek_significant() == SyntaxKind::LParen {
            self.bump_trivia();
            self.parse_balanced_node(SyntaxKind::ParameterList, SyntaxKind::LParen, SyntaxKind::RParen);
        }

        if self.peek_significant() == SyntaxKind::Colon {
            self.bump_trivia();
            self.parse_base_list();
        }

        while self.peek_significant() == SyntaxKind::WhereKw {
            self.bump_trivia();
            self.parse_constraint_clause();
        }

        match self.peek_significant() {
            SyntaxKind::LBrace => {
                self.bump_trivia();
                if kind == SyntaxKind::EnumDeclaration {
                    self.parse_balanced_node(SyntaxKind::DeclarationList, SyntaxKind::LBrace, SyntaxKind::RBrace);
                } else {
                    self.parse_declaration_list();
                }
                if self.peek_significant() == SyntaxKind::Semicolon {
                    self.bump_trivia();
                    self.bump();
                }
            }
            SyntaxKind::Semicolon => {
                self.bump_trivia();
                self.bump();
            }
            _ => self.error_here(
                ParseErrorKind::Expected(SyntaxKind::LBrace),
                "Expected a type body",
            ),
        }
    }

    /// `: Type, Type(args), ...`
    fn parse_base_list(&mut self) {
        self.builder.start_node(SyntaxKind::BaseTypeList.into());
        self.bump(); // :

        loop {
            match self.peek_significant() {
                SyntaxKind::Ident => {
                    self.bump_trivia();
                    self.builder.start_node(SyntaxKind::SimpleBaseType.into());
                    self.parse_name();
                    if self.at(SyntaxKind::LParen) {
                        self.parse_balanced_node(SyntaxKind::ArgumentList, SyntaxKind::LParen, SyntaxKind::RParen);
                    }
                    self.builder.finish_node();
                }
                SyntaxKind::Comma => {
                    self.error_here(
                        ParseErrorKind::Expected(SyntaxKind::Ident),
                        "Empty entry in base type list",
                    );
                }
                kind if Self::ends_base_list(kind) => break,
                _ => self.parse_base_list_error_entry(),
            }

            if self.peek_significant() == SyntaxKind::Comma {
                self.bump_trivia();
                self.bump();
            } else {
                break;
            }
        }

        self.builder.finish_node();
    }

    fn ends_base_list(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::LBrace
                | SyntaxKind::RBrace
                | SyntaxKind::WhereKw
                | SyntaxKind::Semicolon
                | SyntaxKind::Eof
        )
    }

    /// A base list entry that is not a type reference
    fn parse_base_list_error_entry(&mut self) {
        self.bump_trivia();
        self.error_here(
            ParseErrorKind::Unexpected(self.current_kind()),
            "Expected a type in base type list",
        );
        self.builder.start_node(SyntaxKind::Error.into());
        loop {
            self.bump();
            let next = self.peek_significant();
            if next == SyntaxKind::Comma || Self::ends_base_list(next) {
                break;
            }
            self.bump_trivia();
        }
        self.builder.finish_node();
    }

    /// `where T : class, new()`
    fn parse_constraint_clause(&mut self) {
        self.builder.start_node(SyntaxKind::ConstraintClause.into());
        self.bump(); // where
        while !matches!(
            self.peek_significant(),
            SyntaxKind::LBrace
                | SyntaxKind::RBrace
                | SyntaxKind::Semicolon
                | SyntaxKind::WhereKw
                | SyntaxKind::Eof
        ) {
            self.bump_trivia();
            self.bump();
        }
        self.builder.finish_node();
    }

    /// `{ members }` of a class, struct, interface or record
    fn parse_declaration_list(&mut self) {
        self.builder.start_node(SyntaxKind::DeclarationList.into());
        self.bump(); // {
        self.parse_members(true);
        self.expect(SyntaxKind::RBrace);
        self.builder.finish_node();
    }

    /// Consume an opaque member: up to `;` or the end of a `{ }` body
    fn parse_member_body(&mut self) {
        loop {
            match self.current_kind() {
                SyntaxKind::Eof | SyntaxKind::RBrace => break,
                SyntaxKind::Semicolon => {
                    self.bump();
                    break;
                }
                SyntaxKind::LBrace => {
                    self.bump_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace);
                    // `int X { get; } = 1;` and `=> expr;` continue after the body
                    if !matches!(
                        self.peek_significant(),
                        SyntaxKind::Eq | SyntaxKind::Arrow | SyntaxKind::Semicolon
                    ) {
                        break;
                    }
                }
                SyntaxKind::LParen => self.bump_balanced(SyntaxKind::LParen, SyntaxKind::RParen),
                SyntaxKind::LBracket => self.bump_balanced(SyntaxKind::LBracket, SyntaxKind::RBracket),
                _ => self.bump(),
            }
        }
    }

    /// Possibly qualified, possibly generic name, built left-deep:
    /// `A.B.C` becomes `QualifiedName(QualifiedName(A, B), C)`.
    fn parse_name(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_simple_name();

        while self.peek_significant() == SyntaxKind::Dot
            && self.nth_significant(1) == SyntaxKind::Ident
        {
            self.builder.start_node_at(checkpoint, SyntaxKind::QualifiedName.into());
            self.bump_trivia();
            self.bump(); // .
            self.bump_trivia();
            self.parse_simple_name();
            self.builder.finish_node();
        }
    }

    fn parse_simple_name(&mut self) {
        let generic = self.tokens.get(self.pos + 1).map(|t| t.kind) == Some(SyntaxKind::Lt);
        let kind = if generic {
            SyntaxKind::GenericName
        } else {
            SyntaxKind::IdentifierName
        };

        self.builder.start_node(kind.into());
        self.bump(); // identifier
        if generic {
            self.parse_balanced_node(SyntaxKind::TypeArgumentList, SyntaxKind::Lt, SyntaxKind::Gt);
        }
        self.builder.finish_node();
    }

    /// Wrap a balanced `open ... close` run of tokens in a node
    fn parse_balanced_node(&mut self, kind: SyntaxKind, open: SyntaxKind, close: SyntaxKind) {
        self.builder.start_node(kind.into());
        self.bump_balanced(open, close);
        self.builder.finish_node();
    }

    /// Consume tokens from `open` through its matching `close`
    fn bump_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        let angle = open == SyntaxKind::Lt;
        let mut depth = 0usize;

        loop {
            let kind = self.current_kind();
            if kind == SyntaxKind::Eof {
                self.error_here(ParseErrorKind::Expected(close), "Unbalanced delimiters");
                break;
            }
            // Generic argument lists never span a body or a statement end
            if angle && depth > 0 && matches!(kind, SyntaxKind::LBrace | SyntaxKind::Semicolon) {
                self.error_here(ParseErrorKind::Expected(close), "Unclosed type argument list");
                break;
            }
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
            }
            self.bump();
            if depth == 0 {
                break;
            }
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current_kind(&self) -> SyntaxKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn current_text(&self) -> &str {
        self.tokens.get(self.pos).map(|t| t.text.as_str()).unwrap_or("")
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_trivia(&self) -> bool {
        self.current_kind().is_trivia()
    }

    /// Kind of the `n`-th non-trivia token from the cursor
    fn nth_significant(&self, n: usize) -> SyntaxKind {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn peek_significant(&self) -> SyntaxKind {
        self.nth_significant(0)
    }

    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), &token.text);
            self.pos += 1;
        }
    }

    fn bump_trivia(&mut self) {
        while self.at_trivia() {
            self.bump();
        }
    }

    fn expect(&mut self, kind: SyntaxKind) {
        if self.peek_significant() == kind {
            self.bump_trivia();
            self.bump();
        } else {
            self.error_here(ParseErrorKind::Expected(kind), format!("Expected {kind}"));
        }
    }

    fn error_here(&mut self, kind: ParseErrorKind, message: impl Into<String>) {
        let offset = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.span.start)
            .unwrap_or(0);
        self.errors.push(ParseError {
            kind,
            message: message.into(),
            offset,
        });
    }
}
