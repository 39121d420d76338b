//! Concrete Syntax Tree (CST) for C#-shaped source files
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST preserves all source information including whitespace, comments,
//! and formatting, so edits made by fixes leave the rest of the file intact.
//!
//! ## Architecture
//!
//! - **Green Tree**: immutable, position-independent storage. Cheap to clone
//!   and safe to share across threads.
//! - **Red Tree**: [`SyntaxNode`] views with parent pointers, created on demand
//!   for navigation.
//!
//! Edits never mutate a tree. [`replace_node`] produces a new root that shares
//! every untouched subtree with the old one.
//!
//! ## Example
//!
//! ```rust
//! use heritage_core::cst::{SyntaxKind, parse};
//!
//! let source = "class HomeController : Controller { } // done\n";
//! let tree = parse(source).syntax();
//!
//! assert_eq!(tree.text().to_string(), source);
//! assert!(tree.descendants().any(|n| n.kind() == SyntaxKind::BaseTypeList));
//! ```

mod edit;
mod language;
mod lexer;
mod parser;
mod syntax_kind;

pub mod ast;

pub use edit::{find_enclosing, replace_node};
pub use language::{CsLanguage, SyntaxElement, SyntaxNode, SyntaxToken};
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use parser::{Parse, ParseError, ParseErrorKind, parse};
pub use syntax_kind::SyntaxKind;
