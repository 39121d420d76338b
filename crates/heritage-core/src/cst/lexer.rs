//! CST-aware lexer that preserves all trivia
//!
//! Whitespace, newlines, comments and preprocessor directives are emitted as
//! tokens so the parser can place them in the tree, which keeps
//! `parse(source).text() == source`.

use std::ops::Range;

use super::SyntaxKind;

/// Byte range of a token in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: SyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// Unknown characters become `Error` tokens; the lexer never drops input.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let len = input.len();
    let mut i = 0usize;

    while let Some((current, size)) = next_char(input, i) {
        let start = i;

        let (kind, end) = match current {
            '\n' => (SyntaxKind::Newline, i + size),
            '\r' => match next_char(input, i + size) {
                Some(('\n', nl_size)) => (SyntaxKind::Newline, i + size + nl_size),
                _ => (SyntaxKind::Newline, i + size),
            },
            c if c.is_whitespace() => {
                let end = scan_while(input, i, |c| c.is_whitespace() && c != '\n' && c != '\r');
                (SyntaxKind::Whitespace, end)
            }
            '/' => match next_char(input, i + size) {
                Some(('/', _)) => (SyntaxKind::LineComment, scan_while(input, i, |c| c != '\n' && c != '\r')),
                Some(('*', star_size)) => {
                    let body = i + size + star_size;
                    match input[body..].find("*/") {
                        Some(rel) => (SyntaxKind::BlockComment, body + rel + 2),
                        None => {
                            errors.push(LexerError::new("Unterminated block comment", start..len));
                            (SyntaxKind::BlockComment, len)
                        }
                    }
                }
                _ => (SyntaxKind::Punct, i + size),
            },
            '#' if at_line_start(input, i) => (
                SyntaxKind::PreprocessorDirective,
                scan_while(input, i, |c| c != '\n' && c != '\r'),
            ),
            '"' => lex_string(input, i, size, &mut errors),
            '@' | '$' if matches!(next_char(input, i + size), Some(('"', _)) | Some(('@', _)) | Some(('$', _))) => {
                // Verbatim / interpolated strings: skip prefix characters, then the literal.
                let quote = scan_while(input, i, |c| c == '@' || c == '$');
                if matches!(next_char(input, quote), Some(('"', _))) {
                    let verbatim = input[i..quote].contains('@');
                    if verbatim {
                        lex_verbatim_string(input, quote, &mut errors)
                    } else {
                        lex_string(input, quote, 1, &mut errors)
                    }
                } else {
                    (SyntaxKind::Punct, i + size)
                }
            }
            '\'' => lex_char(input, i, size, &mut errors),
            '@' if next_char(input, i + size).is_some_and(|(c, _)| is_ident_start(c)) => {
                // Verbatim identifier such as `@class`
                (SyntaxKind::Ident, scan_while(input, i + size, is_ident_continue))
            }
            c if is_ident_start(c) => {
                let end = scan_while(input, i, is_ident_continue);
                let kind = SyntaxKind::from_keyword(&input[start..end]).unwrap_or(SyntaxKind::Ident);
                (kind, end)
            }
            c if c.is_ascii_digit() => (
                SyntaxKind::NumberLit,
                scan_while(input, i, |c| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
            ),
            '{' => (SyntaxKind::LBrace, i + size),
            '}' => (SyntaxKind::RBrace, i + size),
            '(' => (SyntaxKind::LParen, i + size),
            ')' => (SyntaxKind::RParen, i + size),
            '[' => (SyntaxKind::LBracket, i + size),
            ']' => (SyntaxKind::RBracket, i + size),
            '<' => (SyntaxKind::Lt, i + size),
            '>' => (SyntaxKind::Gt, i + size),
            ';' => (SyntaxKind::Semicolon, i + size),
            ',' => (SyntaxKind::Comma, i + size),
            '.' => (SyntaxKind::Dot, i + size),
            ':' => match next_char(input, i + size) {
                Some((':', colon_size)) => (SyntaxKind::ColonColon, i + size + colon_size),
                _ => (SyntaxKind::Colon, i + size),
            },
            '=' => match next_char(input, i + size) {
                Some(('>', gt_size)) => (SyntaxKind::Arrow, i + size + gt_size),
                Some(('=', eq_size)) => (SyntaxKind::Punct, i + size + eq_size),
                _ => (SyntaxKind::Eq, i + size),
            },
            c if c.is_ascii_punctuation() => (SyntaxKind::Punct, i + size),
            _ => {
                errors.push(LexerError::new(
                    format!("Unexpected character '{current}'"),
                    start..i + size,
                ));
                (SyntaxKind::Error, i + size)
            }
        };

        tokens.push(CstToken::new(kind, &input[start..end], start..end));
        i = end;
    }

    (tokens, errors)
}

fn lex_string(
    input: &str,
    quote: usize,
    quote_size: usize,
    errors: &mut Vec<LexerError>,
) -> (SyntaxKind, usize) {
    let mut end = quote + quote_size;
    while let Some((c, step)) = next_char(input, end) {
        match c {
            '\\' => {
                end += step;
                if let Some((_, escaped)) = next_char(input, end) {
                    end += escaped;
                }
            }
            '"' => return (SyntaxKind::StringLit, end + step),
            '\n' | '\r' => break,
            _ => end += step,
        }
    }
    errors.push(LexerError::new("Unterminated string literal", quote..end));
    (SyntaxKind::StringLit, end)
}

fn lex_verbatim_string(
    input: &str,
    quote: usize,
    errors: &mut Vec<LexerError>,
) -> (SyntaxKind, usize) {
    let mut end = quote + 1;
    while let Some((c, step)) = next_char(input, end) {
        end += step;
        if c == '"' {
            // `""` is an escaped quote inside verbatim strings
            if matches!(next_char(input, end), Some(('"', _))) {
                end += 1;
            } else {
                return (SyntaxKind::StringLit, end);
            }
        }
    }
    errors.push(LexerError::new("Unterminated verbatim string", quote..end));
    (SyntaxKind::StringLit, end)
}

fn lex_char(
    input: &str,
    quote: usize,
    quote_size: usize,
    errors: &mut Vec<LexerError>,
) -> (SyntaxKind, usize) {
    let mut end = quote + quote_size;
    while let Some((c, step)) = next_char(input, end) {
        match c {
            '\\' => {
                end += step;
                if let Some((_, escaped)) = next_char(input, end) {
                    end += escaped;
                }
            }
            '\'' => return (SyntaxKind::CharLit, end + step),
            '\n' | '\r' => break,
            _ => end += step,
        }
    }
    errors.push(LexerError::new("Unterminated character literal", quote..end));
    (SyntaxKind::CharLit, end)
}

/// Only whitespace precedes `pos` on its line
fn at_line_start(input: &str, pos: usize) -> bool {
    input[..pos]
        .chars()
        .rev()
        .take_while(|&c| c != '\n' && c != '\r')
        .all(char::is_whitespace)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Advance from `pos` while `pred` holds, returning the end offset
fn scan_while(input: &str, pos: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = pos;
    while let Some((c, step)) = next_char(input, end) {
        if !pred(c) {
            break;
        }
        end += step;
    }
    end
}

/// Get the next character at a byte position
fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input.get(pos..)?.chars().next().map(|c| (c, c.len_utf8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        lex_with_trivia(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_class_header_with_trivia() {
        assert_eq!(
            kinds("public class Foo : Bar"),
            vec![
                SyntaxKind::ModifierKw,
                SyntaxKind::Whitespace,
                SyntaxKind::ClassKw,
                SyntaxKind::Whitespace,
                SyntaxKind::Ident,
                SyntaxKind::Whitespace,
                SyntaxKind::Colon,
                SyntaxKind::Whitespace,
                SyntaxKind::Ident,
            ]
        );
    }

    #[test]
    fn tokens_cover_the_whole_input() {
        let source = "using System; // note\r\n/* block */ class _Base<T> { string s = @\"a\"\"b\"; char c = '\\''; }";
        let (tokens, errors) = lex_with_trivia(source);
        assert!(errors.is_empty(), "{errors:?}");
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::BlockComment));
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::StringLit && t.text == "@\"a\"\"b\""));
    }

    #[test]
    fn unterminated_comment_is_reported() {
        let (tokens, errors) = lex_with_trivia("class A /* open");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(SyntaxKind::BlockComment));
    }

    #[test]
    fn directives_run_to_end_of_line() {
        let (tokens, errors) = lex_with_trivia("#region Actions
    #if DEBUG // x
class A { }");
        assert!(errors.is_empty(), "{errors:?}");
        let directives: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == SyntaxKind::PreprocessorDirective)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(directives, ["#region Actions", "#if DEBUG // x"]);
        assert_eq!(tokens.last().map(|t| t.kind), Some(SyntaxKind::RBrace));
    }

    #[test]
    fn hash_inside_a_line_is_punctuation() {
        assert_eq!(
            kinds("a #b"),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::Whitespace,
                SyntaxKind::Punct,
                SyntaxKind::Ident,
            ]
        );
    }

    #[test]
    fn double_colon_and_arrow() {
        assert_eq!(
            kinds("global::X =>"),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::ColonColon,
                SyntaxKind::Ident,
                SyntaxKind::Whitespace,
                SyntaxKind::Arrow,
            ]
        );
    }
}
