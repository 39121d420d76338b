//! Rowan language implementation
//!
//! Connects [`SyntaxKind`] to Rowan's generic CST infrastructure.

use rowan::Language;

use super::SyntaxKind;

/// Zero-sized marker tying heritage syntax kinds to Rowan's tree types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CsLanguage;

impl Language for CsLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SyntaxKind::ALL
            .get(raw.0 as usize)
            .copied()
            .unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// A node in the concrete syntax tree
pub type SyntaxNode = rowan::SyntaxNode<CsLanguage>;
/// A token (including trivia) in the concrete syntax tree
pub type SyntaxToken = rowan::SyntaxToken<CsLanguage>;
/// Either a node or a token
pub type SyntaxElement = rowan::SyntaxElement<CsLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        let kinds = [
            SyntaxKind::Whitespace,
            SyntaxKind::ClassKw,
            SyntaxKind::Ident,
            SyntaxKind::Colon,
            SyntaxKind::ClassDeclaration,
            SyntaxKind::BaseTypeList,
        ];

        for &kind in &kinds {
            let raw = CsLanguage::kind_to_raw(kind);
            let back = CsLanguage::kind_from_raw(raw);
            assert_eq!(kind, back, "Roundtrip failed for {kind:?}");
        }
    }

    #[test]
    fn unknown_raw_kind_maps_to_error() {
        assert_eq!(
            CsLanguage::kind_from_raw(rowan::SyntaxKind(u16::MAX)),
            SyntaxKind::Error
        );
    }
}
