//! Token values produced by scanning.

use std::sync::Arc;

/// Classification of a scanned span.
///
/// Tokens are created by the rule layer and only carried by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Token {
    /// No rule matched (or nothing was computed yet).
    #[default]
    Undefined,
    /// The scan range is exhausted.
    Eof,
    /// Whitespace.
    Whitespace,
    /// A content type / scope tag, e.g. `"string.quoted"`.
    Other(Arc<str>),
}

impl Token {
    /// Build a [`Token::Other`] from a content type tag.
    pub fn other(data: impl Into<Arc<str>>) -> Self {
        Self::Other(data.into())
    }

    /// Returns `true` for [`Token::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for [`Token::Eof`].
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` for [`Token::Whitespace`].
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// The content type tag of a [`Token::Other`].
    pub fn data(&self) -> Option<&str> {
        match self {
            Self::Other(data) => Some(data),
            _ => None,
        }
    }
}

/// A pre-computed token fragment waiting to be emitted without re-scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRuleToken {
    /// Token of the fragment.
    pub token: Token,
    /// Start offset (chars).
    pub offset: usize,
    /// Length (chars).
    pub len: usize,
}

impl SubRuleToken {
    /// Create a fragment covering `[offset, offset + len)`.
    pub fn new(token: Token, offset: usize, len: usize) -> Self {
        Self { token, offset, len }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}
