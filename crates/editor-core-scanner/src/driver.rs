//! Rule-driven tokenization on top of [`ScannerRange`](crate::ScannerRange).

use crate::document::Document;
use crate::error::ScannerError;
use crate::rules::{RuleRef, RuleScanner, evaluate_first};
use crate::token::Token;

/// A token with its position, in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    /// Start offset.
    pub offset: usize,
    /// Length.
    pub length: usize,
    /// Token covering the span.
    pub token: Token,
}

impl TokenSpan {
    /// Create a span covering `[offset, offset + length)`.
    pub fn new(offset: usize, length: usize, token: Token) -> Self {
        Self {
            offset,
            length,
            token,
        }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Produces tokens by trying an ordered list of rules at each position.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedScanner {
    rules: Vec<RuleRef>,
    default_token: Token,
}

impl RuleBasedScanner {
    /// Scanner trying `rules` in order. Unmatched chars are reported as
    /// [`Token::Undefined`].
    pub fn new(rules: Vec<RuleRef>) -> Self {
        Self {
            rules,
            default_token: Token::Undefined,
        }
    }

    /// Token reported for chars no rule matches.
    pub fn with_default_token(mut self, token: Token) -> Self {
        self.default_token = token;
        self
    }

    /// The rules, in priority order.
    pub fn rules(&self) -> &[RuleRef] {
        &self.rules
    }

    /// Token reported for chars no rule matches.
    pub fn default_token(&self) -> &Token {
        &self.default_token
    }

    /// Compute the next token.
    ///
    /// Sub-tokens offered by an earlier match are replayed first. Otherwise the rules are
    /// tried at the current offset; when none matches, one char is consumed as the default
    /// token. At the end of the range [`Token::Eof`] is returned and the offset stays put.
    /// A char inside the range that the document cannot serve is an
    /// [`ScannerError::Unreadable`] error rather than an early end of input.
    pub fn next_token(&self, scanner: &mut RuleScanner<'_>) -> Result<Token, ScannerError> {
        if scanner.next_offered_token() {
            return Ok(scanner.token());
        }

        scanner.start_next_token();
        if let Some(token) = evaluate_first(scanner, &self.rules, |_| {})? {
            if let Some(pending) = scanner.end_rule_match_from_stack() {
                tracing::debug!(
                    initial_mark = pending.initial_mark,
                    region = pending.rule.name(),
                    "dropping end-rule match with no enclosing region"
                );
                scanner.clear_end_rule_match_from_stack();
            }
            if scanner.next_offered_token() {
                return Ok(scanner.token());
            }
            scanner.set_token(token.clone());
            return Ok(token);
        }

        let here = scanner.mark();
        if scanner.read().is_none() {
            scanner.unread();
            if here < scanner.range_end() {
                return Err(ScannerError::Unreadable { offset: here });
            }
            scanner.set_token(Token::Eof);
            return Ok(Token::Eof);
        }
        scanner.set_token(self.default_token.clone());
        Ok(self.default_token.clone())
    }

    /// Tokenize the rest of the scanner's range.
    ///
    /// Empty spans are dropped and adjacent spans with equal tokens are merged.
    pub fn tokenize(&self, scanner: &mut RuleScanner<'_>) -> Result<Vec<TokenSpan>, ScannerError> {
        let mut spans: Vec<TokenSpan> = Vec::new();
        loop {
            let token = self.next_token(scanner)?;
            if token.is_eof() {
                break;
            }

            let offset = scanner.token_offset();
            let length = scanner.token_length();
            if length == 0 {
                continue;
            }

            if let Some(last) = spans.last_mut()
                && last.token == token
                && last.end() == offset
            {
                last.length += length;
                continue;
            }
            spans.push(TokenSpan::new(offset, length, token));
        }
        Ok(spans)
    }
}

/// Tokenize a whole document with `scanner`.
pub fn scan_document(
    document: &dyn Document,
    scanner: &RuleBasedScanner,
) -> Result<Vec<TokenSpan>, ScannerError> {
    let mut range = RuleScanner::new(document, 0, document.len())?;
    let spans = scanner.tokenize(&mut range)?;
    tracing::debug!(
        document_length = document.len(),
        spans = spans.len(),
        "document scanned"
    );
    Ok(spans)
}
