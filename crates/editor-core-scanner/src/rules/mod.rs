//! A small rule layer driven by [`RuleBasedScanner`](crate::RuleBasedScanner).
//!
//! Rules match regexes against the current line (as UTF-8 bytes, via the scanner helper),
//! anchored at the scan position. The whole line is the haystack, so assertions such as
//! `\b` see the text before the mark. Region rules nest through the scanner's begin/end
//! rule stack and emit their delimiters and interior as sub-tokens.

mod embedded;
mod pattern;
mod region;

pub use embedded::EmbeddedRule;
pub use pattern::PatternRule;
pub use region::{BeginEndRule, Region};

use crate::error::ScannerError;
use crate::helper::Utf8Line;
use crate::scanner::ScannerRange;
use crate::token::{SubRuleToken, Token};
use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input};
use std::fmt;
use std::sync::Arc;

/// Scanner type seen by rules: region rules are stacked as shared [`Region`]s.
pub type RuleScanner<'doc> = ScannerRange<'doc, Arc<Region>>;

/// Shared handle to a rule.
pub type RuleRef = Arc<dyn Rule + Send + Sync>;

/// A scanning rule.
pub trait Rule: fmt::Debug {
    /// Whether the rule can match at the current offset. Must not move the mark.
    fn starts_at(&self, scanner: &mut RuleScanner<'_>) -> bool;

    /// Try to match at the current offset.
    ///
    /// On success the mark is past the matched text (at least one char) and the returned
    /// token is not [`Token::Undefined`]; the rule may also have offered sub-tokens covering
    /// the match. On failure returns [`Token::Undefined`] with the mark unchanged.
    fn evaluate(&self, scanner: &mut RuleScanner<'_>) -> Result<Token, ScannerError>;
}

/// A regex that only matches at the scan position.
#[derive(Debug, Clone)]
pub(crate) struct AnchoredPattern {
    source: String,
    regex: Regex,
}

impl AnchoredPattern {
    pub(crate) fn new(pattern: &str) -> Result<Self, ScannerError> {
        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(pattern)?,
        })
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// Length in chars of the match starting at the mark, if it fits in the range.
    pub(crate) fn match_at(&self, scanner: &mut RuleScanner<'_>) -> Option<usize> {
        let offset = scanner.mark();
        let range_end = scanner.range_end();
        if offset > range_end {
            return None;
        }

        let (line, byte_start) = scanner.line_bytes_at(offset).ok()?;
        let haystack = &line.text.bytes;
        let input = Input::new(haystack)
            .range(byte_start..)
            .anchored(Anchored::Yes);
        let found = self.regex.search(&input)?;

        let len = Utf8Line::count_chars(&haystack[byte_start..found.end()]);
        (offset + len <= range_end).then_some(len)
    }
}

/// Queue `[offset, offset + len)` as a sub-token unless it is empty.
pub(crate) fn offer_span(scanner: &mut RuleScanner<'_>, token: &Token, offset: usize, len: usize) {
    if len > 0 {
        scanner.offer_sub_token(SubRuleToken::new(token.clone(), offset, len));
    }
}

/// Try `rules` in order at the mark; the first success is returned along with whether it
/// offered its own sub-tokens. `before_match` runs once a rule reports it can start here,
/// before it is evaluated.
pub(crate) fn evaluate_first(
    scanner: &mut RuleScanner<'_>,
    rules: &[RuleRef],
    mut before_match: impl FnMut(&mut RuleScanner<'_>),
) -> Result<Option<Token>, ScannerError> {
    let here = scanner.mark();
    for rule in rules {
        if !rule.starts_at(scanner) {
            continue;
        }
        before_match(scanner);

        let queued = scanner.pending_sub_tokens();
        let token = rule.evaluate(scanner)?;
        if token.is_undefined() || scanner.mark() <= here {
            scanner.set_mark(here);
            continue;
        }
        if scanner.pending_sub_tokens() == queued {
            let end = scanner.mark();
            offer_span(scanner, &token, here, end - here);
        }
        return Ok(Some(token));
    }
    Ok(None)
}
