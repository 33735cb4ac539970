use super::{AnchoredPattern, Rule, RuleScanner};
use crate::error::ScannerError;
use crate::token::Token;

/// Single-token rule: a regex matched at the scan position.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: AnchoredPattern,
    token: Token,
}

impl PatternRule {
    /// Compile `pattern`; a match is reported as `token`.
    pub fn new(pattern: &str, token: Token) -> Result<Self, ScannerError> {
        Ok(Self {
            pattern: AnchoredPattern::new(pattern)?,
            token,
        })
    }

    /// The pattern source.
    pub fn pattern(&self) -> &str {
        self.pattern.source()
    }

    /// The token reported on a match.
    pub fn token(&self) -> &Token {
        &self.token
    }

    fn match_len(&self, scanner: &mut RuleScanner<'_>) -> Option<usize> {
        self.pattern.match_at(scanner).filter(|len| *len > 0)
    }
}

impl Rule for PatternRule {
    fn starts_at(&self, scanner: &mut RuleScanner<'_>) -> bool {
        self.match_len(scanner).is_some()
    }

    fn evaluate(&self, scanner: &mut RuleScanner<'_>) -> Result<Token, ScannerError> {
        let Some(len) = self.match_len(scanner) else {
            return Ok(Token::Undefined);
        };

        let end = scanner.mark() + len;
        scanner.set_mark(end);
        scanner.set_last_match_offset(end);
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{RuleBasedScanner, TokenSpan, scan_document};
    use crate::rules::RuleRef;
    use editor_core_document::TextDocument;
    use std::sync::Arc;

    #[test]
    fn test_pattern_matches_only_at_mark() {
        let doc = TextDocument::from_text("let answer = 42;");
        let mut scanner = RuleScanner::new(&doc, 0, doc.char_count()).unwrap();
        let number = PatternRule::new(r"[0-9]+", Token::other("number")).unwrap();

        assert!(!number.starts_at(&mut scanner));
        assert_eq!(number.evaluate(&mut scanner).unwrap(), Token::Undefined);
        assert_eq!(scanner.mark(), 0);

        scanner.set_mark(13);
        assert!(number.starts_at(&mut scanner));
        assert_eq!(number.evaluate(&mut scanner).unwrap(), Token::other("number"));
        assert_eq!(scanner.mark(), 15);
        assert_eq!(scanner.last_match_offset(), 15);
    }

    #[test]
    fn test_pattern_respects_range_end() {
        let doc = TextDocument::from_text("12345");
        let mut scanner = RuleScanner::new(&doc, 0, 3).unwrap();
        let number = PatternRule::new(r"[0-9]+", Token::other("number")).unwrap();

        // The greedy match runs past the range end, so it is rejected.
        assert_eq!(number.evaluate(&mut scanner).unwrap(), Token::Undefined);

        let short = PatternRule::new(r"[0-9]{2}", Token::other("number")).unwrap();
        assert_eq!(short.evaluate(&mut scanner).unwrap(), Token::other("number"));
        assert_eq!(scanner.mark(), 2);
    }

    #[test]
    fn test_pattern_counts_chars_not_bytes() {
        let doc = TextDocument::from_text("x = \"你好\" ;");
        let mut scanner = RuleScanner::new(&doc, 0, doc.char_count()).unwrap();
        let string = PatternRule::new(r#""[^"]*""#, Token::other("string")).unwrap();

        scanner.set_mark(4);
        assert_eq!(string.evaluate(&mut scanner).unwrap(), Token::other("string"));
        assert_eq!(scanner.mark(), 8);
    }

    #[test]
    fn test_zero_width_match_never_succeeds() {
        let doc = TextDocument::from_text("abc");
        let mut scanner = RuleScanner::new(&doc, 0, 3).unwrap();
        let empty = PatternRule::new(r"x*", Token::other("x")).unwrap();

        assert!(!empty.starts_at(&mut scanner));
        assert_eq!(empty.evaluate(&mut scanner).unwrap(), Token::Undefined);
    }

    #[test]
    fn test_word_boundary_sees_text_before_mark() {
        let doc = TextDocument::from_text("outlet out let");
        let mut scanner = RuleScanner::new(&doc, 0, doc.char_count()).unwrap();
        let keyword = PatternRule::new(r"\blet\b", Token::other("keyword")).unwrap();

        scanner.set_mark(3);
        assert!(!keyword.starts_at(&mut scanner));
        assert_eq!(keyword.evaluate(&mut scanner).unwrap(), Token::Undefined);
        assert_eq!(scanner.mark(), 3);

        scanner.set_mark(11);
        assert!(keyword.starts_at(&mut scanner));
        assert_eq!(keyword.evaluate(&mut scanner).unwrap(), Token::other("keyword"));
        assert_eq!(scanner.mark(), 14);
    }

    #[test]
    fn test_keyword_inside_identifier_stays_default() {
        let doc = TextDocument::from_text("outlet");
        let keyword: RuleRef =
            Arc::new(PatternRule::new(r"\blet\b", Token::other("keyword")).unwrap());
        let spans = scan_document(&doc, &RuleBasedScanner::new(vec![keyword])).unwrap();

        assert_eq!(spans, vec![TokenSpan::new(0, 6, Token::Undefined)]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            PatternRule::new("(", Token::Undefined),
            Err(ScannerError::InvalidPattern(_))
        ));
    }
}
