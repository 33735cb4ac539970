//! Token emission protocol.
//!
//! One token is current at a time. A rule either sets it directly or offers an ordered run
//! of sub-tokens, which are replayed one per [`ScannerRange::next_offered_token`] call
//! before any new rule match is attempted.

use super::ScannerRange;
use crate::token::{SubRuleToken, Token};

impl<R> ScannerRange<'_, R> {
    /// Begin a new token at the current offset, dropping the current token and sub-token.
    pub fn start_next_token(&mut self) {
        self.token_offset = self.offset;
        self.column = None;
        self.token = None;
        self.current_sub_token = None;
    }

    /// Offset at which the current token started.
    pub fn token_start(&self) -> usize {
        self.token_offset
    }

    /// Offset of the current token (the current sub-token's, if one is active).
    pub fn token_offset(&self) -> usize {
        match &self.current_sub_token {
            Some(sub) => sub.offset,
            None => self.token_offset,
        }
    }

    /// Length of the current token, clipped to the range end.
    pub fn token_length(&self) -> usize {
        if let Some(sub) = &self.current_sub_token {
            return sub.len;
        }
        let end = self.offset.min(self.range_end);
        end.saturating_sub(self.token_offset())
    }

    /// Set the current token.
    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    /// The current token, or [`Token::Undefined`] if none was computed.
    pub fn token(&self) -> Token {
        match &self.token {
            Some(token) => token.clone(),
            None => {
                tracing::debug!(offset = self.offset, "token requested before it was computed");
                Token::Undefined
            }
        }
    }

    /// Queue a sub-token for later replay.
    pub fn offer_sub_token(&mut self, sub_token: SubRuleToken) {
        self.sub_tokens.push_back(sub_token);
    }

    /// Make the next queued sub-token current.
    ///
    /// Returns `false` when the queue is empty; the current token and sub-token are then
    /// cleared and the caller has to match rules again.
    pub fn next_offered_token(&mut self) -> bool {
        match self.sub_tokens.pop_front() {
            Some(sub) => {
                self.token = Some(sub.token.clone());
                self.current_sub_token = Some(sub);
                true
            }
            None => {
                self.current_sub_token = None;
                self.token = None;
                false
            }
        }
    }

    /// Make `sub_token` current without going through the queue.
    pub fn set_current_sub_token(&mut self, sub_token: SubRuleToken) {
        self.token = Some(sub_token.token.clone());
        self.current_sub_token = Some(sub_token);
    }

    /// The active sub-token, if any.
    pub fn current_sub_token(&self) -> Option<&SubRuleToken> {
        self.current_sub_token.as_ref()
    }

    /// Number of queued sub-tokens.
    pub fn pending_sub_tokens(&self) -> usize {
        self.sub_tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::scanner::ScannerRange;
    use crate::token::{SubRuleToken, Token};
    use editor_core_document::TextDocument;

    type Scanner<'a> = ScannerRange<'a, ()>;

    #[test]
    fn test_sub_tokens_replay_in_fifo_order() {
        let doc = TextDocument::from_text("\"abc\" rest");
        let mut scanner = Scanner::new(&doc, 0, 10).unwrap();

        let subs = [
            SubRuleToken::new(Token::other("punctuation"), 0, 1),
            SubRuleToken::new(Token::other("string"), 1, 3),
            SubRuleToken::new(Token::other("punctuation"), 4, 1),
        ];
        for sub in subs.iter().cloned() {
            scanner.offer_sub_token(sub);
        }
        assert_eq!(scanner.pending_sub_tokens(), 3);

        for sub in &subs {
            assert!(scanner.next_offered_token());
            assert_eq!(scanner.token(), sub.token);
            assert_eq!(scanner.token_offset(), sub.offset);
            assert_eq!(scanner.token_length(), sub.len);
        }

        assert!(!scanner.next_offered_token());
        assert!(scanner.current_sub_token().is_none());
        assert_eq!(scanner.token(), Token::Undefined);
    }

    #[test]
    fn test_token_span_from_token_start() {
        let doc = TextDocument::from_text("keyword rest");
        let mut scanner = Scanner::new(&doc, 0, 12).unwrap();

        scanner.set_mark(3);
        scanner.start_next_token();
        for _ in 0..4 {
            scanner.read();
        }
        scanner.set_token(Token::other("keyword"));

        assert_eq!(scanner.token_start(), 3);
        assert_eq!(scanner.token_offset(), 3);
        assert_eq!(scanner.token_length(), 4);
        assert_eq!(scanner.token(), Token::other("keyword"));
    }

    #[test]
    fn test_token_length_clips_to_range_end() {
        let doc = TextDocument::from_text("abcdef");
        let mut scanner = Scanner::new(&doc, 0, 4).unwrap();

        scanner.set_mark(2);
        scanner.start_next_token();
        while scanner.read().is_some() {}
        scanner.read();

        assert_eq!(scanner.mark(), 6);
        assert_eq!(scanner.token_length(), 2);
    }

    #[test]
    fn test_start_next_token_clears_current() {
        let doc = TextDocument::from_text("abc");
        let mut scanner = Scanner::new(&doc, 0, 3).unwrap();

        scanner.set_current_sub_token(SubRuleToken::new(Token::Whitespace, 1, 1));
        assert_eq!(scanner.token(), Token::Whitespace);
        assert_eq!(scanner.token_offset(), 1);

        scanner.start_next_token();
        assert!(scanner.current_sub_token().is_none());
        assert_eq!(scanner.token(), Token::Undefined);
        assert_eq!(scanner.token_offset(), 0);
    }
}
