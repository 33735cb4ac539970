//! Begin/end rule stack.
//!
//! Active region rules are kept innermost-last. An end pattern found while probing the
//! stack may belong to an outer region; it is parked as the single pending
//! [`EndRuleMatch`] until the stack has been unwound to that region.

use super::ScannerRange;
use crate::error::ScannerError;
use crate::token::SubRuleToken;

/// An end-rule match waiting to be applied at the right nesting level.
#[derive(Debug, Clone)]
pub struct EndRuleMatch<R> {
    /// Offset where the end match starts.
    pub initial_mark: usize,
    /// Offset just past the end match.
    pub final_mark: usize,
    /// Region rule the end pattern belongs to.
    pub rule: R,
    /// Token span of the end delimiter.
    pub region: SubRuleToken,
}

impl<R> ScannerRange<'_, R> {
    /// Enter a region.
    pub fn push_begin_end_rule(&mut self, rule: R) {
        self.begin_end_rules.push(rule);
    }

    /// Leave the innermost region.
    pub fn pop_begin_end_rule(&mut self) -> Result<R, ScannerError> {
        self.begin_end_rules
            .pop()
            .ok_or(ScannerError::BeginEndStackUnderflow)
    }

    /// Active regions, innermost last.
    pub fn begin_end_rules(&self) -> &[R] {
        &self.begin_end_rules
    }

    /// The innermost active region.
    pub fn current_begin_end_rule(&self) -> Option<&R> {
        self.begin_end_rules.last()
    }

    /// Park an end-rule match found while probing the stack.
    ///
    /// At most one match may be pending: clear the previous one first.
    pub fn set_end_rule_match_from_stack(
        &mut self,
        initial_mark: usize,
        final_mark: usize,
        rule: R,
        region: SubRuleToken,
    ) {
        debug_assert!(
            self.end_rule_match.is_none(),
            "an end-rule match is already pending"
        );
        self.end_rule_match = Some(EndRuleMatch {
            initial_mark,
            final_mark,
            rule,
            region,
        });
    }

    /// The pending end-rule match.
    pub fn end_rule_match_from_stack(&self) -> Option<&EndRuleMatch<R>> {
        self.end_rule_match.as_ref()
    }

    /// Drop the pending end-rule match.
    pub fn clear_end_rule_match_from_stack(&mut self) {
        self.end_rule_match = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ScannerError;
    use crate::scanner::ScannerRange;
    use crate::token::{SubRuleToken, Token};
    use editor_core_document::TextDocument;

    #[test]
    fn test_begin_end_stack_is_lifo() {
        let doc = TextDocument::from_text("abc");
        let mut scanner = ScannerRange::<&str>::new(&doc, 0, 3).unwrap();

        scanner.push_begin_end_rule("string");
        scanner.push_begin_end_rule("interpolation");
        assert_eq!(scanner.current_begin_end_rule(), Some(&"interpolation"));
        assert_eq!(scanner.begin_end_rules(), ["string", "interpolation"]);

        assert_eq!(scanner.pop_begin_end_rule().unwrap(), "interpolation");
        assert_eq!(scanner.pop_begin_end_rule().unwrap(), "string");
        assert!(matches!(
            scanner.pop_begin_end_rule(),
            Err(ScannerError::BeginEndStackUnderflow)
        ));
    }

    #[test]
    fn test_end_rule_match_lifecycle() {
        let doc = TextDocument::from_text("/* a \" */");
        let mut scanner = ScannerRange::<&str>::new(&doc, 0, 9).unwrap();
        assert!(scanner.end_rule_match_from_stack().is_none());

        let region = SubRuleToken::new(Token::other("comment"), 7, 2);
        scanner.set_end_rule_match_from_stack(7, 9, "comment", region.clone());

        let pending = scanner.end_rule_match_from_stack().unwrap();
        assert_eq!(pending.initial_mark, 7);
        assert_eq!(pending.final_mark, 9);
        assert_eq!(pending.rule, "comment");
        assert_eq!(pending.region, region);

        scanner.clear_end_rule_match_from_stack();
        assert!(scanner.end_rule_match_from_stack().is_none());
    }
}
