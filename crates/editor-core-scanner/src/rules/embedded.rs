use super::region::Region;
use super::{Rule, RuleScanner, evaluate_first, offer_span};
use crate::error::ScannerError;
use crate::token::Token;
use std::sync::Arc;

/// Rule for a block of embedded text (e.g. a script inside markup).
///
/// The end delimiter is located first; the interior is then scanned as its own range
/// through [`ScannerRange::push_range`](crate::ScannerRange::push_range), so nested rules
/// can never run past it. The region is isolated: ends of enclosing regions do not close
/// anything inside it.
#[derive(Debug, Clone)]
pub struct EmbeddedRule {
    region: Arc<Region>,
}

impl EmbeddedRule {
    /// Rule for `region`.
    pub fn new(region: Region) -> Self {
        Self {
            region: Arc::new(region.isolate()),
        }
    }

    /// The embedded region.
    pub fn region(&self) -> &Arc<Region> {
        &self.region
    }

    /// Start and length of the end delimiter at or after the mark; an unterminated block
    /// ends at the range end with an empty delimiter.
    fn find_end(&self, scanner: &mut RuleScanner<'_>) -> (usize, usize) {
        loop {
            let here = scanner.mark();
            if let Some(len) = self.region.end_len(scanner) {
                return (here, len);
            }
            if scanner.read().is_none() {
                scanner.unread();
                return (scanner.mark(), 0);
            }
        }
    }

    fn scan_interior(&self, scanner: &mut RuleScanner<'_>) -> Result<(), ScannerError> {
        let region = &self.region;
        let mut content_from = scanner.mark();

        loop {
            let here = scanner.mark();
            let nested = evaluate_first(scanner, region.patterns(), |scanner| {
                offer_span(scanner, region.content_token(), content_from, here - content_from);
                content_from = here;
            })?;
            if nested.is_some() {
                content_from = scanner.mark();
                continue;
            }

            if scanner.read().is_none() {
                scanner.unread();
                let end = scanner.mark();
                offer_span(scanner, region.content_token(), content_from, end - content_from);
                return Ok(());
            }
        }
    }
}

impl Rule for EmbeddedRule {
    fn starts_at(&self, scanner: &mut RuleScanner<'_>) -> bool {
        self.region.begin_len(scanner).is_some()
    }

    fn evaluate(&self, scanner: &mut RuleScanner<'_>) -> Result<Token, ScannerError> {
        let start = scanner.mark();
        let Some(begin_len) = self.region.begin_len(scanner) else {
            return Ok(Token::Undefined);
        };

        let content_start = start + begin_len;
        scanner.set_mark(content_start);
        let (content_end, end_len) = self.find_end(scanner);
        let resume = content_end + end_len;
        tracing::trace!(
            region = self.region.name(),
            content_start,
            content_end,
            "embedded block"
        );

        offer_span(scanner, self.region.begin_token(), start, begin_len);

        // The saved range resumes right after the end delimiter.
        scanner.set_mark(resume);
        scanner.push_range(content_start, content_end - content_start)?;
        scanner.push_begin_end_rule(self.region.clone());
        let scanned = self.scan_interior(scanner);
        scanner.pop_begin_end_rule()?;
        scanner.pop_range()?;
        scanned?;

        offer_span(scanner, self.region.end_token(), content_end, end_len);
        scanner.set_last_match_offset(resume);
        Ok(self.region.begin_token().clone())
    }
}
