use super::{AnchoredPattern, Rule, RuleRef, RuleScanner, evaluate_first, offer_span};
use crate::error::ScannerError;
use crate::token::{SubRuleToken, Token};
use std::sync::Arc;

/// A begin/end delimited region of the grammar.
///
/// Regions are what the scanner's begin/end rule stack holds while their interior is
/// scanned.
#[derive(Debug)]
pub struct Region {
    name: String,
    begin: AnchoredPattern,
    end: AnchoredPattern,
    begin_token: Token,
    content_token: Token,
    end_token: Token,
    patterns: Vec<RuleRef>,
    isolated: bool,
}

impl Region {
    /// Region delimited by `begin`/`end`, reported as `token` throughout.
    pub fn new(name: &str, begin: &str, end: &str, token: Token) -> Result<Self, ScannerError> {
        Ok(Self {
            name: name.to_string(),
            begin: AnchoredPattern::new(begin)?,
            end: AnchoredPattern::new(end)?,
            begin_token: token.clone(),
            content_token: token.clone(),
            end_token: token,
            patterns: Vec::new(),
            isolated: false,
        })
    }

    /// Token of the begin delimiter.
    pub fn with_begin_token(mut self, token: Token) -> Self {
        self.begin_token = token;
        self
    }

    /// Token of interior text no nested rule claims.
    pub fn with_content_token(mut self, token: Token) -> Self {
        self.content_token = token;
        self
    }

    /// Token of the end delimiter.
    pub fn with_end_token(mut self, token: Token) -> Self {
        self.end_token = token;
        self
    }

    /// Rules tried inside the region.
    pub fn with_patterns(mut self, patterns: Vec<RuleRef>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Region name (for diagnostics).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Begin pattern source.
    pub fn begin_pattern(&self) -> &str {
        self.begin.source()
    }

    /// End pattern source.
    pub fn end_pattern(&self) -> &str {
        self.end.source()
    }

    /// Token of the begin delimiter.
    pub fn begin_token(&self) -> &Token {
        &self.begin_token
    }

    /// Token of unclaimed interior text.
    pub fn content_token(&self) -> &Token {
        &self.content_token
    }

    /// Token of the end delimiter.
    pub fn end_token(&self) -> &Token {
        &self.end_token
    }

    /// Rules tried inside the region.
    pub fn patterns(&self) -> &[RuleRef] {
        &self.patterns
    }

    /// Whether nested regions are kept from closing regions outside this one.
    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub(crate) fn isolate(mut self) -> Self {
        self.isolated = true;
        self
    }

    pub(crate) fn begin_len(&self, scanner: &mut RuleScanner<'_>) -> Option<usize> {
        self.begin.match_at(scanner).filter(|len| *len > 0)
    }

    pub(crate) fn end_len(&self, scanner: &mut RuleScanner<'_>) -> Option<usize> {
        self.end.match_at(scanner)
    }
}

/// Find an enclosing region whose end pattern matches at the mark, innermost first.
///
/// The innermost active region (top of the stack) is skipped, and the search stops at an
/// isolated region.
fn find_outer_end(scanner: &mut RuleScanner<'_>) -> Option<(Arc<Region>, usize)> {
    let innermost = scanner.begin_end_rules().len().checked_sub(1)?;
    for depth in (0..innermost).rev() {
        let region = scanner.begin_end_rules()[depth].clone();
        if region.is_isolated() {
            return None;
        }
        if let Some(len) = region.end_len(scanner) {
            return Some((region, len));
        }
    }
    None
}

/// Rule entering a [`Region`] whose interior is scanned with its nested patterns.
///
/// An end pattern of an enclosing region closes this region too; the match is handed to
/// the enclosing region through the scanner's pending end-rule match.
#[derive(Debug, Clone)]
pub struct BeginEndRule {
    region: Arc<Region>,
}

impl BeginEndRule {
    /// Rule for `region`.
    pub fn new(region: Region) -> Self {
        Self {
            region: Arc::new(region),
        }
    }

    /// The region entered by this rule.
    pub fn region(&self) -> &Arc<Region> {
        &self.region
    }

    fn scan_interior(&self, scanner: &mut RuleScanner<'_>) -> Result<(), ScannerError> {
        let region = &self.region;
        let mut content_from = scanner.mark();

        loop {
            let here = scanner.mark();

            if let Some(len) = region.end_len(scanner) {
                offer_span(scanner, &region.content_token, content_from, here - content_from);
                offer_span(scanner, &region.end_token, here, len);
                scanner.set_mark(here + len);
                scanner.set_last_match_offset(here + len);
                return Ok(());
            }

            if let Some((outer, len)) = find_outer_end(scanner) {
                offer_span(scanner, &region.content_token, content_from, here - content_from);
                let end_region = SubRuleToken::new(outer.end_token.clone(), here, len);
                scanner.set_end_rule_match_from_stack(here, here + len, outer, end_region);
                return Ok(());
            }

            let nested = evaluate_first(scanner, &region.patterns, |scanner| {
                offer_span(scanner, &region.content_token, content_from, here - content_from);
                content_from = here;
            })?;
            if nested.is_some() {
                content_from = scanner.mark();
                if let Some(pending) = scanner.end_rule_match_from_stack() {
                    if Arc::ptr_eq(&pending.rule, region) {
                        let final_mark = pending.final_mark;
                        let end_region = pending.region.clone();
                        scanner.clear_end_rule_match_from_stack();
                        if end_region.len > 0 {
                            scanner.offer_sub_token(end_region);
                        }
                        scanner.set_mark(final_mark);
                        scanner.set_last_match_offset(final_mark);
                    }
                    // Otherwise the match closes an enclosing region as well.
                    return Ok(());
                }
                continue;
            }

            if scanner.read().is_none() {
                scanner.unread();
                let end = scanner.mark();
                offer_span(scanner, &region.content_token, content_from, end - content_from);
                return Ok(());
            }
        }
    }
}

impl Rule for BeginEndRule {
    fn starts_at(&self, scanner: &mut RuleScanner<'_>) -> bool {
        self.region.begin_len(scanner).is_some()
    }

    fn evaluate(&self, scanner: &mut RuleScanner<'_>) -> Result<Token, ScannerError> {
        let start = scanner.mark();
        let Some(begin_len) = self.region.begin_len(scanner) else {
            return Ok(Token::Undefined);
        };

        offer_span(scanner, &self.region.begin_token, start, begin_len);
        scanner.set_mark(start + begin_len);
        scanner.set_last_match_offset(start + begin_len);

        scanner.push_begin_end_rule(self.region.clone());
        let scanned = self.scan_interior(scanner);
        let popped = scanner.pop_begin_end_rule()?;
        debug_assert!(Arc::ptr_eq(&popped, &self.region));
        scanned?;

        Ok(self.region.begin_token.clone())
    }
}
