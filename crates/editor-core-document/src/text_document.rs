//! Rope-backed text document.
//!
//! Provides O(log N) char-offset/line conversion and slicing, which keeps scanner buffer
//! refills cheap on large documents.

use ropey::Rope;

/// Every sequence that terminates a line, longest first.
///
/// Documents keep their text exactly as loaded; any of these ends a line.
pub const LEGAL_LINE_DELIMITERS: [&str; 3] = ["\r\n", "\n", "\r"];

/// Text document implemented on top of a rope.
///
/// Every edit bumps [`TextDocument::version`], so callers holding derived state (token
/// caches, partitions) can tell when it went stale.
#[derive(Debug, Clone)]
pub struct TextDocument {
    rope: Rope,
    version: u64,
}

impl TextDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            version: 0,
        }
    }

    /// Build a document from text, keeping its line delimiters as they are.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            version: 0,
        }
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Total line count (an empty document has 1 line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Edit counter, incremented by every insert/delete.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sequences that terminate a line in this document.
    pub fn legal_line_delimiters(&self) -> &'static [&'static str] {
        &LEGAL_LINE_DELIMITERS
    }

    /// Line containing `char_offset`.
    ///
    /// `char_offset == char_count()` is legal and maps to the last line.
    pub fn char_to_line(&self, char_offset: usize) -> Option<usize> {
        if char_offset > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.char_to_line(char_offset))
    }

    /// Char offset at which `line` starts.
    pub fn line_to_char(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        Some(self.rope.line_to_char(line))
    }

    /// Line number and column of a char offset.
    pub fn char_offset_to_position(&self, char_offset: usize) -> Option<(usize, usize)> {
        let line = self.char_to_line(char_offset)?;
        let start = self.rope.line_to_char(line);
        Some((line, char_offset - start))
    }

    /// Text of `[char_offset, char_offset + len_chars)`, or `None` if the span leaves the
    /// document.
    pub fn slice(&self, char_offset: usize, len_chars: usize) -> Option<String> {
        let end = char_offset.checked_add(len_chars)?;
        if end > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_offset..end).to_string())
    }

    /// Text of a line, including its trailing delimiter (if any).
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        Some(self.rope.line(line).to_string())
    }

    /// Insert text at a char offset (clamped to the document end).
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
        self.version += 1;
    }

    /// Delete a char range (clamped to the document end).
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = start_char
            .saturating_add(len_chars)
            .min(self.rope.len_chars());

        if start_char < end_char {
            self.rope.remove(start_char..end_char);
            self.version += 1;
        }
    }
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = TextDocument::new();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.char_count(), 0);
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_char_to_line() {
        let doc = TextDocument::from_text("First line\nSecond line\nThird line");

        assert_eq!(doc.char_to_line(0), Some(0));
        assert_eq!(doc.char_to_line(10), Some(0)); // the '\n'
        assert_eq!(doc.char_to_line(11), Some(1));
        assert_eq!(doc.char_to_line(23), Some(2));
        assert_eq!(doc.char_to_line(doc.char_count()), Some(2));
        assert_eq!(doc.char_to_line(doc.char_count() + 1), None);
    }

    #[test]
    fn test_line_to_char() {
        let doc = TextDocument::from_text("ABC\nDEF\nGHI");

        assert_eq!(doc.line_to_char(0), Some(0));
        assert_eq!(doc.line_to_char(1), Some(4));
        assert_eq!(doc.line_to_char(2), Some(8));
        assert_eq!(doc.line_to_char(3), None);
    }

    #[test]
    fn test_crlf_and_cr_break_lines() {
        let doc = TextDocument::from_text("a\r\nb\rc\nd");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line_to_char(1), Some(3));
        assert_eq!(doc.line_to_char(2), Some(5));
        assert_eq!(doc.line_text(0).as_deref(), Some("a\r\n"));
    }

    #[test]
    fn test_unicode_line_separator_is_inline() {
        let doc = TextDocument::from_text("a\u{2028}b");
        assert_eq!(doc.line_count(), 1);
    }

    #[test]
    fn test_slice_utf8_cjk() {
        let doc = TextDocument::from_text("你好\n世界");
        assert_eq!(doc.char_count(), 5);
        assert_eq!(doc.slice(3, 2).as_deref(), Some("世界"));
        assert_eq!(doc.slice(4, 2), None);
        assert_eq!(doc.slice(5, 0).as_deref(), Some(""));
        assert_eq!(doc.char_offset_to_position(4), Some((1, 1)));
    }

    #[test]
    fn test_insert_delete_bump_version() {
        let mut doc = TextDocument::from_text("Hello World");

        doc.insert(6, "Beautiful ");
        assert_eq!(doc.slice(0, 21).as_deref(), Some("Hello Beautiful World"));
        assert_eq!(doc.version(), 1);

        doc.delete(6, 10);
        assert_eq!(doc.char_count(), 11);
        assert_eq!(doc.slice(0, 11).as_deref(), Some("Hello World"));
        assert_eq!(doc.version(), 2);

        doc.delete(100, 3);
        assert_eq!(doc.version(), 2);
    }
}
