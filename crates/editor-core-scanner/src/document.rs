//! The document abstraction the scanner reads from.
//!
//! The engine never owns document text: it copies slices into its window buffer and asks for
//! line/offset conversions. Any type implementing [`Document`] can be scanned;
//! [`TextDocument`] is supported out of the box.

use editor_core_document::TextDocument;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors returned by [`Document`] lookups.
pub enum DocumentError {
    #[error("range {offset}..{offset}+{length} is outside the document (length {document_length})")]
    /// A char range or offset is outside the document.
    OutOfRange {
        /// Requested offset.
        offset: usize,
        /// Requested length (0 for single-offset lookups).
        length: usize,
        /// Document length at the time of the request.
        document_length: usize,
    },

    #[error("line {line} is outside the document ({line_count} lines)")]
    /// A line number is outside the document.
    LineOutOfRange {
        /// Requested line.
        line: usize,
        /// Number of lines in the document.
        line_count: usize,
    },
}

/// Read-only access to a text document, in char offsets.
pub trait Document {
    /// Document length in chars.
    fn len(&self) -> usize;

    /// Returns `true` for an empty document.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of `[offset, offset + length)`.
    fn slice(&self, offset: usize, length: usize) -> Result<String, DocumentError>;

    /// Line containing `offset` (`offset == len()` maps to the last line).
    fn line_of_offset(&self, offset: usize) -> Result<usize, DocumentError>;

    /// Offset at which `line` starts.
    fn line_offset(&self, line: usize) -> Result<usize, DocumentError>;

    /// Number of lines.
    fn line_count(&self) -> usize;

    /// Sequences that terminate a line.
    fn legal_line_delimiters(&self) -> Vec<String>;

    /// Text of `line`, including its trailing delimiter.
    fn line_text(&self, line: usize) -> Result<String, DocumentError> {
        let start = self.line_offset(line)?;
        let end = if line + 1 < self.line_count() {
            self.line_offset(line + 1)?
        } else {
            self.len()
        };
        self.slice(start, end.saturating_sub(start))
    }
}

impl Document for TextDocument {
    fn len(&self) -> usize {
        self.char_count()
    }

    fn slice(&self, offset: usize, length: usize) -> Result<String, DocumentError> {
        TextDocument::slice(self, offset, length).ok_or(DocumentError::OutOfRange {
            offset,
            length,
            document_length: self.char_count(),
        })
    }

    fn line_of_offset(&self, offset: usize) -> Result<usize, DocumentError> {
        self.char_to_line(offset).ok_or(DocumentError::OutOfRange {
            offset,
            length: 0,
            document_length: self.char_count(),
        })
    }

    fn line_offset(&self, line: usize) -> Result<usize, DocumentError> {
        self.line_to_char(line).ok_or(DocumentError::LineOutOfRange {
            line,
            line_count: TextDocument::line_count(self),
        })
    }

    fn line_count(&self) -> usize {
        TextDocument::line_count(self)
    }

    fn legal_line_delimiters(&self) -> Vec<String> {
        TextDocument::legal_line_delimiters(self)
            .iter()
            .map(|d| (*d).to_string())
            .collect()
    }

    fn line_text(&self, line: usize) -> Result<String, DocumentError> {
        TextDocument::line_text(self, line).ok_or(DocumentError::LineOutOfRange {
            line,
            line_count: TextDocument::line_count(self),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_document_out_of_range() {
        let doc = TextDocument::from_text("abc\ndef");
        assert_eq!(
            Document::slice(&doc, 5, 5),
            Err(DocumentError::OutOfRange {
                offset: 5,
                length: 5,
                document_length: 7
            })
        );
        assert!(doc.line_of_offset(8).is_err());
        assert_eq!(
            doc.line_offset(2),
            Err(DocumentError::LineOutOfRange {
                line: 2,
                line_count: 2
            })
        );
    }

    #[test]
    fn test_default_line_text_matches_text_document() {
        struct Plain(TextDocument);

        impl Document for Plain {
            fn len(&self) -> usize {
                self.0.char_count()
            }
            fn slice(&self, offset: usize, length: usize) -> Result<String, DocumentError> {
                Document::slice(&self.0, offset, length)
            }
            fn line_of_offset(&self, offset: usize) -> Result<usize, DocumentError> {
                self.0.line_of_offset(offset)
            }
            fn line_offset(&self, line: usize) -> Result<usize, DocumentError> {
                self.0.line_offset(line)
            }
            fn line_count(&self) -> usize {
                self.0.line_count()
            }
            fn legal_line_delimiters(&self) -> Vec<String> {
                Document::legal_line_delimiters(&self.0)
            }
        }

        let plain = Plain(TextDocument::from_text("one\r\ntwo\nthree"));
        for line in 0..3 {
            assert_eq!(plain.line_text(line), Document::line_text(&plain.0, line));
        }
        assert_eq!(plain.line_text(1).as_deref(), Ok("two\n"));
    }
}
