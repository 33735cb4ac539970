//! Line/byte context supplied to rules through the scanner.
//!
//! Regex-driven rules match against whole lines encoded as UTF-8; the helper performs the
//! line lookups and conversions and carries the "inside a begin-while continuation" flag.
//! The scanner's forwarders do not cache; rule matching goes through a line cursor kept
//! by the scanner instead.

use crate::document::{Document, DocumentError};

/// A line encoded as UTF-8, with its length in chars.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Utf8Line {
    /// UTF-8 bytes of the line, trailing delimiter included.
    pub bytes: Vec<u8>,
    /// Number of chars in `bytes`.
    pub char_len: usize,
}

impl Utf8Line {
    /// Encode a line of text.
    pub fn from_text(text: String) -> Self {
        let char_len = text.chars().count();
        Self {
            bytes: text.into_bytes(),
            char_len,
        }
    }

    /// Number of chars encoded in a UTF-8 byte slice.
    pub fn count_chars(bytes: &[u8]) -> usize {
        bytes.iter().filter(|b| is_char_boundary(**b)).count()
    }
}

fn is_char_boundary(byte: u8) -> bool {
    (byte & 0xC0) != 0x80
}

/// A line as bytes plus where it sits in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBytes {
    /// Line contents.
    pub text: Utf8Line,
    /// Line number.
    pub line: usize,
    /// Offset (chars) at which the line starts.
    pub line_offset: usize,
}

/// A cached line plus the last char/byte position resolved in it.
///
/// Rules look up positions that move a char or two at a time, so stepping from the previous
/// position keeps each lookup constant-time instead of rescanning the line.
#[derive(Debug, Clone)]
pub(crate) struct LineCursor {
    line: LineBytes,
    column: usize,
    byte: usize,
}

impl LineCursor {
    pub(crate) fn new(line: LineBytes) -> Self {
        Self {
            line,
            column: 0,
            byte: 0,
        }
    }

    pub(crate) fn line(&self) -> &LineBytes {
        &self.line
    }

    /// Whether `offset` lies on this line.
    pub(crate) fn covers(&self, offset: usize) -> bool {
        let Some(column) = offset.checked_sub(self.line.line_offset) else {
            return false;
        };
        let text = &self.line.text;
        if column < text.char_len {
            return true;
        }
        // The end of the last line belongs to it; the end of a delimited line does not.
        column == text.char_len && !matches!(text.bytes.last(), Some(b'\n' | b'\r'))
    }

    /// Byte index of `offset` within the line.
    pub(crate) fn seek(&mut self, offset: usize) -> Option<usize> {
        let column = offset.checked_sub(self.line.line_offset)?;
        let text = &self.line.text;
        if column > text.char_len {
            return None;
        }
        if text.char_len == text.bytes.len() {
            self.column = column;
            self.byte = column;
            return Some(column);
        }

        while self.column < column {
            self.byte += 1;
            while self.byte < text.bytes.len() && !is_char_boundary(text.bytes[self.byte]) {
                self.byte += 1;
            }
            self.column += 1;
        }
        while self.column > column {
            self.byte -= 1;
            while !is_char_boundary(text.bytes[self.byte]) {
                self.byte -= 1;
            }
            self.column -= 1;
        }
        Some(self.byte)
    }
}

/// Context provider consulted by rules through the scanner.
pub trait ScannerHelper {
    /// Number of lines in the document.
    fn number_of_lines(&self, document: &dyn Document) -> usize;

    /// Line containing `offset`.
    fn line_from_offset(
        &self,
        document: &dyn Document,
        offset: usize,
    ) -> Result<usize, DocumentError>;

    /// The line containing `offset`, as bytes.
    fn line_from_offset_as_bytes(
        &self,
        document: &dyn Document,
        offset: usize,
    ) -> Result<LineBytes, DocumentError>;

    /// Line number `line`, as bytes.
    fn line_from_line_as_bytes(
        &self,
        document: &dyn Document,
        line: usize,
    ) -> Result<LineBytes, DocumentError>;

    /// Mark whether scanning continues a begin-while construct.
    fn set_in_begin_while(&mut self, in_begin_while: bool);

    /// Whether scanning continues a begin-while construct.
    fn is_in_begin_while(&self) -> bool;
}

/// [`ScannerHelper`] answering straight from the [`Document`].
#[derive(Debug, Clone, Default)]
pub struct DocumentHelper {
    in_begin_while: bool,
}

impl DocumentHelper {
    /// Create a helper with the begin-while flag cleared.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScannerHelper for DocumentHelper {
    fn number_of_lines(&self, document: &dyn Document) -> usize {
        document.line_count()
    }

    fn line_from_offset(
        &self,
        document: &dyn Document,
        offset: usize,
    ) -> Result<usize, DocumentError> {
        document.line_of_offset(offset)
    }

    fn line_from_offset_as_bytes(
        &self,
        document: &dyn Document,
        offset: usize,
    ) -> Result<LineBytes, DocumentError> {
        let line = document.line_of_offset(offset)?;
        self.line_from_line_as_bytes(document, line)
    }

    fn line_from_line_as_bytes(
        &self,
        document: &dyn Document,
        line: usize,
    ) -> Result<LineBytes, DocumentError> {
        let line_offset = document.line_offset(line)?;
        let text = document.line_text(line)?;
        Ok(LineBytes {
            text: Utf8Line::from_text(text),
            line,
            line_offset,
        })
    }

    fn set_in_begin_while(&mut self, in_begin_while: bool) {
        self.in_begin_while = in_begin_while;
    }

    fn is_in_begin_while(&self) -> bool {
        self.in_begin_while
    }
}
