//! The scanning engine.
//!
//! [`ScannerRange`] owns all mutable scanning state of one scan session: the window buffer,
//! the position tracker (offset, token start, cached column), the stack of saved scan
//! ranges, the sub-token queue and the begin/end rule stack. Rules receive it explicitly as
//! `&mut ScannerRange`; nothing is shared between instances except the borrowed document.
//!
//! `R` is the region-rule type stacked by the grammar layer; the engine never looks inside it.

mod rule_stack;
mod tokens;

pub use rule_stack::EndRuleMatch;

use crate::buffer::WindowBuffer;
use crate::config::ScannerConfig;
use crate::document::{Document, DocumentError};
use crate::error::ScannerError;
use crate::helper::{DocumentHelper, LineBytes, LineCursor, ScannerHelper};
use crate::token::{SubRuleToken, Token};
use std::collections::VecDeque;

/// Snapshot of the active scan range, saved by [`ScannerRange::push_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    /// Offset of the next char to read.
    pub offset: usize,
    /// Exclusive end of the range.
    pub range_end: usize,
    /// End offset of the last pattern match.
    pub last_match_offset: usize,
}

/// Incremental character scanner over a bounded range of a [`Document`].
pub struct ScannerRange<'doc, R> {
    document: &'doc dyn Document,
    helper: Box<dyn ScannerHelper>,
    line_cursor: Option<LineCursor>,
    delimiters: Vec<String>,
    buffer: WindowBuffer,

    offset: usize,
    range_end: usize,
    token_offset: usize,
    column: Option<usize>,
    last_column: usize,
    last_match_offset: usize,

    content_type: Option<String>,
    partition_offset: Option<usize>,

    range_stack: Vec<ScanRange>,

    token: Option<Token>,
    sub_tokens: VecDeque<SubRuleToken>,
    current_sub_token: Option<SubRuleToken>,

    begin_end_rules: Vec<R>,
    end_rule_match: Option<EndRuleMatch<R>>,
}

impl<'doc, R> ScannerRange<'doc, R> {
    /// Scanner over `[offset, offset + length)` with the default configuration.
    pub fn new(
        document: &'doc dyn Document,
        offset: usize,
        length: usize,
    ) -> Result<Self, ScannerError> {
        let mut scanner = Self::with_config(
            document,
            &ScannerConfig::default(),
            Box::new(DocumentHelper::new()),
        )?;
        scanner.set_range(document, offset, length)?;
        Ok(scanner)
    }

    /// Scanner resuming inside a partition; see [`ScannerRange::set_partial_range`].
    pub fn new_partial(
        document: &'doc dyn Document,
        offset: usize,
        length: usize,
        content_type: Option<&str>,
        partition_offset: Option<usize>,
    ) -> Result<Self, ScannerError> {
        let mut scanner = Self::with_config(
            document,
            &ScannerConfig::default(),
            Box::new(DocumentHelper::new()),
        )?;
        scanner.set_partial_range(document, offset, length, content_type, partition_offset)?;
        Ok(scanner)
    }

    /// Scanner with an explicit configuration and helper.
    ///
    /// The range starts out empty at offset 0; call [`ScannerRange::set_range`] before
    /// reading.
    pub fn with_config(
        document: &'doc dyn Document,
        config: &ScannerConfig,
        helper: Box<dyn ScannerHelper>,
    ) -> Result<Self, ScannerError> {
        config.validate()?;
        Ok(Self {
            document,
            helper,
            line_cursor: None,
            delimiters: document.legal_line_delimiters(),
            buffer: WindowBuffer::new(config.buffer_capacity),
            offset: 0,
            range_end: 0,
            token_offset: 0,
            column: None,
            last_column: 0,
            last_match_offset: 0,
            content_type: None,
            partition_offset: None,
            range_stack: Vec::new(),
            token: None,
            sub_tokens: VecDeque::new(),
            current_sub_token: None,
            begin_end_rules: Vec::new(),
            end_rule_match: None,
        })
    }

    /// Establish the scan range `[offset, offset + length)` over `document`.
    pub fn set_range(
        &mut self,
        document: &'doc dyn Document,
        offset: usize,
        length: usize,
    ) -> Result<(), ScannerError> {
        let document_length = document.len();
        let range_end = offset
            .checked_add(length)
            .filter(|end| *end <= document_length)
            .ok_or(ScannerError::InvalidRange {
                offset,
                length,
                document_length,
            })?;

        self.document = document;
        self.line_cursor = None;
        self.buffer.refill(document, offset);
        self.offset = offset;
        self.token_offset = offset;
        self.column = None;
        self.range_end = range_end;
        self.delimiters = document.legal_line_delimiters();
        Ok(())
    }

    /// Establish a scan range that resumes inside a partition.
    ///
    /// When `partition_offset` lies before `offset`, the effective range is widened to
    /// start at the partition so the text preceding `offset` stays reachable through the
    /// buffer, while the scan position (and thus the next token start) is still `offset`.
    /// Otherwise this is a plain [`ScannerRange::set_range`].
    pub fn set_partial_range(
        &mut self,
        document: &'doc dyn Document,
        offset: usize,
        length: usize,
        content_type: Option<&str>,
        partition_offset: Option<usize>,
    ) -> Result<(), ScannerError> {
        match partition_offset {
            Some(start) if offset > start => {
                let widened = length
                    .checked_add(offset - start)
                    .ok_or(ScannerError::InvalidRange {
                        offset,
                        length,
                        document_length: document.len(),
                    })?;
                self.set_range(document, start, widened)?;
                self.offset = offset;
                self.token_offset = offset;
            }
            _ => self.set_range(document, offset, length)?,
        }

        self.content_type = content_type.map(str::to_owned);
        self.partition_offset = partition_offset;
        Ok(())
    }

    /// The scanned document.
    pub fn document(&self) -> &'doc dyn Document {
        self.document
    }

    /// Content type of the partition being resumed, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Start of the partition being resumed, if any.
    pub fn partition_offset(&self) -> Option<usize> {
        self.partition_offset
    }

    /// Exclusive end of the active range.
    pub fn range_end(&self) -> usize {
        self.range_end
    }

    /// The window buffer.
    pub fn window(&self) -> &WindowBuffer {
        &self.buffer
    }

    /// Snapshot of the active range.
    pub fn scan_range(&self) -> ScanRange {
        ScanRange {
            offset: self.offset,
            range_end: self.range_end,
            last_match_offset: self.last_match_offset,
        }
    }

    /// Read the char at the current offset and advance.
    ///
    /// Returns `None` (end of input) once the offset reaches the range end; the offset
    /// still advances so that every read can be balanced by an [`ScannerRange::unread`].
    ///
    /// A char the document cannot serve (failed refill) also reads as `None`, with a
    /// warning logged. Callers tell the two apart by comparing the offset before the read
    /// against [`ScannerRange::range_end`].
    pub fn read(&mut self) -> Option<char> {
        self.column = None;
        if self.offset >= self.range_end {
            self.offset += 1;
            return None;
        }

        if self.offset == self.buffer.end() {
            self.buffer.refill(self.document, self.buffer.end());
        } else if !self.buffer.contains(self.offset) {
            self.buffer.refill(self.document, self.offset);
        }

        let ch = self.buffer.get(self.offset);
        if ch.is_none() {
            tracing::warn!(offset = self.offset, "window buffer cannot serve offset");
        }
        self.offset += 1;
        ch
    }

    /// Step back one char (never before offset 0).
    pub fn unread(&mut self) {
        let start = self.buffer.start();
        if self.offset == start && start > 0 {
            let recentered = start.saturating_sub(self.buffer.capacity() / 2);
            self.buffer.refill(self.document, recentered);
        }

        self.offset = self.offset.saturating_sub(1);
        self.column = None;
    }

    /// Column of the current offset within its line.
    ///
    /// Computed lazily and cached until the offset changes. If the document cannot resolve
    /// the offset, the last computed column is returned.
    pub fn column(&mut self) -> usize {
        if let Some(column) = self.column {
            return column;
        }

        let lookup = self
            .document
            .line_of_offset(self.offset)
            .and_then(|line| self.document.line_offset(line));
        match lookup {
            Ok(line_start) => {
                let column = self.offset.saturating_sub(line_start);
                self.column = Some(column);
                self.last_column = column;
                column
            }
            Err(err) => {
                tracing::warn!(%err, offset = self.offset, "column lookup failed");
                self.last_column
            }
        }
    }

    /// Legal line delimiters of the document, cached by [`ScannerRange::set_range`].
    pub fn legal_line_delimiters(&self) -> &[String] {
        &self.delimiters
    }

    /// Current offset.
    pub fn mark(&self) -> usize {
        self.offset
    }

    /// Move to `offset`, re-windowing the buffer when it crosses the window edge.
    ///
    /// Landing on the window start slides the window back by half its capacity, landing on
    /// its end slides it forward, and landing outside re-windows at `offset`.
    pub fn set_mark(&mut self, offset: usize) {
        self.offset = offset;
        self.column = None;

        let (start, end) = (self.buffer.start(), self.buffer.end());
        if offset == start {
            if start > 0 {
                let recentered = start.saturating_sub(self.buffer.capacity() / 2);
                self.buffer.refill(self.document, recentered);
            }
        } else if offset == end {
            self.buffer.refill(self.document, end);
        } else if offset < start || offset > end {
            self.buffer.refill(self.document, offset);
        }
    }

    /// Temporarily scan `[offset, offset + length)` instead of the active range.
    ///
    /// The active offset, range end and last match offset are saved and come back with
    /// [`ScannerRange::pop_range`].
    pub fn push_range(&mut self, offset: usize, length: usize) -> Result<(), ScannerError> {
        let document_length = self.document.len();
        let range_end = offset
            .checked_add(length)
            .filter(|end| *end <= document_length)
            .ok_or(ScannerError::InvalidRange {
                offset,
                length,
                document_length,
            })?;

        self.range_stack.push(self.scan_range());
        tracing::trace!(
            depth = self.range_stack.len(),
            offset,
            range_end,
            "push scan range"
        );
        self.range_end = range_end;
        self.set_mark(offset);
        Ok(())
    }

    /// Restore the range saved by the matching [`ScannerRange::push_range`].
    pub fn pop_range(&mut self) -> Result<(), ScannerError> {
        let saved = self
            .range_stack
            .pop()
            .ok_or(ScannerError::RangeStackUnderflow)?;
        tracing::trace!(depth = self.range_stack.len(), ?saved, "pop scan range");

        self.range_end = saved.range_end;
        self.last_match_offset = saved.last_match_offset;
        self.set_mark(saved.offset);
        Ok(())
    }

    /// Number of saved ranges.
    pub fn range_depth(&self) -> usize {
        self.range_stack.len()
    }

    /// End offset of the last pattern match.
    pub fn last_match_offset(&self) -> usize {
        self.last_match_offset
    }

    /// Record the end offset of a pattern match.
    pub fn set_last_match_offset(&mut self, offset: usize) {
        self.last_match_offset = offset;
    }

    /// Text of `[offset, offset + length)` read through the buffer; the mark is restored
    /// afterwards. Stops early at the range end.
    pub fn contents(&mut self, offset: usize, length: usize) -> String {
        let mark = self.mark();
        self.set_mark(offset);
        let mut out = String::with_capacity(length);
        for _ in 0..length {
            match self.read() {
                Some(ch) => out.push(ch),
                None => break,
            }
        }
        self.set_mark(mark);
        out
    }

    /// Document text from `offset` to the end of the document (empty if `offset` is out of
    /// range).
    pub fn content_from_offset_to_end_of_doc(&self, offset: usize) -> String {
        let length = self.document.len().saturating_sub(offset);
        match self.document.slice(offset, length) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, offset, "content lookup failed");
                String::new()
            }
        }
    }

    /// Number of lines in the document.
    pub fn number_of_lines(&self) -> usize {
        self.helper.number_of_lines(self.document)
    }

    /// Line containing `offset`.
    pub fn line_from_offset(&self, offset: usize) -> Result<usize, DocumentError> {
        self.helper.line_from_offset(self.document, offset)
    }

    /// The line containing `offset`, as UTF-8 bytes.
    pub fn line_from_offset_as_bytes(&self, offset: usize) -> Result<LineBytes, DocumentError> {
        self.helper.line_from_offset_as_bytes(self.document, offset)
    }

    /// Line `line`, as UTF-8 bytes.
    pub fn line_from_line_as_bytes(&self, line: usize) -> Result<LineBytes, DocumentError> {
        self.helper.line_from_line_as_bytes(self.document, line)
    }

    /// The line containing `offset` as UTF-8 bytes, with the byte index of `offset` in it.
    ///
    /// Unlike [`ScannerRange::line_from_offset_as_bytes`], the line is kept and reused while
    /// lookups stay on it, and the byte index is found by stepping from the previous lookup.
    pub fn line_bytes_at(&mut self, offset: usize) -> Result<(&LineBytes, usize), DocumentError> {
        if !matches!(&self.line_cursor, Some(cursor) if cursor.covers(offset)) {
            self.line_cursor = Some(LineCursor::new(
                self.helper.line_from_offset_as_bytes(self.document, offset)?,
            ));
        }
        let cursor = self.line_cursor.as_mut().expect("line cursor was just set");
        let byte = cursor.seek(offset).ok_or(DocumentError::OutOfRange {
            offset,
            length: 0,
            document_length: self.document.len(),
        })?;
        Ok((cursor.line(), byte))
    }

    /// Mark whether scanning continues a begin-while construct.
    pub fn set_in_begin_while(&mut self, in_begin_while: bool) {
        self.helper.set_in_begin_while(in_begin_while);
    }

    /// Whether scanning continues a begin-while construct.
    pub fn is_in_begin_while(&self) -> bool {
        self.helper.is_in_begin_while()
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for ScannerRange<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScannerRange")
            .field("offset", &self.offset)
            .field("range_end", &self.range_end)
            .field("token_offset", &self.token_offset)
            .field("window", &(self.buffer.start()..self.buffer.end()))
            .field("range_stack", &self.range_stack)
            .field("token", &self.token)
            .field("pending_sub_tokens", &self.sub_tokens.len())
            .field("begin_end_rules", &self.begin_end_rules)
            .finish_non_exhaustive()
    }
}
