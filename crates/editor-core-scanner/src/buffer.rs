//! Windowed buffer over a document.
//!
//! The scanner keeps at most `capacity` chars of the document in memory, copied out of the
//! document so the buffer never borrows from it. A refill fetches the new slice first and only
//! then replaces the window: if the document cannot serve the slice, the previous window stays
//! valid.

use crate::document::Document;

/// In-memory copy of `[start, end)` of the document.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    data: Vec<char>,
    start: usize,
    end: usize,
    capacity: usize,
}

impl WindowBuffer {
    /// An empty window at offset 0. `capacity` must be positive (validated by
    /// [`ScannerConfig`](crate::ScannerConfig)).
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "buffer capacity must be positive");
        Self {
            data: Vec::with_capacity(capacity),
            start: 0,
            end: 0,
            capacity,
        }
    }

    /// First buffered offset.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset just past the last buffered char.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Maximum number of buffered chars.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `offset` is served from memory.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Buffered char at a document offset.
    pub fn get(&self, offset: usize) -> Option<char> {
        if !self.contains(offset) {
            return None;
        }
        self.data.get(offset - self.start).copied()
    }

    /// Re-window to `[offset, offset + capacity)`, clipped to the document length.
    ///
    /// Returns `false` (and keeps the current window) when the document cannot serve the
    /// slice.
    pub(crate) fn refill(&mut self, document: &dyn Document, offset: usize) -> bool {
        let document_length = document.len();
        let end = offset.saturating_add(self.capacity).min(document_length);
        if offset > end {
            tracing::warn!(
                offset,
                document_length,
                "buffer refill requested past the document end"
            );
            return false;
        }

        match document.slice(offset, end - offset) {
            Ok(text) => {
                self.data.clear();
                self.data.extend(text.chars());
                self.start = offset;
                self.end = offset + self.data.len();
                tracing::trace!(start = self.start, end = self.end, "buffer refilled");
                true
            }
            Err(err) => {
                tracing::warn!(%err, offset, "buffer refill failed, keeping previous window");
                false
            }
        }
    }
}
