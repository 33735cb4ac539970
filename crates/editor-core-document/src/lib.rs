#![warn(missing_docs)]
//! `editor-core-document` - the text document consumed by `editor-core-scanner`.
//!
//! [`TextDocument`] stores text in a rope and answers the questions a character scanner asks:
//! length, character slices, line/offset conversion and the legal line delimiters.
//! All offsets are **char offsets**.

pub mod text_document;

pub use text_document::{LEGAL_LINE_DELIMITERS, TextDocument};
