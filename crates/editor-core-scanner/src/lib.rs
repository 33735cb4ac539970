#![warn(missing_docs)]
//! `editor-core-scanner` - windowed, incremental character scanner for syntax partitioning.
//!
//! # Overview
//!
//! [`ScannerRange`] reads a bounded range of a [`Document`] one char at a time through a
//! fixed-capacity window buffer, so scanning never holds more than a slice of the document in
//! memory. On top of plain reading it keeps the state a rule-based tokenizer needs:
//!
//! - the token start and a lazily computed column,
//! - a stack of saved scan ranges (`push_range` / `pop_range`) for scanning embedded text,
//! - a FIFO queue of pre-computed sub-tokens replayed before new rule matching,
//! - a begin/end rule stack with a single pending end-rule match for nested regions.
//!
//! [`rules`] provides regex rules (single patterns, begin/end regions and embedded blocks) and
//! [`RuleBasedScanner`] drives them over a range.
//!
//! All offsets are **char offsets**.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use editor_core_scanner::{
//!     PatternRule, RuleBasedScanner, RuleRef, TextDocument, Token, TokenSpan, scan_document,
//! };
//!
//! let number: RuleRef = Arc::new(PatternRule::new("[0-9]+", Token::other("number"))?);
//! let scanner = RuleBasedScanner::new(vec![number]);
//!
//! let doc = TextDocument::from_text("x = 42");
//! let spans = scan_document(&doc, &scanner)?;
//! assert_eq!(spans[1], TokenSpan::new(4, 2, Token::other("number")));
//! # Ok::<(), editor_core_scanner::ScannerError>(())
//! ```

pub mod buffer;
pub mod config;
pub mod document;
pub mod driver;
pub mod error;
pub mod helper;
pub mod rules;
pub mod scanner;
pub mod token;

pub use buffer::WindowBuffer;
pub use config::{DEFAULT_BUFFER_CAPACITY, ScannerConfig};
pub use document::{Document, DocumentError};
pub use driver::{RuleBasedScanner, TokenSpan, scan_document};
pub use editor_core_document::TextDocument;
pub use error::ScannerError;
pub use helper::{DocumentHelper, LineBytes, ScannerHelper, Utf8Line};
pub use rules::{BeginEndRule, EmbeddedRule, PatternRule, Region, Rule, RuleRef, RuleScanner};
pub use scanner::{EndRuleMatch, ScanRange, ScannerRange};
pub use token::{SubRuleToken, Token};
