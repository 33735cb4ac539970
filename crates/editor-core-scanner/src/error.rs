use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by the scanner engine and its rule layer.
pub enum ScannerError {
    #[error("invalid configuration: {0}")]
    /// A configuration value is unusable (e.g. a zero buffer capacity).
    InvalidConfiguration(String),

    #[error("invalid scan range: offset {offset} + length {length} exceeds document length {document_length}")]
    /// A scan range does not fit inside the document.
    InvalidRange {
        /// Requested start offset.
        offset: usize,
        /// Requested length.
        length: usize,
        /// Length of the document at the time of the request.
        document_length: usize,
    },

    #[error("pop_range called without a matching push_range")]
    /// Unbalanced `push_range`/`pop_range`.
    RangeStackUnderflow,

    #[error("pop_begin_end_rule called on an empty begin/end rule stack")]
    /// Unbalanced `push_begin_end_rule`/`pop_begin_end_rule`.
    BeginEndStackUnderflow,

    #[error("YAML config error: {0}")]
    /// Scanner configuration could not be parsed.
    Config(#[from] serde_yaml::Error),

    #[error("document cannot serve offset {offset} inside the scan range")]
    /// A char inside the scan range could not be read from the document.
    Unreadable {
        /// Offset that could not be read.
        offset: usize,
    },

    #[error("invalid rule pattern: {0}")]
    /// A rule pattern failed to compile.
    InvalidPattern(#[from] regex_automata::meta::BuildError),
}
