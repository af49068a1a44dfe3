use compact_str::CompactString;

/// Errors surfaced by selector compilation, evaluation and context
/// construction.
///
/// Selector syntax problems are reported eagerly when an operation
/// compiles its selector argument, before any node is visited. A missing
/// attribute or an empty result set is never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Index-addressed access or mutation outside the list bounds.
    #[error("index {index} out of bounds for node list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Document construction from text or file failed. The message comes
    /// from the parsing adapter and is surfaced unchanged.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A quoted string in a selector ran past the end of the input.
    #[error("unterminated string in selector")]
    UnterminatedString,

    /// The selector text does not reduce to the grammar.
    #[error("unexpected token in selector: {0:?}")]
    UnexpectedToken(CompactString),

    /// A selector referenced a namespace prefix that was never registered
    /// on the context. Detected at evaluation time.
    #[error("unknown namespace prefix: {0:?}")]
    UnknownNamespacePrefix(CompactString),
}

pub type Result<T> = core::result::Result<T, Error>;
