//! Definition of errors.

use crate::WordId;

/// A specialized Result type for this crate.
pub type Result<T, E = HmmAlignError> = std::result::Result<T, E>;

/// The error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum HmmAlignError {
    /// A source word has no entry at all in the lexical table.
    ///
    /// Decoding of the sentence pair is aborted; the word is never treated as
    /// having probability zero.
    #[error("no lexical probabilities for source word {source_id}")]
    MissingLexicalEntry { source_id: WordId },

    /// A record of a model file does not follow its format.
    #[error("malformed {model} record at line {line}: {msg}")]
    MalformedModelRecord {
        model: &'static str,
        line: usize,
        msg: String,
    },

    /// A phrase alignment refers to positions outside the sentence pair.
    #[error("invalid phrase alignment: {0}")]
    InvalidConstraint(String),

    /// A decoder input line cannot be parsed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Standard I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HmmAlignError {
    pub(crate) fn malformed<S>(model: &'static str, line: usize, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::MalformedModelRecord {
            model,
            line,
            msg: msg.into(),
        }
    }
}
