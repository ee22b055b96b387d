//! Error types for flowtext.
//!
//! Annotation and reflow never fail. Errors only come from configuration
//! parsing and from checked document accessors used by hosts.

use std::fmt;

/// Result type alias for flowtext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for flowtext operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Mode identifier is empty or contains whitespace.
    InvalidMode(String),
    /// Fill column must be at least one.
    InvalidFillColumn(usize),
    /// Character offset past the end of the document.
    OutOfBounds { offset: usize, len: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMode(s) => write!(f, "invalid mode identifier: {s:?}"),
            Self::InvalidFillColumn(col) => write!(f, "invalid fill column: {col}"),
            Self::OutOfBounds { offset, len } => {
                write!(f, "offset {offset} out of bounds for document of {len} chars")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidMode("text mode".to_string());
        assert!(err.to_string().contains("invalid mode identifier"));

        let err = Error::InvalidFillColumn(0);
        assert!(err.to_string().contains("fill column: 0"));

        let err = Error::OutOfBounds { offset: 12, len: 4 };
        assert!(err.to_string().contains("offset 12"));
        assert!(err.to_string().contains("4 chars"));
    }
}
