//! Error types for lineindex.

use thiserror::Error;

use crate::common::NodeId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in lineindex.
#[derive(Debug, Error)]
pub enum Error {
    /// The index or data file cannot be opened, read, or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted line has the wrong field count or a non-numeric field.
    ///
    /// `line` is the 1-based line of the index file.
    #[error("malformed index line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Navigation hit a state a well-formed tree cannot contain.
    ///
    /// This indicates index corruption (or a bug).
    #[error("inconsistent index at {node}: {reason}")]
    Logic { node: NodeId, reason: String },

    /// The caller asked for something the index does not support.
    #[error("invalid usage: {0}")]
    Usage(String),
}

impl Error {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Error::Parse {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn logic(node: NodeId, reason: impl Into<String>) -> Self {
        Error::Logic {
            node,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::parse(7, "expected 6 fields, found 4");
        assert_eq!(
            format!("{}", err),
            "malformed index line 7: expected 6 fields, found 4"
        );

        let err = Error::logic(NodeId::new(3), "null child id");
        assert_eq!(format!("{}", err), "inconsistent index at Node(3): null child id");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: Error = io_err.into();
        assert!(err.source().is_some());
        assert!(Error::Usage("order".into()).source().is_none());
    }
}
