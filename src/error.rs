//! Error types for bench-surface operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, rendering or displaying a chart.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The CSV reader could not tokenize the input.
    #[error("CSV error at line {line}: {message}")]
    Csv {
        /// 1-based line of the offending record.
        line: u64,
        /// Reader message.
        message: String,
    },

    /// A cell did not parse as a finite number.
    #[error("non-numeric value {value:?} at line {line}, column {column}")]
    NonNumeric {
        /// 1-based line of the offending record.
        line: u64,
        /// 1-based column of the offending cell.
        column: usize,
        /// Raw cell text.
        value: String,
    },

    /// A data row has a different number of cells than the header.
    #[error("row at line {line} has {found} columns, expected {expected}")]
    NonRectangular {
        /// 1-based line of the offending record.
        line: u64,
        /// Column count taken from the header row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Invalid dimensions for framebuffer or canvas.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Chart configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// The viewer backend could not be started.
    #[error("viewer error: {0}")]
    Viewer(String),
}

impl From<serde_yaml_ng::Error> for Error {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_non_rectangular_display() {
        let err = Error::NonRectangular { line: 3, expected: 3, found: 2 };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("expected 3"));
    }

    #[test]
    fn test_non_numeric_display() {
        let err = Error::NonNumeric { line: 2, column: 1, value: "abc".to_string() };
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn test_io_from() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
