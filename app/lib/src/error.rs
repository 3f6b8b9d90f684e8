//! Error types for the fastmatch engine.
//!
//! This module defines all error types that can occur during pattern
//! compilation and matching operations.

use thiserror::Error;

/// Main error type for the fastmatch engine.
///
/// All fallible operations return `Result<T, MatchError>`.
///
/// Failures are local to the call that triggered them: a compile error never
/// partially constructs a pattern, and a bad input never corrupts the cache
/// or the dispatch statistics.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Pattern failed to parse under the supported grammar.
    ///
    /// Contains the byte position in the pattern where the error occurred.
    #[error("pattern syntax error at position {position}: {message}")]
    PatternSyntax {
        /// Byte position in the pattern where the error occurred
        position: usize,
        /// Description of the syntax error
        message: String,
    },

    /// Input bytes are not valid UTF-8.
    ///
    /// Surfaced by the byte-slice entry points; the `&str` API cannot
    /// produce this error.
    #[error("invalid UTF-8 in input at byte {position}")]
    InvalidEncoding {
        /// Byte offset of the first invalid sequence
        position: usize,
    },
}

/// Type alias for Results using `MatchError`.
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_syntax_display() {
        let error = MatchError::PatternSyntax {
            position: 4,
            message: "trailing backslash".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("position 4"));
        assert!(display.contains("trailing backslash"));
    }

    #[test]
    fn test_invalid_encoding_display() {
        let error = MatchError::InvalidEncoding { position: 7 };
        let display = format!("{}", error);
        assert!(display.contains("byte 7"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MatchError>();
    }
}
