//! Error types for kmer-counter.
//!
//! Every fallible operation in the library returns [`KmerCounterError`]. The
//! smaller [`KmerLengthError`] and [`InvalidBaseError`] are produced by the
//! validating constructors and convert into it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, counting, or writing k-mers.
#[derive(Debug, Error)]
pub enum KmerCounterError {
    /// The input is not well-formed (sequence before a header, too few BED
    /// fields, or no records at all).
    #[error("malformed input at line {line}: {details}")]
    MalformedInput { line: usize, details: String },

    /// K-mer length is zero.
    #[error("invalid k-mer length {k}: must be at least 1")]
    InvalidKmerLength { k: usize },

    /// A parameter combination that cannot be honoured.
    #[error("invalid parameter: {details}")]
    InvalidParameter { details: String },

    /// An ambiguous or invalid base was found while the strict policy is active.
    #[error("record '{record}': {source}")]
    AmbiguousBase {
        record: String,
        #[source]
        source: InvalidBaseError,
    },

    /// Failed to open or read the input file.
    #[error("failed to read input '{path}': {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to read from or write to a stream.
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    /// Failed to build the worker pool.
    #[error("failed to build thread pool: {source}")]
    ThreadPool {
        #[source]
        source: rayon::ThreadPoolBuildError,
    },

    /// A blocking task panicked or was cancelled.
    #[cfg(feature = "async")]
    #[error("counting task failed: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl KmerCounterError {
    pub(crate) fn malformed(line: usize, details: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            details: details.into(),
        }
    }

    pub(crate) fn parameter(details: impl Into<String>) -> Self {
        Self::InvalidParameter {
            details: details.into(),
        }
    }
}

/// Error for invalid k-mer length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be at least 1")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
}

/// Error for an ambiguous or invalid base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The offending byte value.
    pub base: u8,
    /// Position of the byte in the record's sequence.
    pub position: usize,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_ascii_graphic() || self.base == b' ' {
            write!(
                f,
                "invalid base '{}' (0x{:02x}) at position {}",
                self.base as char, self.base, self.position
            )
        } else {
            write!(
                f,
                "invalid base 0x{:02x} at position {}",
                self.base, self.position
            )
        }
    }
}

impl std::error::Error for InvalidBaseError {}

impl From<std::io::Error> for KmerCounterError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

impl From<serde_json::Error> for KmerCounterError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

impl From<rayon::ThreadPoolBuildError> for KmerCounterError {
    fn from(source: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool { source }
    }
}

#[cfg(feature = "async")]
impl From<tokio::task::JoinError> for KmerCounterError {
    fn from(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }
}

impl From<KmerLengthError> for KmerCounterError {
    fn from(err: KmerLengthError) -> Self {
        Self::InvalidKmerLength { k: err.k }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kmer_length_error_display() {
        let err = KmerLengthError { k: 0 };
        assert_eq!(
            err.to_string(),
            "k-mer length 0 is out of range: must be at least 1"
        );
    }

    #[test]
    fn invalid_base_error_display() {
        let err = InvalidBaseError {
            base: b'N',
            position: 5,
        };
        assert_eq!(err.to_string(), "invalid base 'N' (0x4e) at position 5");

        let err = InvalidBaseError {
            base: 0x07,
            position: 1,
        };
        assert_eq!(err.to_string(), "invalid base 0x07 at position 1");
    }

    #[test]
    fn error_from_kmer_length_error() {
        let err: KmerCounterError = KmerLengthError { k: 0 }.into();
        assert!(matches!(err, KmerCounterError::InvalidKmerLength { k: 0 }));
    }

    #[test]
    fn malformed_input_display() {
        let err = KmerCounterError::malformed(3, "sequence data before any header");
        assert_eq!(
            err.to_string(),
            "malformed input at line 3: sequence data before any header"
        );
    }

    #[test]
    fn ambiguous_base_names_record() {
        let err = KmerCounterError::AmbiguousBase {
            record: "chr1".to_string(),
            source: InvalidBaseError {
                base: b'N',
                position: 2,
            },
        };
        assert_eq!(
            err.to_string(),
            "record 'chr1': invalid base 'N' (0x4e) at position 2"
        );
    }
}
