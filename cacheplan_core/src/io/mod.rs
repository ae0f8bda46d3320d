//! Module for reading problem instances and writing submissions
pub mod instance_read;
pub mod submission;

use std::path::PathBuf;

use thiserror::Error;

/// Error for a malformed instance or submission file
///
/// Line indices are zero-based, counting every line of the input including
/// blank ones, so they point directly at the offending line of the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The input ended before the record that should start at `line`
    #[error("line {line}: unexpected end of input")]
    UnexpectedEnd {
        /// Index of the missing line
        line: usize,
    },
    /// A line held the wrong number of whitespace-delimited fields
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// Index of the offending line
        line: usize,
        /// Number of fields the record requires
        expected: usize,
        /// Number of fields actually present
        found: usize,
    },
    /// A field could not be parsed as a non-negative integer
    #[error("line {line}: invalid integer `{token}`")]
    InvalidInteger {
        /// Index of the offending line
        line: usize,
        /// The token that failed to parse
        token: String,
    },
    /// A value that must be strictly positive was zero
    #[error("line {line}: {what} must be positive")]
    NonPositive {
        /// Index of the offending line
        line: usize,
        /// Which value was zero
        what: &'static str,
    },
    /// An entity id referred outside its declared range
    #[error("line {line}: {what} id {id} out of range (limit {limit})")]
    IdOutOfRange {
        /// Index of the offending line
        line: usize,
        /// Which kind of id was out of range
        what: &'static str,
        /// The offending id
        id: usize,
        /// Exclusive upper bound for the id
        limit: usize,
    },
    /// The same video id appeared twice on one submission cache line
    #[error("line {line}: duplicate video id {video}")]
    DuplicateVideo {
        /// Index of the offending line
        line: usize,
        /// The repeated video id
        video: usize,
    },
}

/// Error for a file that could not be read or written
#[derive(Error, Debug)]
#[error("{path}: {source}")]
pub struct IoError {
    /// Path of the file involved
    pub path: PathBuf,
    /// The underlying io error
    #[source]
    pub source: std::io::Error,
}

impl IoError {
    pub(crate) fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError {
            path: path.into(),
            source,
        }
    }
}
