//! # Error
//!
//! Covers all errors in our module. These errors arise while opening
//! BAM files and their indices, seeking to regions, and reading and
//! classifying alignment records. We convert errors from other packages
//! to this error type so that error handling in our package becomes easier.

use std::io;
use std::num::TryFromIntError;
use thiserror::Error;

/// Enum that covers errors in our module.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Alignment file cannot be opened, or is not a BAM file
    #[error("cannot open alignment file '{path}': {msg}")]
    OpenError {
        /// Path of the alignment file
        path: String,
        /// What went wrong
        msg: String,
    },

    /// Index is missing, unreadable, or does not match the alignment file
    #[error("cannot load index '{path}': {msg}")]
    IndexError {
        /// Path of the index file
        path: String,
        /// What went wrong
        msg: String,
    },

    /// Header embedded in the alignment file cannot be parsed
    #[error("cannot parse alignment header: {0}")]
    HeaderError(String),

    /// Region lookup is impossible e.g. unknown reference or bad coordinates
    #[error("cannot seek to region '{region}': {msg}")]
    SeekError {
        /// The region as requested by the caller
        region: String,
        /// What went wrong
        msg: String,
    },

    /// Misuse of an API, such as classifying an empty record or
    /// building an iterator on a released file
    #[error("precondition violated: {0}")]
    PreconditionError(String),

    /// A record in the file could not be decoded. This is a file
    /// integrity problem and is never skipped silently.
    #[error("malformed alignment record: `{0}`")]
    CorruptRecord(#[source] rust_htslib::errors::Error),

    /// Read is unmapped, use this whenever some function
    /// meant for a mapped read is called on an unmapped read
    #[error("read is unmapped")]
    Unmapped,

    /// Read id of molecule is invalid
    #[error("invalid read id")]
    InvalidReadID,

    /// Contig and coordinates of a region string are invalid
    #[error("invalid alignment coordinates (contig/start/end)")]
    InvalidAlignCoords,

    /// Interval string is not of the form `start-end` or `start-`
    #[error("interval parse error: `{0}`")]
    IntervalParseError(String),

    /// General error when ordering of items in some context is wrong.
    #[error("items in wrong order")]
    WrongOrder,

    /// Parallel region columns supplied by a caller differ in length
    #[error("region columns differ in length: {tids} ids, {starts} starts, {ends} ends")]
    RegionColumnMismatch {
        /// Number of reference ids or names
        tids: usize,
        /// Number of start coordinates
        starts: usize,
        /// Number of end coordinates
        ends: usize,
    },

    /// Error upon conversion from integer
    #[error("integer conversion error: `{0}`")]
    IntConversionError(#[from] TryFromIntError),

    /// Error parsing JSON
    #[error("JSON parsing error: `{0}`")]
    JsonParseError(#[from] serde_json::Error),

    /// Generic Input-Output error
    #[error("input output error: `{0}`")]
    InputOutputError(#[from] io::Error),
}
