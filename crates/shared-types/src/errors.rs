//! # Error Types
//!
//! Errors raised while reading the binary layouts defined in this crate.

use thiserror::Error;

/// Errors from the low-level byte reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Input ended before a field could be read.
    #[error("Unexpected end of input: needed {needed} bytes at offset {offset}, {available} available")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A variable-length integer ran past 10 bytes or overflowed 64 bits.
    #[error("Malformed VLQ integer at offset {offset}")]
    VlqOverflow { offset: usize },
}

/// Errors parsing a serialized block header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Underlying read failed.
    #[error("Header read failed: {0}")]
    Read(#[from] ReadError),

    /// Declared PoW solution length exceeds the protocol limit.
    #[error("PoW solution too large: {length} bytes > {max} bytes")]
    PowSolutionTooLarge { length: u64, max: usize },
}

/// Errors parsing or declaring system parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParametersError {
    /// Parameter value in an extension field is not a 4-byte integer.
    #[error("Invalid value length for parameter {id}: {length} bytes, expected 4")]
    InvalidValueLength { id: i8, length: usize },

    /// The same parameter was declared twice.
    #[error("Duplicate declaration of parameter {id}")]
    DuplicateParameter { id: i8 },

    /// Extension section declares no system parameters.
    #[error("Parameters table is empty")]
    EmptyTable,

    /// Serialized table ids are not strictly ascending.
    #[error("Parameter table out of order: {id} follows {previous}")]
    UnorderedTable { previous: i8, id: i8 },

    /// Bytes left over that do not form a whole table entry.
    #[error("Trailing bytes after parameters table: {count}")]
    TrailingBytes { count: usize },

    /// Underlying read failed.
    #[error("Parameters read failed: {0}")]
    Read(#[from] ReadError),
}

/// Errors parsing a state digest from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    #[error("Invalid hex digest: {0}")]
    InvalidHex(String),

    #[error("Invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
