//! # Domain Errors
//!
//! Two taxonomies: `ConsensusError` rejects a block (the node keeps its
//! current context), `CodecError` rejects persisted or received bytes.

use shared_types::{HeaderError, ParameterId, ParametersError, ReadError};
use thiserror::Error;

/// Block-level consensus failures. Every variant is fatal to the transition
/// and harmless to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// More parameter votes than a header may carry.
    #[error("Too many votes: {count} > {max}")]
    TooManyVotes { count: usize, max: usize },

    /// The same id voted twice in one header.
    #[error("Double vote for parameter {id}")]
    DoubleVote { id: ParameterId },

    /// An id and its negation voted in one header.
    #[error("Contradictory votes for parameter {id}")]
    ContradictoryVotes { id: ParameterId },

    /// Vote for an unknown parameter at an epoch start.
    #[error("Vote for unrecognized parameter {id}")]
    UnrecognizedVote { id: ParameterId },

    /// Genesis block declares extension data.
    #[error("Genesis block carries {count} mandatory extension fields")]
    MandatoryFieldsInGenesis { count: usize },

    /// Declared parameters disagree with the locally recomputed table.
    #[error("Parameter mismatch for {id}: calculated {calculated:?}, declared {declared:?}")]
    ParameterMismatch {
        id: ParameterId,
        calculated: Option<i32>,
        declared: Option<i32>,
    },

    /// Extension parameter declarations are malformed.
    #[error("Failed to parse declared parameters: {0}")]
    ParameterParseFailure(#[from] ParametersError),

    /// Block does not extend the tip by exactly one.
    #[error("Improper block applied: expected height {expected}, got {actual}")]
    OutOfOrderBlock { expected: u32, actual: u32 },

    /// Header carries a PoW solution the context codec cannot store.
    #[error("PoW solution too large: {length} bytes > {max} bytes")]
    PowSolutionTooLarge { length: usize, max: usize },
}

/// Result type for state transitions.
pub type ConsensusResult<T> = Result<T, ConsensusError>;

/// Failures encoding or decoding a serialized state context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input ended inside a fixed field.
    #[error("Truncated state context: {0}")]
    Truncated(#[from] ReadError),

    /// Headers section length is negative.
    #[error("Negative headers section length: {length}")]
    NegativeHeadersLength { length: i32 },

    /// Header runs past the end of the headers section.
    #[error("Header {index} overruns the headers section")]
    HeaderOverrun { index: usize },

    /// Header record is malformed.
    #[error("Malformed header {index}: {source}")]
    Header { index: usize, source: HeaderError },

    /// More headers than the context window holds.
    #[error("Too many headers: {count} > {max}")]
    TooManyHeaders { count: usize, max: usize },

    /// Header heights do not decrease by one from head to tail.
    #[error("Non-contiguous headers at index {index}: expected height {expected}, got {actual}")]
    NonContiguousHeaders {
        index: usize,
        expected: u32,
        actual: u32,
    },

    /// Vote tally contains a placeholder, duplicate or contradictory id.
    #[error("Invalid vote tally entry for parameter {id}")]
    InvalidVoteTally { id: ParameterId },

    /// Parameter table is malformed.
    #[error("Malformed parameters: {0}")]
    Parameters(#[from] ParametersError),

    /// Headers section does not fit its 32-bit length prefix.
    #[error("Headers section too large: {length} bytes")]
    HeadersTooLarge { length: usize },
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
