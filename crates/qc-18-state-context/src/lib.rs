//! # QC-18 State Context
//!
//! Consensus state carried from block to block by a validating node.
//!
//! **Subsystem ID:** 18
//! **Architecture:** Pure domain core (no I/O, no async)
//!
//! ## Purpose
//!
//! Validate and apply each block's contribution to consensus state:
//! - Keep a bounded window of the most recent headers
//! - Collect on-chain parameter votes over a voting epoch
//! - Recompute the parameter table at each epoch boundary and check it
//!   against the table the block declares
//! - Persist and restore the whole context in a fixed binary layout
//!
//! ## Block Processing
//!
//! | Step | Failure |
//! |------|---------|
//! | Height extends the tip by one | `OutOfOrderBlock` |
//! | Header votes are well-formed | `TooManyVotes`, `DoubleVote`, `ContradictoryVotes`, `UnrecognizedVote` |
//! | Epoch boundary: declared table matches recomputed one | `ParameterParseFailure`, `ParameterMismatch` |
//!
//! A rejected block leaves the current context unchanged.
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-state-context/
//! ├── domain/          # StateContext, VoteTally, errors
//! ├── algorithms/      # Vote validation, parameter epoch processing
//! ├── codec.rs         # StateContextCodec
//! └── config.rs        # StateContextConfig
//! ```

#![warn(clippy::all)]

pub mod algorithms;
pub mod codec;
pub mod config;
pub mod domain;

// Re-exports
pub use algorithms::{check_votes, process_extension};
pub use codec::StateContextCodec;
pub use config::{ConfigError, StateContextConfig};
pub use domain::{
    CodecError, CodecResult, ConsensusError, ConsensusResult, StateContext, VoteTally,
    GENESIS_HEIGHT, LAST_HEADERS_IN_CONTEXT,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
