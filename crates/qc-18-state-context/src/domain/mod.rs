//! # Domain Module
//!
//! Core domain types for the State Context subsystem.

pub mod errors;
pub mod state_context;
pub mod vote_tally;

pub use errors::*;
pub use state_context::*;
pub use vote_tally::*;
