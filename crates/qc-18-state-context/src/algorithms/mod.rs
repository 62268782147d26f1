//! # Algorithms Module
//!
//! Pure consensus rules applied to every block: vote validation and
//! parameter-epoch processing.

pub mod epoch_processor;
pub mod vote_validation;

pub use epoch_processor::process_extension;
pub use vote_validation::check_votes;
