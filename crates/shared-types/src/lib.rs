//! # Shared Types Crate
//!
//! Chain primitives consumed by the state context subsystem: block
//! headers, extension sections, full blocks, the system parameter table and
//! the voting settings that drive it.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type crossing the state-context
//!   boundary is defined here.
//! - **Byte-exact layouts**: each type owns its binary form. Integers are
//!   big-endian, variable lengths are VLQ, and table iteration order is
//!   fixed so every node produces identical bytes.
//! - **Deterministic updates**: `Parameters::update` is a pure function of
//!   the previous table, the epoch's votes and the voting settings.

pub mod bytes;
pub mod entities;
pub mod errors;
pub mod parameters;
pub mod voting;

pub use bytes::{put_vlq, ByteReader};
pub use entities::*;
pub use errors::*;
pub use parameters::*;
pub use voting::*;
