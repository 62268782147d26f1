//! # Quantum-Chain Test Suite
//!
//! Cross-crate tests for the state context subsystem.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (apply_block, codec)
//! └── src/
//!     ├── fixtures.rs   # Block and chain builders shared by all tests
//!     └── integration/  # Multi-block flows, codec round-trips, properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # With logs
//! RUST_LOG=debug cargo test -p qc-tests -- --nocapture
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```
