//! # Bio Commander Test Utilities
//!
//! Shared testing utilities for the engine crates:
//! - Determinism test harness
//! - Game state fixtures
//! - Property-based testing strategies
//! - Test log initialisation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod logging;

pub use logging::init_tracing;

/// Re-export proptest for convenience.
pub use proptest;
