//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod names;
pub mod random;
