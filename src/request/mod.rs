//! Request aggregate - domain model and outcome transitions.
//!
//! This module re-exports types from `domain::request`.
//! See that module for the actual implementations.

// Re-export all request types
pub use crate::domain::amount::Amount;
pub use crate::domain::request::state::*;
