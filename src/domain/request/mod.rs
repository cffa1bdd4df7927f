//! Request aggregate - domain model and outcome transitions.
//!
//! This module contains the core domain logic for requests:
//! - Request types, priorities and identifiers
//! - The outcome recorded by the chain
//! - Caller input and its validation

pub mod state;
pub mod transitions;

// Re-export commonly used types
pub use state::*;
