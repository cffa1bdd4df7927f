//! Core domain types for the caregate approval chain.
//!
//! This module contains pure domain types with no chain dependencies:
//! - Fixed-point monetary amounts
//! - The approval request and its outcome transitions
//! - Roles and permissions

pub mod amount;
pub mod permission;
pub mod request;
