//! Multi-tier approval chain for clinical and administrative requests.
//!
//! A request is handed to the head of a chain of authority tiers (for example
//! Nurse → Doctor → Admin). Each tier first checks whether the request falls
//! within its jurisdiction; if not, the request is forwarded to the next tier.
//! The first tier with jurisdiction applies its policy and either approves or
//! rejects, and that decision is final. Outcomes are written back onto the
//! request, and every decision is reported to an audit sink and, for some
//! approvals, to a department notifier.

pub mod chain;
pub mod domain;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod metrics;
pub mod request;

// Re-export commonly used types
pub use chain::{ChainBuilder, ChainConfig, Preset, TierConfig};
pub use domain::permission::{Permission, Role, permissions_for_role_name};
pub use error::{CaregateError, Result};
pub use handler::{
    AdminTier, ApprovalHandler, Decision, DoctorTier, NO_HANDLER_REASON, NurseTier, Tier, TierKind,
};
pub use hooks::{AuditEntry, AuditSink, Department, Hooks, Notification, Notifier};
#[cfg(feature = "prometheus")]
pub use crate::metrics::ApprovalMetrics;
pub use request::*;
