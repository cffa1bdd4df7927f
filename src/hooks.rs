//! Side channels consumed by the approval chain.
//!
//! The chain reports every terminal decision to an [`AuditSink`] and raises
//! department alerts through a [`Notifier`]. Both are external collaborators:
//! the chain only holds them as shared capabilities and never depends on their
//! result. Implementations must be safe to call from several threads at once,
//! since a single chain may serve concurrent callers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::request::{Amount, RequestId, RequestType};

/// A single audit record handed to an [`AuditSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// Name of the tier that made the decision
    pub tier: String,
    pub request_id: RequestId,
    pub request_type: RequestType,
    pub timestamp: DateTime<Utc>,
    /// Set for rejections only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Receives an entry for every approval and rejection made by a tier.
pub trait AuditSink: Send + Sync {
    fn log_approval(&self, entry: &AuditEntry);
    fn log_rejection(&self, entry: &AuditEntry);
}

/// Departments that can be alerted when a tier approves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    It,
    Finance,
    Pharmacy,
    Surgery,
    HumanResources,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::It => "it",
            Department::Finance => "finance",
            Department::Pharmacy => "pharmacy",
            Department::Surgery => "surgery",
            Department::HumanResources => "human_resources",
        }
    }
}

/// Payload of a department alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub tier: String,
    pub request_id: RequestId,
    pub request_type: RequestType,
    pub amount: Amount,
    pub message: String,
}

/// Delivers department alerts. Transport (email, SMS, pager) is up to the implementor.
pub trait Notifier: Send + Sync {
    fn notify(&self, department: Department, notification: &Notification);
}

/// The pair of side channels every link in a chain shares.
#[derive(Clone)]
pub struct Hooks {
    pub audit: Arc<dyn AuditSink>,
    pub notifier: Arc<dyn Notifier>,
}

impl Hooks {
    pub fn new(audit: Arc<dyn AuditSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self { audit, notifier }
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            audit: Arc::new(TracingAuditSink),
            notifier: Arc::new(TracingNotifier),
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

// ============================================================================
// Production Implementations
// ============================================================================

/// Audit sink that writes structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn log_approval(&self, entry: &AuditEntry) {
        tracing::info!(
            tier = %entry.tier,
            request_id = %entry.request_id,
            request_type = %entry.request_type,
            timestamp = %entry.timestamp,
            "Request approved"
        );
    }

    fn log_rejection(&self, entry: &AuditEntry) {
        tracing::info!(
            tier = %entry.tier,
            request_id = %entry.request_id,
            request_type = %entry.request_type,
            timestamp = %entry.timestamp,
            reason = entry.reason.as_deref().unwrap_or_default(),
            "Request rejected"
        );
    }
}

/// Notifier that only logs the alert it would have sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, department: Department, notification: &Notification) {
        tracing::info!(
            department = department.as_str(),
            tier = %notification.tier,
            request_id = %notification.request_id,
            amount = %notification.amount,
            "{}",
            notification.message
        );
    }
}

/// Notifier that drops every alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _department: Department, _notification: &Notification) {}
}

// ============================================================================
// In-memory Implementations
// ============================================================================

use parking_lot::Mutex;

/// One call recorded by a [`RecordingAuditSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditRecord {
    Approval(AuditEntry),
    Rejection(AuditEntry),
}

/// Audit sink that keeps every entry in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the chain
/// and inspect the other.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use caregate::hooks::{Hooks, NoOpNotifier, RecordingAuditSink};
///
/// let audit = RecordingAuditSink::new();
/// let hooks = Hooks::new(Arc::new(audit.clone()), Arc::new(NoOpNotifier));
/// assert!(audit.records().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    pub fn approvals(&self) -> Vec<AuditEntry> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                AuditRecord::Approval(e) => Some(e.clone()),
                AuditRecord::Rejection(_) => None,
            })
            .collect()
    }

    pub fn rejections(&self) -> Vec<AuditEntry> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                AuditRecord::Rejection(e) => Some(e.clone()),
                AuditRecord::Approval(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl AuditSink for RecordingAuditSink {
    fn log_approval(&self, entry: &AuditEntry) {
        self.records.lock().push(AuditRecord::Approval(entry.clone()));
    }

    fn log_rejection(&self, entry: &AuditEntry) {
        self.records.lock().push(AuditRecord::Rejection(entry.clone()));
    }
}

/// Notifier that keeps every alert in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(Department, Notification)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(Department, Notification)> {
        self.sent.lock().clone()
    }

    /// Departments alerted so far, in order.
    pub fn departments(&self) -> Vec<Department> {
        self.sent.lock().iter().map(|(d, _)| *d).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, department: Department, notification: &Notification) {
        self.sent.lock().push((department, notification.clone()));
    }
}
