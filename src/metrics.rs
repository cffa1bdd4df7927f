//! Prometheus metrics for approval decisions.
//!
//! Enabled with the `prometheus` feature. [`ApprovalMetrics`] implements
//! [`AuditSink`](crate::hooks::AuditSink), so it can be handed to a chain
//! directly and will count every approval and rejection by tier and request
//! type. Forwarding and chain exhaustion are reported separately through the
//! `metrics` facade (`caregate_decisions_total`) by the chain itself.

#[cfg(feature = "prometheus")]
use prometheus::{CounterVec, Opts, Registry};

#[cfg(feature = "prometheus")]
use crate::error::Result;
#[cfg(feature = "prometheus")]
use crate::hooks::{AuditEntry, AuditSink};

/// Prometheus metrics registry for approval chains.
#[cfg(feature = "prometheus")]
#[derive(Clone)]
pub struct ApprovalMetrics {
    registry: Registry,

    // Counters (cumulative totals)
    decisions_total: CounterVec,
}

#[cfg(feature = "prometheus")]
impl ApprovalMetrics {
    /// Create a new ApprovalMetrics instance with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metrics fail to register (e.g., duplicate registration).
    pub fn new(registry: Registry) -> Result<Self> {
        let decisions_total = CounterVec::new(
            Opts::new(
                "caregate_tier_decisions_total",
                "Total number of terminal decisions by tier, request type and outcome",
            ),
            &["tier", "request_type", "outcome"],
        )
        .map_err(|e| anyhow::anyhow!("Failed to create decisions_total counter: {}", e))?;

        registry
            .register(Box::new(decisions_total.clone()))
            .map_err(|e| anyhow::anyhow!("Failed to register decisions_total: {}", e))?;

        Ok(Self {
            registry,
            decisions_total,
        })
    }

    /// Get the underlying Prometheus registry.
    ///
    /// Useful for exporting metrics via HTTP endpoint.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a terminal decision.
    pub fn record_decision(&self, tier: &str, request_type: &str, outcome: &str) {
        self.decisions_total
            .with_label_values(&[tier, request_type, outcome])
            .inc();
    }
}

#[cfg(feature = "prometheus")]
impl AuditSink for ApprovalMetrics {
    fn log_approval(&self, entry: &AuditEntry) {
        self.record_decision(&entry.tier, entry.request_type.as_str(), "approved");
    }

    fn log_rejection(&self, entry: &AuditEntry) {
        self.record_decision(&entry.tier, entry.request_type.as_str(), "rejected");
    }
}
