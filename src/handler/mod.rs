//! Chain links and the tiers that sit in them.
//!
//! A chain is a singly linked list of [`ApprovalHandler`] links, each wrapping
//! one [`Tier`]. Calling [`ApprovalHandler::handle`] on the head walks the list:
//!
//! ```text
//!  request ──> [Nurse] ──can_handle? no──> [Doctor] ──can_handle? no──> [Admin]
//!                 │                           │                           │
//!                 └─yes─> decide()            └─yes─> decide()            └─yes─> decide()
//!                          ├─ Approve: approved_by = tier, on_approved, audit
//!                          └─ Reject:  rejection_reason, on_rejected, audit
//! ```
//!
//! Only a failed jurisdiction gate forwards. Once a tier has jurisdiction its
//! decision is terminal, including a rejection. If the last link has no
//! jurisdiction either, the request is rejected with
//! [`NO_HANDLER_REASON`].

use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::domain::permission::Role;
use crate::hooks::{AuditEntry, Hooks, Notifier};
use crate::request::ApprovalRequest;

pub mod admin;
pub mod doctor;
pub mod nurse;

pub use admin::AdminTier;
pub use doctor::DoctorTier;
pub use nurse::NurseTier;

/// Rejection reason recorded when no tier in the chain claims jurisdiction.
pub const NO_HANDLER_REASON: &str = "No appropriate handler found";

/// The verdict of a tier that has jurisdiction over a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve,
    /// Deny with a human-readable reason. The reason must not be empty.
    Reject(String),
}

impl Decision {
    pub fn reject(reason: impl Into<String>) -> Self {
        Decision::Reject(reason.into())
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approve)
    }
}

/// One level of approval authority.
///
/// `can_handle` is the jurisdiction gate and only grants the right to inspect.
/// `decide` applies the tier's policy and may still deny. The hooks run after
/// the outcome has been written to the request; they are side effects and
/// cannot change the decision.
///
/// Tiers hold only configuration fixed at construction, so a chain can be
/// shared between threads as long as the [`Hooks`] are.
pub trait Tier: Send + Sync {
    /// Name recorded as `approved_by` and in audit entries.
    fn name(&self) -> &str;

    fn can_handle(&self, request: &ApprovalRequest) -> bool;

    fn decide(&self, request: &ApprovalRequest) -> Decision;

    fn on_approved(&self, _request: &ApprovalRequest, _notifier: &dyn Notifier) {}

    fn on_rejected(&self, _request: &ApprovalRequest, _notifier: &dyn Notifier) {}
}

/// Built-in tier kinds, used by the chain config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKind {
    Nurse,
    Doctor,
    Admin,
}

impl TierKind {
    /// The staff role whose authority this tier exercises.
    pub fn role(&self) -> Role {
        match self {
            TierKind::Nurse => Role::Nurse,
            TierKind::Doctor => Role::Doctor,
            TierKind::Admin => Role::Admin,
        }
    }

    pub(crate) fn build(&self, name: impl Into<String>) -> Box<dyn Tier> {
        match self {
            TierKind::Nurse => Box::new(NurseTier::new(name)),
            TierKind::Doctor => Box::new(DoctorTier::new(name)),
            TierKind::Admin => Box::new(AdminTier::new(name)),
        }
    }
}

/// A link in an approval chain.
///
/// Links are only created by [`crate::chain::ChainBuilder`], which appends in
/// call order and never links back, so every chain is acyclic.
pub struct ApprovalHandler {
    tier: Box<dyn Tier>,
    next: Option<Box<ApprovalHandler>>,
    hooks: Hooks,
}

impl ApprovalHandler {
    pub(crate) fn new(tier: Box<dyn Tier>, hooks: Hooks) -> Self {
        Self {
            tier,
            next: None,
            hooks,
        }
    }

    /// Attach `link` after the current tail.
    pub(crate) fn append(&mut self, link: ApprovalHandler) {
        if let Some(next) = &mut self.next {
            next.append(link);
        } else {
            self.next = Some(Box::new(link));
        }
    }

    pub fn tier(&self) -> &dyn Tier {
        self.tier.as_ref()
    }

    pub fn next(&self) -> Option<&ApprovalHandler> {
        self.next.as_deref()
    }

    /// Iterate over the links from this one to the tail.
    pub fn links(&self) -> impl Iterator<Item = &ApprovalHandler> {
        std::iter::successors(Some(self), |link| link.next())
    }

    /// Tier names in evaluation order.
    pub fn tier_names(&self) -> Vec<&str> {
        self.links().map(|link| link.tier.name()).collect()
    }

    /// Run `request` through the chain starting at this link.
    ///
    /// Any outcome from an earlier traversal is cleared first, so resubmitting
    /// a request re-evaluates it from the top and overwrites `approved_by`,
    /// `approval_time` and `rejection_reason`.
    pub fn handle(&self, request: &mut ApprovalRequest) {
        request.begin_traversal();

        let mut link = self;
        loop {
            let tier = link.tier.name();
            tracing::debug!(
                tier = tier,
                request_id = %request.id(),
                request_type = %request.request_type(),
                "Processing request"
            );

            if link.tier.can_handle(request) {
                link.conclude(request);
                return;
            }

            match link.next.as_deref() {
                Some(next) => {
                    tracing::trace!(
                        tier = tier,
                        next = next.tier.name(),
                        request_id = %request.id(),
                        "Outside jurisdiction, forwarding"
                    );
                    counter!("caregate_decisions_total", "tier" => tier.to_string(), "outcome" => "forwarded")
                        .increment(1);
                    link = next;
                }
                None => {
                    request.reject(NO_HANDLER_REASON);
                    tracing::warn!(
                        tier = tier,
                        request_id = %request.id(),
                        request_type = %request.request_type(),
                        amount = %request.amount(),
                        "No tier claimed jurisdiction"
                    );
                    counter!("caregate_decisions_total", "tier" => tier.to_string(), "outcome" => "exhausted")
                        .increment(1);
                    return;
                }
            }
        }
    }

    fn conclude(&self, request: &mut ApprovalRequest) {
        let tier = self.tier.name();

        match self.tier.decide(request) {
            Decision::Approve => {
                request.approve(tier);
                self.tier.on_approved(request, self.hooks.notifier.as_ref());
                self.hooks.audit.log_approval(&self.audit_entry(request));

                tracing::debug!(
                    tier = tier,
                    request_id = %request.id(),
                    request_type = %request.request_type(),
                    amount = %request.amount(),
                    "Request approved"
                );
                counter!("caregate_decisions_total", "tier" => tier.to_string(), "outcome" => "approved")
                    .increment(1);
            }
            Decision::Reject(reason) => {
                if reason.trim().is_empty() {
                    tracing::error!(
                        tier = tier,
                        request_id = %request.id(),
                        "Tier rejected a request without giving a reason"
                    );
                }
                debug_assert!(
                    !reason.trim().is_empty(),
                    "tier '{}' rejected request {} without a reason",
                    tier,
                    request.id()
                );

                request.reject(reason);
                self.tier.on_rejected(request, self.hooks.notifier.as_ref());
                self.hooks.audit.log_rejection(&self.audit_entry(request));

                tracing::debug!(
                    tier = tier,
                    request_id = %request.id(),
                    request_type = %request.request_type(),
                    reason = request.rejection_reason().unwrap_or_default(),
                    "Request rejected"
                );
                counter!("caregate_decisions_total", "tier" => tier.to_string(), "outcome" => "rejected")
                    .increment(1);
            }
        }
    }

    fn audit_entry(&self, request: &ApprovalRequest) -> AuditEntry {
        AuditEntry {
            tier: self.tier.name().to_string(),
            request_id: request.id(),
            request_type: request.request_type(),
            timestamp: request.approval_time().unwrap_or_else(chrono::Utc::now),
            reason: request.rejection_reason().map(str::to_string),
        }
    }
}

impl std::fmt::Debug for ApprovalHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalHandler")
            .field("tiers", &self.tier_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::hooks::{NoOpNotifier, RecordingAuditSink, TracingAuditSink};
    use crate::request::{Amount, RequestType};

    /// Tier with a fixed gate answer and a fixed decision.
    struct StubTier {
        name: &'static str,
        claims: bool,
        decision: Decision,
    }

    impl Tier for StubTier {
        fn name(&self) -> &str {
            self.name
        }

        fn can_handle(&self, _request: &ApprovalRequest) -> bool {
            self.claims
        }

        fn decide(&self, _request: &ApprovalRequest) -> Decision {
            self.decision.clone()
        }
    }

    fn link(name: &'static str, claims: bool, decision: Decision, hooks: &Hooks) -> ApprovalHandler {
        ApprovalHandler::new(
            Box::new(StubTier {
                name,
                claims,
                decision,
            }),
            hooks.clone(),
        )
    }

    fn request() -> ApprovalRequest {
        ApprovalRequest::new(
            RequestType::Treatment,
            Amount::from_major(10),
            "tester",
            "physiotherapy",
        )
    }

    #[test]
    fn test_forwards_only_on_failed_gate() {
        let audit = RecordingAuditSink::new();
        let hooks = Hooks::new(Arc::new(audit.clone()), Arc::new(NoOpNotifier));

        let mut head = link("first", false, Decision::Approve, &hooks);
        head.append(link("second", true, Decision::reject("second says no"), &hooks));
        head.append(link("third", true, Decision::Approve, &hooks));

        let mut request = request();
        head.handle(&mut request);

        assert!(!request.approved());
        assert_eq!(request.rejection_reason(), Some("second says no"));
        assert_eq!(audit.rejections().len(), 1);
        assert_eq!(audit.rejections()[0].tier, "second");
        assert!(audit.approvals().is_empty());
    }

    #[test]
    fn test_exhausted_chain_rejects_without_audit() {
        let audit = RecordingAuditSink::new();
        let hooks = Hooks::new(Arc::new(audit.clone()), Arc::new(NoOpNotifier));

        let mut head = link("first", false, Decision::Approve, &hooks);
        head.append(link("second", false, Decision::Approve, &hooks));

        let mut request = request();
        head.handle(&mut request);

        assert!(!request.approved());
        assert!(request.approved_by().is_none());
        assert_eq!(request.rejection_reason(), Some(NO_HANDLER_REASON));
        assert!(audit.records().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let hooks = Hooks::default();
        let mut head = link("a", false, Decision::Approve, &hooks);
        head.append(link("b", false, Decision::Approve, &hooks));
        head.append(link("c", true, Decision::Approve, &hooks));

        assert_eq!(head.tier_names(), vec!["a", "b", "c"]);
        assert_eq!(head.next().map(|n| n.tier().name()), Some("b"));
    }

    #[test]
    #[should_panic(expected = "without a reason")]
    fn test_rejection_without_reason_is_caught() {
        let hooks = Hooks::default();
        let head = link("sloppy", true, Decision::reject("  "), &hooks);
        head.handle(&mut request());
    }

    /// Counts INFO events seen while installed.
    #[derive(Clone, Default)]
    struct InfoCounter(Arc<std::sync::atomic::AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for InfoCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() == tracing::Level::INFO {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_decision_logged_once_at_info_with_tracing_sink() {
        use tracing_subscriber::layer::SubscriberExt;

        let counter = InfoCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let hooks = Hooks::new(Arc::new(TracingAuditSink), Arc::new(NoOpNotifier));

        tracing::subscriber::with_default(subscriber, || {
            let approve = link("approver", true, Decision::Approve, &hooks);
            approve.handle(&mut request());
            let deny = link("denier", true, Decision::reject("no"), &hooks);
            deny.handle(&mut request());
        });

        assert_eq!(counter.0.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_tier_kind_roles() {
        assert_eq!(TierKind::Nurse.role(), Role::Nurse);
        assert_eq!(TierKind::Admin.role(), Role::Admin);
        assert_eq!(TierKind::Doctor.build("Dr. Who").name(), "Dr. Who");
    }
}
