//! Outcome transitions for approval requests.
//!
//! ```text
//!                 ┌──approve(tier)──> approved (approved_by, approval_time)
//! fresh / reset ──┤
//!                 └──reject(reason)─> rejected (rejection_reason)
//! ```
//!
//! Every traversal starts with [`ApprovalRequest::begin_traversal`], so a
//! request resubmitted through a chain is evaluated from scratch and the
//! previous outcome is overwritten. Only the chain calls these transitions.

use chrono::Utc;

use super::state::{ApprovalRequest, Outcome};

impl ApprovalRequest {
    /// True once a tier approved the request or a rejection reason was recorded.
    pub fn is_terminal(&self) -> bool {
        self.outcome.approved
            || self
                .outcome
                .rejection_reason
                .as_deref()
                .is_some_and(|reason| !reason.is_empty())
    }

    /// Clear the outcome of any earlier traversal.
    pub(crate) fn begin_traversal(&mut self) {
        self.outcome = Outcome::default();
    }

    pub(crate) fn approve(&mut self, tier: &str) {
        self.outcome = Outcome {
            approved: true,
            approved_by: Some(tier.to_string()),
            approval_time: Some(Utc::now()),
            rejection_reason: None,
        };
    }

    pub(crate) fn reject(&mut self, reason: impl Into<String>) {
        self.outcome = Outcome {
            approved: false,
            approved_by: None,
            approval_time: None,
            rejection_reason: Some(reason.into()),
        };
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::amount::Amount;
    use crate::domain::request::state::{ApprovalRequest, RequestType};

    fn request() -> ApprovalRequest {
        ApprovalRequest::new(
            RequestType::Billing,
            Amount::from_major(300),
            "billing-office",
            "invoice correction",
        )
    }

    #[test]
    fn test_approve_sets_approval_fields() {
        let mut request = request();
        let before = chrono::Utc::now();
        request.approve("Chief Doctor");

        assert!(request.is_terminal());
        assert!(request.approved());
        assert_eq!(request.approved_by(), Some("Chief Doctor"));
        assert!(request.approval_time().unwrap() >= before);
        assert!(request.rejection_reason().is_none());
    }

    #[test]
    fn test_reject_clears_approval_fields() {
        let mut request = request();
        request.approve("Chief Doctor");
        request.reject("No appropriate handler found");

        assert!(request.is_terminal());
        assert!(!request.approved());
        assert!(request.approved_by().is_none());
        assert!(request.approval_time().is_none());
        assert_eq!(request.rejection_reason(), Some("No appropriate handler found"));
    }

    #[test]
    fn test_begin_traversal_resets_outcome_but_not_inputs() {
        let mut request = request();
        let request_time = request.request_time();
        request.reject("denied");
        request.begin_traversal();

        assert!(!request.is_terminal());
        assert_eq!(request.request_time(), request_time);
        assert_eq!(request.amount(), Amount::from_major(300));
    }
}
