//! Admin tier: unbounded authority and the chain's fallback.

use crate::hooks::{Department, Notification, Notifier};
use crate::request::{Amount, ApprovalRequest, RequestType};

use super::{Decision, Tier};

/// Terminations above this go to the board.
pub const TERMINATION_LIMIT: Amount = Amount::from_major(10_000);

/// Budgets above this alert Finance on approval.
pub const FINANCE_ALERT_THRESHOLD: Amount = Amount::from_major(100_000);

const STAFF_CHANGE: &[&str] = &["hire", "fire", "promote", "role change"];
const TERMINATION: &[&str] = &["fire"];
const SYSTEM_CHANGE: &[&str] = &["database", "security", "backup", "system"];

pub const NEGATIVE_AMOUNT_REASON: &str = "Invalid amount: negative amounts are not permitted";
pub const INVALID_STAFF_CHANGE_REASON: &str = "Invalid staff change request";
pub const TERMINATION_REASON: &str = "High-cost termination requires board approval";
pub const INVALID_SYSTEM_CHANGE_REASON: &str = "Invalid system change request";
pub const MISSING_DESCRIPTION_REASON: &str = "Request description is required";

/// Accepts every request type at any amount.
#[derive(Debug, Clone)]
pub struct AdminTier {
    name: String,
}

impl AdminTier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn decide_staff_change(&self, request: &ApprovalRequest) -> Decision {
        if !request.mentions_any(STAFF_CHANGE) {
            return Decision::reject(INVALID_STAFF_CHANGE_REASON);
        }
        if request.mentions_any(TERMINATION) && request.amount() > TERMINATION_LIMIT {
            return Decision::reject(TERMINATION_REASON);
        }
        Decision::Approve
    }

    fn decide_system_change(&self, request: &ApprovalRequest) -> Decision {
        if request.mentions_any(SYSTEM_CHANGE) {
            Decision::Approve
        } else {
            Decision::reject(INVALID_SYSTEM_CHANGE_REASON)
        }
    }

    fn approve_general(&self, request: &ApprovalRequest) -> Decision {
        if request.description().trim().is_empty() {
            Decision::reject(MISSING_DESCRIPTION_REASON)
        } else {
            Decision::Approve
        }
    }

    fn notify(
        &self,
        notifier: &dyn Notifier,
        department: Department,
        request: &ApprovalRequest,
        message: &str,
    ) {
        notifier.notify(
            department,
            &Notification {
                tier: self.name.clone(),
                request_id: request.id(),
                request_type: request.request_type(),
                amount: request.amount(),
                message: message.to_string(),
            },
        );
    }
}

impl Tier for AdminTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_handle(&self, _request: &ApprovalRequest) -> bool {
        true
    }

    fn decide(&self, request: &ApprovalRequest) -> Decision {
        if request.amount().is_negative() {
            return Decision::reject(NEGATIVE_AMOUNT_REASON);
        }

        match request.request_type() {
            RequestType::StaffChange => self.decide_staff_change(request),
            RequestType::SystemChange => self.decide_system_change(request),
            _ => self.approve_general(request),
        }
    }

    fn on_approved(&self, request: &ApprovalRequest, notifier: &dyn Notifier) {
        match request.request_type() {
            RequestType::SystemChange => self.notify(
                notifier,
                Department::It,
                request,
                "System change approved, IT notified",
            ),
            RequestType::Budget if request.amount() > FINANCE_ALERT_THRESHOLD => self.notify(
                notifier,
                Department::Finance,
                request,
                "Large budget approved, Finance notified",
            ),
            RequestType::StaffChange => self.notify(
                notifier,
                Department::HumanResources,
                request,
                "Staff change approved, HR notified",
            ),
            _ => {}
        }
    }
}
