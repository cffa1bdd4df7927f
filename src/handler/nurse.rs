//! Nurse tier: routine, low-cost clinical requests.

use crate::hooks::{Department, Notification, Notifier};
use crate::request::{Amount, ApprovalRequest, RequestType};

use super::{Decision, Tier};

/// Highest amount the nurse tier may inspect.
pub const NURSE_CEILING: Amount = Amount::from_major(100);

const COMPLEX_APPOINTMENT: &[&str] = &["surgery", "emergency"];
const CONTROLLED_SUBSTANCE: &[&str] = &["controlled", "narcotic"];
const ROUTINE_PROCEDURE: &[&str] = &["blood pressure", "temperature", "weight", "basic check"];

pub const NEGATIVE_AMOUNT_REASON: &str = "Invalid amount: nurse cannot approve negative amounts";
pub const COMPLEX_APPOINTMENT_REASON: &str = "Complex appointments require doctor approval";
pub const CONTROLLED_SUBSTANCE_REASON: &str = "Controlled substances require doctor approval";
pub const PROCEDURE_REASON: &str = "Procedure requires higher level approval";

/// Appointments, low-priority prescriptions and basic procedures up to
/// [`NURSE_CEILING`].
#[derive(Debug, Clone)]
pub struct NurseTier {
    name: String,
}

impl NurseTier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Tier for NurseTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_handle(&self, request: &ApprovalRequest) -> bool {
        let in_scope = match request.request_type() {
            RequestType::Appointment | RequestType::BasicProcedure => true,
            RequestType::Prescription => !request.priority().is_elevated(),
            _ => false,
        };
        in_scope && request.amount() <= NURSE_CEILING
    }

    fn decide(&self, request: &ApprovalRequest) -> Decision {
        if request.amount().is_negative() {
            return Decision::reject(NEGATIVE_AMOUNT_REASON);
        }

        match request.request_type() {
            RequestType::Appointment if request.mentions_any(COMPLEX_APPOINTMENT) => {
                Decision::reject(COMPLEX_APPOINTMENT_REASON)
            }
            RequestType::Prescription if request.mentions_any(CONTROLLED_SUBSTANCE) => {
                Decision::reject(CONTROLLED_SUBSTANCE_REASON)
            }
            RequestType::BasicProcedure if !request.mentions_any(ROUTINE_PROCEDURE) => {
                Decision::reject(PROCEDURE_REASON)
            }
            // Type allowlist is owned by can_handle
            _ => Decision::Approve,
        }
    }

    fn on_approved(&self, request: &ApprovalRequest, notifier: &dyn Notifier) {
        if request.request_type() == RequestType::Prescription {
            notifier.notify(
                Department::Pharmacy,
                &Notification {
                    tier: self.name.clone(),
                    request_id: request.id(),
                    request_type: request.request_type(),
                    amount: request.amount(),
                    message: "Prescription approved for dispensing".to_string(),
                },
            );
        }
    }
}
