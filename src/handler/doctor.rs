//! Doctor tier: clinical and billing requests up to the doctor ceiling.

use crate::hooks::{Department, Notification, Notifier};
use crate::request::{Amount, ApprovalRequest, RequestType};

use super::{Decision, Tier};

/// Highest amount the doctor tier may inspect.
pub const DOCTOR_CEILING: Amount = Amount::from_major(5000);

/// Controlled prescriptions above this need an administrator.
pub const CONTROLLED_PRESCRIPTION_LIMIT: Amount = Amount::from_major(1000);

/// Major or complex surgery above this needs an administrator.
pub const MAJOR_SURGERY_LIMIT: Amount = Amount::from_major(2000);

const CONTROLLED_SUBSTANCE: &[&str] = &["controlled", "narcotic"];
const MAJOR_SURGERY: &[&str] = &["major", "complex"];

pub const NEGATIVE_AMOUNT_REASON: &str = "Invalid amount: doctor cannot approve negative amounts";
pub const CONTROLLED_PRESCRIPTION_REASON: &str =
    "High-cost controlled substances require admin approval";
pub const MAJOR_SURGERY_REASON: &str = "Major surgery over $2000 requires admin approval";

/// Clinical requests plus billing up to [`DOCTOR_CEILING`]. Staff changes are
/// never in scope.
#[derive(Debug, Clone)]
pub struct DoctorTier {
    name: String,
}

impl DoctorTier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Tier for DoctorTier {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_handle(&self, request: &ApprovalRequest) -> bool {
        let in_scope = matches!(
            request.request_type(),
            RequestType::Appointment
                | RequestType::Prescription
                | RequestType::BasicProcedure
                | RequestType::Surgery
                | RequestType::Treatment
                | RequestType::Billing
        );
        in_scope && request.amount() <= DOCTOR_CEILING
    }

    fn decide(&self, request: &ApprovalRequest) -> Decision {
        if request.amount().is_negative() {
            return Decision::reject(NEGATIVE_AMOUNT_REASON);
        }

        match request.request_type() {
            RequestType::Prescription
                if request.mentions_any(CONTROLLED_SUBSTANCE)
                    && request.amount() > CONTROLLED_PRESCRIPTION_LIMIT =>
            {
                Decision::reject(CONTROLLED_PRESCRIPTION_REASON)
            }
            // Major/complex wording wins over minor/outpatient wording.
            RequestType::Surgery
                if request.mentions_any(MAJOR_SURGERY)
                    && request.amount() > MAJOR_SURGERY_LIMIT =>
            {
                Decision::reject(MAJOR_SURGERY_REASON)
            }
            // Type allowlist is owned by can_handle
            _ => Decision::Approve,
        }
    }

    fn on_approved(&self, request: &ApprovalRequest, notifier: &dyn Notifier) {
        let (department, message) = match request.request_type() {
            RequestType::Surgery => (Department::Surgery, "Surgery approved, schedule theatre"),
            RequestType::Prescription => (Department::Pharmacy, "Prescription approved for dispensing"),
            _ => return,
        };
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
