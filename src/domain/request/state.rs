//! Core types for approval requests.
//!
//! An [`ApprovalRequest`] has two halves: the input fields supplied by the
//! caller, which the chain only reads, and the outcome fields, which only the
//! chain writes during a traversal.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::amount::Amount;
use crate::error::{CaregateError, Result};

/// The kind of action a request asks permission for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Appointment,
    Billing,
    StaffChange,
    Prescription,
    Surgery,
    Treatment,
    BasicProcedure,
    SystemChange,
    Budget,
}

impl RequestType {
    pub const ALL: [RequestType; 9] = [
        RequestType::Appointment,
        RequestType::Billing,
        RequestType::StaffChange,
        RequestType::Prescription,
        RequestType::Surgery,
        RequestType::Treatment,
        RequestType::BasicProcedure,
        RequestType::SystemChange,
        RequestType::Budget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Appointment => "APPOINTMENT",
            RequestType::Billing => "BILLING",
            RequestType::StaffChange => "STAFF_CHANGE",
            RequestType::Prescription => "PRESCRIPTION",
            RequestType::Surgery => "SURGERY",
            RequestType::Treatment => "TREATMENT",
            RequestType::BasicProcedure => "BASIC_PROCEDURE",
            RequestType::SystemChange => "SYSTEM_CHANGE",
            RequestType::Budget => "BUDGET",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = CaregateError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        RequestType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| CaregateError::validation(format!("Unknown request type: {}", s)))
    }
}

/// How urgently the requester needs a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }

    /// HIGH and URGENT requests are kept away from the nurse tier for prescriptions.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Priority::High | Priority::Urgent)
    }
}

impl FromStr for Priority {
    type Err = CaregateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            "URGENT" => Ok(Priority::Urgent),
            _ => Err(CaregateError::validation(format!("Unknown priority: {}", s))),
        }
    }
}

/// Unique identifier for an approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Uuid);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display only first 8 characters for readability in logs
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        RequestId(uuid)
    }
}

impl std::ops::Deref for RequestId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Outcome of the most recent traversal.
///
/// `approved_by` and `approval_time` are only set on approval;
/// `rejection_reason` is set whenever the request was denied or the chain
/// ran out of tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub approved: bool,
    pub approved_by: Option<String>,
    pub approval_time: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

/// A request travelling through the approval chain.
///
/// # Example
/// ```
/// use caregate::{Amount, ApprovalRequest, Priority, RequestType};
///
/// let request = ApprovalRequest::new(
///     RequestType::Appointment,
///     Amount::from_major(50),
///     "reception-desk",
///     "routine checkup",
/// )
/// .with_priority(Priority::Low);
/// assert!(!request.is_terminal());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalRequest {
    id: RequestId,
    request_type: RequestType,
    amount: Amount,
    requested_by: String,
    description: String,
    priority: Priority,
    /// The originating domain object. Never inspected by the chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<serde_json::Value>,
    request_time: DateTime<Utc>,
    pub(crate) outcome: Outcome,
}

impl ApprovalRequest {
    pub fn new(
        request_type: RequestType,
        amount: Amount,
        requested_by: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: RequestId(Uuid::new_v4()),
            request_type,
            amount,
            requested_by: requested_by.into(),
            description: description.into(),
            priority: Priority::default(),
            payload: None,
            request_time: Utc::now(),
            outcome: Outcome::default(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn requested_by(&self) -> &str {
        &self.requested_by
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    pub fn request_time(&self) -> DateTime<Utc> {
        self.request_time
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn approved(&self) -> bool {
        self.outcome.approved
    }

    pub fn approved_by(&self) -> Option<&str> {
        self.outcome.approved_by.as_deref()
    }

    pub fn approval_time(&self) -> Option<DateTime<Utc>> {
        self.outcome.approval_time
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.outcome.rejection_reason.as_deref()
    }

    /// Case-insensitive check for any of the given keywords in the description.
    ///
    /// Keywords are expected in lowercase.
    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        let description = self.description.to_lowercase();
        keywords.iter().any(|k| description.contains(k))
    }
}

/// Amount as supplied by a caller: a decimal string or a whole number of minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// Minor units (cents), e.g. `5000` for 50.00
    Minor(i64),
    /// Decimal string, e.g. "2500" or "99.95"
    Decimal(String),
}

impl AmountInput {
    pub fn to_amount(&self) -> Result<Amount> {
        match self {
            AmountInput::Minor(minor) => Ok(Amount::from_minor(*minor)),
            AmountInput::Decimal(decimal) => decimal.parse(),
        }
    }
}

impl From<&str> for AmountInput {
    fn from(decimal: &str) -> Self {
        AmountInput::Decimal(decimal.to_string())
    }
}

/// Caller-supplied request fields, typically deserialized from a form or API body.
///
/// Converting into an [`ApprovalRequest`] is where malformed input is caught:
/// a missing description, an unknown type or priority, or an unparsable amount
/// all produce a [`CaregateError::ValidationError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInput {
    #[serde(rename = "type")]
    pub request_type: String,
    pub amount: AmountInput,
    pub requested_by: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl TryFrom<RequestInput> for ApprovalRequest {
    type Error = CaregateError;

    fn try_from(input: RequestInput) -> Result<Self> {
        let request_type: RequestType = input.request_type.parse()?;
        let amount = input.amount.to_amount()?;
        let description = input
            .description
            .ok_or_else(|| CaregateError::validation("description is required"))?;
        if input.requested_by.trim().is_empty() {
            return Err(CaregateError::validation("requested_by is required"));
        }
        let priority = match input.priority {
            Some(p) => p.parse()?,
            None => Priority::default(),
        };

        let mut request = ApprovalRequest::new(
            request_type,
            amount,
            input.requested_by,
            description,
        )
        .with_priority(priority);
        request.payload = input.payload;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RequestInput {
        RequestInput {
            request_type: "surgery".to_string(),
            amount: "2500.00".into(),
            requested_by: "dr-house".to_string(),
            description: Some("minor outpatient".to_string()),
            priority: Some("high".to_string()),
            payload: Some(serde_json::json!({"patient_id": 42})),
        }
    }

    #[test]
    fn test_request_type_parsing() {
        assert_eq!("STAFF_CHANGE".parse::<RequestType>().unwrap(), RequestType::StaffChange);
        assert_eq!("basic procedure".parse::<RequestType>().unwrap(), RequestType::BasicProcedure);
        assert_eq!("system-change".parse::<RequestType>().unwrap(), RequestType::SystemChange);
        assert!("VACATION".parse::<RequestType>().unwrap_err().is_validation());
    }

    #[test]
    fn test_try_from_input() {
        let request = ApprovalRequest::try_from(input()).unwrap();
        assert_eq!(request.request_type(), RequestType::Surgery);
        assert_eq!(request.amount(), Amount::from_major(2500));
        assert_eq!(request.priority(), Priority::High);
        assert_eq!(request.payload().unwrap()["patient_id"], 42);
        assert!(!request.approved());
        assert!(request.rejection_reason().is_none());
    }

    #[test]
    fn test_missing_description_is_validation_error() {
        let mut bad = input();
        bad.description = None;
        let err = ApprovalRequest::try_from(bad).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_empty_description_is_accepted() {
        let mut empty = input();
        empty.description = Some(String::new());
        let request = ApprovalRequest::try_from(empty).unwrap();
        assert_eq!(request.description(), "");
    }

    #[test]
    fn test_input_deserializes_from_json() {
        let json = r#"{"type":"BUDGET","amount":"150000","requested_by":"cfo","description":"annual budget"}"#;
        let input: RequestInput = serde_json::from_str(json).unwrap();
        let request = ApprovalRequest::try_from(input).unwrap();
        assert_eq!(request.request_type(), RequestType::Budget);
        assert_eq!(request.priority(), Priority::Medium);
    }

    #[test]
    fn test_input_accepts_minor_units() {
        let json = r#"{"type":"APPOINTMENT","amount":5000,"requested_by":"desk","description":"routine checkup"}"#;
        let input: RequestInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.amount, AmountInput::Minor(5000));

        let request = ApprovalRequest::try_from(input).unwrap();
        assert_eq!(request.amount(), Amount::from_major(50));
    }

    #[test]
    fn test_input_with_unparsable_amount_is_validation_error() {
        let json = r#"{"type":"APPOINTMENT","amount":"fifty","requested_by":"desk","description":"routine checkup"}"#;
        let input: RequestInput = serde_json::from_str(json).unwrap();
        assert!(ApprovalRequest::try_from(input).unwrap_err().is_validation());
    }

    #[test]
    fn test_mentions_any_is_case_insensitive() {
        let request = ApprovalRequest::new(
            RequestType::Prescription,
            Amount::from_major(20),
            "nurse-joy",
            "Refill of CONTROLLED medication",
        );
        assert!(request.mentions_any(&["controlled", "narcotic"]));
        assert!(!request.mentions_any(&["surgery"]));
    }
}
