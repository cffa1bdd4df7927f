//! Chain assembly.
//!
//! [`ChainBuilder`] appends tiers in call order and returns the head link.
//! Presets cover the common hospital workflows, and [`ChainConfig`] lets a
//! chain be described in JSON.
//!
//! ```
//! use caregate::{Amount, ApprovalRequest, ChainBuilder, RequestType};
//!
//! let chain = ChainBuilder::new()
//!     .add_nurse("Ward Nurse")
//!     .add_admin("Night Administrator")
//!     .build()
//!     .unwrap();
//!
//! let mut request = ApprovalRequest::new(
//!     RequestType::Appointment,
//!     Amount::from_major(40),
//!     "front-desk",
//!     "routine checkup",
//! );
//! chain.handle(&mut request);
//! assert_eq!(request.approved_by(), Some("Ward Nurse"));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CaregateError, Result};
use crate::handler::{ApprovalHandler, Tier, TierKind};
use crate::hooks::Hooks;

/// Named chain layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Head Nurse → Chief Doctor → Hospital Administrator
    Standard,
    /// Emergency Doctor → Emergency Administrator
    Emergency,
    /// Billing Doctor → Finance Administrator
    Financial,
    /// System Administrator
    Administrative,
}

impl Preset {
    /// The tiers of this preset, in evaluation order.
    pub fn tiers(&self) -> &'static [(TierKind, &'static str)] {
        match self {
            Preset::Standard => &[
                (TierKind::Nurse, "Head Nurse"),
                (TierKind::Doctor, "Chief Doctor"),
                (TierKind::Admin, "Hospital Administrator"),
            ],
            Preset::Emergency => &[
                (TierKind::Doctor, "Emergency Doctor"),
                (TierKind::Admin, "Emergency Administrator"),
            ],
            Preset::Financial => &[
                (TierKind::Doctor, "Billing Doctor"),
                (TierKind::Admin, "Finance Administrator"),
            ],
            Preset::Administrative => &[(TierKind::Admin, "System Administrator")],
        }
    }
}

impl FromStr for Preset {
    type Err = CaregateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Preset::Standard),
            "emergency" => Ok(Preset::Emergency),
            "financial" => Ok(Preset::Financial),
            "administrative" => Ok(Preset::Administrative),
            _ => Err(CaregateError::validation(format!("Unknown chain preset: {}", s))),
        }
    }
}

/// One tier entry in a [`ChainConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    pub kind: TierKind,
    pub name: String,
}

/// Declarative chain description.
///
/// ```json
/// { "preset": "emergency" }
/// { "tiers": [ { "kind": "nurse", "name": "Ward Nurse" }, { "kind": "admin", "name": "Duty Manager" } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainConfig {
    Preset { preset: Preset },
    Tiers { tiers: Vec<TierConfig> },
}

impl ChainConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig::Preset {
            preset: Preset::Standard,
        }
    }
}

/// Append-only builder for approval chains.
#[derive(Default)]
pub struct ChainBuilder {
    hooks: Hooks,
    tiers: Vec<Box<dyn Tier>>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side channels shared by every link. Defaults to the tracing-backed hooks.
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn add_nurse(self, name: impl Into<String>) -> Self {
        self.add_kind(TierKind::Nurse, name)
    }

    pub fn add_doctor(self, name: impl Into<String>) -> Self {
        self.add_kind(TierKind::Doctor, name)
    }

    pub fn add_admin(self, name: impl Into<String>) -> Self {
        self.add_kind(TierKind::Admin, name)
    }

    pub fn add_custom(mut self, tier: Box<dyn Tier>) -> Self {
        self.tiers.push(tier);
        self
    }

    fn add_kind(self, kind: TierKind, name: impl Into<String>) -> Self {
        self.add_custom(kind.build(name))
    }

    /// Link the tiers in the order they were added and return the head.
    pub fn build(self) -> Result<ApprovalHandler> {
        let hooks = self.hooks;
        let mut tiers = self.tiers.into_iter();

        let mut head = match tiers.next() {
            Some(tier) => ApprovalHandler::new(tier, hooks.clone()),
            None => {
                return Err(CaregateError::InvalidChain(
                    "a chain needs at least one tier".to_string(),
                ));
            }
        };
        for tier in tiers {
            head.append(ApprovalHandler::new(tier, hooks.clone()));
        }

        tracing::debug!(tiers = ?head.tier_names(), "Built approval chain");
        Ok(head)
    }

    pub fn preset(preset: Preset, hooks: Hooks) -> Result<ApprovalHandler> {
        preset
            .tiers()
            .iter()
            .fold(ChainBuilder::new().with_hooks(hooks), |builder, (kind, name)| {
                builder.add_kind(*kind, *name)
            })
            .build()
    }

    /// Nurse → Doctor → Admin.
    pub fn standard(hooks: Hooks) -> Result<ApprovalHandler> {
        Self::preset(Preset::Standard, hooks)
    }

    /// Doctor → Admin, for urgent cases that skip the nurse.
    pub fn emergency(hooks: Hooks) -> Result<ApprovalHandler> {
        Self::preset(Preset::Emergency, hooks)
    }

    /// Doctor → Admin, staffed by billing and finance.
    pub fn financial(hooks: Hooks) -> Result<ApprovalHandler> {
        Self::preset(Preset::Financial, hooks)
    }

    /// Admin only.
    pub fn administrative(hooks: Hooks) -> Result<ApprovalHandler> {
        Self::preset(Preset::Administrative, hooks)
    }

    pub fn from_config(config: &ChainConfig, hooks: Hooks) -> Result<ApprovalHandler> {
        match config {
            ChainConfig::Preset { preset } => Self::preset(*preset, hooks),
            ChainConfig::Tiers { tiers } => tiers
                .iter()
                .fold(ChainBuilder::new().with_hooks(hooks), |builder, tier| {
                    builder.add_kind(tier.kind, tier.name.clone())
                })
                .build(),
        }
    }
}
