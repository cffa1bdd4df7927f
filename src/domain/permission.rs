//! Roles and the permissions they carry.
//!
//! Typed roles answer [`Role::permissions`] directly. Callers that still hold
//! role names as plain strings go through [`permissions_for_role_name`], a
//! constant lookup table with an empty set for anything unknown.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CaregateError, Result};

/// Something a role is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewPatients,
    EditPatients,
    ScheduleAppointments,
    Prescribe,
    PerformSurgery,
    ManageBilling,
    ManageStaff,
    ManageSystem,
    ApproveBudget,
}

/// Organizational role of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Nurse,
    Doctor,
    Admin,
    Receptionist,
}

const NURSE: &[Permission] = &[
    Permission::ViewPatients,
    Permission::EditPatients,
    Permission::ScheduleAppointments,
];

const DOCTOR: &[Permission] = &[
    Permission::ViewPatients,
    Permission::EditPatients,
    Permission::ScheduleAppointments,
    Permission::Prescribe,
    Permission::PerformSurgery,
    Permission::ManageBilling,
];

const ADMIN: &[Permission] = &[
    Permission::ViewPatients,
    Permission::EditPatients,
    Permission::ScheduleAppointments,
    Permission::ManageBilling,
    Permission::ManageStaff,
    Permission::ManageSystem,
    Permission::ApproveBudget,
];

const RECEPTIONIST: &[Permission] = &[Permission::ViewPatients, Permission::ScheduleAppointments];

/// Fallback table for string-typed roles, keyed by lowercase name.
const ROLE_NAME_TABLE: &[(&str, &[Permission])] = &[
    ("nurse", NURSE),
    ("head nurse", NURSE),
    ("doctor", DOCTOR),
    ("physician", DOCTOR),
    ("admin", ADMIN),
    ("administrator", ADMIN),
    ("receptionist", RECEPTIONIST),
];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Nurse => "nurse",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
            Role::Receptionist => "receptionist",
        }
    }

    pub fn permissions(&self) -> HashSet<Permission> {
        let granted = match self {
            Role::Nurse => NURSE,
            Role::Doctor => DOCTOR,
            Role::Admin => ADMIN,
            Role::Receptionist => RECEPTIONIST,
        };
        granted.iter().copied().collect()
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl FromStr for Role {
    type Err = CaregateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nurse" => Ok(Role::Nurse),
            "doctor" => Ok(Role::Doctor),
            "admin" | "administrator" => Ok(Role::Admin),
            "receptionist" => Ok(Role::Receptionist),
            _ => Err(CaregateError::validation(format!("Unknown role: {}", s))),
        }
    }
}

/// Permissions for a role known only by name.
pub fn permissions_for_role_name(name: &str) -> HashSet<Permission> {
    let key = name.trim().to_lowercase();
    ROLE_NAME_TABLE
        .iter()
        .find(|(role, _)| *role == key)
        .map(|(_, granted)| granted.iter().copied().collect())
        .unwrap_or_default()
}
