//! Role capabilities
//!
//! The single place that decides which role may perform which action.
//! Views and commands consult [`check`] instead of comparing role strings.
//!
//! - ADMIN: everything
//! - MAINTENANCE_ENGINEER: field work (issues, schedules, inventory, material requests)
//! - SUPERVISOR_VIEWER: read-only

use serde::Serialize;
use thiserror::Error;

use crate::models::Role;

/// Privileged or mutating action offered somewhere in the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ViewDashboard,
    RegisterAsset,
    UpdateAsset,
    ReplaceAsset,
    ReportIssue,
    EditIssue,
    ManageSchedules,
    ReconcileSchedules,
    ManageInventory,
    SubmitMaterialRequest,
    ApprovePurchaseRequest,
    ManageUsers,
    AssignNotificationRoles,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::RegisterAsset => "register_asset",
            Self::UpdateAsset => "update_asset",
            Self::ReplaceAsset => "replace_asset",
            Self::ReportIssue => "report_issue",
            Self::EditIssue => "edit_issue",
            Self::ManageSchedules => "manage_schedules",
            Self::ReconcileSchedules => "reconcile_schedules",
            Self::ManageInventory => "manage_inventory",
            Self::SubmitMaterialRequest => "submit_material_request",
            Self::ApprovePurchaseRequest => "approve_purchase_request",
            Self::ManageUsers => "manage_users",
            Self::AssignNotificationRoles => "assign_notification_roles",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions granted to maintenance engineers
const ENGINEER_ACTIONS: &[Action] = &[
    Action::ViewDashboard,
    Action::ReportIssue,
    Action::EditIssue,
    Action::ManageSchedules,
    Action::ManageInventory,
    Action::SubmitMaterialRequest,
];

/// Actions granted to supervisors
const VIEWER_ACTIONS: &[Action] = &[Action::ViewDashboard];

/// Refusal with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{role} may not {action}: {reason}")]
pub struct Denied {
    pub role: Role,
    pub action: Action,
    pub reason: &'static str,
}

/// Decide whether `role` may perform `action`
pub fn check(role: Role, action: Action) -> Result<(), Denied> {
    let (granted, reason) = match role {
        Role::Admin => (true, ""),
        Role::MaintenanceEngineer => (
            ENGINEER_ACTIONS.contains(&action),
            "reserved for administrators",
        ),
        Role::SupervisorViewer => (VIEWER_ACTIONS.contains(&action), "supervisors have read-only access"),
    };

    if granted {
        Ok(())
    } else {
        Err(Denied {
            role,
            action,
            reason,
        })
    }
}

/// Boolean form of [`check`] for rendering decisions
pub fn can(role: Role, action: Action) -> bool {
    check(role, action).is_ok()
}
