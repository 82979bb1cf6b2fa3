//! User and role model
//!
//! Staff accounts of the console. Roles map to a fixed permission set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    SchoolHead,
    Clerk,
}

/// Individual capabilities granted by a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    FullSystemAccess,
    ManageUsers,
    ConfigureSettings,
    ViewFinancialReports,
    ManageFeeStructures,
    ApprovePaymentAdjustments,
    RecordPayments,
    ViewPaymentHistory,
    GenerateReceipts,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FullSystemAccess => "Full system access",
            Self::ManageUsers => "Manage users and permissions",
            Self::ConfigureSettings => "Configure system settings",
            Self::ViewFinancialReports => "View all financial reports",
            Self::ManageFeeStructures => "Manage fee structures",
            Self::ApprovePaymentAdjustments => "Approve payment adjustments",
            Self::RecordPayments => "Record student payments",
            Self::ViewPaymentHistory => "View student payment history",
            Self::GenerateReceipts => "Generate payment receipts",
        };
        f.pad(label)
    }
}

impl Role {
    pub fn all() -> [Role; 3] {
        [Self::SuperAdmin, Self::SchoolHead, Self::Clerk]
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Self::SuperAdmin => &[
                Permission::FullSystemAccess,
                Permission::ManageUsers,
                Permission::ConfigureSettings,
            ],
            Self::SchoolHead => &[
                Permission::ViewFinancialReports,
                Permission::ManageFeeStructures,
                Permission::ApprovePaymentAdjustments,
            ],
            Self::Clerk => &[
                Permission::RecordPayments,
                Permission::ViewPaymentHistory,
                Permission::GenerateReceipts,
            ],
        }
    }

    /// Full system access implies every other permission
    pub fn allows(&self, permission: Permission) -> bool {
        let granted = self.permissions();
        granted.contains(&Permission::FullSystemAccess) || granted.contains(&permission)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "admin" | "superadmin" => Some(Self::SuperAdmin),
            "head" | "schoolhead" => Some(Self::SchoolHead),
            "clerk" => Some(Self::Clerk),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SuperAdmin => "Super Admin",
            Self::SchoolHead => "School Head",
            Self::Clerk => "Clerk",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    pub full_name: String,

    /// Login name, unique (case-insensitive)
    pub username: String,

    pub email: String,

    pub role: Role,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub last_login: Option<NaiveDate>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(
        full_name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: UserId::new(),
            full_name: full_name.into(),
            username: username.into(),
            email: email.into(),
            role,
            active: true,
            last_login: None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.active {
            "Active"
        } else {
            "Inactive"
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.full_name.trim().is_empty() {
            return Err("Full name cannot be empty".into());
        }
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Username cannot be empty".into());
        }
        if username.chars().any(char::is_whitespace) {
            return Err(format!("Username cannot contain spaces: '{}'", username));
        }
        if !self.email.contains('@') {
            return Err(format!("Invalid email address: {}", self.email));
        }
        Ok(())
    }
}
