use serde::{Deserialize, Serialize};

/// User role, ordered: Explorer < Contributor < Admin.
///
/// Mutated only by an admin action or an approved role request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Explorer,
    Contributor,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Parse a role from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "explorer" => Some(Role::Explorer),
            "contributor" => Some(Role::Contributor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Explorer => "explorer",
            Role::Contributor => "contributor",
            Role::Admin => "admin",
        }
    }
}
