//! Capabilities and the single authorization check.
//!
//! Handlers never compare roles inline; they describe what they are about to
//! do as a [`Capability`] and let [`authorize`] decide.

use super::errors::AuthError;
use super::role::Role;
use crate::common::entity_ids::UserId;

/// The authenticated identity making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
    pub email_confirmed: bool,
}

/// What a caller is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create editorial content (initiatives, articles, tips).
    CreateEditorial,
    /// Create forum content (posts, comments).
    CreateForum,
    /// Approve pending content.
    Approve,
    /// Reject pending content.
    Reject,
    /// Toggle publication of a piece of content.
    Publish,
    /// Cast a vote.
    Vote,
    /// Request a role promotion.
    RequestPromotion,
    /// Process role requests.
    ProcessRoleRequests,
    /// Manage users (role changes, listings).
    ManageUsers,
    /// Manage the caller's own task list.
    ManageOwnTasks,
}

/// Decide whether `caller` may exercise `capability`.
///
/// `owner` is the resource's author where ownership matters (`Publish`);
/// owners and admins pass, everyone else is denied.
pub fn authorize(
    caller: &Caller,
    capability: Capability,
    owner: Option<UserId>,
) -> Result<(), AuthError> {
    match capability {
        Capability::CreateEditorial => {
            if caller.role >= Role::Contributor {
                Ok(())
            } else {
                Err(AuthError::PermissionDenied(
                    "Contributor role required. Request a promotion under /role-requests to start contributing.".to_string(),
                ))
            }
        }
        Capability::CreateForum
        | Capability::Vote
        | Capability::RequestPromotion
        | Capability::ManageOwnTasks => Ok(()),
        Capability::Approve
        | Capability::Reject
        | Capability::ProcessRoleRequests
        | Capability::ManageUsers => {
            if caller.role.is_admin() {
                Ok(())
            } else {
                Err(AuthError::AdminRequired)
            }
        }
        Capability::Publish => {
            if caller.role.is_admin() || owner == Some(caller.id) {
                Ok(())
            } else {
                Err(AuthError::PermissionDenied(
                    "Only the author or an admin may change publication".to_string(),
                ))
            }
        }
    }
}
