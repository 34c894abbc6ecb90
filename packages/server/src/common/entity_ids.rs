//! Typed ID definitions for all domain entities.
//!
//! One type alias per entity so the compiler prevents mixing IDs up (e.g.
//! passing a `UserId` where a vote expects a `ForumPostId`).

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities.
pub struct User;

/// Marker type for Initiative entities (geolocated community initiatives).
pub struct Initiative;

/// Marker type for Article entities.
pub struct Article;

/// Marker type for Tip entities.
pub struct Tip;

/// Marker type for ForumPost entities.
pub struct ForumPost;

/// Marker type for ForumComment entities.
pub struct ForumComment;

/// Marker type for Vote entities.
pub struct Vote;

/// Marker type for RoleRequest entities (promotion requests).
pub struct RoleRequest;

/// Marker type for UserTask entities (per-user scratch list).
pub struct UserTask;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Initiative entities.
pub type InitiativeId = Id<Initiative>;

/// Typed ID for Article entities.
pub type ArticleId = Id<Article>;

/// Typed ID for Tip entities.
pub type TipId = Id<Tip>;

/// Typed ID for ForumPost entities.
pub type ForumPostId = Id<ForumPost>;

/// Typed ID for ForumComment entities.
pub type ForumCommentId = Id<ForumComment>;

/// Typed ID for Vote entities.
pub type VoteId = Id<Vote>;

/// Typed ID for RoleRequest entities.
pub type RoleRequestId = Id<RoleRequest>;

/// Typed ID for UserTask entities.
pub type UserTaskId = Id<UserTask>;
