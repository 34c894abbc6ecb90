//! Content status and the transition table.
//!
//! A single enum replaces the approved/published flag pair: only
//! `published` content is on the public read path, `rejected` is terminal,
//! and the publication toggle moves between `published` and `unpublished`
//! without touching review state.

use crate::common::auth::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a piece of moderatable content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "content_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    PendingReview,
    Published,
    Unpublished,
    Rejected,
}

impl ContentStatus {
    /// Visible on the public read path.
    pub fn is_public(&self) -> bool {
        matches!(self, ContentStatus::Published)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::PendingReview => "pending_review",
            ContentStatus::Published => "published",
            ContentStatus::Unpublished => "unpublished",
            ContentStatus::Rejected => "rejected",
        }
    }
}

/// Result of applying a transition to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status changed; persist and log it.
    Changed(ContentStatus),
    /// Already in the requested state; nothing to persist.
    Unchanged,
}

/// A transition that the table does not permit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidTransition(pub String);

impl ContentStatus {
    /// Admin approval. Idempotent on already-approved content.
    pub fn approve(self) -> Result<Transition, InvalidTransition> {
        match self {
            ContentStatus::PendingReview => Ok(Transition::Changed(ContentStatus::Published)),
            ContentStatus::Published | ContentStatus::Unpublished => Ok(Transition::Unchanged),
            ContentStatus::Rejected => Err(InvalidTransition(
                "Content was rejected and cannot be approved".to_string(),
            )),
        }
    }

    /// Admin rejection. Terminal; the row is retained for the audit trail.
    pub fn reject(self) -> Result<Transition, InvalidTransition> {
        match self {
            ContentStatus::Rejected => Err(InvalidTransition(
                "Content is already rejected".to_string(),
            )),
            _ => Ok(Transition::Changed(ContentStatus::Rejected)),
        }
    }

    /// Author/admin publication toggle. Only legal between published and
    /// unpublished.
    pub fn set_publication(self, publish: bool) -> Result<Transition, InvalidTransition> {
        match (self, publish) {
            (ContentStatus::Published, true) | (ContentStatus::Unpublished, false) => {
                Ok(Transition::Unchanged)
            }
            (ContentStatus::Published, false) => {
                Ok(Transition::Changed(ContentStatus::Unpublished))
            }
            (ContentStatus::Unpublished, true) => Ok(Transition::Changed(ContentStatus::Published)),
            (ContentStatus::PendingReview, _) => Err(InvalidTransition(
                "Content is awaiting review and cannot be toggled".to_string(),
            )),
            (ContentStatus::Rejected, _) => Err(InvalidTransition(
                "Content was rejected and cannot be toggled".to_string(),
            )),
        }
    }
}

/// The kinds of content subject to the moderation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Initiative,
    Article,
    Tip,
    ForumPost,
    ForumComment,
}

impl ContentKind {
    /// Table backing this kind. Static strings only; interpolated into SQL.
    pub fn table(&self) -> &'static str {
        match self {
            ContentKind::Initiative => "initiatives",
            ContentKind::Article => "articles",
            ContentKind::Tip => "tips",
            ContentKind::ForumPost => "forum_posts",
            ContentKind::ForumComment => "forum_comments",
        }
    }

    /// Editorial kinds require the contributor role to create; forum kinds
    /// only require authentication.
    pub fn is_editorial(&self) -> bool {
        matches!(
            self,
            ContentKind::Initiative | ContentKind::Article | ContentKind::Tip
        )
    }

    /// Capability needed to create content of this kind.
    pub fn create_capability(&self) -> Capability {
        if self.is_editorial() {
            Capability::CreateEditorial
        } else {
            Capability::CreateForum
        }
    }

    /// Status a freshly created row starts in. Editorial content waits for
    /// review; forum content is visible immediately and moderated post-hoc.
    pub fn initial_status(&self) -> ContentStatus {
        if self.is_editorial() {
            ContentStatus::PendingReview
        } else {
            ContentStatus::Published
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "initiatives" | "initiative" => Some(ContentKind::Initiative),
            "articles" | "article" => Some(ContentKind::Article),
            "tips" | "tip" => Some(ContentKind::Tip),
            "forum_posts" | "forum_post" => Some(ContentKind::ForumPost),
            "forum_comments" | "forum_comment" => Some(ContentKind::ForumComment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Initiative => "initiative",
            ContentKind::Article => "article",
            ContentKind::Tip => "tip",
            ContentKind::ForumPost => "forum_post",
            ContentKind::ForumComment => "forum_comment",
        }
    }
}
