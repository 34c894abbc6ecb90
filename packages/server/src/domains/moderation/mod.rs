//! Moderation and publication workflow.
//!
//! All moderatable content shares one status enum and one transition table;
//! the service applies transitions against the store and records every
//! transition in the moderation log.

pub mod audit;
pub mod service;
pub mod status;

pub use audit::{ModerationAction, ModerationLogEntry};
pub use service::{ContentHead, ModerationError};
pub use status::{ContentKind, ContentStatus, Transition};
