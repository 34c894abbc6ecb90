pub mod models;

pub use models::{Vote, VoteError, VoteOutcome, VoteTarget, VoteTargetKind};
