pub mod vote;

pub use vote::{Vote, VoteError, VoteOutcome, VoteTarget, VoteTargetKind};
