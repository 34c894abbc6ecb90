pub mod tip;

pub use tip::Tip;
