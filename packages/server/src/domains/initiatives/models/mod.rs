pub mod initiative;

pub use initiative::Initiative;
