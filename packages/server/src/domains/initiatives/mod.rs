pub mod models;

pub use models::Initiative;
