pub mod models;

pub use models::Tip;
