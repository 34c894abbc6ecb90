// HTTP routes
pub mod admin;
pub mod articles;
pub mod auth;
pub mod forum;
pub mod health;
pub mod initiatives;
pub mod role_requests;
pub mod tasks;
pub mod tips;
pub mod votes;

pub use health::*;
