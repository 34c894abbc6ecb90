// Verdant - community platform API core
//
// Backend for a community platform: geolocated sustainability initiatives,
// articles, tips, a forum, and the role-gated moderation workflow that
// governs all of them. Organized domain-first under domains/*.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
