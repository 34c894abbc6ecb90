// Domain modules. Each domain owns its sqlx models; cross-cutting
// moderation logic lives in `moderation`.

pub mod articles;
pub mod forum;
pub mod initiatives;
pub mod moderation;
pub mod roles;
pub mod tasks;
pub mod tips;
pub mod users;
pub mod votes;
