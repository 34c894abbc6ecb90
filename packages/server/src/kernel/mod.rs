// Infrastructure: outbound mail.

pub mod mailer;
pub mod traits;

pub use mailer::{HttpMailer, NoopMailer};
pub use traits::BaseMailer;
