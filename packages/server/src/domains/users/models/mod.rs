pub mod user;
pub mod verification_token;

pub use user::User;
pub use verification_token::VerificationToken;
