pub mod session;

pub use session::{hash_password, verify_password, Session, SessionStore};
