pub mod models;

pub use models::{ProcessAction, RoleRequest, RoleRequestError, RoleRequestStatus};
