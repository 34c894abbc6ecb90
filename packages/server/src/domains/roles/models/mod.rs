pub mod role_request;

pub use role_request::{ProcessAction, RoleRequest, RoleRequestError, RoleRequestStatus};
