// Shared infrastructure: typed IDs, pagination, authorization.

pub mod auth;
pub mod entity_ids;
pub mod id;
pub mod pagination;

pub use auth::{authorize, AuthError, Caller, Capability, Role};
pub use entity_ids::*;
pub use pagination::{PageInfo, Paginated, PaginationArgs, ValidatedPaginationArgs};
