//! Authorization seam.
//!
//! Every handler funnels its permission decision through
//! [`authorize`] instead of re-deriving role comparisons inline.

pub mod capability;
pub mod errors;
pub mod role;

pub use capability::{authorize, Caller, Capability};
pub use errors::AuthError;
pub use role::Role;
