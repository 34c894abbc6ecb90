pub mod models;

pub use models::{TaskError, UserTask};
