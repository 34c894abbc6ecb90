pub mod user_task;

pub use user_task::{TaskError, UserTask};
