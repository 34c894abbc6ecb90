pub mod models;

pub use models::{CommentError, ForumComment, ForumPost};
