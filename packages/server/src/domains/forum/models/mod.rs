pub mod forum_comment;
pub mod forum_post;

pub use forum_comment::{CommentError, ForumComment};
pub use forum_post::ForumPost;
