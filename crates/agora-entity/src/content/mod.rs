//! Post and comment entities, reduced to what moderation needs.

pub mod comment;
pub mod post;

pub use comment::Comment;
pub use post::Post;
