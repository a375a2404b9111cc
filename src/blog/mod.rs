//! Recent posts from the author's Medium feed

pub mod feed;
pub mod post;

pub use feed::{fetch_posts, medium_handle};
pub use post::BlogPost;
