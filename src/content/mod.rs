//! Content module - insight records and the queries over them

mod error;
pub mod feed;
mod post;
pub mod store;

pub use error::ContentError;
pub use feed::{categories, find, select};
pub use post::Post;
pub use store::ContentStore;
