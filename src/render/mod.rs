//! Rendering pipeline: text formatting and page assembly

pub mod format;
mod pages;
mod view;

pub use format::{format, format_html, to_html, Fallback, Run};
pub use pages::PageBuilder;
pub use view::ViewState;
