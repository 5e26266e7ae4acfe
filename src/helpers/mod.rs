//! Helper functions shared by the generator, the server and the templates
//!
//! URL building, escaping, date handling and plain-text shaping.

mod date;
mod html;
mod text;
mod url;

pub use date::*;
pub use html::*;
pub use text::*;
pub use url::*;
