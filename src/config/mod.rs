//! Configuration module

mod site;

pub use site::{env_base_url, SiteConfig, BASE_URL_ENV};
