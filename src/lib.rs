//! insights-rs: a fast static site generator for research insight feeds
//!
//! Posts live in a single JSON file. The generator renders a filterable feed,
//! one detail page per post, social metadata and a placeholder preview image,
//! using Tera templates embedded in the binary.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod render;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentError, ContentStore};

/// A site rooted at a directory containing `_config.yml`
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// JSON file holding the posts
    pub data_path: PathBuf,
    /// Directory copied verbatim into the output (charts, favicons)
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site for a deployment, letting the environment override `url`
    ///
    /// The CLI uses this; library callers and tests use [`Site::new`], which
    /// reads nothing but `_config.yml`.
    pub fn from_env<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let mut site = Self::new(base_dir)?;
        site.config.override_url(config::env_base_url().as_deref());
        Ok(site)
    }

    /// Create a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let data_path = base_dir.join(&config.data_file);
        let static_dir = base_dir.join(&config.static_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            data_path,
            static_dir,
            public_dir,
        }
    }

    /// Path of the site configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    /// Load the content store from the data file
    pub fn load_store(&self) -> Result<ContentStore, ContentError> {
        ContentStore::load(&self.data_path)
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
