//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variables consulted, in order, for the public base URL
pub const BASE_URL_ENV: [&str; 3] = ["INSIGHTS_SITE_URL", "SITE_URL", "VERCEL_URL"];

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub data_file: String,
    pub static_dir: String,
    pub public_dir: String,

    // Feed
    pub all_label: String,
    pub default_category_color: String,
    pub description_length: usize,
    pub smart_emphasis: bool,
    pub feed_limit: usize,

    // Preview image
    pub footer_tagline: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Genesis Research".to_string(),
            subtitle: "Research, timely insights, and transparent trade ideas".to_string(),
            description: "Research, timely insights, and transparent trade ideas.".to_string(),
            author: "Genesis Research".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            data_file: "data/insights.json".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            all_label: "Insights".to_string(),
            default_category_color: "bg-slate-700".to_string(),
            description_length: 160,
            smart_emphasis: true,
            feed_limit: 20,

            footer_tagline: "Research • Timely insights • Transparent trade ideas".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    /// Public base URL without a trailing slash
    pub fn base_url(&self) -> String {
        resolve_base_url(None, &self.url)
    }

    /// Replace the configured `url` with a deployment override, if any
    pub fn override_url(&mut self, from_env: Option<&str>) {
        if let Some(url) = from_env {
            self.url = resolve_base_url(Some(url), &self.url);
            tracing::debug!("Base URL taken from the environment: {}", self.url);
        }
    }
}

/// First non-empty deployment base URL among [`BASE_URL_ENV`]
pub fn env_base_url() -> Option<String> {
    BASE_URL_ENV
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
}

/// Pick the base URL, ensuring a scheme and dropping one trailing slash
pub fn resolve_base_url(from_env: Option<&str>, fallback: &str) -> String {
    let candidate = from_env.unwrap_or(fallback).trim();
    let url = if candidate.starts_with("http") {
        candidate.to_string()
    } else {
        format!("https://{}", candidate)
    };
    url.strip_suffix('/').map(str::to_string).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.all_label, "Insights");
        assert_eq!(config.default_category_color, "bg-slate-700");
        assert_eq!(config.description_length, 160);
        assert!(config.smart_emphasis);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Alpha Notes
all_label: All
data_file: content/posts.json
description_length: 120
github_username: alpha
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Alpha Notes");
        assert_eq!(config.all_label, "All");
        assert_eq!(config.data_file, "content/posts.json");
        assert_eq!(config.description_length, 120);
        assert_eq!(config.public_dir, "public");
        assert!(config.extra.contains_key("github_username"));
    }

    #[test]
    fn test_resolve_base_url() {
        assert_eq!(
            resolve_base_url(Some("genesis-research.vercel.app"), "http://localhost:4000"),
            "https://genesis-research.vercel.app"
        );
        assert_eq!(
            resolve_base_url(Some("http://example.com/"), "http://localhost:4000"),
            "http://example.com"
        );
        assert_eq!(
            resolve_base_url(None, "http://localhost:4000"),
            "http://localhost:4000"
        );
    }

    #[test]
    fn test_override_url() {
        let mut config = SiteConfig::default();
        config.url = "https://genesis.example/".to_string();
        config.override_url(None);
        assert_eq!(config.base_url(), "https://genesis.example");

        config.override_url(Some("preview-42.vercel.app"));
        assert_eq!(config.url, "https://preview-42.vercel.app");
        assert_eq!(config.base_url(), "https://preview-42.vercel.app");
    }
}
