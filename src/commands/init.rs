//! Initialize a new insights site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::Site;

const CONFIG: &str = r#"# Site
title: Genesis Research
subtitle: Research, timely insights, and transparent trade ideas
description: Research, timely insights, and transparent trade ideas.
author: Genesis Research
language: en
timezone: ''

# URL
## INSIGHTS_SITE_URL, SITE_URL or VERCEL_URL take precedence over `url`
url: http://localhost:4000
root: /

# Directory
data_file: data/insights.json
static_dir: static
public_dir: public

# Feed
all_label: Insights
default_category_color: bg-slate-700
description_length: 160
smart_emphasis: true
feed_limit: 20

# Preview image
footer_tagline: Research • Timely insights • Transparent trade ideas
"#;

const SAMPLE_POSTS: &str = r#"[
  {
    "id": 1,
    "date": "14-10-2026",
    "category": "Macro",
    "categoryColor": "bg-blue-700",
    "title": "Welcome to your insights feed",
    "summary": "Posts live in **data/insights.json**. Edit it and run the server to see changes.",
    "fullContent": "Each post has an id, a category and a title. Higher ids are shown first. Wrap a phrase in double asterisks to **emphasise** it. Posts without markers get their first and last sentences emphasised when expanded.",
    "chartPath": "charts/placeholder.svg",
    "chartHeight": "320px"
  },
  {
    "id": 2,
    "date": "16-10-2026",
    "category": "Commodities",
    "title": "A post without a chart",
    "summary": "Cards without a chart show a placeholder. Detail pages get a generated preview image."
  }
]
"#;

const SAMPLE_CHART: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="400" viewBox="0 0 800 400">
  <rect width="800" height="400" fill="#f1f5f9"/>
  <polyline fill="none" stroke="#1d4ed8" stroke-width="4" points="40,340 160,300 280,320 400,220 520,240 640,140 760,80"/>
</svg>
"##;

/// Initialize a new site in the given directory
///
/// Existing files are left alone.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("data"))
        .with_context(|| format!("Failed to create {:?}", target_dir))?;
    fs::create_dir_all(target_dir.join("static/charts"))?;

    for (relative, contents) in [
        ("_config.yml", CONFIG),
        ("data/insights.json", SAMPLE_POSTS),
        ("static/charts/placeholder.svg", SAMPLE_CHART),
    ] {
        let path = target_dir.join(relative);
        if path.exists() {
            tracing::warn!("{:?} already exists, keeping it", path);
            continue;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Created {:?}", path);
    }

    Ok(())
}

/// Run the init command with an existing site
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_site_is_loadable() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.all_label, SiteConfig::default().all_label);
        let store = site.load_store().unwrap();
        assert_eq!(store.len(), 2);
        assert!(site.static_dir.join("charts/placeholder.svg").exists());
    }

    #[test]
    fn test_init_site_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: Mine\n").unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Mine");
    }
}
