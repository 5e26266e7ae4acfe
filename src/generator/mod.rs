//! Generator module - writes the static site using the built-in Tera templates

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::content::{ContentStore, Post};
use crate::helpers::{
    absolute_url, category_slug, date_xml, escape_xml, parse_display_date, post_path,
    strip_invalid_xml_chars, summarize, url_for, Routing,
};
use crate::render::{format_html, Fallback, PageBuilder, ViewState};
use crate::templates::{TemplateRenderer, STYLESHEET};
use crate::Site;

/// Static site generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    fn pages(&self) -> PageBuilder<'_> {
        PageBuilder::new(&self.site.config, &self.renderer, Routing::Static)
    }

    /// Generate the entire site
    pub fn generate(&self, store: &ContentStore) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        // Charts and other static files
        self.copy_static_assets()?;
        fs::write(self.site.public_dir.join("style.css"), STYLESHEET)?;

        self.generate_list_pages(store)?;
        self.generate_post_pages(store)?;
        self.generate_not_found_page()?;
        self.generate_atom_feed(store)?;
        self.generate_search_index(store)?;

        Ok(())
    }

    /// Generate the unfiltered feed and one page per category
    fn generate_list_pages(&self, store: &ContentStore) -> Result<()> {
        let config = &self.site.config;
        let pages = self.pages();

        let view = ViewState::new(config, None);
        write_page(&self.site.public_dir.join("index.html"), &pages.list_page(store, &view)?)?;

        let mut seen: HashMap<String, String> = HashMap::new();
        for category in store.categories(&config.all_label) {
            if category == config.all_label {
                continue;
            }

            let slug = category_slug(&category);
            if let Some(existing) = seen.get(&slug) {
                tracing::warn!(
                    "Category {:?} shares the page cat/{}/ with {:?}, skipping",
                    category,
                    slug,
                    existing
                );
                continue;
            }

            let view = ViewState::new(config, Some(&category));
            let output_path = self
                .site
                .public_dir
                .join("cat")
                .join(&slug)
                .join("index.html");
            write_page(&output_path, &pages.list_page(store, &view)?)?;
            tracing::debug!("Generated category: {:?}", output_path);

            seen.insert(slug, category);
        }

        tracing::info!("Generated {} category pages", seen.len());
        Ok(())
    }

    /// Generate detail pages and their preview images
    fn generate_post_pages(&self, store: &ContentStore) -> Result<()> {
        let pages = self.pages();

        let mut written = HashSet::new();
        for post in store.posts() {
            // Same id twice: the page belongs to the record lookups return
            if !written.insert(post.id) {
                continue;
            }

            let dir = self.site.public_dir.join("i").join(post.id.to_string());

            write_page(&dir.join("index.html"), &pages.post_page(post, None)?)?;
            write_page(
                &dir.join("opengraph-image.svg"),
                &pages.og_image(Some(post))?,
            )?;
            tracing::debug!("Generated post: {:?}", dir);
        }

        tracing::info!("Generated {} posts", written.len());
        Ok(())
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let html = self.pages().not_found_page()?;
        write_page(&self.site.public_dir.join("404.html"), &html)
    }

    /// Generate Atom feed with the newest posts
    fn generate_atom_feed(&self, store: &ContentStore) -> Result<()> {
        let config = &self.site.config;
        let pages = self.pages();
        let base_url = pages.base_url().trim_end_matches('/').to_string();
        let home = absolute_url(&base_url, &url_for(config, "/"));
        let now = chrono::Utc::now().to_rfc3339();

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            absolute_url(&base_url, &url_for(config, "atom.xml"))
        ));
        feed.push_str(&format!("  <link href=\"{}\"/>\n", home));
        feed.push_str(&format!("  <updated>{}</updated>\n", now));
        feed.push_str(&format!("  <id>{}</id>\n", home));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        let newest = store.select(&config.all_label, &config.all_label);
        for post in newest.into_iter().take(config.feed_limit) {
            let link = absolute_url(&base_url, &post_path(config, post.id));
            let updated = post
                .date
                .as_deref()
                .and_then(parse_display_date)
                .map(|d| date_xml(&d))
                .unwrap_or_else(|| now.clone());

            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            feed.push_str(&format!(
                "    <category term=\"{}\"/>\n",
                escape_xml(&post.category)
            ));
            feed.push_str(&format!("    <updated>{}</updated>\n", updated));
            let content = format_html(post.long_text().trim(), Fallback::Plain);
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                strip_invalid_xml_chars(&content)
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        let output_path = self.site.public_dir.join("atom.xml");
        fs::write(&output_path, feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Generate search index
    fn generate_search_index(&self, store: &ContentStore) -> Result<()> {
        let config = &self.site.config;
        let search_data: Vec<serde_json::Value> = store
            .select(&config.all_label, &config.all_label)
            .into_iter()
            .map(|p| search_entry(config, p))
            .collect();

        let output_path = self.site.public_dir.join("search.json");
        let json = serde_json::to_string_pretty(&search_data)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Copy the static directory into the output as is
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            tracing::debug!("No static directory at {:?}", static_dir);
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }
}

fn search_entry(config: &crate::config::SiteConfig, post: &Post) -> serde_json::Value {
    serde_json::json!({
        "id": post.id,
        "title": post.title,
        "category": post.category,
        "date": post.date,
        "url": post_path(config, post.id),
        "description": summarize(post, config.description_length),
    })
}

fn write_page(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
