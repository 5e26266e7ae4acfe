//! Built-in genesis theme templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::encode_uri;

/// Stylesheet written next to the generated pages
pub const STYLESHEET: &str = include_str!("genesis/style.css");

/// Template renderer with the embedded genesis theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Bodies arrive pre-rendered; plain strings are escaped in the templates
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("genesis/layout.html")),
            ("index.html", include_str!("genesis/index.html")),
            ("post.html", include_str!("genesis/post.html")),
            ("404.html", include_str!("genesis/404.html")),
            ("og_image.svg", include_str!("genesis/og_image.svg")),
            (
                "partials/header.html",
                include_str!("genesis/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("genesis/partials/footer.html"),
            ),
            (
                "partials/chart.html",
                include_str!("genesis/partials/chart.html"),
            ),
            (
                "partials/share.html",
                include_str!("genesis/partials/share.html"),
            ),
            (
                "partials/scripts.html",
                include_str!("genesis/partials/scripts.html"),
            ),
        ])?;

        tera.register_filter("encode_uri", encode_uri_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: percent-encode a URL like `encodeURI`
fn encode_uri_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("encode_uri", "value", String, value);
    Ok(tera::Value::String(encode_uri(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub root: String,
    pub stylesheet: String,
    pub last_updated: String,
    pub current_year: String,
    pub generator: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaData {
    pub title: String,
    pub description: String,
    pub open_graph: String,
    pub twitter: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabData {
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    /// Normalized path; encoded at render time
    pub src: String,
    pub alt: String,
    pub height: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub category_color: String,
    pub date: Option<String>,
    pub date_iso: Option<String>,
    pub detail_href: String,
    pub share_url: String,
    pub chart: Option<ChartData>,
    pub collapsed_html: String,
    pub expanded_html: String,
    pub expanded: bool,
    pub toggle_href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub category_color: String,
    pub date: Option<String>,
    pub date_iso: Option<String>,
    pub chart: Option<ChartData>,
    pub body_html: String,
    pub back_href: String,
    pub home_href: String,
    pub share_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OgImageData {
    pub brand: String,
    pub date: String,
    pub category: String,
    pub badge_width: usize,
    pub title_lines: Vec<OgLine>,
    pub tagline: String,
    pub domain: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OgLine {
    pub y: usize,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        let renderer = TemplateRenderer::new().unwrap();
        assert!(renderer.tera.get_template_names().any(|n| n == "index.html"));
    }

    #[test]
    fn test_encode_uri_filter() {
        let value = tera::Value::String("/charts/a b.png".to_string());
        let out = encode_uri_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("/charts/a%20b.png".to_string()));
    }
}
