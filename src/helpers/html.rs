//! HTML helper functions

/// Social metadata for one page
#[derive(Debug, Clone, PartialEq)]
pub struct SocialMeta {
    pub title: String,
    pub description: String,
    /// Absolute page URL
    pub url: String,
    /// Absolute preview image URL
    pub image: Option<String>,
    /// `article` for posts, `website` for listings
    pub og_type: &'static str,
}

/// Generate Open Graph meta tags
pub fn open_graph(meta: &SocialMeta, site_name: &str) -> String {
    let mut tags = vec![
        format!(r#"<meta property="og:type" content="{}">"#, meta.og_type),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(&meta.title)
        ),
        format!(
            r#"<meta property="og:url" content="{}">"#,
            html_escape(&meta.url)
        ),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            html_escape(site_name)
        ),
    ];

    if !meta.description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            html_escape(&meta.description)
        ));
    }

    if let Some(image) = &meta.image {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            html_escape(image)
        ));
    }

    tags.join("\n")
}

/// Generate Twitter card meta tags
pub fn twitter_card(meta: &SocialMeta) -> String {
    let mut tags = vec![
        r#"<meta name="twitter:card" content="summary_large_image">"#.to_string(),
        format!(
            r#"<meta name="twitter:title" content="{}">"#,
            html_escape(&meta.title)
        ),
    ];

    if !meta.description.is_empty() {
        tags.push(format!(
            r#"<meta name="twitter:description" content="{}">"#,
            html_escape(&meta.description)
        ));
    }

    if let Some(image) = &meta.image {
        tags.push(format!(
            r#"<meta name="twitter:image" content="{}">"#,
            html_escape(image)
        ));
    }

    tags.join("\n")
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="insights-rs {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip characters XML 1.0 does not allow (keeps tab, newline, carriage return)
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
