//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters `encodeURI` leaves alone, besides alphanumerics
const URI: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Characters `encodeURIComponent` leaves alone, besides alphanumerics
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How list filters are addressed in generated links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// `/?cat=<name>`, resolved by the server
    Query,
    /// `/cat/<slug>/`, pre-rendered by the generator
    Static,
}

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/charts/a.png") // -> "/research/charts/a.png"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Prefix a root-relative path with the base URL; anything else is returned as is
///
/// # Examples
/// ```ignore
/// absolute_url("https://example.com", "/i/3/") // -> "https://example.com/i/3/"
/// absolute_url("https://example.com", "https://cdn/x.png") // unchanged
/// ```
pub fn absolute_url(base_url: &str, path: &str) -> String {
    if !path.starts_with('/') {
        return path.to_string();
    }
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Canonicalize an asset reference to an absolute or root-relative form
///
/// Some records store chart paths without the leading separator.
/// Percent-encoding is left to [`encode_uri`] at render time.
pub fn normalize_asset_path(path: Option<&str>) -> Option<String> {
    let path = path?;
    if path.starts_with("http") || path.starts_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("/{}", path))
    }
}

/// Link to an asset as served by this site
///
/// Root-relative paths are placed under `root`; absolute and protocol-relative
/// URLs are returned as they are. Not encoded.
pub fn asset_url(config: &SiteConfig, path: Option<&str>) -> Option<String> {
    let path = normalize_asset_path(path)?;
    if path.starts_with("http") || path.starts_with("//") {
        Some(path)
    } else {
        Some(url_for(config, &path))
    }
}

/// Percent-encode like ECMAScript `encodeURI`
pub fn encode_uri(uri: &str) -> String {
    utf8_percent_encode(uri, URI).to_string()
}

/// Percent-encode like ECMAScript `encodeURIComponent`
pub fn encode_uri_component(component: &str) -> String {
    utf8_percent_encode(component, URI_COMPONENT).to_string()
}

/// Link to the list view filtered by `category`
pub fn list_href(config: &SiteConfig, category: &str, routing: Routing) -> String {
    if category == config.all_label {
        return url_for(config, "/");
    }
    match routing {
        Routing::Query => format!(
            "{}?cat={}",
            url_for(config, "/"),
            encode_uri_component(category)
        ),
        Routing::Static => url_for(config, &format!("cat/{}/", category_slug(category))),
    }
}

/// Directory name used for a category's pre-rendered page
///
/// Names with nothing to slugify (`??`, emoji) fall back to `cat-` and the hex
/// of their bytes, so the directory needs no percent-encoding.
pub fn category_slug(category: &str) -> String {
    let slug = slug::slugify(category);
    if !slug.is_empty() {
        return slug;
    }
    let hex: String = category.bytes().map(|b| format!("{:02x}", b)).collect();
    format!("cat-{}", hex)
}

/// Root-relative path of a post's detail page
pub fn post_path(config: &SiteConfig, id: i64) -> String {
    url_for(config, &format!("i/{}/", id))
}

/// Detail link that remembers which list it was opened from
pub fn detail_href(config: &SiteConfig, id: i64, from: &str) -> String {
    format!("{}?from={}", post_path(config, id), encode_uri_component(from))
}

/// Root-relative path of the generated preview image
pub fn og_image_path(config: &SiteConfig, id: i64) -> String {
    url_for(config, &format!("i/{}/opengraph-image.svg", id))
}

/// Accept a `from` locator only when it stays on this site
pub fn safe_return_path(config: &SiteConfig, from: Option<&str>) -> String {
    match from {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => url_for(config, "/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = "/research/".to_string();
        config.all_label = "All".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/charts/a.png"), "/research/charts/a.png");
        assert_eq!(url_for(&config, ""), "/research/");
        assert_eq!(url_for(&SiteConfig::default(), "/"), "/");
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://example.com", "/i/3/"),
            "https://example.com/i/3/"
        );
        assert_eq!(
            absolute_url("https://example.com", "http://cdn.test/x.png"),
            "http://cdn.test/x.png"
        );
    }

    #[test]
    fn test_normalize_asset_path() {
        assert_eq!(
            normalize_asset_path(Some("charts/x.png")).as_deref(),
            Some("/charts/x.png")
        );
        assert_eq!(
            normalize_asset_path(Some("/charts/x.png")).as_deref(),
            Some("/charts/x.png")
        );
        assert_eq!(
            normalize_asset_path(Some("http://a/b.png")).as_deref(),
            Some("http://a/b.png")
        );
        assert_eq!(normalize_asset_path(None), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for p in ["", "a", "/a", "charts/x y.png", "https://x/y", "httpish/z", "//cdn/x"] {
            let once = normalize_asset_path(Some(p));
            let twice = normalize_asset_path(once.as_deref());
            assert_eq!(once, twice, "not idempotent for {:?}", p);
        }
    }

    #[test]
    fn test_asset_url_respects_root() {
        let config = test_config();
        assert_eq!(
            asset_url(&config, Some("charts/x.png")).as_deref(),
            Some("/research/charts/x.png")
        );
        assert_eq!(
            asset_url(&config, Some("/charts/x.png")).as_deref(),
            Some("/research/charts/x.png")
        );
        assert_eq!(
            asset_url(&config, Some("https://cdn.test/x.png")).as_deref(),
            Some("https://cdn.test/x.png")
        );
        assert_eq!(
            asset_url(&config, Some("//cdn.test/x.png")).as_deref(),
            Some("//cdn.test/x.png")
        );
        assert_eq!(
            asset_url(&SiteConfig::default(), Some("charts/x.png")).as_deref(),
            Some("/charts/x.png")
        );
        assert_eq!(asset_url(&config, None), None);
    }

    #[test]
    fn test_encode_uri() {
        assert_eq!(
            encode_uri("/charts/Gold — Silver ratio.png"),
            "/charts/Gold%20%E2%80%94%20Silver%20ratio.png"
        );
        assert_eq!(
            encode_uri("https://a.test/x?y=1&z=(2)#h"),
            "https://a.test/x?y=1&z=(2)#h"
        );
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("/?cat=Macro & FX"), "%2F%3Fcat%3DMacro%20%26%20FX");
    }

    #[test]
    fn test_list_href() {
        let config = test_config();
        assert_eq!(list_href(&config, "All", Routing::Query), "/research/");
        assert_eq!(
            list_href(&config, "Macro & FX", Routing::Query),
            "/research/?cat=Macro%20%26%20FX"
        );
        assert_eq!(
            list_href(&config, "Macro & FX", Routing::Static),
            "/research/cat/macro-fx/"
        );
    }

    #[test]
    fn test_category_slug_is_path_safe() {
        assert_eq!(category_slug("Rates & FX"), "rates-fx");
        assert_eq!(category_slug("??"), "cat-3f3f");
        assert_eq!(category_slug("!!"), "cat-2121");
        assert_ne!(category_slug("??"), category_slug("!!"));
        for name in ["??", "!!", "📈"] {
            let slug = category_slug(name);
            assert!(
                slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
                "{:?} -> {:?}",
                name,
                slug
            );
        }
        assert_eq!(
            list_href(&SiteConfig::default(), "??", Routing::Static),
            "/cat/cat-3f3f/"
        );
    }

    #[test]
    fn test_detail_href() {
        let config = SiteConfig::default();
        assert_eq!(detail_href(&config, 4, "/?cat=FX"), "/i/4/?from=%2F%3Fcat%3DFX");
    }

    #[test]
    fn test_safe_return_path() {
        let config = SiteConfig::default();
        assert_eq!(safe_return_path(&config, Some("/?cat=FX")), "/?cat=FX");
        assert_eq!(safe_return_path(&config, Some("//evil.test")), "/");
        assert_eq!(safe_return_path(&config, Some("https://evil.test")), "/");
        assert_eq!(safe_return_path(&config, None), "/");
    }
}
