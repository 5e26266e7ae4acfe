//! Post model

use serde::{Deserialize, Serialize};

/// One insight record from the data file
///
/// Every optional attribute stays `None` when the JSON omits it; display code
/// decides the fallback. Records are never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier; also the newest-first sort key
    pub id: i64,

    /// Free-form display date (usually `DD-MM-YYYY`)
    #[serde(default)]
    pub date: Option<String>,

    /// Grouping and filter key
    #[serde(default)]
    pub category: String,

    /// Style token for the category badge
    #[serde(default)]
    pub category_color: Option<String>,

    /// Post title
    #[serde(default)]
    pub title: String,

    /// Short-form text
    #[serde(default)]
    pub summary: Option<String>,

    /// Long-form text
    #[serde(default)]
    pub full_content: Option<String>,

    /// Chart image reference (relative, root-relative or absolute)
    #[serde(default)]
    pub chart_path: Option<String>,

    /// CSS height hint for the chart
    #[serde(default)]
    pub chart_height: Option<String>,
}

impl Post {
    /// Create a post with only the required fields
    pub fn new(id: i64, category: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            date: None,
            category: category.into(),
            category_color: None,
            title: title.into(),
            summary: None,
            full_content: None,
            chart_path: None,
            chart_height: None,
        }
    }

    /// Text shown on a collapsed card: the summary if present, else the full text
    pub fn collapsed_text(&self) -> &str {
        self.summary
            .as_deref()
            .or(self.full_content.as_deref())
            .unwrap_or("")
    }

    /// Text shown on an expanded card: the full text if present, else the summary
    pub fn expanded_text(&self) -> &str {
        self.full_content
            .as_deref()
            .or(self.summary.as_deref())
            .unwrap_or("")
    }

    /// First non-empty of summary and full text
    pub fn short_text(&self) -> &str {
        first_non_empty(&[&self.summary, &self.full_content])
    }

    /// First non-empty of full text and summary
    pub fn long_text(&self) -> &str {
        first_non_empty(&[&self.full_content, &self.summary])
    }

    /// Badge style token, falling back to `default`
    pub fn category_color<'a>(&'a self, default: &'a str) -> &'a str {
        match self.category_color.as_deref() {
            Some(color) if !color.trim().is_empty() => color,
            _ => default,
        }
    }
}

fn first_non_empty<'a>(candidates: &[&'a Option<String>]) -> &'a str {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": 7,
            "date": "03-02-2025",
            "category": "Macro",
            "categoryColor": "bg-blue-600",
            "title": "Rates",
            "fullContent": "Long text.",
            "chartPath": "charts/rates.png",
            "chartHeight": "320px",
            "unknownField": true
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.category_color.as_deref(), Some("bg-blue-600"));
        assert_eq!(post.full_content.as_deref(), Some("Long text."));
        assert_eq!(post.chart_path.as_deref(), Some("charts/rates.png"));
        assert!(post.summary.is_none());
    }

    #[test]
    fn test_missing_optionals_default() {
        let post: Post = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(post.category, "");
        assert_eq!(post.title, "");
        assert_eq!(post.collapsed_text(), "");
        assert_eq!(post.category_color("bg-slate-700"), "bg-slate-700");
    }

    #[test]
    fn test_text_selection() {
        let mut post = Post::new(1, "A", "T");
        post.summary = Some(String::new());
        post.full_content = Some("Full.".to_string());

        // Collapsed keeps an empty-but-present summary, the short text skips it
        assert_eq!(post.collapsed_text(), "");
        assert_eq!(post.short_text(), "Full.");
        assert_eq!(post.expanded_text(), "Full.");
        assert_eq!(post.long_text(), "Full.");
    }
}
