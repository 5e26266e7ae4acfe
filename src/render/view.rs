//! Per-view state owned by the presentation layer

use crate::config::SiteConfig;
use crate::helpers::{list_href, Routing};

/// Active filter and expanded card for one list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Active category; the reserved label means no filter
    pub active_category: String,
    /// Post whose long-form text is shown, at most one
    pub expanded: Option<i64>,
}

impl ViewState {
    /// State for a request; a missing or empty category means no filter
    pub fn new(config: &SiteConfig, category: Option<&str>) -> Self {
        let active_category = category
            .filter(|c| !c.is_empty())
            .unwrap_or(config.all_label.as_str())
            .to_string();
        Self {
            active_category,
            expanded: None,
        }
    }

    pub fn with_expanded(mut self, id: Option<i64>) -> Self {
        self.expanded = id;
        self
    }

    /// Toggle the expanded card: expanding one collapses any other
    pub fn toggle(&mut self, id: i64) {
        self.expanded = if self.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded == Some(id)
    }

    pub fn is_filtered(&self, config: &SiteConfig) -> bool {
        self.active_category != config.all_label
    }

    /// Path of this list, used as the detail pages' return locator
    pub fn return_path(&self, config: &SiteConfig, routing: Routing) -> String {
        list_href(config, &self.active_category, routing)
    }
}
