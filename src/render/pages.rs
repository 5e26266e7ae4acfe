//! Page assembly shared by the generator and the development server

use anyhow::Result;
use tera::Context;

use super::format::{format_html, Fallback};
use super::ViewState;
use crate::config::SiteConfig;
use crate::content::{ContentStore, Post};
use crate::helpers::{
    absolute_url, asset_url, current_year, date_iso, detail_href, encode_uri, html_escape,
    list_href, meta_generator, og_image_path, open_graph, post_path, safe_return_path,
    summarize, today, twitter_card, url_for, word_wrap, Routing, SocialMeta,
};
use crate::templates::{
    CardData, ChartData, MetaData, OgImageData, OgLine, PostPageData, SiteData, TabData,
    TemplateRenderer,
};

/// Characters per title line in the preview image
const OG_LINE_WIDTH: usize = 36;
const OG_MAX_LINES: usize = 4;

/// Builds complete pages from the content store and a view state
pub struct PageBuilder<'a> {
    config: &'a SiteConfig,
    renderer: &'a TemplateRenderer,
    base_url: String,
    routing: Routing,
    live_reload: bool,
}

impl<'a> PageBuilder<'a> {
    pub fn new(config: &'a SiteConfig, renderer: &'a TemplateRenderer, routing: Routing) -> Self {
        Self {
            config,
            renderer,
            base_url: config.base_url(),
            routing,
            live_reload: false,
        }
    }

    /// Override the base URL used for absolute links
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Inject the live reload client into every page
    pub fn with_live_reload(mut self, live_reload: bool) -> Self {
        self.live_reload = live_reload;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The feed: category tabs plus the selected posts, newest first
    pub fn list_page(&self, store: &ContentStore, view: &ViewState) -> Result<String> {
        let all_label = &self.config.all_label;

        let tabs: Vec<TabData> = store
            .categories(all_label)
            .into_iter()
            .map(|label| TabData {
                href: list_href(self.config, &label, self.routing),
                active: label == view.active_category,
                label,
            })
            .collect();

        let from = view.return_path(self.config, self.routing);
        let cards: Vec<CardData> = store
            .select(&view.active_category, all_label)
            .into_iter()
            .map(|post| self.card(post, view, &from))
            .collect();

        let title = if view.is_filtered(self.config) {
            format!("{} · {}", view.active_category, self.config.title)
        } else {
            self.config.title.clone()
        };
        let meta = SocialMeta {
            title,
            description: self.config.description.clone(),
            url: absolute_url(&self.base_url, &from),
            image: None,
            og_type: "website",
        };

        let mut context = self.base_context(&meta);
        context.insert("tabs", &tabs);
        context.insert("cards", &cards);
        context.insert("all_label", all_label);

        self.renderer.render("index.html", &context)
    }

    /// One post's detail page; `from` is the list to return to
    pub fn post_page(&self, post: &Post, from: Option<&str>) -> Result<String> {
        let path = post_path(self.config, post.id);
        let share_url = absolute_url(&self.base_url, &path);

        let data = PostPageData {
            id: post.id,
            title: post.title.clone(),
            category: post.category.clone(),
            category_color: self.category_color(post),
            date: post.date.clone(),
            date_iso: post.date.as_deref().and_then(date_iso),
            chart: self.chart(post),
            body_html: format_html(post.long_text().trim(), Fallback::Plain),
            back_href: html_escape(&safe_return_path(self.config, from)),
            home_href: url_for(self.config, "/"),
            share_url: share_url.clone(),
        };

        let meta = SocialMeta {
            title: post.title.clone(),
            description: summarize(post, self.config.description_length),
            url: share_url,
            image: Some(self.social_image(post)),
            og_type: "article",
        };

        let mut context = self.base_context(&meta);
        context.insert("post", &data);
        context.insert("all_label", &self.config.all_label);

        self.renderer.render("post.html", &context)
    }

    /// Page shown for unknown routes and post ids
    pub fn not_found_page(&self) -> Result<String> {
        let meta = SocialMeta {
            title: format!("Page not found · {}", self.config.title),
            description: String::new(),
            url: absolute_url(&self.base_url, &url_for(self.config, "/")),
            image: None,
            og_type: "website",
        };
        let context = self.base_context(&meta);
        self.renderer.render("404.html", &context)
    }

    /// Placeholder preview image (SVG) carrying the title, category and date
    ///
    /// Unknown posts get the brand as title and a generic category.
    pub fn og_image(&self, post: Option<&Post>) -> Result<String> {
        let title = post
            .map(|p| p.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(self.config.title.as_str());
        let category = post
            .map(|p| p.category.to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "INSIGHT".to_string());
        let date = post.and_then(|p| p.date.clone()).unwrap_or_default();

        let title_lines = word_wrap(title, OG_LINE_WIDTH, OG_MAX_LINES)
            .into_iter()
            .enumerate()
            .map(|(i, text)| OgLine { y: 286 + i * 58, text })
            .collect();

        let data = OgImageData {
            brand: self.config.title.to_uppercase(),
            date,
            badge_width: 24 + category.chars().count() * 12,
            category,
            title_lines,
            tagline: self.config.footer_tagline.clone(),
            domain: domain_of(&self.base_url),
        };

        let mut context = Context::new();
        context.insert("og", &data);
        self.renderer.render("og_image.svg", &context)
    }

    /// Preview image URL: the post's chart when it has one, else the generated placeholder
    pub fn social_image(&self, post: &Post) -> String {
        match asset_url(self.config, post.chart_path.as_deref()) {
            Some(chart) => absolute_url(&self.base_url, &encode_uri(&chart)),
            None => absolute_url(&self.base_url, &og_image_path(self.config, post.id)),
        }
    }

    fn card(&self, post: &Post, view: &ViewState, from: &str) -> CardData {
        let (collapsed, expanded) = if self.config.smart_emphasis {
            (Fallback::Collapsed, Fallback::Expanded)
        } else {
            (Fallback::Plain, Fallback::Plain)
        };

        CardData {
            id: post.id,
            title: post.title.clone(),
            category: post.category.clone(),
            category_color: self.category_color(post),
            date: post.date.clone(),
            date_iso: post.date.as_deref().and_then(date_iso),
            detail_href: detail_href(self.config, post.id, from),
            share_url: absolute_url(&self.base_url, &post_path(self.config, post.id)),
            chart: self.chart(post),
            collapsed_html: format_html(post.collapsed_text(), collapsed),
            expanded_html: format_html(post.expanded_text(), expanded),
            expanded: view.is_expanded(post.id),
            toggle_href: self.toggle_href(view, post.id),
        }
    }

    /// No-script link that flips one card; the static build relies on the inline script
    fn toggle_href(&self, view: &ViewState, id: i64) -> String {
        let anchor = format!("#insight-{}", id);
        if self.routing == Routing::Static {
            return anchor;
        }

        let mut next = view.clone();
        next.toggle(id);
        let list = view.return_path(self.config, self.routing);
        match next.expanded {
            Some(expanded) => {
                let sep = if list.contains('?') { '&' } else { '?' };
                format!("{}{}expanded={}{}", list, sep, expanded, anchor)
            }
            None => format!("{}{}", list, anchor),
        }
    }

    fn chart(&self, post: &Post) -> Option<ChartData> {
        asset_url(self.config, post.chart_path.as_deref()).map(|src| ChartData {
            src,
            alt: post.title.clone(),
            height: post.chart_height.clone().filter(|h| !h.trim().is_empty()),
        })
    }

    fn category_color(&self, post: &Post) -> String {
        post.category_color(&self.config.default_category_color)
            .to_string()
    }

    fn site_data(&self) -> SiteData {
        SiteData {
            title: self.config.title.clone(),
            subtitle: self.config.subtitle.clone(),
            description: self.config.description.clone(),
            author: self.config.author.clone(),
            language: self.config.language.clone(),
            root: url_for(self.config, "/"),
            stylesheet: url_for(self.config, "style.css"),
            last_updated: today(&self.config.timezone),
            current_year: current_year(&self.config.timezone),
            generator: meta_generator(),
        }
    }

    fn base_context(&self, meta: &SocialMeta) -> Context {
        let meta_data = MetaData {
            title: meta.title.clone(),
            description: meta.description.clone(),
            open_graph: open_graph(meta, &self.config.title),
            twitter: twitter_card(meta),
        };

        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("meta", &meta_data);
        context.insert("live_reload", &self.live_reload);
        context
    }
}

/// Host part of a base URL, for display
fn domain_of(base_url: &str) -> String {
    base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url)
        .trim_end_matches('/')
        .to_string()
}
