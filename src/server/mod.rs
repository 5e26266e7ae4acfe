//! Development server with live reload
//!
//! Views are rendered per request from the loaded content store; the watcher
//! swaps in a fresh store when the data file changes.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::new_debouncer;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::commands::generate::WatchPaths;
use crate::content::ContentStore;
use crate::helpers::{category_slug, Routing};
use crate::render::{PageBuilder, ViewState};
use crate::templates::{TemplateRenderer, STYLESHEET};
use crate::Site;

/// Server state
pub struct ServerState {
    site: RwLock<Site>,
    store: RwLock<ContentStore>,
    renderer: TemplateRenderer,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    pub fn new(site: Site, store: ContentStore, live_reload: bool) -> Result<Self> {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Ok(Self {
            site: RwLock::new(site),
            store: RwLock::new(store),
            renderer: TemplateRenderer::new()?,
            reload_tx,
            live_reload,
        })
    }

    /// Reload configuration and posts from disk, keeping the old ones on failure
    pub fn reload(&self) -> Result<()> {
        let base_dir = read_lock(&self.site).base_dir.clone();
        let site = Site::from_env(&base_dir)?;
        let store = site.load_store()?;
        tracing::info!("Reloaded {} posts", store.len());

        *write_lock(&self.store) = store;
        *write_lock(&self.site) = site;
        Ok(())
    }
}

/// Query parameters of the list view
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub cat: Option<String>,
    pub expanded: Option<String>,
}

/// Query parameters of the detail view
#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    pub from: Option<String>,
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let store = site.load_store()?;
    tracing::info!("Loaded {} posts from {:?}", store.len(), site.data_path);

    let state = Arc::new(ServerState::new(site.clone(), store, watch)?);
    let app = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let site = site.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(&site, &state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router over a shared state
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(list_handler))
        .route("/cat/:slug", get(category_handler))
        .route("/cat/:slug/", get(category_handler))
        .route("/i/:id", get(post_handler))
        .route("/i/:id/", get(post_handler))
        .route("/i/:id/opengraph-image.svg", get(og_image_handler))
        .route("/style.css", get(stylesheet_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Render the list view for `?cat=` and `?expanded=`
pub fn render_list(state: &ServerState, query: &ListQuery) -> Result<(StatusCode, String)> {
    let site = read_lock(&state.site);
    let store = read_lock(&state.store);

    let expanded = query
        .expanded
        .as_deref()
        .and_then(|id| store.find(id))
        .map(|post| post.id);
    let view = ViewState::new(&site.config, query.cat.as_deref()).with_expanded(expanded);

    let html = pages(state, &site).list_page(&store, &view)?;
    Ok((StatusCode::OK, html))
}

/// Render the list view for a `/cat/<slug>/` path
pub fn render_category(state: &ServerState, slug: &str) -> Result<(StatusCode, String)> {
    let category = {
        let site = read_lock(&state.site);
        let store = read_lock(&state.store);
        store
            .categories(&site.config.all_label)
            .into_iter()
            .skip(1)
            .find(|c| category_slug(c) == slug)
    };

    match category {
        Some(cat) => render_list(
            state,
            &ListQuery {
                cat: Some(cat),
                expanded: None,
            },
        ),
        None => render_not_found(state),
    }
}

/// Render a detail page, or the not-found page for unknown ids
pub fn render_post(state: &ServerState, id: &str, from: Option<&str>) -> Result<(StatusCode, String)> {
    let site = read_lock(&state.site);
    let store = read_lock(&state.store);

    match store.find(id) {
        Some(post) => {
            let html = pages(state, &site).post_page(post, from)?;
            Ok((StatusCode::OK, html))
        }
        None => {
            tracing::debug!("No post with id {:?}", id);
            let html = pages(state, &site).not_found_page()?;
            Ok((StatusCode::NOT_FOUND, html))
        }
    }
}

/// Render the preview image; unknown ids get the generic one
pub fn render_og_image(state: &ServerState, id: &str) -> Result<(StatusCode, String)> {
    let site = read_lock(&state.site);
    let store = read_lock(&state.store);
    let svg = pages(state, &site).og_image(store.find(id))?;
    Ok((StatusCode::OK, svg))
}

pub fn render_not_found(state: &ServerState) -> Result<(StatusCode, String)> {
    let site = read_lock(&state.site);
    let html = pages(state, &site).not_found_page()?;
    Ok((StatusCode::NOT_FOUND, html))
}

fn pages<'a>(state: &'a ServerState, site: &'a Site) -> PageBuilder<'a> {
    PageBuilder::new(&site.config, &state.renderer, Routing::Query).with_live_reload(state.live_reload)
}

async fn list_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    html_response(render_list(&state, &query))
}

async fn category_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    html_response(render_category(&state, &slug))
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Query(query): Query<PostQuery>,
) -> Response {
    html_response(render_post(&state, &id, query.from.as_deref()))
}

async fn og_image_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    match render_og_image(&state, &id) {
        Ok((status, svg)) => (status, [(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => error_response(e),
    }
}

async fn stylesheet_handler() -> Response {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET).into_response()
}

/// Serve files from the static directory, else the not-found page
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let static_dir = read_lock(&state.site).static_dir.clone();
    let mut service = ServeDir::new(static_dir);

    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => html_response(render_not_found(&state)),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn html_response(result: Result<(StatusCode, String)>) -> Response {
    match result {
        Ok((status, html)) => (status, Html(html)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: anyhow::Error) -> Response {
    tracing::error!("Render failed: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}

/// Watch the data file, static directory and config, reloading the store on change
fn watch_and_reload(site: &Site, state: &ServerState) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let paths = WatchPaths::new(site);
    for (dir, mode) in paths.dirs() {
        debouncer.watcher().watch(&dir, mode)?;
        tracing::debug!("Watching: {:?}", dir);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| paths.is_relevant(&e.path))
                    .collect();

                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                match state.reload() {
                    Ok(()) => {
                        // Notify all connected clients to reload
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => tracing::error!("Reload failed, keeping previous posts: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

// A poisoned lock only means a panicking reader; the data is still whole
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;

    fn state() -> ServerState {
        let mut config = crate::config::SiteConfig::default();
        config.url = "https://genesis.example".to_string();
        let site = Site::with_config(std::env::temp_dir(), config);

        let mut a = Post::new(1, "Macro & FX", "Dollar fades");
        a.summary = Some("The **dollar** rolls over.".to_string());
        let b = Post::new(2, "Equities", "Breadth improves");
        let c = Post::new(3, "Macro & FX", "Yen carry unwinds");

        ServerState::new(site, ContentStore::from_posts(vec![a, b, c]), true).unwrap()
    }

    #[test]
    fn test_router_builds_with_request_tracing() {
        let app = router(Arc::new(state()));
        let _: Router = app;
    }

    #[test]
    fn test_render_list_filters_by_query() {
        let state = state();
        let (status, html) = render_list(
            &state,
            &ListQuery {
                cat: Some("Macro & FX".to_string()),
                expanded: None,
            },
        )
        .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Yen carry unwinds"));
        assert!(html.contains("Dollar fades"));
        assert!(!html.contains("Breadth improves"));
        assert!(html.contains("/__livereload"));
    }

    #[test]
    fn test_render_list_ignores_unknown_expanded_id() {
        let state = state();
        let (_, html) = render_list(
            &state,
            &ListQuery {
                cat: None,
                expanded: Some("nope".to_string()),
            },
        )
        .unwrap();
        assert!(!html.contains(r#"data-expanded="true""#));

        let (_, html) = render_list(
            &state,
            &ListQuery {
                cat: None,
                expanded: Some("2".to_string()),
            },
        )
        .unwrap();
        assert!(html.contains(r#"data-insight="2" data-expanded="true""#));
    }

    #[test]
    fn test_render_category_by_slug() {
        let state = state();
        let (status, html) = render_category(&state, "macro-fx").unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Dollar fades"));
        assert!(!html.contains("Breadth improves"));

        let (status, _) = render_category(&state, "crypto").unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_render_category_without_sluggable_name() {
        let site = Site::with_config(std::env::temp_dir(), crate::config::SiteConfig::default());
        let store = ContentStore::from_posts(vec![
            Post::new(1, "??", "Open questions"),
            Post::new(2, "Equities", "Breadth improves"),
        ]);
        let state = ServerState::new(site, store, false).unwrap();

        let (_, list) = render_list(&state, &ListQuery::default()).unwrap();
        assert!(list.contains(r#"href="/?cat=%3F%3F""#));

        let (status, html) = render_category(&state, "cat-3f3f").unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Open questions"));
        assert!(!html.contains("Breadth improves"));
    }

    #[test]
    fn test_render_post() {
        let state = state();
        let (status, html) = render_post(&state, "1", Some("/?cat=Macro%20%26%20FX")).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Dollar fades"));
        assert!(html.contains(r#"href="/?cat=Macro%20%26%20FX""#));
        assert!(html.contains("https://genesis.example/i/1/opengraph-image.svg"));
    }

    #[test]
    fn test_render_post_not_found() {
        let state = state();
        for id in ["99", "abc", ""] {
            let (status, html) = render_post(&state, id, None).unwrap();
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(html.contains("Page not found"));
        }
    }

    #[test]
    fn test_render_og_image() {
        let state = state();
        let (status, svg) = render_og_image(&state, "1").unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(svg.contains("MACRO &amp; FX"));
        assert!(svg.contains("Dollar fades"));
    }
}
