//! Generate static files

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::Generator;
use crate::Site;

/// Generate the static site
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let store = site.load_store()?;
    tracing::info!("Loaded {} posts from {:?}", store.len(), site.data_path);

    let generator = Generator::new(site)?;
    generator.generate(&store)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch the data file, static directory and config, regenerating on change
pub async fn watch(site: &Site) -> Result<()> {
    let site = site.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&site)).await?
}

fn watch_blocking(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    let paths = WatchPaths::new(site);
    for (dir, mode) in paths.dirs() {
        watcher.watch(&dir, mode)?;
        tracing::debug!("Watching: {:?}", dir);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                if !event.paths.iter().any(|p| paths.is_relevant(p)) {
                    continue;
                }

                // Only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    // Config edits change paths and labels, so re-read it each time
                    let result = Site::from_env(&site.base_dir).and_then(|fresh| run(&fresh));
                    if let Err(e) = result {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

/// Files whose changes trigger a rebuild
///
/// Directories are watched rather than files: editors that save by renaming
/// replace the file, which would silence a watch on the file itself.
#[derive(Debug, Clone)]
pub struct WatchPaths {
    data_file: PathBuf,
    config_file: PathBuf,
    static_dir: PathBuf,
}

impl WatchPaths {
    pub fn new(site: &Site) -> Self {
        Self {
            data_file: resolve(&site.data_path),
            config_file: resolve(&site.config_path()),
            static_dir: site
                .static_dir
                .canonicalize()
                .unwrap_or_else(|_| site.static_dir.clone()),
        }
    }

    /// Existing directories to register with a watcher
    pub fn dirs(&self) -> Vec<(PathBuf, RecursiveMode)> {
        let mut dirs: Vec<(PathBuf, RecursiveMode)> = Vec::new();
        for file in [&self.data_file, &self.config_file] {
            if let Some(parent) = file.parent().filter(|p| p.is_dir()) {
                if !dirs.iter().any(|(d, _)| d == parent) {
                    dirs.push((parent.to_path_buf(), RecursiveMode::NonRecursive));
                }
            }
        }
        if self.static_dir.is_dir() {
            dirs.push((self.static_dir.clone(), RecursiveMode::Recursive));
        }
        dirs
    }

    /// Whether a change at `path` affects the site
    pub fn is_relevant(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        if path_str.contains(".git") || path_str.contains(".DS_Store") || path_str.ends_with('~')
        {
            return false;
        }
        path == self.data_file || path == self.config_file || path.starts_with(&self.static_dir)
    }
}

/// Canonical form of a file path whose file may be missing for a moment
fn resolve(file: &Path) -> PathBuf {
    match (file.parent(), file.file_name()) {
        (Some(dir), Some(name)) => dir
            .canonicalize()
            .map(|dir| dir.join(name))
            .unwrap_or_else(|_| file.to_path_buf()),
        _ => file.to_path_buf(),
    }
}
