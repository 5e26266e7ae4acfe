//! Content store - the posts loaded once from the data file

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::{feed, ContentError, Post};

/// Read-only, arrival-ordered collection of posts
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    posts: Vec<Post>,
}

impl ContentStore {
    /// Load and parse the JSON array at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let posts: Vec<Post> =
            serde_json::from_str(&content).map_err(|source| ContentError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), path);
        Ok(Self::from_posts(posts))
    }

    /// Build a store from already parsed posts
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let mut seen = HashSet::new();
        for post in &posts {
            if !seen.insert(post.id) {
                tracing::warn!(
                    "Duplicate post id {} ({:?}); lookups return the first record",
                    post.id,
                    post.title
                );
            }
        }
        Self { posts }
    }

    /// All posts in arrival order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Category tabs, reserved label first
    pub fn categories(&self, all_label: &str) -> Vec<String> {
        feed::categories(&self.posts, all_label)
    }

    /// Visible posts for the active category, newest first
    pub fn select(&self, active: &str, all_label: &str) -> Vec<&Post> {
        feed::select(&self.posts, active, all_label)
    }

    /// Resolve a post from its textual id
    pub fn find(&self, id: &str) -> Option<&Post> {
        feed::find(&self.posts, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "category": "A", "title": "One"}},
               {{"id": 2, "category": "B", "title": "Two", "summary": "S"}}]"#
        )
        .unwrap();

        let store = ContentStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.find("2").unwrap().title, "Two");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ContentStore::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id": 1}}"#).unwrap();

        let err = ContentStore::load(file.path()).unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let store = ContentStore::from_posts(vec![
            Post::new(5, "A", "first"),
            Post::new(5, "B", "second"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find("5").unwrap().title, "first");
    }
}
