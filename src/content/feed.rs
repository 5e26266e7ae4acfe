//! Feed queries: category tabs, filtered listing and post lookup
//!
//! All functions are pure; callers own the view state and pass it in.

use indexmap::IndexSet;

use super::Post;

/// Distinct categories, reserved label first, then first-encounter order
///
/// A post whose category equals `all_label` still gets its own entry, so the
/// label can appear twice.
pub fn categories(posts: &[Post], all_label: &str) -> Vec<String> {
    let distinct: IndexSet<&str> = posts
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    std::iter::once(all_label)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

/// Posts visible under `active`, sorted by id descending
///
/// Matching is exact and case-sensitive. `all_label` disables filtering.
pub fn select<'a>(posts: &'a [Post], active: &str, all_label: &str) -> Vec<&'a Post> {
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));

    if active == all_label {
        return sorted;
    }

    sorted.retain(|p| p.category == active);
    sorted
}

/// First post whose id equals `id` parsed as an integer
pub fn find<'a>(posts: &'a [Post], id: &str) -> Option<&'a Post> {
    let id: i64 = id.trim().parse().ok()?;
    posts.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Post> {
        vec![
            Post::new(1, "A", "one"),
            Post::new(3, "B", "three"),
            Post::new(2, "A", "two"),
        ]
    }

    fn ids(posts: &[&Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_categories_first_seen_order() {
        let mut posts = sample();
        posts.push(Post::new(4, "", "uncategorised"));
        posts.push(Post::new(5, "C", "five"));

        assert_eq!(categories(&posts, "All"), vec!["All", "A", "B", "C"]);
    }

    #[test]
    fn test_categories_reserved_label_collision_is_kept() {
        let posts = vec![Post::new(1, "All", "odd"), Post::new(2, "A", "a")];
        assert_eq!(categories(&posts, "All"), vec!["All", "All", "A"]);
    }

    #[test]
    fn test_select_all_sorted_descending() {
        let posts = sample();
        assert_eq!(ids(&select(&posts, "All", "All")), vec![3, 2, 1]);
    }

    #[test]
    fn test_select_category() {
        let posts = sample();
        assert_eq!(ids(&select(&posts, "A", "All")), vec![2, 1]);
    }

    #[test]
    fn test_select_is_exact_match() {
        let posts = sample();
        assert!(select(&posts, "a", "All").is_empty());
        assert!(select(&posts, "Missing", "All").is_empty());
    }

    #[test]
    fn test_select_filter_is_subsequence_of_all() {
        let posts = sample();
        let all = ids(&select(&posts, "All", "All"));
        let filtered = ids(&select(&posts, "B", "All"));
        let mut cursor = all.iter();
        for id in &filtered {
            assert!(cursor.any(|x| x == id));
        }
    }

    #[test]
    fn test_find() {
        let posts = sample();
        assert_eq!(find(&posts, "3").unwrap().title, "three");
        assert_eq!(find(&posts, " 2 ").unwrap().title, "two");
        assert!(find(&posts, "abc").is_none());
        assert!(find(&posts, "42").is_none());
        assert!(find(&posts, "").is_none());
    }
}
