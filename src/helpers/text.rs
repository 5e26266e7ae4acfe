//! Plain-text helpers: descriptions and line wrapping

use crate::content::Post;

/// Default description bound used for social metadata
pub const DEFAULT_DESCRIPTION_LENGTH: usize = 160;

/// Bounded plain-text description of a post
///
/// Uses the summary, else the full text. Whitespace runs collapse to one
/// space. Text longer than `max_len` characters is cut to `max_len - 1`
/// characters plus `…`, without looking for a word boundary.
pub fn summarize(post: &Post, max_len: usize) -> String {
    let cleaned = collapse_whitespace(post.short_text());
    if cleaned.chars().count() <= max_len {
        return cleaned;
    }

    let mut truncated: String = cleaned.chars().take(max_len.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Replace every whitespace run with a single space and trim both ends
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap text at word boundaries into at most `max_lines` lines
///
/// Overflowing text is dropped and the last line ends with `…`.
pub fn word_wrap(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in s.split_whitespace() {
        let line_len = line.chars().count();
        let word_len = word.chars().count();
        if line_len > 0 && line_len + word_len + 1 > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }

    if max_lines > 0 && lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_summary(summary: &str) -> Post {
        let mut post = Post::new(1, "A", "T");
        post.summary = Some(summary.to_string());
        post
    }

    #[test]
    fn test_summarize_truncates_with_ellipsis() {
        let post = post_with_summary("Hello   world\n\n");
        assert_eq!(summarize(&post, 10), "Hello wor…");
        assert_eq!(summarize(&post, 10).chars().count(), 10);
    }

    #[test]
    fn test_summarize_short_text_unchanged() {
        let post = post_with_summary("  Gold  broke\tout.\n");
        assert_eq!(summarize(&post, DEFAULT_DESCRIPTION_LENGTH), "Gold broke out.");

        let exact = post_with_summary("abcdefghij");
        assert_eq!(summarize(&exact, 10), "abcdefghij");
    }

    #[test]
    fn test_summarize_bound_holds() {
        let long = "word ".repeat(100);
        let post = post_with_summary(&long);
        let out = summarize(&post, DEFAULT_DESCRIPTION_LENGTH);
        assert_eq!(out.chars().count(), DEFAULT_DESCRIPTION_LENGTH);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_summarize_falls_back_to_full_content() {
        let mut post = Post::new(1, "A", "T");
        post.summary = Some(String::new());
        post.full_content = Some("Full body.".to_string());
        assert_eq!(summarize(&post, 160), "Full body.");

        let empty = Post::new(2, "A", "T");
        assert_eq!(summarize(&empty, 160), "");
    }

    #[test]
    fn test_summarize_counts_characters_not_bytes() {
        let post = post_with_summary("é".repeat(12).as_str());
        assert_eq!(summarize(&post, 10), format!("{}…", "é".repeat(9)));
    }

    #[test]
    fn test_word_wrap() {
        assert_eq!(
            word_wrap("Gold miners are finally catching a bid", 16, 0),
            vec!["Gold miners are", "finally catching", "a bid"]
        );
        assert_eq!(
            word_wrap("one two three four", 8, 2),
            vec!["one two", "three…"]
        );
        assert!(word_wrap("   ", 10, 3).is_empty());
    }
}
