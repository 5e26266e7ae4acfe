//! Text formatter - turns post text into bold/plain runs
//!
//! Explicit `**bold**` markers win. Text without a marker pair falls back to
//! a sentence policy chosen by the caller.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::helpers::html_escape;

lazy_static! {
    /// Non-greedy, non-nested marker pair; `.` does not cross newlines
    static ref MARKER_RE: Regex = Regex::new(r"\*\*.*?\*\*").unwrap();
    /// Non-terminators followed by a run of terminators
    static ref SENTENCE_RE: Regex = Regex::new(r"[^.!?]+[.!?]+").unwrap();
}

/// A contiguous span of text with one emphasis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// What to do with text that carries no marker pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// One plain run
    Plain,
    /// Summary view: one bold run
    Collapsed,
    /// Full view: one run per sentence, first and last bold
    Expanded,
}

/// Split `text` into styled runs in document order
///
/// Never fails: a dangling `**` is kept as literal text.
pub fn format(text: &str, fallback: Fallback) -> Vec<Run> {
    if text.is_empty() {
        return Vec::new();
    }
    if !MARKER_RE.is_match(text) {
        return format_sentences(text, fallback);
    }

    let mut runs = Vec::new();
    let mut last = 0;
    for m in MARKER_RE.find_iter(text) {
        runs.push(Run::plain(&text[last..m.start()]));
        runs.push(Run::bold(&text[m.start() + 2..m.end() - 2]));
        last = m.end();
    }
    runs.push(Run::plain(&text[last..]));
    runs
}

fn format_sentences(text: &str, fallback: Fallback) -> Vec<Run> {
    match fallback {
        Fallback::Plain => vec![Run::plain(text)],
        Fallback::Collapsed => vec![Run::bold(text)],
        Fallback::Expanded => {
            let sentences = split_sentences(text);
            let last = sentences.len().saturating_sub(1);
            sentences
                .into_iter()
                .enumerate()
                .map(|(i, sentence)| Run {
                    text: format!("{} ", sentence),
                    bold: i == 0 || i == last,
                })
                .collect()
        }
    }
}

/// Sentences of `text`, trimmed; trailing text without a terminator is its own sentence
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences: Vec<&str> = Vec::new();
    let mut last = 0;
    for m in SENTENCE_RE.find_iter(text) {
        sentences.push(m.as_str().trim());
        last = m.end();
    }

    let rest = text[last..].trim();
    if !rest.is_empty() || sentences.is_empty() {
        sentences.push(if sentences.is_empty() { text } else { rest });
    }
    sentences
}

/// Render runs as inline HTML
pub fn to_html(runs: &[Run]) -> String {
    let mut html = String::new();
    for run in runs {
        if run.bold {
            html.push_str(r#"<strong class="font-bold">"#);
            html.push_str(&html_escape(&run.text));
            html.push_str("</strong>");
        } else {
            html.push_str("<span>");
            html.push_str(&html_escape(&run.text));
            html.push_str("</span>");
        }
    }
    html
}

/// Format and render in one step
pub fn format_html(text: &str, fallback: Fallback) -> String {
    to_html(&format(text, fallback))
}
