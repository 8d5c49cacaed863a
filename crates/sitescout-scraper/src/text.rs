//! Body-text extraction and corpus assembly.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never reaches the corpus.
const NON_CONTENT_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Content roots in priority order.
static CONTENT_ROOT_SELECTORS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    ["main", "article", "body"].map(|tag| Selector::parse(tag).expect("valid selector"))
});
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Label of the home-page part of the corpus.
pub const HOME_PAGE_LABEL: &str = "HOME PAGE";

/// Whitespace-normalised text of the page's `<main>`, `<article>` or
/// `<body>` (first present wins), ignoring script, style, nav, footer and
/// header content.
#[must_use]
pub fn extract_body_text(document: &Html) -> String {
    let Some(root) = CONTENT_ROOT_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .find(|el| !inside_non_content(*el))
    }) else {
        return String::new();
    };

    let mut pieces: Vec<&str> = Vec::new();
    push_text(root, &mut pieces);
    WHITESPACE_RE
        .replace_all(&pieces.join(" "), " ")
        .trim()
        .to_owned()
}

fn inside_non_content(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| NON_CONTENT_TAGS.contains(&ancestor.value().name()))
}

fn push_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed);
            }
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if !NON_CONTENT_TAGS.contains(&child_el.value().name()) {
                push_text(child_el, pieces);
            }
        }
    }
}

/// Joins labelled parts as `[LABEL]\n<text>` separated by blank lines.
///
/// Subpages come first so that truncation cuts generic home-page copy
/// before venue specifics. An empty home text adds no part.
#[must_use]
pub fn assemble_corpus(subpage_parts: &[(String, String)], home_text: &str) -> String {
    let mut parts: Vec<String> = subpage_parts
        .iter()
        .map(|(label, text)| format!("[{label}]\n{text}"))
        .collect();
    if !home_text.is_empty() {
        parts.push(format!("[{HOME_PAGE_LABEL}]\n{home_text}"));
    }
    parts.join("\n\n")
}

/// Hard cut at `max_chars` characters (not bytes).
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_owned(),
        None => text.to_owned(),
    }
}
