//! Best-effort main-text extraction from downloaded pages.
//!
//! The heuristic is intentionally small and makes no promise of completeness:
//!
//! 1. Paragraphs inside navigation, headers, footers, asides, forms, scripts and
//!    similar boilerplate containers are ignored.
//! 2. If the page has `<article>` elements, the one with the most paragraph
//!    text wins.
//! 3. Otherwise paragraphs are grouped by their parent element and the
//!    heaviest group wins.
//! 4. A page without any usable paragraph falls back to the visible body text.
//!
//! An empty result is not an error; callers decide how to report it.

use crate::error::ExtractError;
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "iframe", "svg",
    "figcaption", "template", "button",
];

/// Paragraphs shorter than this many words are treated as chrome
/// ("Share", "Advertisement", ...).
const MIN_PARAGRAPH_WORDS: usize = 2;

/// Structured view of a downloaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArticle {
    pub title: Option<String>,
    /// Main body text, paragraphs separated by blank lines. May be empty.
    pub text: String,
}

/// Parse downloaded content and extract its main body.
#[instrument(level = "debug", skip_all, fields(bytes = content.len()))]
pub fn parse_article(
    content: &str,
    content_type: Option<&str>,
) -> Result<ParsedArticle, ExtractError> {
    if content.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    match content_type.map(mime_essence).as_deref() {
        None => {}
        Some("text/plain") => {
            return Ok(ParsedArticle {
                title: None,
                text: collapse_whitespace(content),
            });
        }
        Some(ct) if ct.contains("html") || ct.ends_with("xml") => {}
        Some(ct) => return Err(ExtractError::UnsupportedContentType(ct.to_string())),
    }

    let document = Html::parse_document(content);
    let body = document
        .select(&BODY)
        .next()
        .ok_or(ExtractError::NoDocumentRoot)?;

    let title = extract_title(&document);
    let mut paragraphs = best_article_paragraphs(&document);
    if paragraphs.is_empty() {
        paragraphs = densest_paragraph_group(body);
    }
    let text = if paragraphs.is_empty() {
        visible_text(body)
    } else {
        paragraphs.join("\n\n")
    };

    debug!(chars = text.chars().count(), has_title = title.is_some(), "Extracted article");
    Ok(ParsedArticle { title, text })
}

/// `"Text/HTML; charset=utf-8"` -> `"text/html"`.
fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&OG_TITLE)
        .filter_map(|m| m.value().attr("content"))
        .map(collapse_whitespace)
        .find(|t| !t.is_empty())
        .or_else(|| {
            document
                .select(&TITLE)
                .map(|t| collapse_whitespace(&t.text().collect::<String>()))
                .find(|t| !t.is_empty())
        })
}

fn in_boilerplate(el: &ElementRef) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| BOILERPLATE_TAGS.contains(&a.value().name()))
}

fn paragraph_text(p: &ElementRef) -> Option<String> {
    if in_boilerplate(p) {
        return None;
    }
    let text = collapse_whitespace(&p.text().collect::<String>());
    (text.split_whitespace().count() >= MIN_PARAGRAPH_WORDS).then_some(text)
}

fn total_chars(paragraphs: &[String]) -> usize {
    paragraphs.iter().map(|p| p.len()).sum()
}

fn best_article_paragraphs(document: &Html) -> Vec<String> {
    document
        .select(&ARTICLE)
        .filter(|a| !in_boilerplate(a))
        .map(|a| {
            a.select(&PARAGRAPH)
                .filter_map(|p| paragraph_text(&p))
                .collect::<Vec<_>>()
        })
        .max_by_key(|ps| total_chars(ps))
        .unwrap_or_default()
}

fn densest_paragraph_group(body: ElementRef) -> Vec<String> {
    let mut groups: Vec<(Option<ElementRef>, Vec<String>)> = Vec::new();
    for p in body.select(&PARAGRAPH) {
        let Some(text) = paragraph_text(&p) else {
            continue;
        };
        let parent = p.parent().and_then(ElementRef::wrap);
        match groups.iter_mut().find(|(id, _)| *id == parent) {
            Some((_, texts)) => texts.push(text),
            None => groups.push((parent, vec![text])),
        }
    }
    groups
        .into_iter()
        .map(|(_, texts)| texts)
        .max_by_key(|ps: &Vec<String>| total_chars(ps))
        .unwrap_or_default()
}

fn visible_text(body: ElementRef) -> String {
    let mut out = String::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| BOILERPLATE_TAGS.contains(&a.value().name()));
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}
