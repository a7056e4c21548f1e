//! Data models exchanged by the news tools.
//!
//! - [`NewsItem`]: simplified search hit surfaced to the agent
//! - [`RawArticle`] / [`RawSource`]: the provider's loosely-typed record, validated
//!   into [`NewsItem`] at ingestion
//! - [`ArticleResult`]: one per requested URL from the retrieval tool
//! - [`RetrievalOutput`]: the profile-selected container of [`ArticleResult`]s

use crate::config::OutputShape;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A news search hit.
///
/// `title` and `url` are never empty; records lacking either are dropped
/// by [`NewsItem::from_raw`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_name: String,
}

impl NewsItem {
    /// Validate a provider record. Returns `None` when title or url is missing
    /// or blank.
    pub fn from_raw(raw: RawArticle) -> Option<Self> {
        let title = raw.title.filter(|t| !t.trim().is_empty())?;
        let url = raw.url.filter(|u| !u.trim().is_empty())?;
        Some(NewsItem {
            title,
            url,
            description: raw.description.filter(|d| !d.is_empty()),
            source_name: raw.source.and_then(|s| s.name).unwrap_or_default(),
        })
    }
}

/// An article record as the search provider returns it. Every field may be
/// absent or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// The retrieval outcome for one URL. `text` is empty when the article could
/// not be fetched or extracted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleResult {
    pub url: String,
    pub text: String,
}

impl ArticleResult {
    pub fn empty(url: &str) -> Self {
        ArticleResult {
            url: url.to_string(),
            text: String::new(),
        }
    }
}

/// Result container of the retrieval tool.
///
/// `List` serializes as `[{"url": .., "text": ..}, ..]`, `Mapping` as
/// `{"<url>": "<text>", ..}` in first-seen URL order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutput {
    List(Vec<ArticleResult>),
    Mapping(Vec<ArticleResult>),
}

impl RetrievalOutput {
    /// Shape results according to the profile.
    ///
    /// In mapping form a repeated URL keeps the position of its first
    /// occurrence and the text of its last.
    pub fn shaped(results: Vec<ArticleResult>, shape: OutputShape) -> Self {
        match shape {
            OutputShape::List => RetrievalOutput::List(results),
            OutputShape::Mapping => {
                let mut entries: Vec<ArticleResult> = Vec::with_capacity(results.len());
                for result in results {
                    match entries.iter_mut().find(|e| e.url == result.url) {
                        Some(existing) => existing.text = result.text,
                        None => entries.push(result),
                    }
                }
                RetrievalOutput::Mapping(entries)
            }
        }
    }

    pub fn results(&self) -> &[ArticleResult] {
        match self {
            RetrievalOutput::List(r) | RetrievalOutput::Mapping(r) => r,
        }
    }
}

impl Serialize for RetrievalOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RetrievalOutput::List(results) => results.serialize(serializer),
            RetrievalOutput::Mapping(results) => {
                let mut map = serializer.serialize_map(Some(results.len()))?;
                for r in results {
                    map.serialize_entry(&r.url, &r.text)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: Option<&str>, url: Option<&str>) -> RawArticle {
        RawArticle {
            source: Some(RawSource {
                name: Some("Example Times".into()),
            }),
            title: title.map(String::from),
            url: url.map(String::from),
            description: Some("desc".into()),
        }
    }

    #[test]
    fn test_from_raw_keeps_complete_records() {
        let item = NewsItem::from_raw(raw(Some("Title"), Some("https://e.com/a"))).unwrap();
        assert_eq!(item.title, "Title");
        assert_eq!(item.url, "https://e.com/a");
        assert_eq!(item.description.as_deref(), Some("desc"));
        assert_eq!(item.source_name, "Example Times");
    }

    #[test]
    fn test_from_raw_drops_missing_or_blank_title_and_url() {
        assert!(NewsItem::from_raw(raw(None, Some("https://e.com/a"))).is_none());
        assert!(NewsItem::from_raw(raw(Some(""), Some("https://e.com/a"))).is_none());
        assert!(NewsItem::from_raw(raw(Some("Title"), None)).is_none());
        assert!(NewsItem::from_raw(raw(Some("Title"), Some("  "))).is_none());
    }

    #[test]
    fn test_from_raw_without_source_has_empty_source_name() {
        let mut r = raw(Some("T"), Some("https://e.com"));
        r.source = None;
        assert_eq!(NewsItem::from_raw(r).unwrap().source_name, "");
    }

    #[test]
    fn test_raw_article_tolerates_nulls() {
        let json = r#"{"source":{"id":null,"name":"BBC"},"author":null,"title":"Hi","description":null,"url":"https://bbc.co.uk/x","urlToImage":null,"publishedAt":"2025-05-06T10:00:00Z","content":null}"#;
        let r: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(r.title.as_deref(), Some("Hi"));
        assert!(r.description.is_none());
        assert_eq!(r.source.unwrap().name.as_deref(), Some("BBC"));
    }

    #[test]
    fn test_news_item_omits_absent_description() {
        let item = NewsItem {
            title: "T".into(),
            url: "u".into(),
            description: None,
            source_name: "S".into(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["source_name"], "S");
    }

    #[test]
    fn test_list_output_serializes_as_array() {
        let out = RetrievalOutput::shaped(
            vec![ArticleResult::empty("u1"), ArticleResult {
                url: "u2".into(),
                text: "t".into(),
            }],
            OutputShape::List,
        );
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"[{"url":"u1","text":""},{"url":"u2","text":"t"}]"#);
    }

    #[test]
    fn test_mapping_output_keeps_first_position_last_value() {
        let results = vec![
            ArticleResult { url: "a".into(), text: "1".into() },
            ArticleResult { url: "b".into(), text: "2".into() },
            ArticleResult { url: "a".into(), text: "3".into() },
        ];
        let out = RetrievalOutput::shaped(results, OutputShape::Mapping);
        assert_eq!(out.results().len(), 2);
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"a":"3","b":"2"}"#);
    }
}
