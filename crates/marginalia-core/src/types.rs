//! Bookmark records and the values derived from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::MalformedRecord;

/// Public engagement counters attached to a bookmarked post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    #[serde(default, alias = "like_count")]
    pub likes: u64,
    #[serde(default, alias = "retweet_count", alias = "repost_count")]
    pub reposts: u64,
    #[serde(default, alias = "reply_count")]
    pub replies: u64,
}

impl Engagement {
    pub fn total(&self) -> u64 {
        self.likes
            .saturating_add(self.reposts)
            .saturating_add(self.replies)
    }
}

/// A bookmark as it arrives from storage or an importer.
///
/// Every field is optional so that one bad entry never poisons a whole
/// collection; [`Bookmark::try_from`] decides what is usable. Links come
/// from `links`, or from the fetcher's `entities.urls` when `links` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordShape")]
pub struct BookmarkRecord {
    pub id: Option<String>,
    pub author: Option<String>,
    pub text: Option<String>,
    pub links: Vec<String>,
    pub media: Vec<String>,
    pub created_at: Option<String>,
    pub engagement: Engagement,
    pub is_thread: bool,
    /// Permalink of the post itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub unreadable: Option<Unreadable>,
}

/// An input entry that did not deserialize as a record
#[derive(Debug, Clone, PartialEq)]
pub struct Unreadable {
    pub reason: String,
    /// The entry exactly as read, written back unchanged on save
    pub source: serde_json::Value,
}

impl BookmarkRecord {
    /// Placeholder for an entry that failed to deserialize.
    ///
    /// Keeps the entry's id when one can be read so skips stay traceable.
    pub fn unreadable(source: serde_json::Value, reason: impl ToString) -> Self {
        let id = match source.get("id") {
            Some(serde_json::Value::String(id)) => Some(id.clone()),
            Some(serde_json::Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        Self {
            id,
            unreadable: Some(Unreadable {
                reason: reason.to_string(),
                source,
            }),
            ..Default::default()
        }
    }

    pub fn is_unreadable(&self) -> bool {
        self.unreadable.is_some()
    }
}

#[derive(Deserialize)]
struct RecordShape {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "author_username")]
    author: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    links: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    entities: Entities,
    #[serde(default, deserialize_with = "null_as_default")]
    media: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, alias = "metrics", deserialize_with = "null_as_default")]
    engagement: Engagement,
    #[serde(default, deserialize_with = "null_as_default")]
    is_thread: bool,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Default, Deserialize)]
struct Entities {
    #[serde(default, deserialize_with = "null_as_default")]
    urls: Vec<UrlEntity>,
}

#[derive(Deserialize)]
struct UrlEntity {
    #[serde(default)]
    expanded_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl From<RecordShape> for BookmarkRecord {
    fn from(shape: RecordShape) -> Self {
        let links = if shape.links.is_empty() {
            let mut links: Vec<String> = Vec::new();
            for entity in shape.entities.urls {
                // Shortened links stand in when no expansion was recorded
                let link = entity.expanded_url.or(entity.url).unwrap_or_default();
                if !link.trim().is_empty() && !links.contains(&link) {
                    links.push(link);
                }
            }
            links
        } else {
            shape.links
        };

        Self {
            id: shape.id,
            author: shape.author,
            text: shape.text,
            links,
            media: shape.media,
            created_at: shape.created_at,
            engagement: shape.engagement,
            is_thread: shape.is_thread,
            url: shape.url.filter(|url| !url.trim().is_empty()),
            unreadable: None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A validated, immutable bookmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    /// Author handle without the leading `@`; empty when unknown
    pub author: String,
    pub text: String,
    pub links: Vec<String>,
    pub media: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub engagement: Engagement,
    pub is_thread: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Bookmark {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into().trim_start_matches('@').to_string(),
            text: text.into(),
            links: Vec::new(),
            media: Vec::new(),
            created_at,
            engagement: Engagement::default(),
            is_thread: false,
            url: None,
        }
    }

    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    pub fn with_media(mut self, media: Vec<String>) -> Self {
        self.media = media;
        self
    }

    pub fn with_engagement(mut self, engagement: Engagement) -> Self {
        self.engagement = engagement;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn in_thread(mut self) -> Self {
        self.is_thread = true;
        self
    }
}

impl TryFrom<&BookmarkRecord> for Bookmark {
    type Error = MalformedRecord;

    fn try_from(record: &BookmarkRecord) -> Result<Self, Self::Error> {
        if let Some(unreadable) = &record.unreadable {
            return Err(MalformedRecord::Unreadable(unreadable.reason.clone()));
        }

        let id = record
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(MalformedRecord::MissingId)?;

        // Empty text is allowed (media-only posts); an absent field is not.
        let text = record.text.as_deref().ok_or(MalformedRecord::MissingText)?;

        let raw_timestamp = record
            .created_at
            .as_deref()
            .map(str::trim)
            .filter(|ts| !ts.is_empty())
            .ok_or(MalformedRecord::MissingTimestamp)?;
        let created_at = DateTime::parse_from_rfc3339(raw_timestamp)
            .map_err(|_| MalformedRecord::InvalidTimestamp(raw_timestamp.to_string()))?
            .with_timezone(&Utc);

        Ok(Self {
            id: id.to_string(),
            author: record
                .author
                .as_deref()
                .unwrap_or("")
                .trim()
                .trim_start_matches('@')
                .to_string(),
            text: text.to_string(),
            links: record.links.clone(),
            media: record.media.clone(),
            created_at,
            engagement: record.engagement,
            is_thread: record.is_thread,
            url: record.url.clone(),
        })
    }
}

impl TryFrom<BookmarkRecord> for Bookmark {
    type Error = MalformedRecord;

    fn try_from(record: BookmarkRecord) -> Result<Self, Self::Error> {
        Bookmark::try_from(&record)
    }
}

impl From<&Bookmark> for BookmarkRecord {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            id: Some(bookmark.id.clone()),
            author: (!bookmark.author.is_empty()).then(|| bookmark.author.clone()),
            text: Some(bookmark.text.clone()),
            links: bookmark.links.clone(),
            media: bookmark.media.clone(),
            created_at: Some(bookmark.created_at.to_rfc3339()),
            engagement: bookmark.engagement,
            is_thread: bookmark.is_thread,
            url: bookmark.url.clone(),
            unreadable: None,
        }
    }
}

/// A normalized term and how often it occurs within some scope
/// (one bookmark, one topic cluster, or the whole collection)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub frequency: usize,
}

impl Keyword {
    pub fn new(term: impl Into<String>, frequency: usize) -> Self {
        Self {
            term: term.into(),
            frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: Option<&str>, text: Option<&str>, ts: Option<&str>) -> BookmarkRecord {
        BookmarkRecord {
            id: id.map(String::from),
            author: Some("@rustlang".to_string()),
            text: text.map(String::from),
            created_at: ts.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_record_converts() {
        let rec = record(Some("42"), Some("hello"), Some("2024-03-01T12:00:00.000Z"));
        let bookmark = Bookmark::try_from(&rec).unwrap();
        assert_eq!(bookmark.id, "42");
        assert_eq!(bookmark.author, "rustlang");
        assert_eq!(
            bookmark.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let ts = Some("2024-03-01T12:00:00Z");
        assert_eq!(
            Bookmark::try_from(&record(None, Some("x"), ts)),
            Err(MalformedRecord::MissingId)
        );
        assert_eq!(
            Bookmark::try_from(&record(Some("  "), Some("x"), ts)),
            Err(MalformedRecord::MissingId)
        );
        assert_eq!(
            Bookmark::try_from(&record(Some("1"), None, ts)),
            Err(MalformedRecord::MissingText)
        );
        assert_eq!(
            Bookmark::try_from(&record(Some("1"), Some("x"), None)),
            Err(MalformedRecord::MissingTimestamp)
        );
        assert_eq!(
            Bookmark::try_from(&record(Some("1"), Some("x"), Some("yesterday"))),
            Err(MalformedRecord::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_empty_text_is_allowed() {
        let rec = record(Some("1"), Some(""), Some("2024-03-01T12:00:00Z"));
        assert!(Bookmark::try_from(&rec).is_ok());
    }

    #[test]
    fn test_record_accepts_fetcher_field_names() {
        let json = r#"{
            "id": "1789",
            "text": "Great thread on #rust",
            "created_at": "2024-01-01T00:00:00.000Z",
            "author_username": "ferris",
            "metrics": {"like_count": 10, "retweet_count": 2, "reply_count": 1, "quote_count": 0},
            "entities": null,
            "links": null
        }"#;
        let rec: BookmarkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.author.as_deref(), Some("ferris"));
        assert_eq!(rec.engagement.likes, 10);
        assert_eq!(rec.engagement.reposts, 2);
        assert_eq!(rec.engagement.total(), 13);
        assert!(rec.links.is_empty());
    }

    #[test]
    fn test_record_reads_links_from_entities() {
        let json = r#"{
            "id": "1790",
            "text": "Rust 2024 is out https://t.co/abc",
            "created_at": "2024-01-01T00:00:00.000Z",
            "author_username": "ferris",
            "entities": {
                "urls": [
                    {"start": 17, "end": 40, "url": "https://t.co/abc", "expanded_url": "https://blog.rust-lang.org"},
                    {"url": "https://t.co/def"},
                    {"url": "https://t.co/xyz", "expanded_url": "https://blog.rust-lang.org"}
                ],
                "hashtags": [{"tag": "rust"}]
            },
            "url": "https://twitter.com/ferris/status/1790"
        }"#;
        let rec: BookmarkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            rec.links,
            vec!["https://blog.rust-lang.org", "https://t.co/def"]
        );
        assert_eq!(
            rec.url.as_deref(),
            Some("https://twitter.com/ferris/status/1790")
        );

        let bookmark = Bookmark::try_from(&rec).unwrap();
        assert_eq!(bookmark.links.len(), 2);

        let stored: BookmarkRecord =
            serde_json::from_str(&serde_json::to_string(&rec).unwrap()).unwrap();
        assert_eq!(stored, rec);
    }

    #[test]
    fn test_explicit_links_win_over_entities() {
        let json = r#"{"id": "1", "links": ["https://a.example"], "entities": {"urls": [{"expanded_url": "https://b.example"}]}}"#;
        let rec: BookmarkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.links, vec!["https://a.example"]);
        assert!(rec.url.is_none());
    }

    #[test]
    fn test_unreadable_record_is_malformed() {
        let source = serde_json::json!({"id": "9", "text": 42});
        let rec = BookmarkRecord::unreadable(source.clone(), "invalid type");
        assert!(rec.is_unreadable());
        assert_eq!(rec.id.as_deref(), Some("9"));
        assert_eq!(rec.unreadable.as_ref().unwrap().source, source);
        assert_eq!(
            Bookmark::try_from(&rec),
            Err(MalformedRecord::Unreadable("invalid type".to_string()))
        );
        assert!(BookmarkRecord::unreadable(serde_json::json!(42), "x").id.is_none());
    }

    #[test]
    fn test_bookmark_record_roundtrip() {
        let bookmark = Bookmark::new(
            "7",
            "ferris",
            "text",
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        )
        .with_links(vec!["https://example.com".to_string()])
        .with_url("https://twitter.com/ferris/status/7")
        .in_thread();
        let rec = BookmarkRecord::from(&bookmark);
        assert_eq!(Bookmark::try_from(rec).unwrap(), bookmark);
    }
}
