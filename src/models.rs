use reqwest::Url;
use serde::{Deserialize, Serialize};

/// A series as known to one source. Identity is `(url, source_id)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Series {
    /// Local store id, `None` for a transient entity built from remote data
    pub id: Option<i64>,
    pub url: String,
    pub title: String,
    pub source_id: i64,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub status: Option<String>,
}

impl Series {
    /// A fresh, unsaved series for the given in-site path
    pub fn transient(url: &str, source_id: i64) -> Self {
        Self {
            url: url.to_string(),
            source_id,
            ..Default::default()
        }
    }

    /// Fill metadata from a remote copy. Identity fields are left untouched and
    /// empty remote values never clear what is already known.
    pub fn copy_from(&mut self, other: &Series) {
        if !other.title.is_empty() {
            self.title = other.title.clone();
        }
        if other.author.is_some() {
            self.author = other.author.clone();
        }
        if other.description.is_some() {
            self.description = other.description.clone();
        }
        if other.cover_url.is_some() {
            self.cover_url = other.cover_url.clone();
        }
        if other.status.is_some() {
            self.status = other.status.clone();
        }
    }
}

/// A chapter as listed by a source. Identity is `(url, source_id)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Chapter {
    pub id: Option<i64>,
    pub url: String,
    pub name: String,
    /// Ordering key, `-1.0` when the source gives no usable number
    pub chapter_number: f32,
    /// Epoch milliseconds, 0 when unknown
    pub date_upload: i64,
    pub scanlator: Option<String>,
    pub source_id: i64,
}

/// Chapters in the order the source returned them
pub type ChapterList = Vec<Chapter>;

/// An inbound deep link. Only structural accessors live here, what the parts
/// mean is up to the delegate that recognizes the link.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepLink {
    uri: Url,
}

impl DeepLink {
    pub fn parse(raw: &str) -> Result<Self, crate::error::ResolveError> {
        let uri = Url::parse(raw.trim())
            .map_err(|e| crate::error::ResolveError::Parse(format!("invalid link '{}': {}", raw, e)))?;
        Ok(Self { uri })
    }

    pub fn host(&self) -> Option<&str> {
        self.uri.host_str()
    }

    /// Non-empty path segments in order
    pub fn path_segments(&self) -> Vec<&str> {
        self.uri
            .path_segments()
            .map(|segs| segs.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Path segments of the URL fragment, for single-page-app links like `#/viewer/1`
    pub fn fragment_segments(&self) -> Vec<&str> {
        self.uri
            .fragment()
            .map(|f| f.split('/').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        self.uri
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl std::fmt::Display for DeepLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.uri.as_str())
    }
}

/// What a delegate pulled out of a deep link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkTarget {
    /// Site-native id of the linked chapter
    pub target_id: String,
}

/// Identifiers scraped from a delegate payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMarkers {
    pub title_id: String,
    pub title: String,
}

/// The canonical answer to a deep link.
/// `chapter` is always an element of `chapters` and shares `series.source_id`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ResolutionResult {
    pub chapter: Chapter,
    pub series: Series,
    pub chapters: ChapterList,
}
