//! Entity Lookup: read access to series and chapters the reader already has.
//!
//! The resolution pipeline only reads through this trait. Persisting resolved
//! entities is the caller's decision.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::{Chapter, Series};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityLookup: Send + Sync {
    /// `None` on a miss, never an error
    async fn find_series_by_url_and_source(&self, url: &str, source_id: i64) -> Option<Series>;

    async fn find_chapter_by_url_and_source(&self, url: &str, source_id: i64) -> Option<Chapter>;
}

/// Map-backed lookup, handy for embedding and for tests
#[derive(Default)]
pub struct InMemoryLibrary {
    series: RwLock<HashMap<(String, i64), Series>>,
    chapters: RwLock<HashMap<(String, i64), Chapter>>,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_series(&self, series: Series) {
        if let Ok(mut map) = self.series.write() {
            map.insert((series.url.clone(), series.source_id), series);
        }
    }

    pub fn insert_chapter(&self, chapter: Chapter) {
        if let Ok(mut map) = self.chapters.write() {
            map.insert((chapter.url.clone(), chapter.source_id), chapter);
        }
    }

    pub fn series_count(&self) -> usize {
        self.series.read().map(|m| m.len()).unwrap_or(0)
    }
}

#[async_trait]
impl EntityLookup for InMemoryLibrary {
    async fn find_series_by_url_and_source(&self, url: &str, source_id: i64) -> Option<Series> {
        let map = self.series.read().ok()?;
        map.get(&(url.to_string(), source_id)).cloned()
    }

    async fn find_chapter_by_url_and_source(&self, url: &str, source_id: i64) -> Option<Chapter> {
        let map = self.chapters.read().ok()?;
        map.get(&(url.to_string(), source_id)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_keyed_by_url_and_source() {
        let library = InMemoryLibrary::new();
        let mut series = Series::transient("/titles/777", 1);
        series.id = Some(10);
        library.insert_series(series);

        assert!(library.find_series_by_url_and_source("/titles/777", 1).await.is_some());
        assert!(library.find_series_by_url_and_source("/titles/777", 2).await.is_none());
        assert!(library.find_series_by_url_and_source("/titles/778", 1).await.is_none());
        assert_eq!(library.series_count(), 1);
    }

    #[tokio::test]
    async fn test_chapter_lookup() {
        let library = InMemoryLibrary::new();
        library.insert_chapter(Chapter {
            id: Some(3),
            url: "/viewer/1".to_string(),
            source_id: 1,
            ..Default::default()
        });
        let found = library.find_chapter_by_url_and_source("/viewer/1", 1).await;
        assert_eq!(found.and_then(|c| c.id), Some(3));
    }
}
