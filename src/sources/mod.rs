//! Remote Source Contract and the partner backends implementing it

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::error::ResolveResult;
use crate::models::{ChapterList, Series};

pub mod mangaplus;

/// What every partner-site backend can do given an in-site path.
/// Failures are surfaced unchanged, nothing here retries.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    fn id(&self) -> i64;

    fn name(&self) -> &str;

    fn lang(&self) -> &str;

    /// Headers the site expects on every request
    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    async fn fetch_series_metadata(&self, path: &str) -> ResolveResult<Series>;

    async fn fetch_chapter_list(&self, path: &str) -> ResolveResult<ChapterList>;
}
