//! Per-site delegates.
//!
//! A delegate knows one partner site's link shapes and payload markers. The
//! shared steps (fetch, join, reconcile) live in [`crate::pipeline`]; delegates
//! only supply the site-specific hooks below.

use std::sync::Arc;

use crate::config::{DelegateKind, DelegateSettings};
use crate::error::ResolveResult;
use crate::helpers::last_numeric_segment;
use crate::http_client::HttpRequest;
use crate::models::{DeepLink, DeepLinkTarget, ResolutionResult, TitleMarkers};
use crate::pipeline::ResolveContext;
use crate::sources::RemoteSource;

pub mod mangaplus;

pub use mangaplus::MangaPlusDelegate;

pub trait DelegateResolver: Send + Sync {
    /// Human readable domain this delegate answers for
    fn domain_name(&self) -> &str;

    /// The backend this delegate was bound to at construction
    fn source(&self) -> &Arc<dyn RemoteSource>;

    fn lang(&self) -> &str {
        self.source().lang()
    }

    /// Routing predicate. Pure, no I/O.
    fn recognizes(&self, link: &DeepLink) -> bool;

    /// The site-native chapter id embedded in the link
    fn target(&self, link: &DeepLink) -> Option<DeepLinkTarget>;

    /// In-site path of the linked chapter, as it appears in the site's chapter list
    fn site_chapter_path(&self, link: &DeepLink) -> Option<String>;

    fn page_number(&self, link: &DeepLink) -> Option<u32> {
        last_numeric_segment(&link.path_segments())
    }

    /// Request for the raw payload describing the target chapter
    fn payload_request(&self, target: &DeepLinkTarget) -> HttpRequest;

    fn extract_title(&self, payload: &str) -> ResolveResult<TitleMarkers>;

    fn series_path(&self, title_id: &str) -> String;
}

/// Every supported partner site
pub enum Delegate {
    MangaPlus(MangaPlusDelegate),
}

impl Delegate {
    pub fn from_settings(
        settings: &DelegateSettings,
        source: Arc<dyn RemoteSource>,
    ) -> ResolveResult<Self> {
        match settings.kind {
            DelegateKind::MangaPlus => Ok(Delegate::MangaPlus(MangaPlusDelegate::new(
                &settings.domain_pattern,
                &settings.api_url,
                source,
            )?)),
        }
    }

    pub fn kind(&self) -> DelegateKind {
        match self {
            Delegate::MangaPlus(_) => DelegateKind::MangaPlus,
        }
    }

    /// Full resolution of a link this delegate recognizes
    pub async fn resolve(
        &self,
        link: &DeepLink,
        ctx: &ResolveContext,
    ) -> ResolveResult<ResolutionResult> {
        crate::pipeline::resolve_with_delegate(self, link, ctx).await
    }

    fn inner(&self) -> &dyn DelegateResolver {
        match self {
            Delegate::MangaPlus(d) => d,
        }
    }
}

impl From<MangaPlusDelegate> for Delegate {
    fn from(d: MangaPlusDelegate) -> Self {
        Delegate::MangaPlus(d)
    }
}

impl DelegateResolver for Delegate {
    fn domain_name(&self) -> &str {
        self.inner().domain_name()
    }

    fn source(&self) -> &Arc<dyn RemoteSource> {
        self.inner().source()
    }

    fn lang(&self) -> &str {
        self.inner().lang()
    }

    fn recognizes(&self, link: &DeepLink) -> bool {
        self.inner().recognizes(link)
    }

    fn target(&self, link: &DeepLink) -> Option<DeepLinkTarget> {
        self.inner().target(link)
    }

    fn site_chapter_path(&self, link: &DeepLink) -> Option<String> {
        self.inner().site_chapter_path(link)
    }

    fn page_number(&self, link: &DeepLink) -> Option<u32> {
        self.inner().page_number(link)
    }

    fn payload_request(&self, target: &DeepLinkTarget) -> HttpRequest {
        self.inner().payload_request(target)
    }

    fn extract_title(&self, payload: &str) -> ResolveResult<TitleMarkers> {
        self.inner().extract_title(payload)
    }

    fn series_path(&self, title_id: &str) -> String {
        self.inner().series_path(title_id)
    }
}
