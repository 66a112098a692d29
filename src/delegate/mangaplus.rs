use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use super::DelegateResolver;
use crate::error::{ResolveError, ResolveResult};
use crate::helpers::{clean_title, numeric_segment_after};
use crate::http_client::HttpRequest;
use crate::models::{DeepLink, DeepLinkTarget, TitleMarkers};
use crate::sources::RemoteSource;

static TITLE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/drm/title/(\d+)").unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#MANGA_Plus ([^\x12\n]*)\x12").unwrap());

/// MANGA Plus viewer links: `/viewer/{chapter_id}`, `#/viewer/{chapter_id}`
/// or `?chapter={chapter_id}`.
pub struct MangaPlusDelegate {
    domain: Regex,
    api_url: String,
    source: Arc<dyn RemoteSource>,
}

impl MangaPlusDelegate {
    pub fn new(
        domain_pattern: &str,
        api_url: &str,
        source: Arc<dyn RemoteSource>,
    ) -> ResolveResult<Self> {
        Ok(Self {
            domain: Regex::new(domain_pattern)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            source,
        })
    }
}

impl DelegateResolver for MangaPlusDelegate {
    fn domain_name(&self) -> &str {
        "mangaplus.shueisha.co.jp"
    }

    fn source(&self) -> &Arc<dyn RemoteSource> {
        &self.source
    }

    fn recognizes(&self, link: &DeepLink) -> bool {
        link.host().map(|h| self.domain.is_match(h)).unwrap_or(false)
    }

    fn target(&self, link: &DeepLink) -> Option<DeepLinkTarget> {
        let segments = link.path_segments();
        let fragment = link.fragment_segments();
        let target_id = numeric_segment_after(&segments, "viewer")
            .or_else(|| numeric_segment_after(&fragment, "viewer"))
            .map(str::to_string)
            .or_else(|| {
                link.query_param("chapter")
                    .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
            })?;
        Some(DeepLinkTarget { target_id })
    }

    fn site_chapter_path(&self, link: &DeepLink) -> Option<String> {
        self.target(link).map(|t| format!("/viewer/{}", t.target_id))
    }

    // Viewer links never carry a page
    fn page_number(&self, _link: &DeepLink) -> Option<u32> {
        None
    }

    fn payload_request(&self, target: &DeepLinkTarget) -> HttpRequest {
        let url = format!(
            "{}/manga_viewer?chapter_id={}&split=no&img_quality=low",
            self.api_url, target.target_id
        );
        HttpRequest::get(url)
            .with_headers(self.source.headers())
            .force_network()
    }

    fn extract_title(&self, payload: &str) -> ResolveResult<TitleMarkers> {
        let title_id = TITLE_ID_RE
            .captures(payload)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(ResolveError::TitleIdNotFound)?;

        let title = TITLE_RE
            .captures(payload)
            .and_then(|c| c.get(1))
            .map(|m| clean_title(m.as_str()))
            .filter(|t| !t.is_empty())
            .ok_or(ResolveError::TitleNotFound)?;

        Ok(TitleMarkers { title_id, title })
    }

    fn series_path(&self, title_id: &str) -> String {
        format!("/titles/{}", title_id)
    }
}
