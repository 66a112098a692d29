use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use serde::Deserialize;
use std::sync::Arc;

use super::RemoteSource;
use crate::error::{ResolveError, ResolveResult};
use crate::helpers::chapter_number_from_name;
use crate::http_client::{HttpRequest, Transport};
use crate::models::{Chapter, ChapterList, Series};

pub const WEB_URL: &str = "https://mangaplus.shueisha.co.jp";

#[derive(Deserialize, Debug)]
struct ApiResponse {
    #[serde(default)]
    success: Option<SuccessResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SuccessResult {
    #[serde(default)]
    title_detail_view: Option<TitleDetailView>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TitleDetailView {
    title: TitleData,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    title_image_url: Option<String>,
    #[serde(default)]
    non_appearance_info: Option<String>,
    #[serde(default)]
    chapter_list_group: Vec<ChapterGroup>,
    // Older payloads list chapters without groups
    #[serde(default)]
    first_chapter_list: Vec<ChapterEntry>,
    #[serde(default)]
    last_chapter_list: Vec<ChapterEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TitleData {
    title_id: i64,
    name: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    portrait_image_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ChapterGroup {
    #[serde(default)]
    first_chapter_list: Vec<ChapterEntry>,
    #[serde(default)]
    mid_chapter_list: Vec<ChapterEntry>,
    #[serde(default)]
    last_chapter_list: Vec<ChapterEntry>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct ChapterEntry {
    chapter_id: i64,
    name: String,
    #[serde(default)]
    sub_title: Option<String>,
    #[serde(default)]
    start_time_stamp: Option<i64>,
}

/// MANGA Plus title API, queried in its JSON format
pub struct MangaPlusSource {
    id: i64,
    lang: String,
    api_url: String,
    transport: Arc<dyn Transport>,
}

impl MangaPlusSource {
    pub fn new(id: i64, lang: &str, api_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            id,
            lang: lang.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    async fn title_detail(&self, path: &str) -> ResolveResult<TitleDetailView> {
        let title_id = title_id_from_path(path)?;
        let url = format!("{}/title_detailV3?title_id={}&format=json", self.api_url, title_id);
        let request = HttpRequest::get(url).with_headers(self.headers());
        let body = self.transport.execute(request).await?.into_success_body()?;
        parse_title_detail(&body)
    }
}

fn title_id_from_path(path: &str) -> ResolveResult<&str> {
    path.trim_start_matches('#')
        .strip_prefix("/titles/")
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| ResolveError::Parse(format!("not a MANGA Plus title path: {}", path)))
}

fn parse_title_detail(body: &str) -> ResolveResult<TitleDetailView> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if let Some(err) = response.error {
        return Err(ResolveError::Parse(format!("MANGA Plus error response: {}", err)));
    }
    response
        .success
        .and_then(|s| s.title_detail_view)
        .ok_or_else(|| ResolveError::Parse("MANGA Plus response has no title detail".to_string()))
}

fn series_from_detail(detail: &TitleDetailView, source_id: i64) -> Series {
    let status = match detail.non_appearance_info.as_deref() {
        Some(info) if info.to_lowercase().contains("completed") => "completed",
        _ => "ongoing",
    };
    Series {
        id: None,
        url: format!("/titles/{}", detail.title.title_id),
        title: detail.title.name.clone(),
        source_id,
        author: detail.title.author.clone(),
        description: detail.overview.clone(),
        cover_url: detail
            .title
            .portrait_image_url
            .clone()
            .or_else(|| detail.title_image_url.clone()),
        status: Some(status.to_string()),
    }
}

fn chapters_from_detail(detail: TitleDetailView, source_id: i64) -> ChapterList {
    let mut entries: Vec<ChapterEntry> = Vec::new();
    for group in detail.chapter_list_group {
        entries.extend(group.first_chapter_list);
        entries.extend(group.mid_chapter_list);
        entries.extend(group.last_chapter_list);
    }
    entries.extend(detail.first_chapter_list);
    entries.extend(detail.last_chapter_list);

    let mut chapters: ChapterList = Vec::with_capacity(entries.len());
    for entry in entries {
        let url = format!("/viewer/{}", entry.chapter_id);
        // Groups overlap at their edges
        if chapters.iter().any(|c| c.url == url) {
            continue;
        }
        let name = match entry.sub_title.as_deref() {
            Some(sub) if !sub.is_empty() => format!("{} - {}", entry.name, sub),
            _ => entry.name.clone(),
        };
        chapters.push(Chapter {
            id: None,
            url,
            chapter_number: chapter_number_from_name(&entry.name),
            name,
            date_upload: entry
                .start_time_stamp
                .and_then(|secs| secs.checked_mul(1000))
                .unwrap_or(0),
            scanlator: Some("Shueisha".to_string()),
            source_id,
        });
    }

    // API lists oldest first, readers expect newest first
    chapters.reverse();
    chapters
}

#[async_trait]
impl RemoteSource for MangaPlusSource {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        "MANGA Plus by SHUEISHA"
    }

    fn lang(&self) -> &str {
        &self.lang
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static(WEB_URL));
        headers.insert(REFERER, HeaderValue::from_static("https://mangaplus.shueisha.co.jp/"));
        headers
    }

    async fn fetch_series_metadata(&self, path: &str) -> ResolveResult<Series> {
        let detail = self.title_detail(path).await?;
        log::debug!("MANGA Plus: fetched metadata for {} ({})", path, detail.title.name);
        Ok(series_from_detail(&detail, self.id))
    }

    async fn fetch_chapter_list(&self, path: &str) -> ResolveResult<ChapterList> {
        let detail = self.title_detail(path).await?;
        let chapters = chapters_from_detail(detail, self.id);
        log::debug!("MANGA Plus: {} chapters for {}", chapters.len(), path);
        Ok(chapters)
    }
}
