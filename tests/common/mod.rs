//! Stub collaborators shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use manga_link_resolver::delegate::MangaPlusDelegate;
use manga_link_resolver::http_client::{HttpRequest, RawResponse, Transport};
use manga_link_resolver::library::EntityLookup;
use manga_link_resolver::sources::RemoteSource;
use manga_link_resolver::{Chapter, ChapterList, DelegateRegistry, ResolutionPipeline, ResolveError, ResolveResult, Series};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const SOURCE_ID: i64 = 42;
pub const LINK: &str = "app://open?chapter=12345";
pub const PAYLOAD: &str = "\u{1}\u{2}viewer TITLE_ID:/drm/title/777 pages... #MANGA_Plus Example Series\u{12}\u{8}rest";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Answers requests whose URL contains a registered fragment, records everything
pub struct StubTransport {
    routes: Vec<(String, RawResponse)>,
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self { routes: Vec::new(), requests: Mutex::new(Vec::new()) }
    }

    pub fn route(mut self, url_fragment: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            url_fragment.to_string(),
            RawResponse { status, body: body.to_string() },
        ));
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> ResolveResult<RawResponse> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        self.routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, resp)| resp.clone())
            .ok_or_else(|| ResolveError::Transport(format!("no route for {}", url)))
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Remote backend with call counters and an optional never-finishing chapter list
pub struct StubSource {
    pub id: i64,
    pub metadata: ResolveResult<Series>,
    pub chapters: ResolveResult<ChapterList>,
    pub hang_chapter_list: bool,
    pub metadata_calls: AtomicUsize,
    pub chapter_list_calls: AtomicUsize,
    pub chapter_list_completed: AtomicUsize,
    pub chapter_list_started: Notify,
    pub chapter_list_finished_or_dropped: Arc<AtomicBool>,
}

impl StubSource {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            metadata: Ok(Series {
                title: "Remote Title".to_string(),
                author: Some("Remote Author".to_string()),
                ..Default::default()
            }),
            chapters: Ok(chapter_list(&["/viewer/12346", "/viewer/12345", "/viewer/12344"])),
            hang_chapter_list: false,
            metadata_calls: AtomicUsize::new(0),
            chapter_list_calls: AtomicUsize::new(0),
            chapter_list_completed: AtomicUsize::new(0),
            chapter_list_started: Notify::new(),
            chapter_list_finished_or_dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_chapters(mut self, chapters: ChapterList) -> Self {
        self.chapters = Ok(chapters);
        self
    }

    pub fn with_metadata_error(mut self, err: ResolveError) -> Self {
        self.metadata = Err(err);
        self
    }

    pub fn hanging_chapter_list(mut self) -> Self {
        self.hang_chapter_list = true;
        self
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn chapter_list_calls(&self) -> usize {
        self.chapter_list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for StubSource {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn lang(&self) -> &str {
        "en"
    }

    async fn fetch_series_metadata(&self, _path: &str) -> ResolveResult<Series> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.metadata.clone()
    }

    async fn fetch_chapter_list(&self, _path: &str) -> ResolveResult<ChapterList> {
        self.chapter_list_calls.fetch_add(1, Ordering::SeqCst);
        let _flag = DropFlag(self.chapter_list_finished_or_dropped.clone());
        self.chapter_list_started.notify_one();
        if self.hang_chapter_list {
            std::future::pending::<()>().await;
        }
        self.chapter_list_completed.fetch_add(1, Ordering::SeqCst);
        self.chapters.clone()
    }
}

/// Read-only lookup with call counters
#[derive(Default)]
pub struct StubLookup {
    pub series: Option<Series>,
    pub chapter: Option<Chapter>,
    pub series_calls: AtomicUsize,
}

impl StubLookup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_series(series: Series) -> Self {
        Self { series: Some(series), ..Default::default() }
    }

    pub fn series_calls(&self) -> usize {
        self.series_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityLookup for StubLookup {
    async fn find_series_by_url_and_source(&self, url: &str, source_id: i64) -> Option<Series> {
        self.series_calls.fetch_add(1, Ordering::SeqCst);
        self.series
            .clone()
            .filter(|s| s.url == url && s.source_id == source_id)
    }

    async fn find_chapter_by_url_and_source(&self, url: &str, source_id: i64) -> Option<Chapter> {
        self.chapter
            .clone()
            .filter(|c| c.url == url && c.source_id == source_id)
    }
}

pub fn chapter_list(urls: &[&str]) -> ChapterList {
    urls.iter()
        .enumerate()
        .map(|(i, url)| Chapter {
            url: url.to_string(),
            name: format!("#{:03}", urls.len() - i),
            chapter_number: (urls.len() - i) as f32,
            ..Default::default()
        })
        .collect()
}

pub fn payload_transport() -> StubTransport {
    StubTransport::new().route("manga_viewer?chapter_id=12345", 200, PAYLOAD)
}

pub fn mangaplus_delegate(source: Arc<StubSource>) -> MangaPlusDelegate {
    MangaPlusDelegate::new("^open$", "https://api.test/api", source).expect("valid pattern")
}

pub fn build_pipeline(
    transport: Arc<StubTransport>,
    source: Arc<StubSource>,
    lookup: Arc<dyn EntityLookup>,
) -> ResolutionPipeline {
    let registry = DelegateRegistry::new(vec![mangaplus_delegate(source).into()]);
    ResolutionPipeline::new(registry, transport, lookup)
}
