//! Resolution pipeline
//!
//! Turns a deep link into a `(Chapter, Series, ChapterList)` triple:
//!
//! 1. pick the first delegate in registry order that recognizes the link
//! 2. derive the in-site chapter path
//! 3. fetch the delegate payload, bypassing any response cache
//! 4. extract the title id and title from the payload
//! 5. derive the series path
//! 6. concurrently resolve the series (local lookup, remote fallback) and fetch the chapter list
//! 7. overwrite the series title with the payload title
//! 8. find the linked chapter in the list
//! 9. assemble the result
//!
//! Nothing is written back to the local store and nothing is retried.

use std::sync::Arc;

use crate::config::{Config, DelegateKind};
use crate::delegate::{Delegate, DelegateResolver};
use crate::error::{ResolveError, ResolveResult};
use crate::http_client::Transport;
use crate::library::EntityLookup;
use crate::metrics::{track_resolution, MetricsTracker};
use crate::models::{DeepLink, ResolutionResult, Series};
use crate::sources::mangaplus::MangaPlusSource;
use crate::sources::RemoteSource;

/// Collaborators shared by every resolution
#[derive(Clone)]
pub struct ResolveContext {
    pub transport: Arc<dyn Transport>,
    pub lookup: Arc<dyn EntityLookup>,
}

/// Delegates in priority order
#[derive(Default)]
pub struct DelegateRegistry {
    delegates: Vec<Delegate>,
}

impl DelegateRegistry {
    pub fn new(delegates: Vec<Delegate>) -> Self {
        Self { delegates }
    }

    /// Build the enabled delegates from configuration, each bound to its own backend
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> ResolveResult<Self> {
        let mut delegates = Vec::new();
        for settings in config.enabled_delegates() {
            let source: Arc<dyn RemoteSource> = match settings.kind {
                DelegateKind::MangaPlus => Arc::new(MangaPlusSource::new(
                    settings.source_id,
                    &settings.lang,
                    &settings.api_url,
                    transport.clone(),
                )),
            };
            let delegate = Delegate::from_settings(settings, source)?;
            log::debug!("Registered {:?} delegate for source {}", delegate.kind(), settings.source_id);
            delegates.push(delegate);
        }
        log::info!("{} delegate(s) enabled", delegates.len());
        Ok(Self { delegates })
    }

    /// First delegate that recognizes the link
    pub fn find(&self, link: &DeepLink) -> Option<&Delegate> {
        self.delegates.iter().find(|d| d.recognizes(link))
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

pub struct ResolutionPipeline {
    registry: DelegateRegistry,
    context: ResolveContext,
    metrics: Option<Arc<MetricsTracker>>,
}

impl ResolutionPipeline {
    pub fn new(
        registry: DelegateRegistry,
        transport: Arc<dyn Transport>,
        lookup: Arc<dyn EntityLookup>,
    ) -> Self {
        Self {
            registry,
            context: ResolveContext { transport, lookup },
            metrics: None,
        }
    }

    /// Pipeline over the reqwest transport and the delegates named in `config`
    pub fn from_config(config: &Config, lookup: Arc<dyn EntityLookup>) -> ResolveResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(config.http.create_http_client()?);
        let registry = DelegateRegistry::from_config(config, transport.clone())?;
        Ok(Self::new(registry, transport, lookup))
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsTracker>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn can_open(&self, link: &DeepLink) -> bool {
        self.registry.find(link).is_some()
    }

    /// Page the link points at inside the chapter, if the site encodes one
    pub fn page_number(&self, link: &DeepLink) -> Option<u32> {
        self.registry.find(link).and_then(|d| d.page_number(link))
    }

    /// Resolve a raw link. Unparseable input is treated like any unrecognized link.
    pub async fn resolve_str(&self, raw: &str) -> ResolveResult<ResolutionResult> {
        match DeepLink::parse(raw) {
            Ok(link) => self.resolve(&link).await,
            Err(e) => {
                log::debug!("Rejecting link: {}", e);
                Err(ResolveError::UnsupportedLink)
            }
        }
    }

    pub async fn resolve(&self, link: &DeepLink) -> ResolveResult<ResolutionResult> {
        let Some(delegate) = self.registry.find(link) else {
            log::info!("No delegate recognizes {}", link);
            return Err(ResolveError::UnsupportedLink);
        };
        log::debug!("{} handled by {}", link, delegate.domain_name());

        match &self.metrics {
            Some(metrics) => {
                track_resolution(metrics, delegate.domain_name(), delegate.resolve(link, &self.context))
                    .await
            }
            None => delegate.resolve(link, &self.context).await,
        }
    }
}

/// Steps 2 to 9 for an already selected delegate
pub(crate) async fn resolve_with_delegate(
    delegate: &Delegate,
    link: &DeepLink,
    ctx: &ResolveContext,
) -> ResolveResult<ResolutionResult> {
    let chapter_path = delegate
        .site_chapter_path(link)
        .ok_or(ResolveError::UnrecognizedPath)?;
    let target = delegate.target(link).ok_or(ResolveError::UnrecognizedPath)?;

    let request = delegate.payload_request(&target);
    let payload = ctx.transport.execute(request).await?.into_success_body()?;

    let markers = delegate.extract_title(&payload)?;
    let series_path = delegate.series_path(&markers.title_id);
    log::debug!(
        "{}: chapter {} belongs to {} ({})",
        delegate.domain_name(),
        chapter_path,
        series_path,
        markers.title
    );

    let source = delegate.source();
    let source_id = source.id();

    // Dropping this future drops both branches, a failure in one drops the other
    let (mut series, mut chapters) = tokio::try_join!(
        find_or_fetch_series(&*ctx.lookup, &**source, &series_path, source_id),
        source.fetch_chapter_list(&series_path),
    )?;

    series.title = markers.title;

    for chapter in chapters.iter_mut() {
        chapter.source_id = source_id;
    }
    let index = chapters
        .iter()
        .position(|c| c.url == chapter_path)
        .ok_or(ResolveError::ChapterNotFoundInList)?;

    if chapters[index].id.is_none() {
        if let Some(local) = ctx
            .lookup
            .find_chapter_by_url_and_source(&chapter_path, source_id)
            .await
        {
            chapters[index].id = local.id;
        }
    }

    let chapter = chapters[index].clone();
    Ok(ResolutionResult {
        chapter,
        series,
        chapters,
    })
}

/// Cache first: the remote source is only asked when the lookup misses
async fn find_or_fetch_series(
    lookup: &dyn EntityLookup,
    source: &dyn RemoteSource,
    path: &str,
    source_id: i64,
) -> ResolveResult<Series> {
    match lookup.find_series_by_url_and_source(path, source_id).await {
        Some(series) => Ok(series),
        None => {
            log::debug!("{} not in library, fetching from {}", path, source.name());
            let remote = source.fetch_series_metadata(path).await?;
            let mut series = Series::transient(path, source_id);
            series.copy_from(&remote);
            Ok(series)
        }
    }
}
