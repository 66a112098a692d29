// Library interface for manga_link_resolver
// Resolves shared chapter links on partner sites into series, chapter and chapter list

pub mod config;
pub mod delegate;
pub mod error;
pub mod helpers;
pub mod http_client;
pub mod library;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod sources;

pub use delegate::{Delegate, DelegateResolver};
pub use error::{ResolveError, ResolveResult};
pub use models::{Chapter, ChapterList, DeepLink, ResolutionResult, Series};
pub use pipeline::{DelegateRegistry, ResolutionPipeline, ResolveContext};
