use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ResolveError, ResolveResult};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    /// Delegates in priority order, the first one that recognizes a link wins
    #[serde(default = "default_delegates")]
    pub delegates: Vec<DelegateSettings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Timeout for HTTP requests in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Fixed user agent, a browser-like one is picked at random when unset
    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default = "default_true")]
    pub enable_cookies: bool,

    /// Enable gzip/brotli compression
    #[serde(default = "default_true")]
    pub enable_compression: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DelegateKind {
    MangaPlus,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DelegateSettings {
    pub kind: DelegateKind,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Regex matched against the host of an inbound link
    #[serde(default = "default_mangaplus_domain")]
    pub domain_pattern: String,

    /// Id of the remote source this delegate is bound to
    #[serde(default = "default_mangaplus_source_id")]
    pub source_id: i64,

    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_mangaplus_api")]
    pub api_url: String,
}

fn default_true() -> bool { true }
fn default_timeout() -> u64 { 30 }
fn default_lang() -> String { "en".to_string() }
fn default_mangaplus_domain() -> String {
    r"(^|\.)mangaplus\.shueisha\.co\.jp$|^jumpg-webapi\.tokyo-cdn\.com$".to_string()
}
fn default_mangaplus_source_id() -> i64 { 1998944621602463790 }
fn default_mangaplus_api() -> String { "https://jumpg-webapi.tokyo-cdn.com/api".to_string() }
fn default_delegates() -> Vec<DelegateSettings> { vec![DelegateSettings::default()] }

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
            enable_cookies: true,
            enable_compression: true,
        }
    }
}

impl Default for DelegateSettings {
    fn default() -> Self {
        Self {
            kind: DelegateKind::MangaPlus,
            enabled: true,
            domain_pattern: default_mangaplus_domain(),
            source_id: default_mangaplus_source_id(),
            lang: default_lang(),
            api_url: default_mangaplus_api(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            delegates: default_delegates(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match Self::from_toml_str(&content) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Could not read {}: {}", path.display(), e),
            }
        }
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> ResolveResult<Self> {
        toml::from_str::<Config>(content).map_err(|e| ResolveError::Config(e.to_string()))
    }

    /// Enabled delegates, in priority order
    pub fn enabled_delegates(&self) -> impl Iterator<Item = &DelegateSettings> {
        self.delegates.iter().filter(|d| d.enabled)
    }
}

impl HttpConfig {
    /// Create the HTTP client described by this configuration
    pub fn create_http_client(&self) -> ResolveResult<crate::http_client::EnhancedHttpClient> {
        use crate::http_client::{EnhancedHttpClient, HttpClientConfig};
        use std::time::Duration;

        let config = HttpClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            enable_cookies: self.enable_cookies,
            enable_gzip: self.enable_compression,
        };

        Ok(EnhancedHttpClient::with_config(config)?)
    }
}
