use std::time::Duration;

use crate::{
    BUNDLE_SIZE_URL, NPM_DOWNLOADS_URL, NPM_REGISTRY_URL, NPM_SEARCH_URL, QUALITY_URL,
    RAW_CONTENT_URL,
};

/// Default total time allowed for a single upstream request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default time allowed for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the npm client
///
/// Holds the base URL of every downstream service so tests (or mirrors) can
/// point the client somewhere other than the public endpoints.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Registry metadata service (e.g., "https://registry.npmjs.org")
    pub registry_base: String,
    /// Registry search endpoint
    pub search_base: String,
    /// Download counts service, `/{period}/{name}` is appended
    pub downloads_base: String,
    /// Raw repository file host used for README lookup
    pub raw_content_base: String,
    /// Bundle size service, takes `?package={name}@{version}`
    pub bundle_size_base: String,
    /// Package quality score service
    pub quality_base: String,
    /// User agent for HTTP requests
    pub user_agent: String,
    /// Total timeout for each request in seconds
    pub timeout_secs: u64,
    /// Connect timeout for each request in seconds
    pub connect_timeout_secs: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            registry_base: NPM_REGISTRY_URL.to_owned(),
            search_base: NPM_SEARCH_URL.to_owned(),
            downloads_base: NPM_DOWNLOADS_URL.to_owned(),
            raw_content_base: RAW_CONTENT_URL.to_owned(),
            bundle_size_base: BUNDLE_SIZE_URL.to_owned(),
            quality_base: QUALITY_URL.to_owned(),
            user_agent: format!("npm-registry-rs/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Configuration {
    /// Create a new configuration pointing at the public services
    pub fn new() -> Self {
        Self::default()
    }

    /// Point every service at a single base URL.
    ///
    /// Paths are laid out as `/registry`, `/search`, `/downloads`, `/raw`,
    /// `/bundle` and `/quality` below `base`. Mostly useful against a mock
    /// server.
    pub fn with_single_base<S: AsRef<str>>(self, base: S) -> Self {
        let base = base.as_ref().trim_end_matches('/');
        Self {
            registry_base: format!("{base}/registry"),
            search_base: format!("{base}/search"),
            downloads_base: format!("{base}/downloads"),
            raw_content_base: format!("{base}/raw"),
            bundle_size_base: format!("{base}/bundle"),
            quality_base: format!("{base}/quality"),
            ..self
        }
    }

    /// Set the registry metadata base URL
    pub fn with_registry_base<S: Into<String>>(mut self, url: S) -> Self {
        self.registry_base = trim_base(url.into());
        self
    }

    /// Set the search endpoint
    pub fn with_search_base<S: Into<String>>(mut self, url: S) -> Self {
        self.search_base = trim_base(url.into());
        self
    }

    /// Set the download counts base URL
    pub fn with_downloads_base<S: Into<String>>(mut self, url: S) -> Self {
        self.downloads_base = trim_base(url.into());
        self
    }

    /// Set the raw file host used for README lookup
    pub fn with_raw_content_base<S: Into<String>>(mut self, url: S) -> Self {
        self.raw_content_base = trim_base(url.into());
        self
    }

    /// Set the bundle size endpoint
    pub fn with_bundle_size_base<S: Into<String>>(mut self, url: S) -> Self {
        self.bundle_size_base = trim_base(url.into());
        self
    }

    /// Set the quality score base URL
    pub fn with_quality_base<S: Into<String>>(mut self, url: S) -> Self {
        self.quality_base = trim_base(url.into());
        self
    }

    /// Set custom user agent
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs.max(1);
        self
    }

    /// Set connect timeout
    pub fn with_connect_timeout(mut self, timeout_secs: u64) -> Self {
        self.connect_timeout_secs = timeout_secs.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_owned()
}
