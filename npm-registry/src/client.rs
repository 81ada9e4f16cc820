use std::sync::Arc;

use serde_json::Value;

use crate::config::Configuration;
use crate::error::{NpmError, Result};
use crate::models::{PackageDocument, PackageVersion, RegistryRecord, SearchResponse};
use crate::name::{PackageIdentifier, encode_package_name, require_name};
use crate::schema::{SchemaError, Validated, validate};

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
/// Upper bound accepted by the registry search endpoint.
pub const MAX_SEARCH_LIMIT: u32 = 250;

/// # npm Client
///
/// Async client for the npm registry and the satellite services around it
/// (download counts, bundle size, quality scores, raw repository files).
///
/// Every method that returns a model validates the upstream JSON against the
/// model's declared shape first, so callers never see a half-populated
/// struct.
///
/// ## Usage
///
/// ```rust,no_run
/// use npm_registry::{Configuration, NpmClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = NpmClient::new(Configuration::new())?;
///
///     let doc = client.package_document("@types/node").await?;
///     println!("latest: {:?}", doc.latest_version());
///
///     let results = client.search_packages("state management", Some(5)).await?;
///     for object in results.objects {
///         println!("{} {}", object.package.name, object.package.version);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct NpmClient {
    configuration: Arc<Configuration>,
    http: reqwest::Client,
}

impl std::fmt::Debug for NpmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpmClient")
            .field("registry_base", &self.configuration.registry_base)
            .finish()
    }
}

impl NpmClient {
    /// Create a new client; builds one connection pool shared by all calls.
    pub fn new(configuration: Configuration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(configuration.timeout())
            .connect_timeout(configuration.connect_timeout())
            .user_agent(&configuration.user_agent)
            .build()?;

        Ok(Self {
            configuration: Arc::new(configuration),
            http,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    // === Registry ===

    /// Fetch one version of a package as undecoded JSON.
    ///
    /// `GET {registry}/{name}/{version}`; `version` defaults to the `latest`
    /// dist-tag. The name is percent-encoded so scoped packages survive as a
    /// single path segment.
    pub async fn fetch_package_at_version(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<Value> {
        let id = PackageIdentifier::new(name, version.map(str::to_owned))?;
        let url = format!(
            "{}/{}/{}",
            self.configuration.registry_base,
            id.encoded_name(),
            urlencoding::encode(id.version_or_latest())
        );
        self.get_json(&url).await
    }

    /// Fetch the full package document (all versions, dist-tags, times).
    ///
    /// `GET {registry}/{name}`
    pub async fn fetch_full_package_document(&self, name: &str) -> Result<Value> {
        let name = require_name(name)?;
        let url = format!(
            "{}/{}",
            self.configuration.registry_base,
            encode_package_name(name)
        );
        self.get_json(&url).await
    }

    /// Metadata for one version, validated.
    pub async fn package_version(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<PackageVersion> {
        let value = self.fetch_package_at_version(name, version).await?;
        Ok(validate(value)?)
    }

    /// Name, version, description and repository of one version.
    ///
    /// Fails validation when `repository.url` is absent.
    pub async fn registry_record(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<RegistryRecord> {
        let value = self.fetch_package_at_version(name, version).await?;
        Ok(validate(value)?)
    }

    /// The full package document, validated.
    pub async fn package_document(&self, name: &str) -> Result<PackageDocument> {
        let value = self.fetch_full_package_document(name).await?;
        Ok(validate(value)?)
    }

    /// Search the registry.
    ///
    /// `GET {search}?text={query}&size={limit}`. `limit` defaults to 20 and
    /// must be between 1 and 250.
    pub async fn search_packages(&self, query: &str, limit: Option<u32>) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            return Err(NpmError::invalid_argument("search query must not be empty"));
        }
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(NpmError::invalid_argument(format!(
                "limit must be between 1 and {MAX_SEARCH_LIMIT}, got {limit}"
            )));
        }
        let url = format!(
            "{}?text={}&size={}",
            self.configuration.search_base,
            urlencoding::encode(query),
            limit
        );
        self.get_validated(&url).await
    }

    // === Shared plumbing ===

    pub(crate) async fn get_validated<T: Validated>(&self, url: &str) -> Result<T> {
        let value = self.get_json(url).await?;
        Ok(validate(value)?)
    }

    pub(crate) async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.send(url).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| SchemaError::invalid_json(&err).into())
    }

    pub(crate) async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;
        Ok(response.text().await?)
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::debug!(%url, status = status.as_u16(), "upstream request failed");
            Err(NpmError::upstream(status, url))
        }
    }
}
