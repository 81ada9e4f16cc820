//! Async client for the npm package ecosystem.
//!
//! Every upstream response is decoded as untyped JSON, checked against a
//! declared [`Shape`](schema::Shape) and only then converted into the typed
//! models in [`models`]. A response that does not match surfaces as
//! [`NpmError::SchemaValidation`] naming the offending field.

pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const NPM_SEARCH_URL: &str = "https://registry.npmjs.org/-/v1/search";
pub const NPM_DOWNLOADS_URL: &str = "https://api.npmjs.org/downloads/point";
pub const RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";
pub const BUNDLE_SIZE_URL: &str = "https://bundlephobia.com/api/size";
pub const QUALITY_URL: &str = "https://api.npms.io/v2/package";

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod name;
pub mod readme;
pub mod schema;
mod stats;

pub use client::NpmClient;
pub use config::Configuration;
pub use error::{NpmError, Result};
pub use name::{PackageIdentifier, encode_package_name};
pub use schema::{SchemaError, Shape, Validated, validate};
