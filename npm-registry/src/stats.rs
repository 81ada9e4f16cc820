//! Download counts, bundle size and quality scores.

use crate::client::NpmClient;
use crate::error::Result;
use crate::models::{DownloadPoint, Period, QualityResponse, QualityScore, SizeReport};
use crate::name::{PackageIdentifier, encode_package_name, require_name};

impl NpmClient {
    /// Download count over `period`.
    ///
    /// `GET {downloads}/{period}/{name}`
    pub async fn download_point(&self, name: &str, period: Period) -> Result<DownloadPoint> {
        let name = require_name(name)?;
        let url = format!(
            "{}/{}/{}",
            self.configuration().downloads_base,
            period,
            encode_package_name(name)
        );
        self.get_validated(&url).await
    }

    /// Minified and gzipped size of a version.
    ///
    /// The size service needs an explicit version, so when `version` is
    /// `None` the `latest` dist-tag is resolved through the registry first.
    pub async fn package_size(&self, name: &str, version: Option<&str>) -> Result<SizeReport> {
        let id = match PackageIdentifier::new(name, version.map(str::to_owned))? {
            id @ PackageIdentifier { version: Some(_), .. } => id,
            PackageIdentifier { name, .. } => {
                let latest = self.package_version(&name, None).await?.version;
                PackageIdentifier::new(name, Some(latest))?
            }
        };
        let url = format!(
            "{}?package={}",
            self.configuration().bundle_size_base,
            encode_package_name(&id.to_string())
        );
        self.get_validated(&url).await
    }

    /// Final, quality, popularity and maintenance scores.
    ///
    /// `GET {quality}/{name}`
    pub async fn quality_score(&self, name: &str) -> Result<QualityScore> {
        let name = require_name(name)?;
        let url = format!(
            "{}/{}",
            self.configuration().quality_base,
            encode_package_name(name)
        );
        let response: QualityResponse = self.get_validated(&url).await?;
        Ok(response.into())
    }
}
