//! Tool handlers.
//!
//! Each handler fetches and validates upstream data into a typed result.
//! The result serializes to the structured payload and renders the human
//! summary, so both outputs always carry the same facts.

use indexmap::IndexMap;
use npm_registry::models::{
    DependencyTriple, License, PackageDocument, PackageVersion, Period, Person, SizeReport,
};
use npm_registry::readme::normalize_repository_url;
use npm_registry::{NpmClient, NpmError, PackageIdentifier};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::compare::{self, ComparisonResult};
use crate::registry::ToolKind;

/// How many versions the text summary lists.
const RECENT_VERSIONS: usize = 15;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    Arguments(String),
    #[error(transparent)]
    Npm(#[from] NpmError),
    #[error("could not encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Dual output of a successful call.
#[derive(Debug)]
pub struct ToolOutput {
    pub text: String,
    pub structured: Value,
}

/// A tool result that can describe itself in prose.
pub trait Summary: Serialize {
    fn summary(&self) -> String;
}

fn output<T: Summary>(data: &T) -> Result<ToolOutput, ToolError> {
    Ok(ToolOutput {
        text: data.summary(),
        structured: serde_json::to_value(data)?,
    })
}

pub(crate) fn parse_arguments<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T, ToolError> {
    let value = arguments.unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::from_value(value).map_err(|err| ToolError::Arguments(err.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageArgs {
    package_name: String,
    #[serde(default)]
    version: Option<String>,
}

impl PackageArgs {
    /// `packageName` may carry its own version (`react@18.2.0`); an explicit
    /// `version` argument takes precedence.
    fn identifier(self) -> Result<PackageIdentifier, NpmError> {
        let parsed = PackageIdentifier::parse(&self.package_name)?;
        match self.version.filter(|v| !v.trim().is_empty()) {
            Some(version) => PackageIdentifier::new(parsed.name, Some(version)),
            None => Ok(parsed),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameArgs {
    package_name: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadArgs {
    package_name: String,
    #[serde(default)]
    period: Period,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareArgs {
    package_name1: String,
    package_name2: String,
}

/// Run the handler behind `kind`.
pub async fn call(
    client: &NpmClient,
    kind: ToolKind,
    arguments: Option<Value>,
) -> Result<ToolOutput, ToolError> {
    match kind {
        ToolKind::ReadmeData => {
            let id = parse_arguments::<PackageArgs>(arguments)?.identifier()?;
            output(&readme_data(client, &id.name, id.version.as_deref()).await?)
        }
        ToolKind::SearchPackages => {
            let args: SearchArgs = parse_arguments(arguments)?;
            output(&search(client, &args.query, args.limit).await?)
        }
        ToolKind::PackageVersions => {
            let args: NameArgs = parse_arguments(arguments)?;
            output(&versions_data(client, &args.package_name).await?)
        }
        ToolKind::PackageDependencies => {
            let id = parse_arguments::<PackageArgs>(arguments)?.identifier()?;
            output(&dependencies_data(client, &id.name, id.version.as_deref()).await?)
        }
        ToolKind::DownloadStats => {
            let args: DownloadArgs = parse_arguments(arguments)?;
            output(&download_data(client, &args.package_name, args.period).await?)
        }
        ToolKind::PackageInfo => {
            let id = parse_arguments::<PackageArgs>(arguments)?.identifier()?;
            output(&package_info(client, &id.name, id.version.as_deref()).await?)
        }
        ToolKind::ComparePackages => {
            let args: CompareArgs = parse_arguments(arguments)?;
            let result: ComparisonResult =
                compare::compare_packages(client, &args.package_name1, &args.package_name2).await?;
            output(&result)
        }
        ToolKind::PackageSize => {
            let id = parse_arguments::<PackageArgs>(arguments)?.identifier()?;
            output(&client.package_size(&id.name, id.version.as_deref()).await?)
        }
        ToolKind::PackageQuality => {
            let args: NameArgs = parse_arguments(arguments)?;
            output(&quality_data(client, &args.package_name).await?)
        }
    }
}

// === get_readme_data ===

#[derive(Debug, Serialize)]
pub struct ReadmeData {
    pub package: String,
    pub version: String,
    pub description: Option<String>,
    pub repository: String,
    pub readme: String,
}

pub async fn readme_data(
    client: &NpmClient,
    name: &str,
    version: Option<&str>,
) -> Result<ReadmeData, NpmError> {
    let record = client.registry_record(name, version).await?;
    let readme = client.fetch_readme(&record.repository.url).await?;
    Ok(ReadmeData {
        repository: normalize_repository_url(&record.repository.url).to_owned(),
        package: record.name,
        version: record.version,
        description: record.description,
        readme,
    })
}

impl Summary for ReadmeData {
    fn summary(&self) -> String {
        let mut out = format!("# {} v{}\n\n", self.package, self.version);
        if let Some(description) = &self.description {
            out.push_str(&format!("{description}\n\n"));
        }
        out.push_str(&format!("Repository: {}\n\n---\n\n{}", self.repository, self.readme));
        out
    }
}

// === search_packages ===

#[derive(Debug, Serialize)]
pub struct SearchData {
    pub total: u64,
    pub results: Vec<SearchEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npm_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

pub async fn search(
    client: &NpmClient,
    query: &str,
    limit: Option<u32>,
) -> Result<SearchData, NpmError> {
    let response = client.search_packages(query, limit).await?;
    let results = response
        .objects
        .into_iter()
        .map(|object| {
            let package = object.package;
            SearchEntry {
                author: package.author_name().map(str::to_owned),
                npm_url: package.npm_url().map(str::to_owned),
                score: object.score.and_then(|s| s.final_score),
                name: package.name,
                version: package.version,
                description: package.description,
            }
        })
        .collect();
    Ok(SearchData {
        total: response.total,
        results,
    })
}

impl Summary for SearchData {
    fn summary(&self) -> String {
        let mut out = format!(
            "Found {} packages (showing {}):\n",
            format_number(self.total),
            self.results.len()
        );
        for (index, entry) in self.results.iter().enumerate() {
            out.push_str(&format!("\n{}. {}@{}", index + 1, entry.name, entry.version));
            if let Some(description) = &entry.description {
                out.push_str(&format!(" - {description}"));
            }
            if let Some(author) = &entry.author {
                out.push_str(&format!("\n   Author: {author}"));
            }
            if let Some(url) = &entry.npm_url {
                out.push_str(&format!("\n   {url}"));
            }
        }
        out
    }
}

// === get_package_versions ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionsData {
    pub name: String,
    pub latest: Option<String>,
    pub dist_tags: IndexMap<String, String>,
    pub versions: Vec<String>,
    pub version_count: usize,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub published: IndexMap<String, String>,
}

pub async fn versions_data(client: &NpmClient, name: &str) -> Result<VersionsData, NpmError> {
    let doc = client.package_document(name).await?;
    let versions = doc.version_names();
    let published = versions
        .iter()
        .filter_map(|v| doc.published(v).map(|t| (v.clone(), t.to_owned())))
        .collect();
    Ok(VersionsData {
        latest: doc.latest_version().map(str::to_owned),
        version_count: versions.len(),
        name: doc.name,
        dist_tags: doc.dist_tags,
        versions,
        published,
    })
}

impl Summary for VersionsData {
    fn summary(&self) -> String {
        let mut out = format!(
            "# {} - {} versions (latest: {})\n\n## Dist-tags\n",
            self.name,
            self.version_count,
            self.latest.as_deref().unwrap_or("none")
        );
        for (tag, version) in &self.dist_tags {
            out.push_str(&format!("- {tag}: {version}\n"));
        }
        out.push_str("\n## Recent versions\n");
        for version in self.versions.iter().rev().take(RECENT_VERSIONS) {
            match self.published.get(version) {
                Some(time) => out.push_str(&format!("- {version} ({time})\n")),
                None => out.push_str(&format!("- {version}\n")),
            }
        }
        out
    }
}

// === get_package_dependencies ===

#[derive(Debug, Serialize)]
pub struct DependenciesData {
    pub name: String,
    pub version: String,
    #[serde(flatten)]
    pub dependencies: DependencyTriple,
}

pub async fn dependencies_data(
    client: &NpmClient,
    name: &str,
    version: Option<&str>,
) -> Result<DependenciesData, NpmError> {
    let metadata = client.package_version(name, version).await?;
    Ok(DependenciesData {
        dependencies: metadata.dependency_triple(),
        name: metadata.name,
        version: metadata.version,
    })
}

impl Summary for DependenciesData {
    fn summary(&self) -> String {
        let mut out = format!("# {} v{} dependencies\n", self.name, self.version);
        let sections = [
            ("Dependencies", &self.dependencies.dependencies),
            ("Dev dependencies", &self.dependencies.dev_dependencies),
            ("Peer dependencies", &self.dependencies.peer_dependencies),
        ];
        for (title, deps) in sections {
            out.push_str(&format!("\n## {title} ({})\n", deps.len()));
            if deps.is_empty() {
                out.push_str("none\n");
            }
            for (dep, range) in deps {
                out.push_str(&format!("- {dep}: {range}\n"));
            }
        }
        out
    }
}

// === get_download_stats ===

#[derive(Debug, Serialize)]
pub struct DownloadData {
    pub package: String,
    pub downloads: u64,
    pub period: Period,
    pub start: String,
    pub end: String,
}

pub async fn download_data(
    client: &NpmClient,
    name: &str,
    period: Period,
) -> Result<DownloadData, NpmError> {
    let point = client.download_point(name, period).await?;
    Ok(DownloadData {
        package: point.package,
        downloads: point.downloads,
        period,
        start: point.start,
        end: point.end,
    })
}

impl Summary for DownloadData {
    fn summary(&self) -> String {
        format!(
            "{} was downloaded {} times in the {} ({} to {})",
            self.package,
            format_number(self.downloads),
            self.period.as_str().replace('-', " "),
            self.start,
            self.end
        )
    }
}

// === get_package_info ===

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PackageInfo {
    Version(VersionInfo),
    Package(PackageOverview),
}

/// One published version.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub license: Option<String>,
    pub author: Option<String>,
    pub maintainers: Vec<String>,
    pub repository: Option<String>,
    pub homepage: Option<String>,
    pub dependency_count: usize,
}

/// The package across all versions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageOverview {
    pub name: String,
    pub latest: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub license: Option<String>,
    pub author: Option<String>,
    pub maintainers: Vec<String>,
    pub repository: Option<String>,
    pub homepage: Option<String>,
    pub total_versions: usize,
    pub dist_tags: IndexMap<String, String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

pub async fn package_info(
    client: &NpmClient,
    name: &str,
    version: Option<&str>,
) -> Result<PackageInfo, NpmError> {
    match version.map(str::trim).filter(|v| !v.is_empty()) {
        Some(version) => {
            let metadata = client.package_version(name, Some(version)).await?;
            Ok(PackageInfo::Version(version_info(metadata)))
        }
        None => {
            let doc = client.package_document(name).await?;
            Ok(PackageInfo::Package(package_overview(doc)))
        }
    }
}

fn version_info(metadata: PackageVersion) -> VersionInfo {
    VersionInfo {
        dependency_count: metadata.dependencies.len(),
        maintainers: metadata.maintainer_names(),
        license: metadata.license.as_ref().map(|l| l.identifier().to_owned()),
        author: metadata.author.as_ref().map(|a| a.name().to_owned()),
        repository: metadata
            .repository
            .as_ref()
            .map(|r| normalize_repository_url(r.url()).to_owned()),
        name: metadata.name,
        version: metadata.version,
        description: metadata.description,
        keywords: metadata.keywords,
        homepage: metadata.homepage,
    }
}

/// Top-level document fields win; the latest version fills the gaps.
fn package_overview(doc: PackageDocument) -> PackageOverview {
    let latest = doc.latest().cloned();
    let from_latest = |f: fn(&PackageVersion) -> Option<String>| latest.as_ref().and_then(f);

    let keywords = if doc.keywords.is_empty() {
        latest.as_ref().map(|v| v.keywords.clone()).unwrap_or_default()
    } else {
        doc.keywords.clone()
    };
    let maintainers: Vec<String> = doc
        .maintainers
        .iter()
        .map(Person::name)
        .map(str::to_owned)
        .collect();

    PackageOverview {
        latest: doc.latest_version().map(str::to_owned),
        description: doc
            .description
            .clone()
            .or_else(|| from_latest(|v| v.description.clone())),
        license: doc
            .license
            .as_ref()
            .map(License::identifier)
            .map(str::to_owned)
            .or_else(|| from_latest(|v| v.license.as_ref().map(|l| l.identifier().to_owned()))),
        author: doc
            .author
            .as_ref()
            .map(|a| a.name().to_owned())
            .or_else(|| from_latest(|v| v.author.as_ref().map(|a| a.name().to_owned()))),
        repository: doc
            .repository
            .as_ref()
            .map(|r| r.url().to_owned())
            .or_else(|| from_latest(|v| v.repository.as_ref().map(|r| r.url().to_owned())))
            .map(|url| normalize_repository_url(&url).to_owned()),
        homepage: doc
            .homepage
            .clone()
            .or_else(|| from_latest(|v| v.homepage.clone())),
        created: doc.published("created").map(str::to_owned),
        modified: doc.published("modified").map(str::to_owned),
        total_versions: doc.versions.len(),
        keywords,
        maintainers,
        name: doc.name,
        dist_tags: doc.dist_tags,
    }
}

impl Summary for PackageInfo {
    fn summary(&self) -> String {
        match self {
            PackageInfo::Version(info) => {
                let mut out = format!("# {} v{}\n", info.name, info.version);
                push_common(
                    &mut out,
                    info.description.as_deref(),
                    &info.keywords,
                    info.license.as_deref(),
                    info.author.as_deref(),
                    &info.maintainers,
                    info.repository.as_deref(),
                    info.homepage.as_deref(),
                );
                out.push_str(&format!("Dependencies: {}\n", info.dependency_count));
                out
            }
            PackageInfo::Package(info) => {
                let mut out = format!(
                    "# {} (latest: {})\n",
                    info.name,
                    info.latest.as_deref().unwrap_or("none")
                );
                push_common(
                    &mut out,
                    info.description.as_deref(),
                    &info.keywords,
                    info.license.as_deref(),
                    info.author.as_deref(),
                    &info.maintainers,
                    info.repository.as_deref(),
                    info.homepage.as_deref(),
                );
                out.push_str(&format!("Total versions: {}\n", info.total_versions));
                let tags: Vec<String> = info
                    .dist_tags
                    .iter()
                    .map(|(tag, version)| format!("{tag}={version}"))
                    .collect();
                out.push_str(&format!("Dist-tags: {}\n", tags.join(", ")));
                if let Some(created) = &info.created {
                    out.push_str(&format!("Created: {created}\n"));
                }
                if let Some(modified) = &info.modified {
                    out.push_str(&format!("Modified: {modified}\n"));
                }
                out
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn push_common(
    out: &mut String,
    description: Option<&str>,
    keywords: &[String],
    license: Option<&str>,
    author: Option<&str>,
    maintainers: &[String],
    repository: Option<&str>,
    homepage: Option<&str>,
) {
    if let Some(description) = description {
        out.push_str(&format!("\n{description}\n\n"));
    }
    let fields = [
        ("License", license.map(str::to_owned)),
        ("Author", author.map(str::to_owned)),
        ("Repository", repository.map(str::to_owned)),
        ("Homepage", homepage.map(str::to_owned)),
        (
            "Keywords",
            (!keywords.is_empty()).then(|| keywords.join(", ")),
        ),
        (
            "Maintainers",
            (!maintainers.is_empty()).then(|| maintainers.join(", ")),
        ),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }
}

// === get_package_size ===

impl Summary for SizeReport {
    fn summary(&self) -> String {
        format!(
            "{}@{}: {} minified, {} gzipped, {} dependencies",
            self.name,
            self.version,
            format_bytes(self.size),
            format_bytes(self.gzip),
            self.dependency_count
        )
    }
}

// === get_package_quality ===

#[derive(Debug, Serialize)]
pub struct QualityData {
    pub name: String,
    #[serde(rename = "final")]
    pub final_score: f64,
    pub quality: f64,
    pub popularity: f64,
    pub maintenance: f64,
}

pub async fn quality_data(client: &NpmClient, name: &str) -> Result<QualityData, NpmError> {
    let score = client.quality_score(name).await?;
    Ok(QualityData {
        name: name.trim().to_owned(),
        final_score: score.final_score,
        quality: score.quality,
        popularity: score.popularity,
        maintenance: score.maintenance,
    })
}

impl Summary for QualityData {
    fn summary(&self) -> String {
        format!(
            "# {} scores\n\nOverall: {}\nQuality: {}\nPopularity: {}\nMaintenance: {}",
            self.name,
            percent(self.final_score),
            percent(self.quality),
            percent(self.popularity),
            percent(self.maintenance)
        )
    }
}

// === formatting ===

/// `1234567` -> `1,234,567`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} kB", b / KB)
    } else {
        format!("{:.2} MB", b / (KB * KB))
    }
}

fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}
