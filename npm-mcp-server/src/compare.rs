//! Side-by-side comparison of two packages.
//!
//! Four requests go out together: both full documents and both last-month
//! download counts. All four are awaited before anything is inspected, and
//! any single failure fails the whole comparison. When several fail, the
//! first in the order [document 1, downloads 1, document 2, downloads 2] is
//! reported.

use npm_registry::models::{DownloadPoint, PackageDocument, Period};
use npm_registry::schema::SchemaError;
use npm_registry::{NpmClient, NpmError};
use serde::Serialize;

use crate::tools::{Summary, format_number};

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub downloads: u64,
    pub maintainers: Vec<String>,
    pub keywords: Vec<String>,
}

/// Entries are in the caller's argument order.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub packages: [ComparisonEntry; 2],
}

pub async fn compare_packages(
    client: &NpmClient,
    first: &str,
    second: &str,
) -> Result<ComparisonResult, NpmError> {
    let (doc1, downloads1, doc2, downloads2) = futures::join!(
        client.package_document(first),
        client.download_point(first, Period::LastMonth),
        client.package_document(second),
        client.download_point(second, Period::LastMonth)
    );

    let first = entry(doc1?, downloads1?)?;
    let second = entry(doc2?, downloads2?)?;
    Ok(ComparisonResult {
        packages: [first, second],
    })
}

fn entry(doc: PackageDocument, downloads: DownloadPoint) -> Result<ComparisonEntry, NpmError> {
    let latest = doc.latest().ok_or_else(|| {
        SchemaError {
            path: "dist-tags.latest".to_owned(),
            expected: "a version present in `versions`".to_owned(),
            found: doc.latest_version().unwrap_or("missing").to_owned(),
        }
    })?;

    Ok(ComparisonEntry {
        name: doc.name.clone(),
        version: latest.version.clone(),
        description: latest.description.clone().or_else(|| doc.description.clone()),
        downloads: downloads.downloads,
        maintainers: if latest.maintainers.is_empty() {
            doc.maintainers.iter().map(|m| m.name().to_owned()).collect()
        } else {
            latest.maintainer_names()
        },
        keywords: latest.keywords.clone(),
    })
}

impl Summary for ComparisonResult {
    fn summary(&self) -> String {
        let [a, b] = &self.packages;
        let rows = [
            ("Version", a.version.clone(), b.version.clone()),
            (
                "Downloads (last month)",
                format_number(a.downloads),
                format_number(b.downloads),
            ),
            ("Maintainers", a.maintainers.len().to_string(), b.maintainers.len().to_string()),
            ("Keywords", a.keywords.join(", "), b.keywords.join(", ")),
        ];

        let mut out = format!(
            "# {} vs {}\n\n| | {} | {} |\n|---|---|---|\n",
            a.name, b.name, a.name, b.name
        );
        for (label, left, right) in rows {
            out.push_str(&format!("| {label} | {left} | {right} |\n"));
        }
        for package in [a, b] {
            if let Some(description) = &package.description {
                out.push_str(&format!("\n{}: {}", package.name, description));
            }
        }
        out
    }
}
