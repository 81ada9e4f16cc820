//! `package://` resources.
//!
//! Reads go through the same fetch and validate pipeline as the matching
//! tools but return a single body keyed by MIME type.

use npm_registry::NpmClient;

use crate::protocol::ReadResourceResult;
use crate::registry::ResourceKind;
use crate::tools::{self, ToolError};

pub const SCHEME: &str = "package://";

/// A parsed `package://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUri {
    pub name: String,
    pub kind: ResourceKind,
}

impl PackageUri {
    /// Parse `package://{name}[/readme|/dependencies|/versions]`.
    ///
    /// The name may be percent-encoded or raw; a raw scoped name keeps its
    /// slash (`package://@types/node/versions`).
    pub fn parse(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix(SCHEME)?.trim_end_matches('/');

        let (raw_name, kind) = [
            ResourceKind::Readme,
            ResourceKind::Dependencies,
            ResourceKind::Versions,
        ]
        .into_iter()
        .find_map(|kind| {
            rest.strip_suffix(kind.suffix())
                // `package://@scope/readme` names the package, not a view
                .filter(|name| !is_bare_scope(name))
                .map(|name| (name, kind))
        })
        .unwrap_or((rest, ResourceKind::Metadata));

        let name = urlencoding::decode(raw_name).ok()?.into_owned();
        if name.is_empty() {
            return None;
        }
        Some(Self { name, kind })
    }
}

fn is_bare_scope(name: &str) -> bool {
    name.starts_with('@') && !name.contains('/') && !name.contains("%2F") && !name.contains("%2f")
}

/// Read one resource; failures become plain-text content.
pub async fn read(client: &NpmClient, uri: &str) -> ReadResourceResult {
    let Some(parsed) = PackageUri::parse(uri) else {
        return ReadResourceResult::error(uri, format!("unsupported resource URI: {uri}"));
    };

    match fetch(client, &parsed).await {
        Ok(text) => ReadResourceResult::content(uri, parsed.kind.mime_type(), text),
        Err(err) => {
            tracing::debug!(%uri, error = %err, "resource read failed");
            ReadResourceResult::error(uri, err)
        }
    }
}

async fn fetch(client: &NpmClient, uri: &PackageUri) -> Result<String, ToolError> {
    let name = uri.name.as_str();
    let text = match uri.kind {
        ResourceKind::Metadata => {
            serde_json::to_string_pretty(&tools::package_info(client, name, None).await?)?
        }
        ResourceKind::Readme => tools::readme_data(client, name, None).await?.readme,
        ResourceKind::Dependencies => {
            serde_json::to_string_pretty(&tools::dependencies_data(client, name, None).await?)?
        }
        ResourceKind::Versions => {
            serde_json::to_string_pretty(&tools::versions_data(client, name).await?)?
        }
    };
    Ok(text)
}
