use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Field, Shape, Validated};

/// Dependency name to semver range, in document order.
pub type DependencyMap = IndexMap<String, String>;

/// Source repository descriptor as published in `package.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Repository {
    fn shape() -> Shape {
        Shape::object([
            Field::optional("type", Shape::String),
            Field::required("url", Shape::String),
            Field::optional("directory", Shape::String),
        ])
    }
}

/// `repository` may be a bare shorthand string (`github:user/repo`) or an
/// object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepositoryField {
    Shorthand(String),
    Detailed(Repository),
}

impl RepositoryField {
    pub fn url(&self) -> &str {
        match self {
            Self::Shorthand(url) => url.as_str(),
            Self::Detailed(repo) => repo.url.as_str(),
        }
    }
}

/// A person field: either `"Name <email> (url)"` or an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Person {
    Text(String),
    Detailed {
        #[serde(default)]
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl Person {
    pub(crate) fn shape() -> Shape {
        Shape::one_of([
            Shape::String,
            Shape::object([
                Field::optional("name", Shape::String),
                Field::optional("email", Shape::String),
                Field::optional("url", Shape::String),
            ]),
        ])
    }

    /// Display name without email or url decoration.
    pub fn name(&self) -> &str {
        match self {
            Self::Text(text) => text
                .split(['<', '('])
                .next()
                .map(str::trim)
                .unwrap_or(text.as_str()),
            Self::Detailed { name, .. } => name.as_str(),
        }
    }
}

/// SPDX string, or the legacy `{type, url}` object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum License {
    Spdx(String),
    Legacy {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl License {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Spdx(id) => id.as_str(),
            Self::Legacy { kind, .. } => kind.as_str(),
        }
    }
}

/// The minimal record needed to locate a README.
///
/// Unlike [`PackageVersion`], `repository.url` is mandatory here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub repository: Repository,
}

impl Validated for RegistryRecord {
    fn shape() -> Shape {
        Shape::object([
            Field::required("name", Shape::String),
            Field::required("version", Shape::String),
            Field::optional("description", Shape::String),
            Field::required("repository", Repository::shape()),
        ])
    }
}

/// Metadata for one published version (`GET /{name}/{version}`).
///
/// Keywords, license, people and repository are decorative: old versions
/// carry them in many legacy forms, so an unrecognised form reads as absent
/// instead of failing the whole record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersion {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "keywords")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub license: Option<License>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Person>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub maintainers: Vec<Person>,
    #[serde(default, deserialize_with = "lenient")]
    pub repository: Option<RepositoryField>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub dependencies: DependencyMap,
    #[serde(default, deserialize_with = "lenient")]
    pub dev_dependencies: DependencyMap,
    #[serde(default, deserialize_with = "lenient")]
    pub peer_dependencies: DependencyMap,
}

impl PackageVersion {
    pub(crate) fn fields() -> Vec<Field> {
        vec![
            Field::required("name", Shape::String),
            Field::required("version", Shape::String),
            Field::optional("description", Shape::String),
            Field::optional("keywords", Shape::Any),
            Field::optional("license", Shape::Any),
            Field::optional("author", Shape::Any),
            Field::optional("maintainers", Shape::Any),
            Field::optional("repository", Shape::Any),
            Field::optional("homepage", Shape::String),
            Field::optional("dependencies", Shape::map_of(Shape::String)),
            Field::optional("devDependencies", Shape::map_of(Shape::String)),
            Field::optional("peerDependencies", Shape::map_of(Shape::String)),
        ]
    }

    /// Runtime, dev and peer dependencies; absent sets come back empty.
    pub fn dependency_triple(&self) -> DependencyTriple {
        DependencyTriple {
            dependencies: self.dependencies.clone(),
            dev_dependencies: self.dev_dependencies.clone(),
            peer_dependencies: self.peer_dependencies.clone(),
        }
    }

    pub fn maintainer_names(&self) -> Vec<String> {
        self.maintainers.iter().map(|m| m.name().to_owned()).collect()
    }
}

impl Validated for PackageVersion {
    fn shape() -> Shape {
        Shape::Object(Self::fields())
    }
}

/// Three independent dependency sets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyTriple {
    pub dependencies: DependencyMap,
    pub dev_dependencies: DependencyMap,
    pub peer_dependencies: DependencyMap,
}

/// The full package document (`GET /{name}`): every version, dist-tag and
/// publish timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "dist-tags")]
    pub dist_tags: IndexMap<String, String>,
    pub versions: IndexMap<String, PackageVersion>,
    /// `created`, `modified` and per-version publish times
    #[serde(default, deserialize_with = "lenient")]
    pub time: IndexMap<String, Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub maintainers: Vec<Person>,
    #[serde(default, deserialize_with = "keywords")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub license: Option<License>,
    #[serde(default, deserialize_with = "lenient")]
    pub repository: Option<RepositoryField>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Person>,
}

impl Validated for PackageDocument {
    /// Version entries only need to identify themselves; the rest of a
    /// historic version is read leniently.
    fn shape() -> Shape {
        let version_entry = Shape::object([
            Field::required("name", Shape::String),
            Field::required("version", Shape::String),
        ]);
        Shape::object([
            Field::required("name", Shape::String),
            Field::optional("description", Shape::String),
            Field::required("dist-tags", Shape::map_of(Shape::String)),
            Field::required("versions", Shape::map_of(version_entry)),
            Field::optional("time", Shape::map_of(Shape::Any)),
            Field::optional("maintainers", Shape::Any),
            Field::optional("keywords", Shape::Any),
            Field::optional("license", Shape::Any),
            Field::optional("repository", Shape::Any),
            Field::optional("homepage", Shape::String),
            Field::optional("author", Shape::Any),
        ])
    }
}

impl PackageDocument {
    /// Version the `latest` dist-tag points at.
    pub fn latest_version(&self) -> Option<&str> {
        self.dist_tags.get(crate::name::LATEST).map(String::as_str)
    }

    /// Metadata of the version `latest` points at.
    pub fn latest(&self) -> Option<&PackageVersion> {
        self.latest_version().and_then(|v| self.versions.get(v))
    }

    /// Publish timestamp of `key` (a version, `created` or `modified`).
    pub fn published(&self, key: &str) -> Option<&str> {
        self.time.get(key).and_then(Value::as_str)
    }

    pub fn version_names(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }
}

/// Null, or a form `T` does not understand, reads as `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Keep the entries of a list that decode; anything but a list is empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Keywords as a list, or the legacy single string (`"http, client"`).
fn keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(keyword) => Some(keyword),
                _ => None,
            })
            .collect(),
        Value::String(text) => text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    })
}
