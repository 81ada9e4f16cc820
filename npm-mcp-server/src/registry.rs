//! The immutable catalogue of tools, resource templates and prompts.
//!
//! Built once at startup and only read afterwards, so it is shared without
//! locking.

use serde_json::{Value, json};

use crate::protocol::{
    PromptArgument, PromptDescriptor, ResourceTemplateDescriptor, ToolDescriptor,
};

/// Which handler a tool name dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ReadmeData,
    SearchPackages,
    PackageVersions,
    PackageDependencies,
    DownloadStats,
    PackageInfo,
    ComparePackages,
    PackageSize,
    PackageQuality,
}

#[derive(Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub kind: ToolKind,
}

/// Which view a `package://` URI addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Metadata,
    Readme,
    Dependencies,
    Versions,
}

impl ResourceKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ResourceKind::Readme => "text/markdown",
            _ => "application/json",
        }
    }

    /// Path suffix after the package name, empty for metadata.
    pub fn suffix(self) -> &'static str {
        match self {
            ResourceKind::Metadata => "",
            ResourceKind::Readme => "/readme",
            ResourceKind::Dependencies => "/dependencies",
            ResourceKind::Versions => "/versions",
        }
    }
}

#[derive(Debug)]
pub struct ResourceTemplateSpec {
    pub uri_template: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ResourceKind,
}

#[derive(Debug)]
pub struct PromptSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug)]
pub struct Registry {
    tools: Vec<ToolSpec>,
    resources: Vec<ResourceTemplateSpec>,
    prompts: Vec<PromptSpec>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            tools: tool_specs(),
            resources: resource_specs(),
            prompts: prompt_specs(),
        }
    }

    pub fn tool(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|spec| spec.name == name)
    }

    pub fn prompt(&self, name: &str) -> Option<&PromptSpec> {
        self.prompts.iter().find(|spec| spec.name == name)
    }

    pub fn tool_descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|spec| ToolDescriptor {
                name: spec.name,
                description: spec.description,
                input_schema: spec.input_schema.clone(),
            })
            .collect()
    }

    pub fn resource_templates(&self) -> Vec<ResourceTemplateDescriptor> {
        self.resources
            .iter()
            .map(|spec| ResourceTemplateDescriptor {
                uri_template: spec.uri_template,
                name: spec.name,
                description: spec.description,
                mime_type: spec.kind.mime_type(),
            })
            .collect()
    }

    pub fn prompt_descriptors(&self) -> Vec<PromptDescriptor> {
        self.prompts
            .iter()
            .map(|spec| PromptDescriptor {
                name: spec.name,
                description: spec.description,
                arguments: spec.arguments.clone(),
            })
            .collect()
    }
}

fn package_name_schema() -> Value {
    json!({"type": "string", "description": "Package name, e.g. react or @types/node"})
}

fn versioned_name_schema() -> Value {
    json!({
        "type": "string",
        "description": "Package name, optionally with a version, e.g. react or @types/node@22.5.0"
    })
}

fn version_schema() -> Value {
    json!({"type": "string", "description": "Exact version or dist-tag (defaults to latest)"})
}

fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "get_readme_data",
            description: "Get the README of an npm package from its source repository, with basic package metadata",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "packageName": versioned_name_schema(),
                    "version": version_schema()
                },
                "required": ["packageName"]
            }),
            kind: ToolKind::ReadmeData,
        },
        ToolSpec {
            name: "search_packages",
            description: "Search the npm registry by keyword",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search text"},
                    "limit": {"type": "integer", "minimum": 1, "maximum": 250, "default": 20, "description": "Maximum number of results"}
                },
                "required": ["query"]
            }),
            kind: ToolKind::SearchPackages,
        },
        ToolSpec {
            name: "get_package_versions",
            description: "List every published version of a package and its dist-tags",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "packageName": package_name_schema()
                },
                "required": ["packageName"]
            }),
            kind: ToolKind::PackageVersions,
        },
        ToolSpec {
            name: "get_package_dependencies",
            description: "Get runtime, dev and peer dependencies of a package version",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "packageName": versioned_name_schema(),
                    "version": version_schema()
                },
                "required": ["packageName"]
            }),
            kind: ToolKind::PackageDependencies,
        },
        ToolSpec {
            name: "get_download_stats",
            description: "Get download counts for a package over the last day, week or month",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "packageName": package_name_schema(),
                    "period": {
                        "type": "string",
                        "enum": ["last-day", "last-week", "last-month"],
                        "default": "last-month",
                        "description": "Counting window"
                    }
                },
                "required": ["packageName"]
            }),
            kind: ToolKind::DownloadStats,
        },
        ToolSpec {
            name: "get_package_info",
            description: "Get package metadata: keywords, license, maintainers, repository, homepage and dist-tags",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "packageName": versioned_name_schema(),
                    "version": {"type": "string", "description": "Version to describe; omit for the package as a whole"}
                },
                "required": ["packageName"]
            }),
            kind: ToolKind::PackageInfo,
        },
        ToolSpec {
            name: "compare_packages",
            description: "Compare two packages side by side: latest version, description, monthly downloads, maintainers and keywords",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "packageName1": package_name_schema(),
                    "packageName2": package_name_schema()
                },
                "required": ["packageName1", "packageName2"]
            }),
            kind: ToolKind::ComparePackages,
        },
        ToolSpec {
            name: "get_package_size",
            description: "Get minified and gzipped bundle size of a package version",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "packageName": versioned_name_schema(),
                    "version": version_schema()
                },
                "required": ["packageName"]
            }),
            kind: ToolKind::PackageSize,
        },
        ToolSpec {
            name: "get_package_quality",
            description: "Get quality, popularity and maintenance scores (0 to 1) for a package",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "packageName": package_name_schema()
                },
                "required": ["packageName"]
            }),
            kind: ToolKind::PackageQuality,
        },
    ]
}

fn resource_specs() -> Vec<ResourceTemplateSpec> {
    vec![
        ResourceTemplateSpec {
            uri_template: "package://{packageName}",
            name: "package-metadata",
            description: "Package metadata as JSON",
            kind: ResourceKind::Metadata,
        },
        ResourceTemplateSpec {
            uri_template: "package://{packageName}/readme",
            name: "package-readme",
            description: "README of the latest version as markdown",
            kind: ResourceKind::Readme,
        },
        ResourceTemplateSpec {
            uri_template: "package://{packageName}/dependencies",
            name: "package-dependencies",
            description: "Dependencies of the latest version as JSON",
            kind: ResourceKind::Dependencies,
        },
        ResourceTemplateSpec {
            uri_template: "package://{packageName}/versions",
            name: "package-versions",
            description: "Published versions and dist-tags as JSON",
            kind: ResourceKind::Versions,
        },
    ]
}

fn prompt_specs() -> Vec<PromptSpec> {
    let package = PromptArgument {
        name: "packageName",
        description: "Package to analyze",
        required: true,
    };
    vec![
        PromptSpec {
            name: "analyze-package",
            description: "Review a package's health, popularity and fitness for use",
            arguments: vec![package.clone()],
        },
        PromptSpec {
            name: "compare-packages",
            description: "Weigh two packages against each other",
            arguments: vec![
                PromptArgument {
                    name: "packageName1",
                    description: "First package",
                    required: true,
                },
                PromptArgument {
                    name: "packageName2",
                    description: "Second package",
                    required: true,
                },
            ],
        },
        PromptSpec {
            name: "find-alternatives",
            description: "Look for replacements for a package",
            arguments: vec![
                package,
                PromptArgument {
                    name: "useCase",
                    description: "What the package is used for",
                    required: false,
                },
            ],
        },
    ]
}
