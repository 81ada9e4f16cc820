//! JSON-RPC 2.0 envelope and the MCP result payloads built on top of it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ServerError;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2025-06-18";
pub const SERVER_NAME: &str = "npm-mcp-server";

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default, rename = "jsonrpc")]
    _jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// Requests without an `id` are notifications and get no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ResponseError>,
}

impl Response {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, error: ServerError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(ResponseError::from(error)),
        }
    }

    #[cfg(test)]
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    #[cfg(test)]
    pub fn error_code(&self) -> Option<i32> {
        self.error.as_ref().map(|e| e.code)
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl From<ServerError> for ResponseError {
    fn from(err: ServerError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            data: None,
        }
    }
}

// === initialize ===

#[derive(Debug, Default, Deserialize)]
pub struct InitializeParams {
    #[serde(default, rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(default, rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    capabilities: Value,
    #[serde(rename = "serverInfo")]
    server_info: ServerInfo,
    instructions: &'static str,
}

impl InitializeResult {
    pub fn new(params: InitializeParams) -> Self {
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                version = client.version.as_deref().unwrap_or("unknown"),
                "client connected"
            );
        }
        Self {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| PROTOCOL_VERSION.to_owned()),
            capabilities: serde_json::json!({
                "tools": {"listChanged": false},
                "resources": {"subscribe": false, "listChanged": false},
                "prompts": {"listChanged": false}
            }),
            server_info: ServerInfo {
                name: SERVER_NAME,
                version: env!("CARGO_PKG_VERSION"),
            },
            instructions: "Look up npm package metadata: README, versions, dependencies, \
                           downloads, bundle size and quality scores.",
        }
    }
}

#[derive(Debug, Serialize)]
struct ServerInfo {
    name: &'static str,
    version: &'static str,
}

// === tools ===

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Outcome of a tool call: a summary for humans plus the same facts as
/// structured data, or an error-flagged message.
#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "structuredContent")]
    pub structured_content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "isError")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn success(text: String, structured: Value) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
            structured_content: Some(structured),
            is_error: None,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!("Error: {message}"),
            }],
            structured_content: None,
            is_error: Some(true),
        }
    }

    #[cfg(test)]
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text.as_str(),
            None => "",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

// === resources ===

#[derive(Debug, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

#[derive(Debug, Serialize)]
pub struct ResourceTemplateDescriptor {
    #[serde(rename = "uriTemplate")]
    pub uri_template: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

#[derive(Debug, Serialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
    pub mime_type: Option<&'static str>,
    pub text: String,
}

impl ReadResourceResult {
    pub fn content(uri: &str, mime_type: &'static str, text: String) -> Self {
        Self {
            contents: vec![ResourceContents {
                uri: uri.to_owned(),
                mime_type: Some(mime_type),
                text,
            }],
        }
    }

    /// Failure is plain text with no MIME type override.
    pub fn error(uri: &str, message: impl std::fmt::Display) -> Self {
        Self {
            contents: vec![ResourceContents {
                uri: uri.to_owned(),
                mime_type: None,
                text: format!("Error: {message}"),
            }],
        }
    }
}

// === prompts ===

#[derive(Debug, Deserialize)]
pub struct GetPromptParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct PromptDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Serialize)]
pub struct GetPromptResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

#[derive(Debug, Serialize)]
pub struct PromptMessage {
    pub role: &'static str,
    pub content: ToolContent,
}

impl PromptMessage {
    pub fn user(text: String) -> Self {
        Self {
            role: "user",
            content: ToolContent::Text { text },
        }
    }
}
