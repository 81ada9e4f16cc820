use std::sync::Arc;

use npm_registry::NpmClient;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

use crate::config::{ServerConfig, Transport};
use crate::error::{ServerError, ServerResult};
use crate::http;
use crate::prompts;
use crate::protocol::{
    CallToolParams, CallToolResult, GetPromptParams, InitializeParams, InitializeResult,
    ListParams, ReadResourceParams, ReadResourceResult, Request, Response,
};
use crate::registry::Registry;
use crate::resources;
use crate::tools;

pub struct NpmMcpServer {
    client: NpmClient,
    registry: Registry,
}

impl NpmMcpServer {
    /// Build the server from `config` and serve the selected transports
    /// until they finish. Any error here is fatal.
    pub async fn bootstrap(config: ServerConfig) -> ServerResult<()> {
        let client = NpmClient::new(config.npm.clone())?;
        let server = Arc::new(Self::new(client));
        tracing::info!(transport = %config.transport, "npm MCP server starting");

        match config.transport {
            Transport::Stdio => server.run_stdio().await,
            Transport::Http => http::serve(server, config.bind_addr()).await,
            Transport::Both => {
                tokio::try_join!(
                    server.run_stdio(),
                    http::serve(server.clone(), config.bind_addr())
                )?;
                Ok(())
            }
        }
    }

    pub fn new(client: NpmClient) -> Self {
        Self {
            client,
            registry: Registry::new(),
        }
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> ServerResult<()> {
        let reader = BufReader::new(io::stdin());
        let mut writer = BufWriter::new(io::stdout());
        let mut lines = reader.lines();

        tracing::info!("stdio transport ready");

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(trimmed).await {
                let payload =
                    serde_json::to_string(&response).map_err(ServerError::Serialization)?;
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        tracing::info!("stdin closed, stdio transport stopping");
        Ok(())
    }

    /// Handle one raw JSON-RPC message. Notifications yield `None`.
    pub async fn handle_message(&self, raw: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("unparseable message: {err}");
                return Some(Response::error(None, ServerError::Json(err)));
            }
        };
        let id = value.get("id").cloned();
        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(err) => {
                tracing::warn!("invalid request: {err}");
                Some(Response::error(
                    id,
                    ServerError::InvalidRequest(err.to_string()),
                ))
            }
        }
    }

    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        let notification = request.is_notification();
        let result = self.dispatch(&request.method, request.params).await;

        if notification {
            if let Err(err) = result {
                tracing::warn!(method = %request.method, "notification failed: {err}");
            }
            return None;
        }

        Some(match result {
            Ok(value) => Response::success(request.id, value),
            Err(err) => Response::error(request.id, err),
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> ServerResult<Value> {
        match method {
            "initialize" => {
                let params: InitializeParams = parse_optional_params(method, params)?;
                to_value(InitializeResult::new(params))
            }
            "initialized" | "notifications/initialized" | "shutdown" => Ok(Value::Null),
            "ping" => Ok(json!({})),
            "tools/list" => {
                list_request(method, params)?;
                Ok(json!({ "tools": self.registry.tool_descriptors() }))
            }
            "tools/call" => {
                let params: CallToolParams = parse_required_params(method, params)?;
                to_value(self.call_tool(&params.name, params.arguments).await?)
            }
            "resources/list" => {
                list_request(method, params)?;
                Ok(json!({ "resources": [] }))
            }
            "resources/templates/list" => {
                list_request(method, params)?;
                Ok(json!({ "resourceTemplates": self.registry.resource_templates() }))
            }
            "resources/read" => {
                let params: ReadResourceParams = parse_required_params(method, params)?;
                to_value(self.read_resource(&params.uri).await)
            }
            "prompts/list" => {
                list_request(method, params)?;
                Ok(json!({ "prompts": self.registry.prompt_descriptors() }))
            }
            "prompts/get" => {
                let params: GetPromptParams = parse_required_params(method, params)?;
                let spec = self.registry.prompt(&params.name).ok_or_else(|| {
                    ServerError::InvalidParams(format!("unknown prompt: {}", params.name))
                })?;
                to_value(prompts::render(spec, &params.arguments)?)
            }
            other => Err(ServerError::InvalidMethod(other.to_string())),
        }
    }

    /// Run a tool. Only an unknown tool name is a protocol error; everything
    /// that goes wrong inside the tool comes back as an error-flagged result.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> ServerResult<CallToolResult> {
        let spec = self
            .registry
            .tool(name)
            .ok_or_else(|| ServerError::InvalidParams(format!("unknown tool: {name}")))?;

        tracing::debug!(tool = name, "tool call");
        Ok(match tools::call(&self.client, spec.kind, arguments).await {
            Ok(output) => CallToolResult::success(output.text, output.structured),
            Err(err) => {
                tracing::info!(tool = name, error = %err, "tool call failed");
                CallToolResult::error(err)
            }
        })
    }

    pub async fn read_resource(&self, uri: &str) -> ReadResourceResult {
        resources::read(&self.client, uri).await
    }
}

fn to_value<T: serde::Serialize>(value: T) -> ServerResult<Value> {
    serde_json::to_value(value).map_err(ServerError::Serialization)
}

/// Lists are small and never paged; a cursor is accepted and ignored.
fn list_request(method: &str, params: Option<Value>) -> ServerResult<()> {
    let params: ListParams = parse_optional_params(method, params)?;
    if let Some(cursor) = params.cursor {
        tracing::debug!(method, %cursor, "ignoring pagination cursor");
    }
    Ok(())
}

fn parse_required_params<T>(method: &str, params: Option<Value>) -> ServerResult<T>
where
    T: DeserializeOwned,
{
    match params {
        Some(value) => serde_json::from_value(value)
            .map_err(|err| ServerError::InvalidParams(format!("{method}: {err}"))),
        None => Err(ServerError::InvalidParams(format!(
            "{method}: missing parameters"
        ))),
    }
}

fn parse_optional_params<T>(method: &str, params: Option<Value>) -> ServerResult<T>
where
    T: DeserializeOwned + Default,
{
    match params {
        Some(value) => serde_json::from_value(value)
            .map_err(|err| ServerError::InvalidParams(format!("{method}: {err}"))),
        None => Ok(T::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npm_registry::Configuration;
    use std::time::Duration;
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_for(mock: &MockServer) -> NpmMcpServer {
        let client = NpmClient::new(Configuration::new().with_single_base(mock.uri()))
            .expect("client should build");
        NpmMcpServer::new(client)
    }

    async fn mount_json(mock: &MockServer, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(mock)
            .await;
    }

    fn document(name: &str, latest: &str) -> Value {
        json!({
            "name": name,
            "dist-tags": {"latest": latest},
            "versions": {
                "0.1.0": {"name": name, "version": "0.1.0"},
                latest: {
                    "name": name,
                    "version": latest,
                    "description": format!("{name} does things"),
                    "keywords": ["state"],
                    "maintainers": [{"name": format!("{name}-dev"), "email": "dev@example.com"}]
                }
            },
            "time": {"created": "2020-01-01T00:00:00.000Z", "0.1.0": "2020-01-01T00:00:00.000Z"}
        })
    }

    fn downloads(name: &str, count: u64) -> Value {
        json!({"downloads": count, "start": "2026-09-14", "end": "2026-10-13", "package": name})
    }

    #[tokio::test]
    async fn readme_data_falls_back_to_master() {
        let mock = MockServer::start().await;
        mount_json(
            &mock,
            "/registry/example-pkg/1.0.0",
            json!({
                "name": "example-pkg",
                "version": "1.0.0",
                "description": "An example",
                "repository": {"type": "git", "url": "git+https://github.com/acme/example-pkg.git"}
            }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/raw/acme/example-pkg/refs/heads/main/README.md"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock)
            .await;
        Mock::given(method("GET"))
            .and(path("/raw/acme/example-pkg/refs/heads/master/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<master content>"))
            .expect(1)
            .mount(&mock)
            .await;

        let result = server_for(&mock)
            .call_tool(
                "get_readme_data",
                Some(json!({"packageName": "example-pkg", "version": "1.0.0"})),
            )
            .await
            .unwrap();

        assert!(!result.is_error());
        let structured = result.structured_content.as_ref().unwrap();
        assert_eq!(structured["package"], "example-pkg");
        assert_eq!(structured["version"], "1.0.0");
        assert_eq!(structured["repository"], "https://github.com/acme/example-pkg.git");
        assert_eq!(structured["readme"], "<master content>");
        assert!(result.text().contains("<master content>"));
    }

    #[tokio::test]
    async fn readme_data_without_repository_url_never_reaches_resolver() {
        let mock = MockServer::start().await;
        mount_json(
            &mock,
            "/registry/no-repo/latest",
            json!({"name": "no-repo", "version": "2.0.0", "repository": {"type": "git"}}),
        )
        .await;
        Mock::given(method("GET"))
            .and(path_regex("^/raw/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock)
            .await;

        let result = server_for(&mock)
            .call_tool("get_readme_data", Some(json!({"packageName": "no-repo"})))
            .await
            .unwrap();

        assert!(result.is_error());
        assert!(result.structured_content.is_none());
        assert!(result.text().contains("repository.url"));
    }

    #[tokio::test]
    async fn search_keeps_total_and_response_order() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("text", "state management"))
            .and(query_param("size", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "objects": [
                    {"package": {"name": "redux", "version": "5.0.1",
                        "description": "Predictable state container",
                        "author": {"name": "Dan Abramov"},
                        "links": {"npm": "https://www.npmjs.com/package/redux"}},
                     "score": {"final": 0.9}},
                    {"package": {"name": "mobx", "version": "6.13.0"}}
                ],
                "total": 500
            })))
            .mount(&mock)
            .await;

        let result = server_for(&mock)
            .call_tool("search_packages", Some(json!({"query": "state management", "limit": 2})))
            .await
            .unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["total"], 500);
        let results = structured["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["name"], "redux");
        assert_eq!(results[0]["author"], "Dan Abramov");
        assert_eq!(results[0]["npmUrl"], "https://www.npmjs.com/package/redux");
        assert_eq!(results[1]["name"], "mobx");
        assert!(results[1].get("description").is_none());
    }

    #[tokio::test]
    async fn dependencies_default_missing_peer_set_to_empty() {
        let mock = MockServer::start().await;
        mount_json(
            &mock,
            "/registry/%40types%2Fnode/latest",
            json!({
                "name": "@types/node",
                "version": "22.5.0",
                "dependencies": {"undici-types": "~6.19.2"}
            }),
        )
        .await;

        let result = server_for(&mock)
            .call_tool("get_package_dependencies", Some(json!({"packageName": "@types/node"})))
            .await
            .unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["name"], "@types/node");
        assert_eq!(structured["dependencies"]["undici-types"], "~6.19.2");
        assert_eq!(structured["peerDependencies"], json!({}));
        assert_eq!(structured["devDependencies"], json!({}));
    }

    #[tokio::test]
    async fn unknown_period_is_rejected_without_a_request() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock)
            .await;

        let result = server_for(&mock)
            .call_tool(
                "get_download_stats",
                Some(json!({"packageName": "react", "period": "last-year"})),
            )
            .await
            .unwrap();

        assert!(result.is_error());
        assert!(result.text().contains("last-year"));
    }

    #[tokio::test]
    async fn download_stats_default_to_last_month() {
        let mock = MockServer::start().await;
        mount_json(&mock, "/downloads/last-month/react", downloads("react", 104_000_000)).await;

        let result = server_for(&mock)
            .call_tool("get_download_stats", Some(json!({"packageName": "react"})))
            .await
            .unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["period"], "last-month");
        assert_eq!(structured["downloads"], 104_000_000u64);
        assert!(result.content.len() == 1);
    }

    #[tokio::test]
    async fn comparison_preserves_argument_order() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registry/a"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(document("a", "1.0.0"))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&mock)
            .await;
        mount_json(&mock, "/registry/b", document("b", "2.0.0")).await;
        mount_json(&mock, "/downloads/last-month/a", downloads("a", 10)).await;
        mount_json(&mock, "/downloads/last-month/b", downloads("b", 20)).await;

        let result = server_for(&mock)
            .call_tool(
                "compare_packages",
                Some(json!({"packageName1": "a", "packageName2": "b"})),
            )
            .await
            .unwrap();

        let structured = result.structured_content.unwrap();
        let packages = structured["packages"].as_array().unwrap();
        assert_eq!(packages[0]["name"], "a");
        assert_eq!(packages[0]["version"], "1.0.0");
        assert_eq!(packages[0]["downloads"], 10);
        assert_eq!(packages[0]["maintainers"], json!(["a-dev"]));
        assert_eq!(packages[1]["name"], "b");
        assert_eq!(packages[1]["downloads"], 20);
    }

    #[tokio::test]
    async fn comparison_fails_when_any_request_fails() {
        let mock = MockServer::start().await;
        mount_json(&mock, "/registry/a", document("a", "1.0.0")).await;
        mount_json(&mock, "/registry/b", document("b", "2.0.0")).await;
        mount_json(&mock, "/downloads/last-month/a", downloads("a", 10)).await;
        Mock::given(method("GET"))
            .and(path("/downloads/last-month/b"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock)
            .await;

        let result = server_for(&mock)
            .call_tool(
                "compare_packages",
                Some(json!({"packageName1": "a", "packageName2": "b"})),
            )
            .await
            .unwrap();

        assert!(result.is_error());
        assert!(result.structured_content.is_none());
        assert!(result.text().contains("503"));
    }

    #[tokio::test]
    async fn versions_are_identical_across_calls() {
        let mock = MockServer::start().await;
        mount_json(&mock, "/registry/left-pad", document("left-pad", "1.3.0")).await;
        let server = server_for(&mock);

        let first = server
            .call_tool("get_package_versions", Some(json!({"packageName": "left-pad"})))
            .await
            .unwrap()
            .structured_content
            .unwrap();
        let second = server
            .call_tool("get_package_versions", Some(json!({"packageName": "left-pad"})))
            .await
            .unwrap()
            .structured_content
            .unwrap();

        assert_eq!(first["versions"], second["versions"]);
        assert_eq!(first["distTags"], second["distTags"]);
        assert_eq!(first["versions"], json!(["0.1.0", "1.3.0"]));
        assert_eq!(first["latest"], "1.3.0");
        assert_eq!(first["versionCount"], 2);
    }

    #[tokio::test]
    async fn package_info_without_version_is_aggregate() {
        let mock = MockServer::start().await;
        mount_json(&mock, "/registry/left-pad", document("left-pad", "1.3.0")).await;

        let result = server_for(&mock)
            .call_tool("get_package_info", Some(json!({"packageName": "left-pad"})))
            .await
            .unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["totalVersions"], 2);
        assert_eq!(structured["latest"], "1.3.0");
        assert_eq!(structured["description"], "left-pad does things");
        assert_eq!(structured["created"], "2020-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn size_and_quality_report_structured_numbers() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bundle"))
            .and(query_param("package", "@scope/pkg@1.2.3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "@scope/pkg", "version": "1.2.3",
                "size": 2048, "gzip": 900, "dependencyCount": 3
            })))
            .mount(&mock)
            .await;
        mount_json(
            &mock,
            "/quality/%40scope%2Fpkg",
            json!({"score": {"final": 0.5, "detail": {"quality": 0.25, "popularity": 0.5, "maintenance": 1.0}}}),
        )
        .await;
        let server = server_for(&mock);

        let size = server
            .call_tool(
                "get_package_size",
                Some(json!({"packageName": "@scope/pkg", "version": "1.2.3"})),
            )
            .await
            .unwrap();
        let size = size.structured_content.unwrap();
        assert_eq!(size["gzip"], 900);
        assert_eq!(size["dependencyCount"], 3);

        let quality = server
            .call_tool("get_package_quality", Some(json!({"packageName": "@scope/pkg"})))
            .await
            .unwrap();
        assert!(quality.text().contains("Quality: 25%"));
        let quality = quality.structured_content.unwrap();
        assert_eq!(quality["name"], "@scope/pkg");
        assert_eq!(quality["final"], 0.5);
        assert_eq!(quality["maintenance"], 1.0);
    }

    #[tokio::test]
    async fn unknown_tool_is_a_protocol_error() {
        let mock = MockServer::start().await;
        let response = server_for(&mock)
            .handle_message(
                r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"nope"}}"#,
            )
            .await
            .unwrap();
        assert_eq!(response.error_code(), Some(-32602));
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let mock = MockServer::start().await;
        let response = server_for(&mock)
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let mock = MockServer::start().await;
        let response = server_for(&mock).handle_message("{not json").await.unwrap();
        assert_eq!(response.error_code(), Some(-32700));
    }

    #[tokio::test]
    async fn message_without_method_is_invalid_request() {
        let mock = MockServer::start().await;
        let response = server_for(&mock)
            .handle_message(r#"{"jsonrpc":"2.0","id":9}"#)
            .await
            .unwrap();
        assert_eq!(response.error_code(), Some(-32600));
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["id"], 9);
    }

    #[tokio::test]
    async fn versions_tool_survives_legacy_fields_in_old_versions() {
        let mock = MockServer::start().await;
        mount_json(
            &mock,
            "/registry/oldpkg",
            json!({
                "name": "oldpkg",
                "dist-tags": {"latest": "1.0.0"},
                "versions": {
                    "0.0.1": {
                        "name": "oldpkg",
                        "version": "0.0.1",
                        "keywords": "http, client",
                        "repository": {"type": "git"}
                    },
                    "1.0.0": {"name": "oldpkg", "version": "1.0.0"}
                }
            }),
        )
        .await;

        let result = server_for(&mock)
            .call_tool("get_package_versions", Some(json!({"packageName": "oldpkg"})))
            .await
            .unwrap();

        assert!(!result.is_error());
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["versions"], json!(["0.0.1", "1.0.0"]));
    }

    #[tokio::test]
    async fn package_name_with_version_selects_that_version() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registry/left-pad/1.3.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "left-pad",
                "version": "1.3.0"
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let result = server_for(&mock)
            .call_tool(
                "get_package_dependencies",
                Some(json!({"packageName": "left-pad@1.3.0"})),
            )
            .await
            .unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["version"], "1.3.0");
        assert_eq!(structured["dependencies"], json!({}));
    }

    #[tokio::test]
    async fn initialize_and_list_over_json_rpc() {
        let mock = MockServer::start().await;
        let server = server_for(&mock);

        let init = server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","clientInfo":{"name":"test"}}}"#,
            )
            .await
            .unwrap();
        let init = init.result().unwrap();
        assert_eq!(init["protocolVersion"], "2025-03-26");
        assert_eq!(init["serverInfo"]["name"], "npm-mcp-server");

        let tools = server
            .handle_message(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = tools.result().unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 9);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

        let templates = server
            .handle_message(r#"{"jsonrpc":"2.0","id":3,"method":"resources/templates/list"}"#)
            .await
            .unwrap();
        assert_eq!(
            templates.result().unwrap()["resourceTemplates"][0]["uriTemplate"],
            "package://{packageName}"
        );
    }

    #[tokio::test]
    async fn readme_resource_is_markdown_and_errors_are_plain() {
        let mock = MockServer::start().await;
        mount_json(
            &mock,
            "/registry/widget/latest",
            json!({
                "name": "widget", "version": "3.0.0",
                "repository": {"url": "https://github.com/acme/widget"}
            }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/raw/acme/widget/refs/heads/main/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Widget"))
            .mount(&mock)
            .await;
        let server = server_for(&mock);

        let ok = server.read_resource("package://widget/readme").await;
        assert_eq!(ok.contents[0].mime_type, Some("text/markdown"));
        assert_eq!(ok.contents[0].text, "# Widget");

        let missing = server.read_resource("package://ghost/versions").await;
        assert_eq!(missing.contents[0].mime_type, None);
        assert!(missing.contents[0].text.starts_with("Error:"));
    }

    #[tokio::test]
    async fn prompts_get_renders_template() {
        let mock = MockServer::start().await;
        let response = server_for(&mock)
            .handle_message(
                r#"{"jsonrpc":"2.0","id":4,"method":"prompts/get","params":{"name":"analyze-package","arguments":{"packageName":"zod"}}}"#,
            )
            .await
            .unwrap();
        let result = response.result().unwrap();
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("\"zod\""));
    }

    #[tokio::test]
    async fn http_transport_routes_json_rpc() {
        use axum::body::{Body, to_bytes};
        use axum::http::{Request as HttpRequest, StatusCode};
        use tower::ServiceExt;

        let mock = MockServer::start().await;
        let app = http::router(Arc::new(server_for(&mock)));

        let response = app
            .clone()
            .oneshot(
                HttpRequest::post("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["result"], json!({}));

        let response = app
            .clone()
            .oneshot(
                HttpRequest::post("/mcp")
                    .body(Body::from(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
