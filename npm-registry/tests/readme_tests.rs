use npm_registry::readme::README_NOT_FOUND;
use npm_registry::{Configuration, NpmClient, NpmError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPO: &str = "git+https://github.com/acme/example-pkg.git";

fn client_for(server: &MockServer) -> NpmClient {
    NpmClient::new(Configuration::new().with_single_base(server.uri()))
        .expect("client should build")
}

async fn mount(server: &MockServer, route: &str, status: u16, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn falls_back_to_master_after_main_misses() {
    let server = MockServer::start().await;
    mount(&server, "/raw/acme/example-pkg/refs/heads/main/README.md", 404, "", 1).await;
    mount(&server, "/raw/acme/example-pkg/refs/heads/master/README.md", 200, "# master", 1).await;
    mount(&server, "/raw/acme/example-pkg/README.md", 200, "# default", 0).await;

    let readme = client_for(&server).fetch_readme(REPO).await.unwrap();
    assert_eq!(readme, "# master");
}

#[tokio::test]
async fn main_wins_when_both_branches_exist() {
    let server = MockServer::start().await;
    mount(&server, "/raw/acme/example-pkg/refs/heads/main/README.md", 200, "# main", 1).await;
    mount(&server, "/raw/acme/example-pkg/refs/heads/master/README.md", 200, "# master", 0).await;

    let readme = client_for(&server).fetch_readme(REPO).await.unwrap();
    assert_eq!(readme, "# main");
}

#[tokio::test]
async fn branchless_path_is_the_last_resort() {
    let server = MockServer::start().await;
    mount(&server, "/raw/acme/example-pkg/refs/heads/main/README.md", 404, "", 1).await;
    mount(&server, "/raw/acme/example-pkg/refs/heads/master/README.md", 500, "", 1).await;
    mount(&server, "/raw/acme/example-pkg/README.md", 200, "# trunk", 1).await;

    let readme = client_for(&server).fetch_readme(REPO).await.unwrap();
    assert_eq!(readme, "# trunk");
}

#[tokio::test]
async fn exhausting_every_candidate_is_resource_not_found() {
    let server = MockServer::start().await;
    mount(&server, "/raw/acme/example-pkg/refs/heads/main/README.md", 404, "", 1).await;
    mount(&server, "/raw/acme/example-pkg/refs/heads/master/README.md", 404, "", 1).await;
    mount(&server, "/raw/acme/example-pkg/README.md", 404, "", 1).await;

    let err = client_for(&server).fetch_readme(REPO).await.unwrap_err();
    match err {
        NpmError::ResourceNotFound { message } => assert_eq!(message, README_NOT_FOUND),
        other => panic!("expected ResourceNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_still_resource_not_found() {
    // Nothing listens on the discard port.
    let client = NpmClient::new(
        Configuration::new()
            .with_raw_content_base("http://127.0.0.1:9")
            .with_connect_timeout(1),
    )
    .unwrap();

    let err = client.fetch_readme(REPO).await.unwrap_err();
    assert!(matches!(err, NpmError::ResourceNotFound { .. }));
}
