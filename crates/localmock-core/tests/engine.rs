//! End-to-end resolution against mock directories on disk.

use localmock_core::mocks::{FsDefinitionLoader, FsRouteTable, RouteTableProvider};
use localmock_core::{MockEngine, MockNode, MockOptions, MockOutcome, MockService, RequestContext};
use rstest::{fixture, rstest};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[fixture]
fn project() -> TempDir {
    mock_project()
}

/// Project root with `mock/routes.yaml` and a handful of definitions.
fn mock_project() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    write(
        root.path(),
        "mock/routes.yaml",
        r#"
/api/users/:id:
  path: user-detail
/api/orders/:orderId/items/:item?:
  path: order-items
/api/files/*:
  path: files
  method: GET
"#,
    );
    write(
        root.path(),
        "mock/user-detail.yaml",
        r#"
__mock: true
id: "${id}"
active: "${active}"
"#,
    );
    write(
        root.path(),
        "mock/order-items.json",
        r#"{
  "__mock": true,
  "order": "${orderId}",
  "item": "${item}",
  "tags": "${tags}"
}"#,
    );
    write(
        root.path(),
        "mock/files.jsonc",
        r#"{
  // wildcard capture
  "__mock": true,
  "file": "${\"*\"}"
}"#,
    );
    write(
        root.path(),
        "mock/api/health.json",
        r#"{"__mock": true, "__delay": 25, "status": "ok"}"#,
    );
    write(
        root.path(),
        "mock/api/search.yaml",
        r#"
__mock: true
query: "${q}"
page: "${page}"
"#,
    );
    write(
        root.path(),
        "mock/api/legacy.json",
        r#"{"__mock": false, "status": "ok"}"#,
    );
    write(root.path(), "mock/api/broken.json", r#"{"__mock": true,"#);
    root
}

fn options() -> MockOptions {
    MockOptions {
        path_map_config: Some("routes".to_string()),
        ..MockOptions::default()
    }
}

fn resolve(root: &Path, options: &MockOptions, request_line: &str, body: Option<&str>) -> MockOutcome {
    let table = FsRouteTable::from_options(root, options).route_table();
    MockEngine::new(FsDefinitionLoader::from_options(root, options)).resolve_mock_response(
        request_line,
        &table,
        body,
        options.delay(),
    )
}

fn payload(outcome: MockOutcome) -> Value {
    match outcome {
        MockOutcome::Handled { payload, .. } => payload,
        MockOutcome::NotAMock => panic!("expected a mocked response"),
    }
}

#[rstest]
fn test_user_detail_from_route_table(project: TempDir) {
    let outcome = resolve(project.path(), &options(), "GET /api/users/42?active=true", None);
    assert_eq!(
        outcome,
        MockOutcome::Handled {
            target: "user-detail".to_string(),
            payload: json!({"__mock": true, "id": "42", "active": "true"}),
            delay: Duration::ZERO,
        }
    );
}

#[rstest]
#[case("GET /api/orders/7/items/3", json!("3"))]
#[case("GET /api/orders/7/items", json!(null))]
fn test_optional_param(project: TempDir, #[case] request_line: &str, #[case] item: Value) {
    let payload = payload(resolve(project.path(), &options(), request_line, None));
    assert_eq!(payload["order"], json!("7"));
    assert_eq!(payload["item"], item);
}

#[rstest]
fn test_query_arrays_reach_definitions(project: TempDir) {
    let payload = payload(resolve(
        project.path(),
        &options(),
        "GET /api/orders/7/items/3?tags=a&tags=b",
        None,
    ));
    assert_eq!(payload["tags"], json!(["a", "b"]));
}

#[rstest]
fn test_wildcard_capture(project: TempDir) {
    let payload = payload(resolve(
        project.path(),
        &options(),
        "GET /api/files/docs/readme.md",
        None,
    ));
    assert_eq!(payload["file"], json!("docs/readme.md"));
}

#[rstest]
fn test_method_restricted_route_falls_back_to_path(project: TempDir) {
    let outcome = resolve(project.path(), &options(), "DELETE /api/files/a.txt", None);
    assert_eq!(outcome, MockOutcome::NotAMock);
}

#[rstest]
fn test_path_based_definition(project: TempDir) {
    let outcome = resolve(project.path(), &options(), "GET /api/health", None);
    assert_eq!(
        outcome,
        MockOutcome::Handled {
            target: "/api/health".to_string(),
            payload: json!({"__mock": true, "__delay": 25, "status": "ok"}),
            delay: Duration::from_millis(25),
        }
    );
}

#[rstest]
#[case(Some(r#"{"q": "rust", "page": 2}"#), json!("rust"), json!(2))]
#[case(Some(r#"{"q": "#), json!("from-query"), json!("1"))]
#[case(Some(r#"["q"]"#), json!("from-query"), json!("1"))]
#[case(None, json!("from-query"), json!("1"))]
fn test_body_overrides_query(
    project: TempDir,
    #[case] body: Option<&str>,
    #[case] query: Value,
    #[case] page: Value,
) {
    let payload = payload(resolve(
        project.path(),
        &options(),
        "POST /api/search?q=from-query&page=1",
        body,
    ));
    assert_eq!(payload["query"], query);
    assert_eq!(payload["page"], page);
}

#[rstest]
#[case("GET /api/legacy")]
#[case("GET /api/broken")]
#[case("GET /api/missing")]
#[case("GET /../mock/api/health")]
#[case("GET /")]
fn test_not_a_mock(project: TempDir, #[case] request_line: &str) {
    assert_eq!(
        resolve(project.path(), &options(), request_line, None),
        MockOutcome::NotAMock
    );
}

#[rstest]
fn test_without_route_table_only_paths_resolve(project: TempDir) {
    let options = MockOptions::default();
    assert_eq!(
        resolve(project.path(), &options, "GET /api/users/42", None),
        MockOutcome::NotAMock
    );
    assert!(resolve(project.path(), &options, "GET /api/health", None).is_handled());
}

#[rstest]
fn test_broken_route_table_falls_back_to_paths(project: TempDir) {
    write(project.path(), "mock/routes.yaml", "/api/users/:id: [");
    let options = options();
    assert!(FsRouteTable::from_options(project.path(), &options)
        .route_table()
        .is_empty());
    assert!(resolve(project.path(), &options, "GET /api/health", None).is_handled());
}

#[rstest]
fn test_definition_edits_are_picked_up(project: TempDir) {
    let options = options();
    assert_eq!(
        resolve(project.path(), &options, "GET /api/legacy", None),
        MockOutcome::NotAMock
    );

    write(
        project.path(),
        "mock/api/legacy.json",
        r#"{"__mock": true, "status": "back"}"#,
    );
    let payload = payload(resolve(project.path(), &options, "GET /api/legacy", None));
    assert_eq!(payload["status"], json!("back"));
}

#[rstest]
fn test_options_file(project: TempDir) {
    write(
        project.path(),
        "localmock.yaml",
        "dir: mock\npathMapConfig: routes\ndelay: 100\n",
    );
    let options = MockOptions::load(&project.path().join("localmock.yaml")).unwrap();
    let outcome = resolve(project.path(), &options, "GET /api/users/1", None);
    assert!(matches!(
        outcome,
        MockOutcome::Handled { delay, .. } if delay == Duration::from_millis(100)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_service_handles_request() {
    let project = mock_project();
    let service = MockService::from_options(project.path(), options());

    let request = RequestContext::new("GET", "/api/health");
    let start = tokio::time::Instant::now();
    let response = service.handle(&request).await.expect("mocked");

    assert!(start.elapsed() >= Duration::from_millis(25));
    assert_eq!(response.status, 200);
    assert_eq!(
        serde_json::from_str::<Value>(&response.body).unwrap(),
        json!({"__mock": true, "__delay": 25, "status": "ok"})
    );
}

#[tokio::test]
async fn test_service_disabled() {
    let project = mock_project();
    let options = MockOptions {
        enable: false,
        ..options()
    };
    let service = MockService::from_options(project.path(), options);
    assert!(service
        .handle(&RequestContext::new("GET", "/api/health"))
        .await
        .is_none());
}

#[rstest]
fn test_native_callables() {
    use localmock_core::mocks::StaticDefinitions;
    use localmock_core::{RouteEntry, RouteTable};

    let definitions = StaticDefinitions::new().with(
        "greeting",
        MockNode::object([
            ("__mock", MockNode::from(json!(true))),
            (
                "message",
                MockNode::callable(|params| {
                    let name = params.get_str("name").unwrap_or("stranger");
                    MockNode::from(json!(format!("hello {name}")))
                }),
            ),
            ("skipped", MockNode::callable(|_| MockNode::Undefined)),
        ]),
    );
    let table = RouteTable::new(vec![RouteEntry::new("/hello/:name?", "greeting")]);
    let engine = MockEngine::new(definitions);

    let named = engine.resolve_mock_response("GET /hello/ada", &table, None, Duration::ZERO);
    assert_eq!(payload(named), json!({"__mock": true, "message": "hello ada"}));

    let anonymous = engine.resolve_mock_response("GET /hello", &table, None, Duration::ZERO);
    assert_eq!(payload(anonymous), json!({"__mock": true, "message": "hello stranger"}));
}
