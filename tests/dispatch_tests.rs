//! End-to-end tool calls against a mock upstream API.

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use vidbridge::api::{ApiClient, ApiConfig};
use vidbridge::config::ModelSettings;
use vidbridge::mcp::{Dispatcher, McpServer, ToolCallResult, ToolDescriptor};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    query: Option<String>,
    api_key: Option<String>,
    content_type: Option<String>,
    body: String,
}

impl RecordedRequest {
    fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    log.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        api_key: header("x-api-key"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn index_json(id: &str) -> Value {
    json!({
        "_id": id,
        "index_name": "football",
        "models": [{"model_name": "marengo2.7", "model_options": ["visual", "audio"]}],
        "video_count": 3,
        "total_duration": 421.5,
        "created_at": "2024-05-01T10:00:00Z"
    })
}

/// Task IDs encode their status: `task-indexing` reports "indexing".
async fn get_task(Path(task_id): Path<String>) -> Json<Value> {
    let status = task_id.strip_prefix("task-").unwrap_or("ready").to_string();
    Json(json!({
        "_id": task_id,
        "index_id": "idx1",
        "video_id": "vid1",
        "status": status,
        "system_metadata": {"filename": "match.mp4", "duration": 93.2}
    }))
}

fn upstream() -> Router {
    Router::new()
        .route(
            "/v1.3/indexes",
            post(|| async { Json(json!({"_id": "idx-new"})) }).get(|| async {
                Json(json!({
                    "data": [index_json("idx1"), {"_id": "idx2"}],
                    "page_info": {"page": 1, "limit_per_page": 10, "total_page": 1, "total_results": 2}
                }))
            }),
        )
        .route(
            "/v1.3/indexes/{index_id}",
            get(|Path(id): Path<String>| async move { Json(index_json(&id)) })
                .put(|| async { StatusCode::NO_CONTENT })
                .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/v1.3/tasks",
            post(|| async { Json(json!({"_id": "task-new", "video_id": "vid-new"})) }).get(
                || async {
                    Json(json!({
                        "data": [{"_id": "task-ready", "status": "ready"}],
                        "page_info": {"page": 2, "total_results": 11}
                    }))
                },
            ),
        )
        .route(
            "/v1.3/tasks/{task_id}",
            get(get_task).delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/v1.3/search",
            post(|| async {
                Json(json!({
                    "data": [
                        {"video_id": "vid1", "score": 88.1, "start": 12.0, "end": 19.5, "confidence": "high"},
                        {"video_id": "vid2", "score": 61.0, "start": 3.0, "end": 7.0}
                    ],
                    "page_info": {"limit_per_page": 10, "total_results": 14, "next_page_token": "tok-2"}
                }))
            }),
        )
        .route(
            "/v1.3/search/{page_token}",
            get(|| async {
                Json(json!({
                    "data": [{"video_id": "vid3", "score": 40.0, "start": 1.0, "end": 2.0}],
                    "page_info": {"limit_per_page": 10, "total_results": 14, "prev_page_token": "tok-1"}
                }))
            }),
        )
        .route(
            "/v1.3/generate",
            post(|| async { Json(json!({"id": "gen1", "data": "A goal is scored."})) }),
        )
        .route(
            "/v1.3/gist",
            post(|| async {
                Json(json!({"id": "gist1", "title": "Late winner", "hashtags": ["football"]}))
            }),
        )
        .route(
            "/v1.3/summarize",
            post(|| async {
                Json(json!({
                    "id": "sum1",
                    "highlights": [{"start": 80.0, "end": 90.0, "highlight": "Goal"}]
                }))
            }),
        )
        .route(
            "/v1.3/tasks/transfers/import/{integration_id}",
            post(|| async {
                Json(json!({
                    "videos": [{"video_id": "vid9", "filename": "a.mp4"}],
                    "failed_files": [{"filename": "b.mov", "error_message": "unsupported codec"}]
                }))
            }),
        )
        .route(
            "/v1.3/tasks/transfers/import/{integration_id}/status",
            get(|| async {
                Json(json!({"ready": [{"video_id": "vid9", "filename": "a.mp4"}]}))
            }),
        )
        .route(
            "/v1.3/tasks/transfers/import/{integration_id}/logs",
            get(|| async {
                Json(json!({
                    "data": [{
                        "index_id": "idx1",
                        "index_name": "football",
                        "video_status": {"ready": 1, "failed": 1}
                    }]
                }))
            }),
        )
}

struct Upstream {
    dispatcher: Dispatcher,
    log: RequestLog,
}

impl Upstream {
    async fn start(router: Router) -> Self {
        let log = RequestLog::default();
        let app = router.layer(middleware::from_fn_with_state(log.clone(), record));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ApiConfig::new(&format!("http://{}/v1.3", addr), "test-key").unwrap();
        let client = ApiClient::new(config).unwrap();
        Self {
            dispatcher: Dispatcher::new(client, ModelSettings::default()),
            log,
        }
    }

    async fn call(&self, name: &str, arguments: Value) -> ToolCallResult {
        self.dispatcher.call(name, Some(arguments)).await
    }

    /// Call a tool that must succeed and return its parsed JSON payload.
    async fn call_ok(&self, name: &str, arguments: Value) -> Value {
        let result = self.call(name, arguments).await;
        assert!(!result.is_error, "{} failed: {}", name, result.joined_text());
        serde_json::from_str(&result.joined_text()).unwrap()
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request reached the upstream")
    }
}

/// Minimal arguments that satisfy a tool's required fields.
fn sample_arguments(tool: &ToolDescriptor) -> Value {
    let schema = &tool.input_schema;
    let mut args = Map::new();
    for field in schema["required"].as_array().unwrap() {
        let field = field.as_str().unwrap();
        let property = &schema["properties"][field];
        let value = match property["type"].as_str() {
            Some("array") => json!([property["items"]["enum"][0].clone()]),
            Some("integer") => json!(1),
            Some("boolean") => json!(true),
            _ if property["enum"].is_array() => property["enum"][0].clone(),
            _ => json!(format!("sample-{}", field)),
        };
        args.insert(field.to_string(), value);
    }
    Value::Object(args)
}

#[tokio::test]
async fn every_registered_tool_succeeds_against_a_healthy_upstream() {
    let upstream = Upstream::start(upstream()).await;
    for tool in upstream.dispatcher.tools() {
        let result = upstream.call(&tool.name, sample_arguments(tool)).await;
        assert!(
            !result.is_error,
            "{} failed: {}",
            tool.name,
            result.joined_text()
        );
    }
}

#[tokio::test]
async fn every_request_carries_the_api_key() {
    let upstream = Upstream::start(upstream()).await;
    upstream.call_ok("list_indexes", json!({})).await;
    upstream.call_ok("get_task", json!({"task_id": "task-ready"})).await;

    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| r.api_key.as_deref() == Some("test-key")));
}

#[tokio::test]
async fn create_index_sends_configured_model_pairing() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call_ok("create_index", json!({"index_name": "football"}))
        .await;
    assert_eq!(result, json!({"id": "idx-new", "name": "football"}));

    let request = upstream.last_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/v1.3/indexes");
    let body = request.json_body();
    assert_eq!(body["index_name"], "football");
    assert_eq!(body["models"][0]["model_name"], "marengo2.7");
    assert_eq!(body["models"][1]["model_name"], "pegasus1.2");
    assert_eq!(body["models"][1]["model_options"], json!(["visual", "audio"]));
    assert!(body.get("addons").is_none());
}

#[tokio::test]
async fn list_indexes_renames_and_defaults_fields() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call_ok(
            "list_indexes",
            json!({"page": 1, "sort_by": "created_at", "sort_option": "desc"}),
        )
        .await;

    assert_eq!(result["indexes"][0]["id"], "idx1");
    assert_eq!(result["indexes"][0]["name"], "football");
    assert_eq!(result["indexes"][1]["id"], "idx2");
    assert_eq!(result["indexes"][1]["models"], json!([]));
    assert!(result["indexes"][1]["name"].is_null());
    assert_eq!(result["page_info"]["total_results"], 2);

    let query = upstream.last_request().query.unwrap();
    assert!(query.contains("sort_by=created_at"));
    assert!(query.contains("sort_option=desc"));
}

#[tokio::test]
async fn get_index_is_keyed_by_id() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream.call_ok("get_index", json!({"index_id": "idx1"})).await;
    assert_eq!(result["id"], "idx1");
    assert_eq!(result["video_count"], 3);
    assert_eq!(upstream.last_request().path, "/v1.3/indexes/idx1");
}

#[tokio::test]
async fn update_and_delete_index_accept_empty_bodies() {
    let upstream = Upstream::start(upstream()).await;

    let updated = upstream
        .call_ok("update_index", json!({"index_id": "idx1", "index_name": "soccer"}))
        .await;
    assert_eq!(updated, json!({"id": "idx1", "name": "soccer", "updated": true}));
    let request = upstream.last_request();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.json_body(), json!({"index_name": "soccer"}));

    let deleted = upstream.call_ok("delete_index", json!({"index_id": "idx1"})).await;
    assert_eq!(deleted, json!({"id": "idx1", "deleted": true}));
    assert_eq!(upstream.last_request().method, "DELETE");
}

#[tokio::test]
async fn upload_video_is_multipart() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call_ok(
            "upload_video",
            json!({"index_id": "idx1", "video_url": "https://cdn.example.com/match.mp4"}),
        )
        .await;
    assert_eq!(result, json!({"task_id": "task-new", "video_id": "vid-new"}));

    let request = upstream.last_request();
    assert_eq!(request.path, "/v1.3/tasks");
    assert!(request
        .content_type
        .unwrap()
        .starts_with("multipart/form-data"));
    assert!(request.body.contains("https://cdn.example.com/match.mp4"));
    assert!(request.body.contains("name=\"index_id\""));
}

#[tokio::test]
async fn search_applies_defaults() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call_ok("search_videos", json!({"index_id": "idx1", "query": "late goal"}))
        .await;

    assert_eq!(result["results"].as_array().unwrap().len(), 2);
    assert_eq!(result["results"][0]["video_id"], "vid1");
    assert_eq!(result["results"][0]["confidence"], "high");
    assert!(result["results"][1]["confidence"].is_null());
    assert_eq!(result["page_info"]["next_page_token"], "tok-2");

    let body = upstream.last_request().json_body();
    assert_eq!(body["query_text"], "late goal");
    assert_eq!(body["search_options"], json!(["visual", "audio"]));
    assert_eq!(body["operator"], "or");
    assert_eq!(body["page_limit"], 10);
    assert!(body.get("threshold").is_none());
}

#[tokio::test]
async fn null_optional_arguments_fall_back_to_defaults() {
    let upstream = Upstream::start(upstream()).await;

    upstream
        .call_ok(
            "search_videos",
            json!({
                "index_id": "idx1",
                "query": "late goal",
                "operator": null,
                "search_options": null,
                "page_limit": null,
                "threshold": null
            }),
        )
        .await;
    let body = upstream.last_request().json_body();
    assert_eq!(body["operator"], "or");
    assert_eq!(body["search_options"], json!(["visual", "audio"]));
    assert_eq!(body["page_limit"], 10);
    assert!(body.get("threshold").is_none());

    upstream
        .call_ok(
            "generate_text",
            json!({"video_id": "vid1", "prompt": "What happens?", "temperature": null}),
        )
        .await;
    assert_eq!(upstream.last_request().json_body()["temperature"], 0.2);

    upstream
        .call_ok(
            "import_videos",
            json!({"integration_id": "int1", "index_id": "idx1", "incremental_import": null}),
        )
        .await;
    assert_eq!(upstream.last_request().json_body()["incremental_import"], true);
}

#[tokio::test]
async fn null_fields_in_upstream_replies_are_tolerated() {
    let router = Router::new()
        .route(
            "/v1.3/tasks/{task_id}",
            get(|Path(task_id): Path<String>| async move {
                Json(json!({
                    "_id": task_id,
                    "status": "ready",
                    "video_id": null,
                    "system_metadata": null
                }))
            })
            .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/v1.3/indexes/{index_id}",
            get(|| async {
                Json(json!({"_id": "idx1", "models": null, "video_count": null, "total_duration": null}))
            }),
        );
    let upstream = Upstream::start(router).await;

    let task = upstream.call_ok("get_task", json!({"task_id": "t1"})).await;
    assert_eq!(task["metadata"], json!({}));

    let deleted = upstream.call_ok("delete_task", json!({"task_id": "t1"})).await;
    assert_eq!(deleted["deleted"], true);

    let index = upstream.call_ok("get_index", json!({"index_id": "idx1"})).await;
    assert_eq!(index["video_count"], 0);
    assert_eq!(index["models"], json!([]));
}

#[tokio::test]
async fn search_next_page_follows_the_token() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call_ok("search_next_page", json!({"page_token": "tok-2"}))
        .await;
    assert_eq!(result["results"][0]["video_id"], "vid3");

    let request = upstream.last_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/v1.3/search/tok-2");
}

#[tokio::test]
async fn generation_tools_shape_their_results() {
    let upstream = Upstream::start(upstream()).await;

    let text = upstream
        .call_ok("generate_text", json!({"video_id": "vid1", "prompt": "What happens?"}))
        .await;
    assert_eq!(text, json!({"id": "gen1", "text": "A goal is scored."}));
    let body = upstream.last_request().json_body();
    assert_eq!(body["temperature"], 0.2);
    assert_eq!(body["stream"], false);

    let gist = upstream
        .call_ok("generate_gist", json!({"video_id": "vid1", "types": ["title", "hashtag"]}))
        .await;
    assert_eq!(gist["title"], "Late winner");
    assert_eq!(gist["topics"], json!([]));
    assert_eq!(gist["hashtags"], json!(["football"]));

    let summary = upstream
        .call_ok(
            "summarize_video",
            json!({"video_id": "vid1", "type": "highlight", "temperature": 0.7}),
        )
        .await;
    assert_eq!(summary["type"], "highlight");
    assert!(summary["summary"].is_null());
    assert_eq!(summary["chapters"], json!([]));
    assert_eq!(summary["highlights"][0]["highlight"], "Goal");
    assert_eq!(summary["highlights"][0]["highlight_summary"], "");
    let body = upstream.last_request().json_body();
    assert_eq!(body["type"], "highlight");
    assert_eq!(body["temperature"], 0.7);
}

#[tokio::test]
async fn list_tasks_passes_filters_through() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call_ok(
            "list_tasks",
            json!({"index_id": "idx1", "status": "ready", "page": 2}),
        )
        .await;
    assert_eq!(result["tasks"][0]["id"], "task-ready");
    assert_eq!(result["tasks"][0]["metadata"], json!({}));
    assert_eq!(result["page_info"]["page"], 2);

    let query = upstream.last_request().query.unwrap();
    assert!(query.contains("index_id=idx1"));
    assert!(query.contains("status=ready"));
    assert!(query.contains("page=2"));
}

#[tokio::test]
async fn get_task_reports_status_and_metadata() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call_ok("get_task", json!({"task_id": "task-indexing"}))
        .await;
    assert_eq!(result["status"], "indexing");
    assert_eq!(result["metadata"]["filename"], "match.mp4");
}

#[tokio::test]
async fn deleting_an_indexing_task_never_sends_delete() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call("delete_task", json!({"task_id": "task-indexing"}))
        .await;

    assert!(result.is_error);
    assert!(result.joined_text().contains("indexing"));
    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert!(requests.iter().all(|r| r.method != "DELETE"));
}

#[tokio::test]
async fn deleting_a_ready_task_sends_one_delete() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call_ok("delete_task", json!({"task_id": "task-ready"}))
        .await;
    assert_eq!(result, json!({"id": "task-ready", "deleted": true}));

    let deletes: Vec<_> = upstream
        .requests()
        .into_iter()
        .filter(|r| r.method == "DELETE")
        .collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, "/v1.3/tasks/task-ready");
}

#[tokio::test]
async fn deleting_a_failed_task_is_allowed() {
    let upstream = Upstream::start(upstream()).await;
    let result = upstream
        .call("delete_task", json!({"task_id": "task-failed"}))
        .await;
    assert!(!result.is_error, "{}", result.joined_text());
}

#[tokio::test]
async fn import_tools_default_and_shape_fields() {
    let upstream = Upstream::start(upstream()).await;

    let imported = upstream
        .call_ok("import_videos", json!({"integration_id": "int1", "index_id": "idx1"}))
        .await;
    assert_eq!(imported["videos"][0]["video_id"], "vid9");
    assert_eq!(imported["failed_files"][0]["error_message"], "unsupported codec");
    let request = upstream.last_request();
    assert_eq!(request.path, "/v1.3/tasks/transfers/import/int1");
    assert_eq!(
        request.json_body(),
        json!({"index_id": "idx1", "incremental_import": true})
    );

    let status = upstream
        .call_ok("get_import_status", json!({"integration_id": "int1", "index_id": "idx1"}))
        .await;
    assert_eq!(status["ready"][0]["filename"], "a.mp4");
    assert_eq!(status["failed"], json!([]));
    assert_eq!(upstream.last_request().query.as_deref(), Some("index_id=idx1"));

    let logs = upstream
        .call_ok("get_import_logs", json!({"integration_id": "int1"}))
        .await;
    assert_eq!(logs["logs"][0]["video_status"]["ready"], 1);
    assert_eq!(logs["logs"][0]["video_status"]["indexing"], 0);
    assert_eq!(logs["logs"][0]["failed_files"], json!([]));
}

#[tokio::test]
async fn upstream_error_status_and_body_are_surfaced() {
    let router = Router::new().fallback(|| async {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message":"boom"}"#,
        )
            .into_response()
    });
    let upstream = Upstream::start(router).await;

    let result = upstream.call("get_index", json!({"index_id": "idx1"})).await;
    assert!(result.is_error);
    let text = result.joined_text();
    assert!(text.contains("500"), "{}", text);
    assert!(text.contains("boom"), "{}", text);
    assert_eq!(upstream.requests().len(), 1);
}

#[tokio::test]
async fn non_json_success_body_is_an_error_result() {
    let router = Router::new().fallback(|| async { "<html>maintenance</html>" });
    let upstream = Upstream::start(router).await;

    let result = upstream
        .call("generate_text", json!({"video_id": "vid1", "prompt": "hi"}))
        .await;
    assert!(result.is_error);
    assert!(result.joined_text().contains("Malformed upstream response"));
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_upstream() {
    let upstream = Upstream::start(upstream()).await;

    let result = upstream
        .call("search_videos", json!({"index_id": "idx1", "query": "x", "operator": "xor"}))
        .await;
    assert!(result.is_error);

    let result = upstream.call("update_index", json!({"index_id": "idx1"})).await;
    assert!(result.is_error);
    assert!(result.joined_text().contains("index_name"));

    assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn server_routes_tool_calls_to_the_upstream() {
    let upstream = Upstream::start(upstream()).await;
    let log = upstream.log.clone();
    let server = McpServer::new(upstream.dispatcher);

    let response = server
        .handle_line(
            r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"get_task","arguments":{"task_id":"task-queued"}}}"#,
        )
        .await
        .unwrap();
    let value = serde_json::to_value(response).unwrap();
    assert_eq!(value["id"], 9);
    assert_eq!(value["result"]["isError"], false);
    let payload: Value =
        serde_json::from_str(value["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(payload["status"], "queued");
    assert_eq!(log.lock().unwrap().len(), 1);
}
