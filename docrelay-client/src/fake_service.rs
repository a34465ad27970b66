//! In-process stand-in for the document service, used by the tests
//!
//! Serves the same routes as the real API on a random loopback port. Task
//! status reads replay a per-task script and keep returning the last entry
//! once the script is used up.

use axum::extract::{Multipart, OriginalUri, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use docrelay_core::{ClientConfig, Operation};
use serde_json::{Value as JsonValue, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::DocumentClient;

const CLIENT_ID: &str = "test-id";
const CLIENT_SECRET: &str = "test-secret";

#[derive(Default)]
struct TaskScript {
    pending: VecDeque<JsonValue>,
    last: Option<JsonValue>,
    reads: usize,
}

#[derive(Default)]
struct ServiceState {
    documents: HashMap<String, Vec<u8>>,
    uploads: Vec<String>,
    tasks: HashMap<String, TaskScript>,
    last_submission: Option<(String, JsonValue)>,
    last_download_filename: Option<String>,
}

type Shared = Arc<Mutex<ServiceState>>;

pub struct FakeService {
    base_url: String,
    state: Shared,
}

impl FakeService {
    /// Bind to a free port and serve in the background
    pub async fn start() -> Self {
        let state = Shared::default();

        let mut router = Router::new()
            .route("/api/echo", post(echo))
            .route("/api/not-json", post(not_json))
            .route("/api/broken", get(broken))
            .route("/api/documents/upload", post(upload))
            .route("/api/documents/{id}/download", get(download))
            .route("/api/documents/{id}", delete(remove))
            .route("/api/tasks/{id}", get(task_status));
        for operation in Operation::ALL {
            router = router.route(operation.path(), post(submit));
        }
        let app = router
            .layer(middleware::from_fn(require_credentials))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> DocumentClient {
        self.client_with(|config| config)
    }

    pub fn client_with(&self, adjust: impl FnOnce(ClientConfig) -> ClientConfig) -> DocumentClient {
        let config = adjust(ClientConfig::new(&self.base_url, CLIENT_ID, CLIENT_SECRET));
        DocumentClient::new(config).unwrap()
    }

    /// Queue the status records `task_id` will report, oldest first
    pub fn script_task(&self, task_id: &str, records: Vec<JsonValue>) {
        let mut state = self.state.lock().unwrap();
        state.tasks.insert(
            task_id.to_string(),
            TaskScript {
                pending: records.into(),
                ..Default::default()
            },
        );
    }

    pub fn status_reads(&self, task_id: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.tasks.get(task_id).map_or(0, |script| script.reads)
    }

    pub fn upload_count(&self) -> usize {
        self.state.lock().unwrap().uploads.len()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn last_submission(&self) -> Option<(String, JsonValue)> {
        self.state.lock().unwrap().last_submission.clone()
    }

    pub fn last_download_filename(&self) -> Option<String> {
        self.state.lock().unwrap().last_download_filename.clone()
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

async fn require_credentials(request: Request, next: Next) -> Response {
    let headers = request.headers();
    let matches = |name: &str, expected: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == expected)
    };

    if !matches("client_id", CLIENT_ID) || !matches("client_secret", CLIENT_SECRET) {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "invalid client credentials",
        );
    }

    next.run(request).await
}

async fn echo(Json(payload): Json<JsonValue>) -> Json<JsonValue> {
    Json(json!({
        "clientId": CLIENT_ID,
        "clientSecret": CLIENT_SECRET,
        "payload": payload,
    }))
}

async fn not_json() -> &'static str {
    "accepted, probably"
}

async fn broken() -> Response {
    (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>").into_response()
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let Ok(content) = field.bytes().await else {
            break;
        };

        let mut state = state.lock().unwrap();
        state.uploads.push(name);
        let id = format!("doc{}", state.uploads.len());
        state.documents.insert(id.clone(), content.to_vec());
        return Json(json!({ "documentId": id })).into_response();
    }

    error_response(StatusCode::BAD_REQUEST, "NO_FILE", "missing file part")
}

async fn download(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.last_download_filename = query.get("filename").cloned();

    match state.documents.get(&id) {
        Some(content) => content.clone().into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "DOCUMENT_NOT_FOUND",
            "document does not exist",
        ),
    }
}

async fn remove(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();

    match state.documents.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "DOCUMENT_NOT_FOUND",
            "document does not exist",
        ),
    }
}

async fn task_status(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    let Some(script) = state.tasks.get_mut(&id) else {
        return error_response(StatusCode::NOT_FOUND, "TASK_NOT_FOUND", "unknown task");
    };

    script.reads += 1;
    if let Some(next) = script.pending.pop_front() {
        script.last = Some(next);
    }

    let mut record = script.last.clone().unwrap_or_else(|| json!({ "status": "PENDING" }));
    record["taskId"] = JsonValue::String(id);
    Json(record).into_response()
}

async fn submit(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<JsonValue>,
) -> Response {
    if payload.get("reject") == Some(&JsonValue::Bool(true)) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_PAYLOAD",
            "payload rejected",
        );
    }

    let mut state = state.lock().unwrap();
    state.last_submission = Some((uri.path().to_string(), payload));
    Json(json!({ "taskId": "t1" })).into_response()
}
