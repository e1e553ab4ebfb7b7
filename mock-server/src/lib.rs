use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub done: bool,
}

#[derive(Deserialize)]
pub struct CreateTask {
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Unavailable(String),
}

/// Backing storage for the task routes.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, StoreError>;
    async fn create(&self, title: String) -> Result<Task, StoreError>;
}

/// In-memory store; ids ascend from 1 in creation order.
#[derive(Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn create(&self, title: String) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let id = tasks.last().map_or(1, |t| t.id + 1);
        let task = Task {
            id,
            title,
            done: false,
        };
        tasks.push(task.clone());
        Ok(task)
    }
}

pub type Db = Arc<dyn TaskStore>;

pub fn app() -> Router {
    app_with_store(Arc::new(MemoryStore::default()))
}

pub fn app_with_store(store: Db) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_store(listener: TcpListener, store: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };
    (status, Json(body)).into_response()
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn list_tasks(State(store): State<Db>) -> Response {
    match store.list().await {
        Ok(tasks) => Json(tasks).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn create_task(
    State(store): State<Db>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Response {
    let Ok(Json(input)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "invalid JSON body");
    };
    let title = input.title.trim();
    if title.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "title is required");
    }
    match store.create(title.to_string()).await {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
