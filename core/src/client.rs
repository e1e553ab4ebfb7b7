//! Stateless HTTP request builder and response parser for the tasks API.
//!
//! # Design
//! `TaskClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Whoever executes the round-trip sits in between, so this module stays
//! deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTask, Task};

/// Path of the tasks collection, relative to the base URL.
pub const TASKS_PATH: &str = "/api/tasks";

/// Synchronous, stateless client for the tasks API.
#[derive(Debug, Clone)]
pub struct TaskClient {
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_tasks(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{TASKS_PATH}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    /// The title is sent as given; trimming is the caller's job.
    pub fn build_create_task(&self, title: &str) -> Result<HttpRequest, ApiError> {
        let input = CreateTask {
            title: title.to_string(),
        };
        let body = serde_json::to_string(&input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{TASKS_PATH}", self.base_url),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        check_status(&response, HttpMethod::Get)?;
        parse_body(&response)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response, HttpMethod::Post)?;
        parse_body(&response)
    }
}

/// Map a non-2xx response to `RequestFailed` with the user-facing message.
fn check_status(response: &HttpResponse, method: HttpMethod) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::RequestFailed {
        status: response.status,
        message: error_message(method, TASKS_PATH, response),
    })
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Message shown for a failed response, in order of preference:
/// the `error` string of a JSON body, the raw body text, then
/// `"<METHOD> <path> failed: <status>"`.
///
/// Blank candidates fall through to the next option.
pub fn error_message(method: HttpMethod, path: &str, response: &HttpResponse) -> String {
    let from_json = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| match body.get("error") {
            Some(Value::String(msg)) if !msg.trim().is_empty() => Some(msg.clone()),
            _ => None,
        });
    if let Some(msg) = from_json {
        return msg;
    }
    if !response.body.trim().is_empty() {
        return response.body.clone();
    }
    format!("{method} {path} failed: {}", response.status)
}
