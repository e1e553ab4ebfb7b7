//! Executes `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the I/O half of the host-does-IO split: it turns an
//! `HttpRequest` into an `HttpResponse` and nothing more. Status codes are
//! returned as data, never as errors, so `TaskClient` alone decides what a
//! non-2xx response means. `HttpTaskApi` pairs the two into a `TaskApi`.
//!
//! `UreqTransport` runs ureq's blocking calls on Tokio's blocking pool. If the
//! awaiting future is dropped the worker finishes on its own and its response
//! is thrown away.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::TaskApi;
use crate::client::TaskClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Task;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking ureq agent driven from async code.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| ApiError::TransportFailed { cause: e.to_string() })?
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;
    debug!(%method, %url, "sending request");

    let result = match (method, body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&url), &headers).call(),
        (HttpMethod::Post, Some(body)) => {
            with_headers(agent.post(&url), &headers).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => with_headers(agent.post(&url), &headers).send_empty(),
    };

    let mut response = result.map_err(|e| {
        warn!(%method, %url, error = %e, "transport failure");
        ApiError::TransportFailed { cause: e.to_string() }
    })?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::TransportFailed { cause: e.to_string() })?;
    debug!(%method, %url, status, "response received");

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

/// `TaskApi` backed by a `TaskClient` and a `Transport`.
#[derive(Debug, Clone)]
pub struct HttpTaskApi<T = UreqTransport> {
    client: TaskClient,
    transport: T,
}

impl HttpTaskApi<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(TaskClient::new(&config.base_url), UreqTransport::new())
    }
}

impl<T: Transport> HttpTaskApi<T> {
    pub fn new(client: TaskClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TaskClient {
        &self.client
    }
}

#[async_trait]
impl<T: Transport> TaskApi for HttpTaskApi<T> {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let request = self.client.build_list_tasks();
        let response = self.transport.execute(request).await?;
        self.client.parse_list_tasks(response)
    }

    async fn create(&self, title: &str) -> Result<Task, ApiError> {
        let request = self.client.build_create_task(title)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_task(response)
    }
}
