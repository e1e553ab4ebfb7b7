//! Framework-agnostic core of a task list frontend.
//!
//! # Overview
//! A sans-IO `TaskClient` builds and parses plain-data HTTP values for the
//! tasks API (`GET /api/tasks`, `POST /api/tasks`). `HttpTaskApi` pairs it
//! with a `Transport` to expose the `TaskApi` capability. `ViewState` is the
//! pure view state machine, and `TaskListView` drives it against any
//! `TaskApi` on a Tokio runtime.
//!
//! # Design
//! - `TaskClient` is stateless; it holds only `base_url`.
//! - Every error reaching a view is reduced to one display string.
//! - A newer load always supersedes an older one; creates are never cancelled.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;
pub mod view;

pub use api::TaskApi;
pub use client::{error_message, TaskClient, TASKS_PATH};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::TaskListView;
pub use transport::{HttpTaskApi, Transport, UreqTransport};
pub use types::{CreateTask, Task, TaskId};
pub use view::{LoadOutcome, LoadTicket, Rendering, SubmitTicket, ViewState};
