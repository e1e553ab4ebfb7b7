//! The capability interface a task view drives.
//!
//! UI layers and tests depend on `TaskApi` only. `HttpTaskApi` is the
//! network-backed implementation; tests substitute in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::Task;

#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch every task.
    ///
    /// Cancellation is cooperative: dropping the returned future abandons
    /// the request, and whatever it would have produced is discarded.
    async fn list(&self) -> Result<Vec<Task>, ApiError>;

    /// Create a task. `title` is expected to be trimmed and non-empty.
    async fn create(&self, title: &str) -> Result<Task, ApiError>;
}

#[async_trait]
impl<T: TaskApi + ?Sized> TaskApi for Arc<T> {
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        (**self).list().await
    }

    async fn create(&self, title: &str) -> Result<Task, ApiError> {
        (**self).create(title).await
    }
}
