//! Async driver tying a `ViewState` to a `TaskApi`.
//!
//! # Design
//! `TaskListView` owns the state behind a `tokio::sync::watch` channel so any
//! UI layer can subscribe and redraw on change. Requests run as spawned Tokio
//! tasks that write their outcome back through the channel when they settle.
//!
//! A load is cancellable: `reload` and `Drop` abort the in-flight load task,
//! and the generation check in `ViewState::finish_load` discards any outcome
//! that still races through. A create is never cancelled; its outcome is
//! always applied, even after the view is gone.
//!
//! Spawning requires a Tokio runtime; a current-thread runtime is enough.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::TaskApi;
use crate::view::{LoadOutcome, ViewState};

pub struct TaskListView {
    api: Arc<dyn TaskApi>,
    state: Arc<watch::Sender<ViewState>>,
    load: Option<JoinHandle<()>>,
}

impl TaskListView {
    /// A view that has not started loading yet.
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        let (state, _) = watch::channel(ViewState::new());
        Self {
            api,
            state: Arc::new(state),
            load: None,
        }
    }

    /// Create the view and start the initial load.
    pub fn mount(api: Arc<dyn TaskApi>) -> Self {
        let mut view = Self::new(api);
        view.reload();
        view
    }

    /// Start a load, superseding any load still in flight.
    pub fn reload(&mut self) {
        if let Some(previous) = self.load.take() {
            previous.abort();
        }

        let mut ticket = None;
        self.state.send_modify(|s| ticket = Some(s.begin_load()));
        let Some(ticket) = ticket else { return };
        debug!(?ticket, "load started");

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        self.load = Some(tokio::spawn(async move {
            let outcome = api.list().await.map_err(|e| e.to_string());
            state.send_if_modified(|s| match s.finish_load(ticket, outcome) {
                LoadOutcome::Applied => true,
                LoadOutcome::Superseded => {
                    debug!(?ticket, "stale load discarded");
                    false
                }
            });
        }));
    }

    /// Wait for the current load, if any, to settle or be aborted.
    pub async fn load_settled(&mut self) {
        if let Some(handle) = self.load.as_mut() {
            // An aborted load is as settled as a finished one.
            let _ = handle.await;
            self.load = None;
        }
    }

    pub fn set_draft(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|s| s.set_draft(title));
    }

    /// Submit the draft. Returns `None` without touching the network when
    /// `can_submit` does not hold; otherwise a handle that resolves once the
    /// create has settled.
    pub fn submit(&self) -> Option<JoinHandle<()>> {
        let mut ticket = None;
        self.state.send_if_modified(|s| {
            ticket = s.begin_submit();
            ticket.is_some()
        });
        let ticket = ticket?;
        debug!(title = ticket.title(), "submit started");

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        Some(tokio::spawn(async move {
            let outcome = api.create(ticket.title()).await.map_err(|e| e.to_string());
            debug!(ok = outcome.is_ok(), "submit settled");
            state.send_modify(|s| s.finish_submit(ticket, outcome));
        }))
    }

    /// Current state.
    pub fn state(&self) -> watch::Ref<'_, ViewState> {
        self.state.borrow()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }
}

impl Drop for TaskListView {
    fn drop(&mut self) {
        if let Some(load) = self.load.take() {
            load.abort();
        }
        self.state.send_if_modified(|s| {
            s.abandon_load();
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::{oneshot, Mutex};

    use super::*;
    use crate::error::ApiError;
    use crate::types::{Task, TaskId};

    type Reply<T> = oneshot::Receiver<Result<T, ApiError>>;

    /// Each call waits on the next queued reply so tests decide when and
    /// in which order requests settle.
    #[derive(Default)]
    struct ScriptedApi {
        lists: Mutex<VecDeque<Reply<Vec<Task>>>>,
        creates: Mutex<VecDeque<Reply<Task>>>,
        list_calls: AtomicUsize,
        create_calls: AtomicUsize,
    }

    impl ScriptedApi {
        async fn queue_list(&self) -> oneshot::Sender<Result<Vec<Task>, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.lists.lock().await.push_back(rx);
            tx
        }

        async fn queue_create(&self) -> oneshot::Sender<Result<Task, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.creates.lock().await.push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl TaskApi for ScriptedApi {
        async fn list(&self) -> Result<Vec<Task>, ApiError> {
            let rx = self.lists.lock().await.pop_front().expect("unexpected list call");
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            rx.await.expect("reply dropped")
        }

        async fn create(&self, _title: &str) -> Result<Task, ApiError> {
            let rx = self.creates.lock().await.pop_front().expect("unexpected create call");
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            rx.await.expect("reply dropped")
        }
    }

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: TaskId::from(id),
            title: title.to_string(),
            done: false,
        }
    }

    fn failed(message: &str) -> ApiError {
        ApiError::RequestFailed {
            status: 500,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn mount_loads_tasks() {
        let api = Arc::new(ScriptedApi::default());
        let reply = api.queue_list().await;
        let mut view = TaskListView::mount(api.clone());
        assert!(view.state().pending());

        reply.send(Ok(vec![task("1", "a")])).unwrap();
        view.load_settled().await;
        assert_eq!(view.state().tasks().map(<[Task]>::len), Some(1));
        assert!(!view.state().pending());
    }

    #[tokio::test]
    async fn load_failure_surfaces_message() {
        let api = Arc::new(ScriptedApi::default());
        let reply = api.queue_list().await;
        let mut view = TaskListView::mount(api.clone());
        reply.send(Err(failed("db down"))).unwrap();
        view.load_settled().await;
        assert_eq!(view.state().error(), Some("db down"));
        assert_eq!(view.state().tasks(), None);
    }

    #[tokio::test]
    async fn newer_load_wins_over_slower_older_one() {
        let api = Arc::new(ScriptedApi::default());
        let first = api.queue_list().await;
        let second = api.queue_list().await;

        let mut view = TaskListView::mount(api.clone());
        while api.list_calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }
        view.reload();
        second.send(Ok(vec![task("2", "fresh")])).unwrap();
        view.load_settled().await;

        // The first load was aborted; a late reply must change nothing.
        let _ = first.send(Err(failed("stale")));
        tokio::task::yield_now().await;

        let state = view.snapshot();
        assert_eq!(state.error(), None);
        assert_eq!(state.tasks().unwrap()[0].title, "fresh");
    }

    #[tokio::test]
    async fn dropping_view_abandons_load() {
        let api = Arc::new(ScriptedApi::default());
        let reply = api.queue_list().await;
        let view = TaskListView::mount(api.clone());
        let rx = view.subscribe();
        while api.list_calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }

        drop(view);
        let _ = reply.send(Ok(vec![task("1", "late")]));
        tokio::task::yield_now().await;
        assert!(rx.borrow().pending());
    }

    #[tokio::test]
    async fn submit_appends_created_task() {
        let api = Arc::new(ScriptedApi::default());
        let list = api.queue_list().await;
        let create = api.queue_create().await;
        let mut view = TaskListView::mount(api.clone());
        list.send(Ok(vec![task("1", "a")])).unwrap();
        view.load_settled().await;

        view.set_draft("Buy milk");
        let handle = view.submit().unwrap();
        assert!(view.state().is_submitting());
        assert!(view.submit().is_none());

        create.send(Ok(task("42", "Buy milk"))).unwrap();
        handle.await.unwrap();

        let state = view.snapshot();
        assert_eq!(state.tasks().map(<[Task]>::len), Some(2));
        assert_eq!(state.tasks().unwrap()[1].id, TaskId::from("42"));
        assert_eq!(state.draft_title(), "");
        assert!(!state.is_submitting());
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_submit_keeps_draft_and_reenables() {
        let api = Arc::new(ScriptedApi::default());
        let list = api.queue_list().await;
        let create = api.queue_create().await;
        let mut view = TaskListView::mount(api.clone());
        list.send(Ok(Vec::new())).unwrap();
        view.load_settled().await;

        view.set_draft("Buy milk");
        let handle = view.submit().unwrap();
        create.send(Err(failed("title is required"))).unwrap();
        handle.await.unwrap();

        let state = view.snapshot();
        assert_eq!(state.tasks().map(<[Task]>::len), Some(0));
        assert_eq!(state.draft_title(), "Buy milk");
        assert_eq!(state.error(), Some("title is required"));
        assert!(!state.is_submitting());
    }

    #[tokio::test]
    async fn whitespace_draft_issues_no_request() {
        let api = Arc::new(ScriptedApi::default());
        let list = api.queue_list().await;
        let mut view = TaskListView::mount(api.clone());
        list.send(Ok(Vec::new())).unwrap();
        view.load_settled().await;

        view.set_draft("   ");
        let before = view.snapshot();
        assert!(view.submit().is_none());
        assert_eq!(view.snapshot(), before);
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_outlives_dropped_view() {
        let api = Arc::new(ScriptedApi::default());
        let create = api.queue_create().await;
        let view = TaskListView::new(api.clone());
        let mut rx = view.subscribe();

        view.set_draft("x");
        let handle = view.submit().unwrap();
        drop(view);

        create.send(Ok(task("1", "x"))).unwrap();
        handle.await.unwrap();
        assert_eq!(rx.borrow_and_update().tasks().map(<[Task]>::len), Some(1));
    }

    #[tokio::test]
    async fn subscribers_see_load_result() {
        let api = Arc::new(ScriptedApi::default());
        let list = api.queue_list().await;
        let view = TaskListView::mount(api.clone());
        let mut rx = view.subscribe();

        list.send(Ok(vec![task("1", "a")])).unwrap();
        let state = rx.wait_for(|s| !s.pending()).await.unwrap().clone();
        assert_eq!(state.tasks().map(<[Task]>::len), Some(1));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }
}
