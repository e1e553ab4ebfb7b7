//! Task list view state, independent of any UI toolkit.
//!
//! # Design
//! `ViewState` is a plain value mutated by three kinds of event: user input
//! (`set_draft`), the settling of a load, and the settling of a submit. Each
//! request is started with a `begin_*` call that hands out a ticket, and the
//! matching `finish_*` call consumes it. Load tickets carry a generation
//! number: only the most recently started load may write its outcome, so a
//! slow response can never overwrite a newer one.
//!
//! Nothing here performs I/O; `crate::session` drives the requests.

use crate::types::Task;

pub const LOADING_MESSAGE: &str = "Loading…";
pub const EMPTY_LIST_MESSAGE: &str = "No tasks yet. Add your first one above.";
pub const SUBMIT_LABEL: &str = "Add";
pub const SUBMITTING_LABEL: &str = "Adding…";

/// Proof that a load was started. Only the latest ticket is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket(u64);

/// Proof that a submit was accepted, carrying the trimmed title to send.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct SubmitTicket {
    title: String,
}

impl SubmitTicket {
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// What happened to a load outcome handed to `finish_load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load had started; the outcome was dropped.
    Superseded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    tasks: Option<Vec<Task>>,
    error: Option<String>,
    draft_title: String,
    submitting: bool,
    generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first successful load.
    pub fn tasks(&self) -> Option<&[Task]> {
        self.tasks.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Never loaded and no error to show.
    pub fn pending(&self) -> bool {
        self.tasks.is_none() && self.error.is_none()
    }

    pub fn can_submit(&self) -> bool {
        !self.draft_title.trim().is_empty() && !self.submitting
    }

    pub fn set_draft(&mut self, title: impl Into<String>) {
        self.draft_title = title.into();
    }

    /// Start a load. Clears the error and supersedes any load still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.error = None;
        LoadTicket(self.generation)
    }

    /// Discard the outcome of whatever load is in flight without starting a
    /// new one.
    pub fn abandon_load(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Apply a load outcome. A failure keeps the previous task list.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<Vec<Task>, String>,
    ) -> LoadOutcome {
        if ticket.0 != self.generation {
            return LoadOutcome::Superseded;
        }
        match outcome {
            Ok(tasks) => {
                self.tasks = Some(tasks);
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
        LoadOutcome::Applied
    }

    /// Accept a submit if `can_submit` holds; otherwise nothing changes.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(SubmitTicket {
            title: self.draft_title.trim().to_string(),
        })
    }

    /// Apply a create outcome. `submitting` is cleared either way.
    pub fn finish_submit(&mut self, _ticket: SubmitTicket, outcome: Result<Task, String>) {
        match outcome {
            Ok(task) => {
                self.tasks.get_or_insert_with(Vec::new).push(task);
                self.draft_title.clear();
            }
            Err(message) => self.error = Some(message),
        }
        self.submitting = false;
    }

    pub fn render(&self) -> Rendering<'_> {
        let pending = self.pending();
        let list = if !pending && self.error.is_none() {
            self.tasks.as_deref()
        } else {
            None
        };
        Rendering {
            error: self.error.as_deref(),
            pending,
            list,
            submit_enabled: self.can_submit(),
            submit_label: if self.submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
        }
    }
}

/// Everything a UI needs to draw the view, derived from `ViewState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendering<'a> {
    /// Shown as a single line when present.
    pub error: Option<&'a str>,
    /// Show `LOADING_MESSAGE`.
    pub pending: bool,
    /// The list to draw, only when neither pending nor failed.
    pub list: Option<&'a [Task]>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

impl Rendering<'_> {
    /// The list is visible and has nothing in it.
    pub fn shows_empty_list(&self) -> bool {
        matches!(self.list, Some(tasks) if tasks.is_empty())
    }
}
