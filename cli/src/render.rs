//! Plain-text drawing of a `Rendering`.

use std::fmt::Write;

use task_core::view::{EMPTY_LIST_MESSAGE, LOADING_MESSAGE};
use task_core::Rendering;

pub fn render_text(rendering: &Rendering<'_>) -> String {
    let mut out = String::new();
    if let Some(error) = rendering.error {
        let _ = writeln!(out, "⚠️ {error}");
    }
    if rendering.pending {
        let _ = writeln!(out, "{LOADING_MESSAGE}");
    }
    if let Some(tasks) = rendering.list {
        for task in tasks {
            let mark = if task.done { 'x' } else { ' ' };
            let _ = writeln!(out, "[{mark}] {}", task.title);
        }
        if tasks.is_empty() {
            let _ = writeln!(out, "{EMPTY_LIST_MESSAGE}");
        }
    }
    out
}
