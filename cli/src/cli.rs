use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tasks", about = "Terminal front end for the tasks API")]
pub struct Args {
    /// API base URL; defaults to $TASKS_API_URL, then http://localhost:8081.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Load and print the task list.
    List,
    /// Add a task, then print the updated list.
    Add {
        /// Title of the new task; surrounding whitespace is dropped.
        title: String,
    },
}
