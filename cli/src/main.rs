use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use task_core::{ClientConfig, HttpTaskApi, TaskApi, TaskListView};
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn real_main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let config = match args.base_url.as_deref() {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    };
    tracing::debug!(base_url = %config.base_url, "using tasks API");

    let api: Arc<dyn TaskApi> = Arc::new(HttpTaskApi::from_config(&config));
    let mut view = TaskListView::mount(api);
    view.load_settled().await;

    if let Command::Add { title } = args.command {
        view.set_draft(title);
        let Some(create) = view.submit() else {
            bail!("task title must not be blank");
        };
        create.await.context("create task did not complete")?;
    }

    let state = view.snapshot();
    print!("{}", render::render_text(&state.render()));
    Ok(if state.error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing() {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
