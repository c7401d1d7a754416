//! todo - personal task tracker for the command line

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::debug;

use task_tracker::app::commands;
use task_tracker::app::task_store::TaskStore;
use task_tracker::app::ui::RenderContext;
use task_tracker::cli::Cli;
use task_tracker::config::Config;

fn main() -> Result<()> {
    if std::env::var("TODO_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("task_tracker=debug,todo=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    // Nothing to do without an action flag
    let Some(action) = cli.action() else {
        Cli::command().print_help()?;
        return Ok(());
    };
    action.validate()?;

    let config = Config::from_cli(&cli)?;
    let mut store = TaskStore::open(&config.storage_path)
        .with_context(|| format!("Failed to open task file {}", config.storage_path.display()))?;
    debug!(
        path = %store.path().display(),
        max_id = store.max_id(),
        ?action,
        "running action"
    );

    let ctx = RenderContext::current(config.color);
    let mut stdout = std::io::stdout().lock();
    commands::run(action, &mut store, &ctx, &mut stdout)
}
