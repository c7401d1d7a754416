// Runs one parsed action against the task store and writes what the user sees
use std::io::Write;

use anyhow::Result;

use crate::app::models::NewTask;
use crate::app::task_store::{Completion, TaskStore};
use crate::app::ui::{self, RenderContext, Statistics};
use crate::cli::Action;
use crate::error::TodoError;

pub fn run<W: Write>(
    action: Action,
    store: &mut TaskStore,
    ctx: &RenderContext,
    out: &mut W,
) -> Result<()> {
    let outcome = match action {
        Action::Add(draft) => add(store, draft, out),
        Action::Query(terms) => query(store, &terms, ctx, out),
        Action::List => list(store, ctx, out),
        Action::Done(id) => done(store, id, out),
        Action::Delete(id) => delete(store, id, out),
        Action::Report => report(store, ctx, out),
    };

    // A missing task is an answer, not a failure
    match outcome {
        Err(err) if matches!(err.downcast_ref::<TodoError>(), Some(TodoError::NotFound(_))) => {
            writeln!(out, "{err}")?;
            Ok(())
        }
        other => other,
    }
}

fn add<W: Write>(store: &mut TaskStore, draft: NewTask, out: &mut W) -> Result<()> {
    let task = store.add(draft)?;
    writeln!(
        out,
        "Created task {}: {} (priority {})",
        task.id, task.name, task.priority
    )?;
    Ok(())
}

fn list<W: Write>(store: &TaskStore, ctx: &RenderContext, out: &mut W) -> Result<()> {
    let tasks = store.list();
    if tasks.is_empty() {
        writeln!(out, "Nothing to do")?;
        return Ok(());
    }
    write_lines(out, ui::list_lines(&tasks, ctx))
}

fn query<W: Write>(
    store: &TaskStore,
    terms: &[String],
    ctx: &RenderContext,
    out: &mut W,
) -> Result<()> {
    let matches = store.query(terms);
    if matches.is_empty() {
        writeln!(out, "No matching tasks found")?;
        return Ok(());
    }
    write_lines(out, ui::detail_lines(&matches, ctx))
}

fn done<W: Write>(store: &mut TaskStore, id: i64, out: &mut W) -> Result<()> {
    match store.done(id)? {
        Completion::Completed(task) => writeln!(out, "Completed task {}: {}", task.id, task.name)?,
        Completion::AlreadyCompleted(task) => {
            writeln!(out, "Task {} is already completed", task.id)?
        }
    }
    Ok(())
}

fn delete<W: Write>(store: &mut TaskStore, id: i64, out: &mut W) -> Result<()> {
    let removed = store.delete(id)?;
    writeln!(out, "Deleted task {}: {}", removed.id, removed.name)?;
    Ok(())
}

fn report<W: Write>(store: &TaskStore, ctx: &RenderContext, out: &mut W) -> Result<()> {
    let tasks: Vec<_> = store.report().iter().collect();
    write_lines(out, ui::detail_lines(&tasks, ctx))?;
    writeln!(out)?;
    write_lines(
        out,
        ui::statistics_lines(&Statistics::collect(store.report(), ctx)),
    )
}

fn write_lines<W: Write>(out: &mut W, lines: Vec<String>) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
