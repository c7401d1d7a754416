// Text rendering of task tables and statistics
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};
use crossterm::style::{Color, Stylize};

use crate::app::models::Task;

const DATE_FORMAT: &str = "%m/%d/%Y";
const TIMESTAMP_FORMAT: &str = "%c";

const COL_ID: usize = 5;
const COL_AGE: usize = 5;
const COL_DUE: usize = 12;
const COL_PRIORITY: usize = 11;
const COL_NAME: usize = 30;
const COL_CREATED: usize = 30;

// Moment of rendering and how to paint it
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
    pub color: bool,
}

impl RenderContext {
    pub fn current(color: bool) -> RenderContext {
        RenderContext {
            now: Utc::now(),
            today: local_today(),
            color,
        }
    }
}

fn priority_color(priority: i32) -> Option<Color> {
    match priority {
        2 => Some(Color::Yellow),
        3 => Some(Color::Red),
        _ => None,
    }
}

fn paint_name(task: &Task, text: String, ctx: &RenderContext) -> String {
    match priority_color(task.priority) {
        Some(color) if ctx.color => text.with(color).to_string(),
        _ => text,
    }
}

fn due_cell(task: &Task, ctx: &RenderContext) -> String {
    match task.due_date {
        Some(due) if task.is_overdue(ctx.today) => format!("{}!", due.format(DATE_FORMAT)),
        Some(due) => due.format(DATE_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

fn local_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

// Table of incomplete tasks, as printed by --list
pub fn list_lines(tasks: &[&Task], ctx: &RenderContext) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{:<COL_ID$}{:<COL_AGE$}{:<COL_DUE$}{:<COL_PRIORITY$}{}",
            "ID", "Age", "Due Date", "Priority", "Task"
        ),
        format!(
            "{:<COL_ID$}{:<COL_AGE$}{:<COL_DUE$}{:<COL_PRIORITY$}{}",
            "--", "---", "--------", "--------", "----"
        ),
    ];

    for task in tasks {
        lines.push(format!(
            "{:<COL_ID$}{:<COL_AGE$}{:<COL_DUE$}{:<COL_PRIORITY$}{}",
            task.id,
            task.age_days(ctx.now),
            due_cell(task, ctx),
            task.priority,
            paint_name(task, task.name.clone(), ctx),
        ));
    }
    lines
}

// Full-detail table, as printed by --report and --query
pub fn detail_lines(tasks: &[&Task], ctx: &RenderContext) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{:<COL_ID$}{:<COL_AGE$}{:<COL_DUE$}{:<COL_PRIORITY$}{:<COL_NAME$}{:<COL_CREATED$}{}",
            "ID", "Age", "Due Date", "Priority", "Task", "Created", "Completed"
        ),
        format!(
            "{:<COL_ID$}{:<COL_AGE$}{:<COL_DUE$}{:<COL_PRIORITY$}{:<COL_NAME$}{:<COL_CREATED$}{}",
            "--", "---", "--------", "--------", "----", "-------", "---------"
        ),
    ];

    for task in tasks {
        // Pad before painting so escape codes don't eat into the column
        let name = paint_name(task, format!("{:<COL_NAME$}", task.name), ctx);
        lines.push(format!(
            "{:<COL_ID$}{:<COL_AGE$}{:<COL_DUE$}{:<COL_PRIORITY$}{}{:<COL_CREATED$}{}",
            task.id,
            task.age_days(ctx.now),
            due_cell(task, ctx),
            task.priority,
            name,
            local_timestamp(task.created),
            task.completed.map(local_timestamp).unwrap_or_else(|| "-".to_string()),
        ));
    }
    lines
}

#[derive(Debug, Default, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub incomplete: usize,
    pub due_next_week: usize,
    pub late: usize,
}

impl Statistics {
    pub fn collect(tasks: &[Task], ctx: &RenderContext) -> Statistics {
        let start_of_today = ctx.today.and_time(NaiveTime::MIN);
        let next_week = start_of_today + Duration::weeks(1);

        let mut stats = Statistics {
            total: tasks.len(),
            ..Statistics::default()
        };
        for task in tasks.iter().filter(|t| !t.is_complete()) {
            stats.incomplete += 1;
            if let Some(due) = task.due_date.map(|d| d.and_time(NaiveTime::MIN)) {
                if due < start_of_today {
                    stats.late += 1;
                } else if due < next_week {
                    stats.due_next_week += 1;
                }
            }
        }
        stats
    }
}

pub fn statistics_lines(stats: &Statistics) -> Vec<String> {
    vec![
        format!("Total tasks: {}", stats.total),
        format!("Incomplete tasks: {}", stats.incomplete),
        format!("Due next week: {}", stats.due_next_week),
        format!("Late: {}", stats.late),
    ]
}

// Local calendar day, used as the overdue cut-off
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
