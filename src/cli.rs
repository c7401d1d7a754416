//! Command-line surface of `todo`

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::app::models::{NewTask, DEFAULT_PRIORITY};
use crate::error::Result;

const DUE_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Update your ToDo list.")]
pub struct Cli {
    /// A task string to add to your list
    #[arg(long, value_name = "TEXT")]
    pub add: Option<String>,

    /// Due date in MM/DD/YYYY format
    #[arg(long, value_name = "MM/DD/YYYY", value_parser = parse_due_date)]
    pub due: Option<NaiveDate>,

    /// Priority of task (1=low, 2=medium, 3=high)
    #[arg(long, default_value_t = DEFAULT_PRIORITY, allow_negative_numbers = true)]
    pub priority: i32,

    /// Query incomplete tasks by keyword
    #[arg(long, num_args = 1.., value_name = "TERM")]
    pub query: Option<Vec<String>>,

    /// List all tasks that have not been completed
    #[arg(long)]
    pub list: bool,

    /// Mark a task as completed
    #[arg(long, value_name = "ID")]
    pub done: Option<i64>,

    /// Delete a task
    #[arg(long, value_name = "ID")]
    pub delete: Option<i64>,

    /// A report of all tasks
    #[arg(long)]
    pub report: bool,

    /// Task file to use instead of ~/.todo.db
    #[arg(long, env = "TODO_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug)]
pub enum Action {
    Add(NewTask),
    Query(Vec<String>),
    List,
    Done(i64),
    Delete(i64),
    Report,
}

impl Action {
    // Input checks that must pass before the task file is touched
    pub fn validate(&self) -> Result<()> {
        match self {
            Action::Add(draft) => draft.validate(),
            _ => Ok(()),
        }
    }
}

impl Cli {
    /// The single action to run. When several are given the first one in
    /// add, query, list, done, delete, report order wins.
    pub fn action(&self) -> Option<Action> {
        if let Some(name) = &self.add {
            let mut draft = NewTask::named(name.as_str()).with_priority(self.priority);
            draft.due_date = self.due;
            return Some(Action::Add(draft));
        }
        if let Some(terms) = self.query.as_ref().filter(|terms| !terms.is_empty()) {
            return Some(Action::Query(terms.clone()));
        }
        if self.list {
            return Some(Action::List);
        }
        if let Some(id) = self.done {
            return Some(Action::Done(id));
        }
        if let Some(id) = self.delete {
            return Some(Action::Delete(id));
        }
        if self.report {
            return Some(Action::Report);
        }
        None
    }
}

pub fn parse_due_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DUE_DATE_FORMAT)
        .map_err(|e| format!("'{value}' is not a MM/DD/YYYY date ({e})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("todo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_with_due_and_priority() {
        let cli = parse(&["--add", "Buy milk", "--priority", "2", "--due", "05/01/2025"]);
        match cli.action() {
            Some(Action::Add(draft)) => {
                assert_eq!(draft.name, "Buy milk");
                assert_eq!(draft.priority, 2);
                assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 5, 1));
            }
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn test_priority_defaults_to_one() {
        let cli = parse(&["--add", "Call bank"]);
        assert_eq!(cli.priority, 1);
        assert!(cli.due.is_none());
    }

    #[test]
    fn test_add_takes_precedence() {
        let cli = parse(&["--report", "--list", "--done", "3", "--add", "x"]);
        assert!(matches!(cli.action(), Some(Action::Add(_))));
    }

    #[test]
    fn test_precedence_after_add() {
        let cli = parse(&["--report", "--delete", "4", "--query", "milk", "bread", "--list"]);
        match cli.action() {
            Some(Action::Query(terms)) => assert_eq!(terms, vec!["milk", "bread"]),
            other => panic!("expected query, got {other:?}"),
        }

        assert!(matches!(
            parse(&["--report", "--delete", "4", "--list"]).action(),
            Some(Action::List)
        ));
        assert!(matches!(
            parse(&["--report", "--delete", "4", "--done", "2"]).action(),
            Some(Action::Done(2))
        ));
        assert!(matches!(
            parse(&["--report", "--delete", "4"]).action(),
            Some(Action::Delete(4))
        ));
        assert!(matches!(parse(&["--report"]).action(), Some(Action::Report)));
        assert!(parse(&[]).action().is_none());
    }

    #[test]
    fn test_malformed_due_date_is_rejected() {
        assert!(Cli::try_parse_from(["todo", "--add", "x", "--due", "2025-05-01"]).is_err());
        assert!(Cli::try_parse_from(["todo", "--add", "x", "--due", "13/01/2025"]).is_err());
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        assert!(Cli::try_parse_from(["todo", "--done", "first"]).is_err());
        assert!(Cli::try_parse_from(["todo", "--delete", "1.5"]).is_err());
    }

    #[test]
    fn test_out_of_range_priority_fails_validation() {
        let action = parse(&["--add", "x", "--priority", "-1"]).action().unwrap();
        assert!(action.validate().is_err());

        let action = parse(&["--add", "", "--priority", "2"]).action().unwrap();
        assert!(action.validate().is_err());
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(
            parse_due_date("12/31/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
        );
        assert!(parse_due_date("31/12/2024").is_err());
        assert!(parse_due_date("").is_err());
    }
}
