// Runtime settings derived from the command line and environment

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::{Result, TodoError};

pub const DEFAULT_FILE_NAME: &str = ".todo.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub storage_path: PathBuf,
    pub color: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Config> {
        let color = !cli.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();
        Config::resolve(cli.file.clone(), dirs::home_dir(), color)
    }

    // An explicit file wins over the home directory default
    pub fn resolve(file: Option<PathBuf>, home: Option<PathBuf>, color: bool) -> Result<Config> {
        let storage_path = match (file, home) {
            (Some(file), _) => file,
            (None, Some(home)) => home.join(DEFAULT_FILE_NAME),
            (None, None) => {
                return Err(TodoError::invalid(
                    "cannot locate a home directory; pass --file or set TODO_FILE",
                ))
            }
        };
        Ok(Config {
            storage_path,
            color,
        })
    }
}
