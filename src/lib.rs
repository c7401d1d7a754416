//! Personal task tracker: a task model persisted in a single SQLite file,
//! driven by the `todo` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
