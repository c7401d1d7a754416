pub mod commands;
pub mod models;
pub mod storage;
pub mod task_store;
pub mod ui;
