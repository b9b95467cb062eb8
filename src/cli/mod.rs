// ABOUTME: CLI module for the taskflow workflow runner
// ABOUTME: Exports command line interface components and main application logic

pub mod app;
pub mod args;
pub mod commands;
pub mod config;

pub use app::{cancel_on_ctrl_c, App, AppInfo};
pub use args::{Args, Commands};
pub use config::Config;
