//! Command-line front end for modal message boxes
//!
//! Draws prompts in the terminal with ratatui or answers them headlessly.
//! The chosen action becomes the process exit status.

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod terminal;

pub use app::{Invocation, effective_config};
pub use cli::{Args, default_data_dir};
pub use config::{AppConfig, ConfigError};
pub use logging::init_logging;
pub use terminal::TerminalToolkit;
