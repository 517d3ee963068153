//! Terminal front-end for drawcheck.
pub mod app;
pub mod cli;
pub mod config;
pub mod input;
pub mod platform;
pub mod render;

pub use app::{run, App, UiEvent};
pub use cli::Cli;
pub use config::AppConfig;
