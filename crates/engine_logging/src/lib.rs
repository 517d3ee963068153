#![deny(missing_docs)]
//! Shared logging utilities for the drawcheck workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the `job_*` variants that tag a line with the analysis job it belongs to,
//! and a minimal test initializer for the global logger.

/// Formats the prefix used by the `job_*` macros.
///
/// Job work hops between tokio worker threads, so the job id travels with
/// every call instead of living in thread-local storage.
pub fn job_prefix(job_id: u64) -> String {
    format!("[job {job_id}]")
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Logs an info-level message tagged with an analysis job id.
#[macro_export]
macro_rules! job_info {
    ($job_id:expr, $($arg:tt)*) => {{
        log::info!("{} {}", $crate::job_prefix($job_id), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with an analysis job id.
#[macro_export]
macro_rules! job_warn {
    ($job_id:expr, $($arg:tt)*) => {{
        log::warn!("{} {}", $crate::job_prefix($job_id), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with an analysis job id.
#[macro_export]
macro_rules! job_error {
    ($job_id:expr, $($arg:tt)*) => {{
        log::error!("{} {}", $crate::job_prefix($job_id), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
