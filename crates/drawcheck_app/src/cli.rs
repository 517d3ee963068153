use std::path::PathBuf;

use clap::Parser;

use crate::platform::logging::LogDestination;

/// Checks engineering drawings (PDF) against GOST drafting rules with a local
/// Ollama model.
#[derive(Debug, Parser)]
#[command(name = "drawcheck", version, about)]
pub struct Cli {
    /// Configuration file (RON). Defaults to ./drawcheck.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Inference service address, overriding the configuration file.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(long, default_value = "drawcheck.log")]
    pub log_file: PathBuf,
}
