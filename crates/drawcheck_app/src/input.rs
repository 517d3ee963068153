//! Terminal command parsing.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use drawcheck_core::{AnalysisMode, Msg};

pub const HELP: &str = "\
Commands:
  open <path>          load a PDF drawing
  check                standard analysis (text and graphics)
  quick                fast analysis (text only)
  stop                 stop the running analysis
  export [path]        save the last result (.pdf, .txt or .md)
  status               check the inference service
  models               list installed and suggested models
  model text <name>    choose the text model
  model vision <name>  choose the vision model
  help                 show this help
  quit                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Check,
    Quick,
    Stop,
    Export(Option<PathBuf>),
    Status,
    Models,
    TextModel(String),
    VisionModel(String),
    Help,
    Quit,
}

impl Command {
    /// The core message for this command, if it has one.
    pub fn into_msg(self, now: DateTime<Local>) -> Option<Msg> {
        match self {
            Command::Open(path) => Some(Msg::DocumentSelected(path)),
            Command::Check => Some(Msg::StartClicked(AnalysisMode::Standard)),
            Command::Quick => Some(Msg::StartClicked(AnalysisMode::Fast)),
            Command::Stop => Some(Msg::StopClicked),
            Command::Export(path) => Some(Msg::ExportClicked(
                path.unwrap_or_else(|| default_export_path(now)),
            )),
            Command::Status => Some(Msg::CheckServiceClicked),
            Command::TextModel(name) => Some(Msg::TextModelSelected(name)),
            Command::VisionModel(name) => Some(Msg::VisionModelSelected(name)),
            Command::Models | Command::Help | Command::Quit => None,
        }
    }
}

pub fn default_export_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("report-{}.pdf", now.format("%Y%m%d-%H%M%S")))
}

/// Parses one input line. Paths keep inner spaces.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "open" | "load" => {
            if rest.is_empty() {
                Err("usage: open <path>".to_string())
            } else {
                Ok(Command::Open(PathBuf::from(unquote(rest))))
            }
        }
        "check" => Ok(Command::Check),
        "quick" => Ok(Command::Quick),
        "stop" => Ok(Command::Stop),
        "export" | "save" => Ok(Command::Export(
            (!rest.is_empty()).then(|| PathBuf::from(unquote(rest))),
        )),
        "status" => Ok(Command::Status),
        "models" => Ok(Command::Models),
        "model" => parse_model(rest),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("type `help` for a list of commands".to_string()),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

fn parse_model(rest: &str) -> Result<Command, String> {
    let (kind, name) = rest
        .split_once(char::is_whitespace)
        .map(|(kind, name)| (kind, name.trim()))
        .ok_or_else(|| "usage: model text|vision <name>".to_string())?;
    match kind {
        "text" => Ok(Command::TextModel(name.to_string())),
        "vision" => Ok(Command::VisionModel(name.to_string())),
        _ => Err("usage: model text|vision <name>".to_string()),
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}
