use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use drawcheck_core::{update, AppState, AppViewModel, Msg};
use engine_logging::{engine_info, engine_warn};

use crate::cli::Cli;
use crate::config::{self, AppConfig};
use crate::input::{parse_command, Command, HELP};
use crate::platform::effects::EffectRunner;
use crate::platform::logging;
use crate::render::{models_summary, Renderer};

/// Everything the UI loop reacts to, from any thread.
#[derive(Debug)]
pub enum UiEvent {
    Msg(Msg),
    Input(String),
    Quit,
}

/// Owns the coordinator state; the only place `update` is called.
pub struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig, runner: EffectRunner) -> Self {
        Self {
            state: AppState::with_models(config.models()),
            runner,
            renderer: Renderer::default(),
            config,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn dispatch(&mut self, msg: Msg, out: &mut impl Write) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);

        if self.state.consume_dirty() {
            let alerts = self.state.take_alerts();
            self.renderer.render(&self.state.view(), &alerts, out)?;
        }
        Ok(())
    }

    /// Handles one line of user input. Returns false when the user quits.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                return Ok(true);
            }
        };
        match command {
            Command::Quit => return Ok(false),
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Models => writeln!(
                out,
                "{}",
                models_summary(
                    &self.state.view(),
                    &self.config.text_models,
                    &self.config.vision_models
                )
            )?,
            other => {
                if let Some(msg) = other.into_msg(Local::now()) {
                    self.dispatch(msg, out)?;
                }
            }
        }
        Ok(true)
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log, &cli.log_file);

    let mut config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load_default(Path::new(".")),
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    engine_info!("Using inference service at {}", config.base_url);

    let (ui_tx, ui_rx) = mpsc::channel();
    let runner = EffectRunner::new(
        config.engine_config(),
        config.preview_path.clone(),
        ui_tx.clone(),
    )
    .context("cannot start analysis engine")?;
    spawn_stdin_reader(ui_tx.clone());
    if let Some(interval) = config.service_refresh() {
        spawn_refresh_timer(ui_tx, interval);
    }

    let mut app = App::new(config, runner);
    let mut out = io::stdout();
    writeln!(out, "drawcheck: type `help` for commands")?;
    // Startup check is silent; only the status line reports it.
    app.dispatch(Msg::ServiceRefreshDue, &mut out)?;

    while let Ok(event) = ui_rx.recv() {
        match event {
            UiEvent::Msg(msg) => app.dispatch(msg, &mut out)?,
            UiEvent::Input(line) => {
                if !app.handle_line(&line, &mut out)? {
                    break;
                }
            }
            UiEvent::Quit => break,
        }
    }
    engine_info!("Exiting");
    Ok(())
}

fn spawn_stdin_reader(ui_tx: mpsc::Sender<UiEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if ui_tx.send(UiEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
        let _ = ui_tx.send(UiEvent::Quit);
    });
}

fn spawn_refresh_timer(ui_tx: mpsc::Sender<UiEvent>, interval: Duration) {
    thread::spawn(move || loop {
        thread::sleep(interval);
        if ui_tx.send(UiEvent::Msg(Msg::ServiceRefreshDue)).is_err() {
            break;
        }
    });
}
