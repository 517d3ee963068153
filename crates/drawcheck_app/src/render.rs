//! Plain-text rendering of the view model.

use std::io::{self, Write};

use drawcheck_core::{Alert, AlertLevel, AppViewModel};

/// Prints only what changed since the previous render.
#[derive(Debug, Default)]
pub struct Renderer {
    generation: u64,
    printed: usize,
    status_line: String,
}

impl Renderer {
    pub fn render(
        &mut self,
        view: &AppViewModel,
        alerts: &[Alert],
        out: &mut impl Write,
    ) -> io::Result<()> {
        if view.transcript_generation != self.generation {
            self.generation = view.transcript_generation;
            self.printed = 0;
        }
        for line in view.transcript.iter().skip(self.printed) {
            writeln!(out, "{line}")?;
        }
        self.printed = view.transcript.len();

        if view.status_line != self.status_line {
            writeln!(out, "-- {}", view.status_line)?;
            self.status_line.clone_from(&view.status_line);
        }
        for alert in alerts {
            let tag = match alert.level {
                AlertLevel::Info => "info",
                AlertLevel::Warning => "warning",
                AlertLevel::Error => "error",
            };
            writeln!(out, "[{tag}] {}", alert.text)?;
        }
        out.flush()
    }
}

/// One-shot summary for the `models` command.
pub fn models_summary(
    view: &AppViewModel,
    text_suggestions: &[String],
    vision_suggestions: &[String],
) -> String {
    format!(
        "{}\nText model: {} (suggested: {})\nVision model: {} (suggested: {})",
        view.service.summary(),
        view.models.text_model,
        text_suggestions.join(", "),
        view.models.vision_model,
        vision_suggestions.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawcheck_core::{update, AppState, Msg};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn render_to_string(renderer: &mut Renderer, state: &mut AppState) -> String {
        let mut out = Vec::new();
        let alerts = state.take_alerts();
        renderer.render(&state.view(), &alerts, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn only_new_lines_are_printed() {
        let mut renderer = Renderer::default();
        let (mut state, _) = update(
            AppState::new(),
            Msg::DocumentSelected(PathBuf::from("a.pdf")),
        );

        let first = render_to_string(&mut renderer, &mut state);
        assert!(first.contains("File loaded: a.pdf"));
        assert!(first.contains("-- Loaded: a.pdf"));

        assert_eq!(render_to_string(&mut renderer, &mut state), "");
    }

    #[test]
    fn alerts_are_tagged_by_level() {
        let mut renderer = Renderer::default();
        let (mut state, _) = update(
            AppState::new(),
            Msg::StartClicked(drawcheck_core::AnalysisMode::Fast),
        );
        let output = render_to_string(&mut renderer, &mut state);
        assert!(output.contains("[error] Load a PDF file first"));
    }

    #[test]
    fn new_document_restarts_transcript() {
        let mut renderer = Renderer::default();
        let (state, _) = update(AppState::new(), Msg::DocumentSelected(PathBuf::from("a.pdf")));
        let (mut state, _) = update(state, Msg::JobProgress { job_id: 1, message: "x".into() });
        render_to_string(&mut renderer, &mut state);

        let (mut state, _) = update(state, Msg::DocumentSelected(PathBuf::from("b.pdf")));
        let output = render_to_string(&mut renderer, &mut state);
        assert!(output.contains("File loaded: b.pdf"));
    }
}
