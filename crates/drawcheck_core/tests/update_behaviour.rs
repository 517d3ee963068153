use std::path::PathBuf;
use std::sync::Once;

use drawcheck_core::{
    update, AlertLevel, AnalysisMode, AppState, Effect, JobOutcome, Msg, ServiceStatus,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn reachable(models: &[&str]) -> Msg {
    Msg::ServiceChecked {
        status: ServiceStatus {
            reachable: true,
            models: models.iter().map(|m| m.to_string()).collect(),
        },
        announce: false,
    }
}

fn completed_state(report: &str) -> AppState {
    let (state, _) = update(AppState::new(), reachable(&["llama2:3b"]));
    let (state, _) = update(state, Msg::DocumentSelected(PathBuf::from("a.pdf")));
    let (state, _) = update(state, Msg::StartClicked(AnalysisMode::Fast));
    let (mut state, _) = update(
        state,
        Msg::JobFinished {
            job_id: 1,
            outcome: JobOutcome::Completed {
                report: report.to_string(),
                degraded: false,
            },
        },
    );
    state.take_alerts();
    state
}

#[test]
fn document_selection_resets_transcript_and_requests_preview() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::DocumentSelected(PathBuf::from("/tmp/part.pdf")));

    assert_eq!(
        effects,
        vec![Effect::RenderPreview {
            document: PathBuf::from("/tmp/part.pdf")
        }]
    );
    let view = state.view();
    assert_eq!(view.status_line, "Loaded: part.pdf");
    assert_eq!(view.transcript, vec!["File loaded: /tmp/part.pdf".to_string()]);
    assert!(view.controls.can_start);
    assert!(!view.controls.can_export);
    assert!(state.consume_dirty());
}

#[test]
fn loading_a_new_document_clears_the_previous_report() {
    init_logging();
    let state = completed_state("old report");
    assert!(state.view().controls.can_export);

    let (state, _) = update(state, Msg::DocumentSelected(PathBuf::from("b.pdf")));
    let view = state.view();
    assert!(view.report.is_none());
    assert!(!view.controls.can_export);
}

#[test]
fn document_selection_rejected_while_running() {
    init_logging();
    let (state, _) = update(AppState::new(), reachable(&[]));
    let (state, _) = update(state, Msg::DocumentSelected(PathBuf::from("a.pdf")));
    let (state, _) = update(state, Msg::StartClicked(AnalysisMode::Standard));

    let (mut state, effects) = update(state, Msg::DocumentSelected(PathBuf::from("b.pdf")));
    assert!(effects.is_empty());
    assert_eq!(state.document(), Some(PathBuf::from("a.pdf").as_path()));
    assert_eq!(state.take_alerts()[0].level, AlertLevel::Error);
}

#[test]
fn stale_preview_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(PathBuf::from("a.pdf")));
    let (state, _) = update(state, Msg::DocumentSelected(PathBuf::from("b.pdf")));
    let (state, _) = update(
        state,
        Msg::PreviewRendered {
            document: PathBuf::from("a.pdf"),
            result: Ok(2048),
        },
    );
    assert_eq!(state.view().preview_bytes, None);

    let (state, _) = update(
        state,
        Msg::PreviewRendered {
            document: PathBuf::from("b.pdf"),
            result: Ok(4096),
        },
    );
    assert_eq!(state.view().preview_bytes, Some(4096));
}

#[test]
fn preview_failure_is_a_warning() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(PathBuf::from("a.pdf")));
    let (mut state, _) = update(
        state,
        Msg::PreviewRendered {
            document: PathBuf::from("a.pdf"),
            result: Err("pdftoppm not found".to_string()),
        },
    );
    let alerts = state.take_alerts();
    assert_eq!(alerts[0].level, AlertLevel::Warning);
    assert!(alerts[0].text.contains("pdftoppm not found"));
}

#[test]
fn service_checks_emit_effects() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::CheckServiceClicked);
    assert_eq!(effects, vec![Effect::CheckService { announce: true }]);

    let (_state, effects) = update(state, Msg::ServiceRefreshDue);
    assert_eq!(effects, vec![Effect::CheckService { announce: false }]);
}

#[test]
fn announced_service_check_alerts_user() {
    init_logging();
    let (mut state, _) = update(
        AppState::new(),
        Msg::ServiceChecked {
            status: ServiceStatus::default(),
            announce: true,
        },
    );
    let view = state.view();
    assert_eq!(view.status_line, "Service: not running");
    assert_eq!(view.service.summary(), "Service unavailable");
    assert_eq!(state.take_alerts()[0].level, AlertLevel::Error);

    let (mut state, _) = update(state, reachable(&["llava:7b"]));
    assert_eq!(state.view().status_line, "Service: connected");
    assert!(state.take_alerts().is_empty());
}

#[test]
fn unknown_model_is_accepted_with_warning() {
    init_logging();
    let (state, _) = update(AppState::new(), reachable(&["llama2:3b"]));
    let (mut state, _) = update(state, Msg::TextModelSelected(" qwen:1.8b ".to_string()));

    assert_eq!(state.models().text_model, "qwen:1.8b");
    let alerts = state.take_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);

    let (mut state, _) = update(state, Msg::VisionModelSelected("  ".to_string()));
    assert_eq!(state.models().vision_model, "llava:7b");
    assert_eq!(state.take_alerts()[0].level, AlertLevel::Error);
}

#[test]
fn export_without_result_is_rejected() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::ExportClicked(PathBuf::from("r.pdf")));
    assert!(effects.is_empty());
    assert_eq!(state.take_alerts()[0].text, "No results to export");
}

#[test]
fn export_after_completion_carries_exact_report() {
    init_logging();
    let state = completed_state("Отчёт: всё хорошо");
    let (_state, effects) = update(state, Msg::ExportClicked(PathBuf::from("r.txt")));
    assert_eq!(
        effects,
        vec![Effect::ExportReport {
            destination: PathBuf::from("r.txt"),
            report: "Отчёт: всё хорошо".to_string(),
        }]
    );
}

#[test]
fn export_finished_reports_outcome() {
    init_logging();
    let state = completed_state("report");
    let (mut state, _) = update(state, Msg::ExportFinished(Ok(PathBuf::from("out/r.pdf"))));
    assert_eq!(state.take_alerts()[0].text, "Report saved: out/r.pdf");

    let (mut state, _) = update(state, Msg::ExportFinished(Err("permission denied".to_string())));
    let alerts = state.take_alerts();
    assert_eq!(alerts[0].level, AlertLevel::Error);
    assert!(alerts[0].text.contains("permission denied"));
}
