use std::fs;
use std::path::Path;

use drawcheck_engine::{
    export_report, render_pdf, DocumentBackend, ExportError, LopdfBackend, OpenDocument,
};
use pretty_assertions::assert_eq;

const REPORT: &str = "СООТВЕТСТВИЕ: НЕТ\nПРОБЛЕМЫ:\n- Ra 6.3 missing (ГОСТ 2.309-73)";

#[test]
fn export_without_result_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = export_report(None, &dir.path().join("report.pdf")).unwrap_err();
    assert_eq!(err, ExportError::NoResult);
    assert!(!dir.path().join("report.pdf").exists());
}

#[test]
fn text_export_is_verbatim_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("report.txt");

    let written = export_report(Some(REPORT), &target).unwrap();

    assert_eq!(written, target);
    assert_eq!(fs::read_to_string(&target).unwrap(), REPORT);
}

#[test]
fn export_overwrites_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("report.md");
    export_report(Some("old"), &target).unwrap();
    export_report(Some("new"), &target).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "new");
}

#[test]
fn pdf_export_is_readable_back() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("report.PDF");

    export_report(Some(REPORT), &target).unwrap();

    let mut document = LopdfBackend::default().open(&target).unwrap();
    assert_eq!(document.page_count(), 1);
    let text = document.page_text(0).unwrap();
    assert!(text.contains("Ra 6.3 missing"));
}

#[test]
fn long_reports_span_several_pages() {
    let report = (1..=200)
        .map(|n| format!("line {n}"))
        .collect::<Vec<_>>()
        .join("\n");
    let bytes = render_pdf(&report).unwrap();

    let document = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(document.get_pages().len(), 4);
}

#[test]
fn result_text_is_not_altered_by_pdf_rendering() {
    let report = String::from("Лист 1 ✓");
    render_pdf(&report).unwrap();
    assert_eq!(report, "Лист 1 ✓");
}

#[test]
fn unwritable_destination_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file").unwrap();

    let err = export_report(Some(REPORT), &blocker.join("report.txt")).unwrap_err();
    assert!(matches!(err, ExportError::Write { .. }));
}

#[test]
fn destination_without_file_name_is_rejected() {
    let err = export_report(Some(REPORT), Path::new("/")).unwrap_err();
    assert!(matches!(err, ExportError::Write { .. }));
}
