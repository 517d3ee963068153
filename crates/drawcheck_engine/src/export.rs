use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use engine_logging::engine_info;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::persist::AtomicFileWriter;
use crate::ExportError;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 11;
const LEADING: i64 = 14;
const WRAP_COLUMNS: usize = 90;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Writes the report to `destination`. `.pdf` renders a paginated document;
/// any other extension gets the verbatim UTF-8 text.
pub fn export_report(result: Option<&str>, destination: &Path) -> Result<PathBuf, ExportError> {
    let report = result.ok_or(ExportError::NoResult)?;
    let bytes = if is_pdf(destination) {
        render_pdf(report)?
    } else {
        report.as_bytes().to_vec()
    };

    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ExportError::Write {
            path: destination.display().to_string(),
            message: "destination has no file name".to_string(),
        })?;
    let path = AtomicFileWriter::for_target(destination)
        .write(filename, &bytes)
        .map_err(|err| ExportError::Write {
            path: destination.display().to_string(),
            message: err.to_string(),
        })?;
    engine_info!("Report written to {:?} ({} bytes)", path, bytes.len());
    Ok(path)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Encodes one line for a WinAnsi font; characters the encoding lacks become `?`.
pub fn to_win_ansi(line: &str) -> Vec<u8> {
    let mut buf = [0u8; 4];
    line.chars()
        .map(|ch| {
            if ch.is_control() {
                return b' ';
            }
            let (bytes, _, had_errors) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
            match (had_errors, bytes.as_ref()) {
                (false, [byte]) => *byte,
                _ => b'?',
            }
        })
        .collect()
}

/// Greedy word wrap by character count. Words longer than a line are split.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        let mut width = 0;
        for word in raw.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > columns {
                if width > 0 {
                    lines.push(std::mem::take(&mut current));
                    width = 0;
                }
                let rest = word.split_off(columns);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if width == 0 { word.len() } else { width + 1 + word.len() };
            if needed > columns {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }
            if width > 0 {
                current.push(' ');
                width += 1;
            }
            current.extend(word.iter());
            width += word.len();
        }
        lines.push(current);
    }
    lines
}

pub fn render_pdf(report: &str) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let lines = wrap(report, WRAP_COLUMNS);
    let mut kids: Vec<Object> = Vec::new();
    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![&lines[..]]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };
    for chunk in chunks {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("TL", vec![LEADING.into()]),
            Operation::new(
                "Td",
                vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - FONT_SIZE).into()],
            ),
        ];
        for line in chunk {
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(line), StringFormat::Literal)],
            ));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations }
            .encode()
            .map_err(|err| ExportError::Render(err.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    Ok(bytes)
}
