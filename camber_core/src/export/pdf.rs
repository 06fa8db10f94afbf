//! # Report PDF Export
//!
//! Renders the accumulated report to PDF via Typst. The Typst source is
//! assembled from the report sections, compiled against an in-memory
//! world, and returned as raw PDF bytes.
//!
//! Fonts come from `typst-assets`; the bundled Libertinus family covers
//! the Cyrillic labels.

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{CalcError, CalcResult};
use crate::labels;
use crate::report::{Report, ReportValue};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        let mut fonts = Vec::new();
        for font_bytes in typst_assets::fonts() {
            let buffer = Bytes::new(font_bytes.to_vec());
            for font in Font::iter(buffer) {
                fonts.push(font);
            }
        }
        fonts
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Report Rendering
// ============================================================================

/// Render the report to PDF bytes.
///
/// Returns `Export` errors for an empty report and for Typst compile or
/// render failures.
pub fn render_report_pdf(report: &Report) -> CalcResult<Vec<u8>> {
    if report.is_empty() {
        return Err(CalcError::export(
            "pdf",
            "report is empty, run calculations first",
        ));
    }

    let source = build_source(report);
    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::export(
            "pdf",
            format!("Typst compilation failed: {}", messages.join("; ")),
        )
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::export(
            "pdf",
            format!("PDF rendering failed: {}", messages.join("; ")),
        )
    })?;

    Ok(pdf_bytes)
}

fn build_source(report: &Report) -> String {
    let mut source = format!(
        r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #align(center)[#text(size: 9pt)[#counter(page).display()]]
  ]
)

#set text(size: 11pt)

#align(center)[
  #text(size: 18pt, weight: "bold")[Отчет по расчету характеристик автомобиля]
]

#v(8pt)
Дата создания: {date}
#v(12pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)
"##,
        date = Utc::now().format("%Y-%m-%d %H:%M:%S"),
    );

    for (name, section) in report.sections() {
        source.push_str(&format!("\n== {}\n\n", escape_typst(labels::section_title(name))));
        source.push_str("#table(\n  columns: (1fr, 1fr),\n  inset: 6pt,\n  stroke: 0.5pt,\n");
        for (key, value) in section.iter() {
            match value {
                ReportValue::Line(line) => {
                    source.push_str(&format!(
                        "  [{}], [{}],\n",
                        escape_typst(labels::field_label(key)),
                        escape_typst(line)
                    ));
                }
                ReportValue::Group(fields) => {
                    source.push_str(&format!(
                        "  [#strong[{}]], [],\n",
                        escape_typst(labels::field_label(key))
                    ));
                    for (k, v) in fields {
                        source.push_str(&format!(
                            "  [#h(1em){}], [{}],\n",
                            escape_typst(labels::field_label(k)),
                            escape_typst(v)
                        ));
                    }
                }
            }
        }
        source.push_str(")\n#v(8pt)\n");
    }

    source
}

/// Escape special Typst characters in report text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let mut report = Report::new();
        report.record(
            "engine",
            vec![
                ("power_hp".into(), ReportValue::Line("150 л.с.".into())),
                ("efficiency".into(), ReportValue::Line("77.5%".into())),
            ],
        );
        report.record(
            "dynamics",
            vec![(
                "acceleration".into(),
                ReportValue::Group(vec![
                    ("max_speed".into(), "231.4 км/ч".into()),
                    ("acceleration_0_100".into(), "7.91 с".into()),
                ]),
            )],
        );
        report
    }

    #[test]
    fn test_empty_report_is_rejected() {
        let err = render_report_pdf(&Report::new()).unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_ERROR");
    }

    #[test]
    fn test_source_contains_translated_labels() {
        let source = build_source(&sample_report());
        assert!(source.contains("== Двигатель"));
        assert!(source.contains("Мощность (л.с.)"));
        assert!(source.contains("Максимальная скорость (км/ч)"));
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_report_pdf(&sample_report());
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
