//! # Export Module
//!
//! CSV export of calculation history and PDF export of the accumulated
//! report. Exporting a report also archives it: the snapshot goes into
//! the `reports` table and each report section gets an audit row in the
//! calculation history pointing back at the snapshot.

pub mod csv;
pub mod pdf;

use std::path::Path;

use tracing::info;

use crate::errors::{CalcError, CalcResult};
use crate::params::{ParamMap, ParamValue};
use crate::report::{Report, ReportValue};
use crate::store::Database;

pub use csv::{export_history_csv, write_history_csv};
pub use pdf::render_report_pdf;

/// Outcome of a PDF export, for the front end's status line.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfExportSummary {
    pub report_id: i64,
    pub audit_rows: usize,
}

/// Render the report to PDF at `path` and archive it.
///
/// Archiving writes the report snapshot into the `reports` table, then
/// one `<section>_calculation` row per report section into the history,
/// each carrying the snapshot id in its parameters.
pub fn export_report_pdf(
    db: &Database,
    report: &Report,
    path: &Path,
) -> CalcResult<PdfExportSummary> {
    let pdf_bytes = pdf::render_report_pdf(report)?;
    std::fs::write(path, pdf_bytes).map_err(|e| CalcError::export("pdf", e.to_string()))?;

    let report_id = db.save_report(report)?;

    let mut audit_rows = 0;
    for (name, section) in report.sections() {
        let mut params = ParamMap::new();
        params.insert("report_id", ParamValue::Number(report_id as f64));

        let mut results = ParamMap::new();
        for (key, value) in section.iter() {
            match value {
                ReportValue::Line(line) => {
                    results.insert(key, ParamValue::text(line.clone()));
                }
                ReportValue::Group(fields) => {
                    results.insert(
                        key,
                        ParamValue::list(fields.iter().map(|(k, v)| format!("{}: {}", k, v))),
                    );
                }
            }
        }

        db.save_calculation(&audit_tag(name), &params, &results)?;
        audit_rows += 1;
    }

    info!(path = %path.display(), report_id, audit_rows, "report exported");
    Ok(PdfExportSummary {
        report_id,
        audit_rows,
    })
}

/// History tag for a report section's audit row.
///
/// All engine sub-sections collapse into one `engine_calculation` tag,
/// matching how the history view groups them.
fn audit_tag(section: &str) -> String {
    if section.contains("engine") {
        "engine_calculation".to_string()
    } else if section.contains("transmission") {
        "transmission_calculation".to_string()
    } else {
        format!("{}_calculation", section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_tags() {
        assert_eq!(audit_tag("engine"), "engine_calculation");
        assert_eq!(audit_tag("engine_power_calc"), "engine_calculation");
        assert_eq!(audit_tag("transmission"), "transmission_calculation");
        assert_eq!(audit_tag("braking"), "braking_calculation");
        assert_eq!(audit_tag("fuel_system"), "fuel_system_calculation");
    }
}
