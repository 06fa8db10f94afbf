//! # History CSV Export
//!
//! Writes calculation history as semicolon-delimited CSV with Russian
//! headers and translated field labels. The file starts with a UTF-8 BOM
//! so spreadsheet applications detect the encoding.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::{CalcError, CalcResult};
use crate::labels;
use crate::params::ParamMap;
use crate::store::HistoryEntry;

const BOM: &[u8] = "\u{feff}".as_bytes();

/// Write history rows as CSV into any writer.
pub fn write_history_csv<W: Write>(writer: W, entries: &[HistoryEntry]) -> CalcResult<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    out.write_record(["ID", "Дата и время", "Тип расчета", "Параметры", "Результаты"])
        .map_err(|e| CalcError::export("csv", e.to_string()))?;

    for entry in entries {
        out.write_record([
            entry.id.to_string(),
            entry.timestamp.clone(),
            labels::calc_type_title(&entry.calc_type).to_string(),
            labeled_lines(&entry.parameters),
            labeled_lines(&entry.results),
        ])
        .map_err(|e| CalcError::export("csv", e.to_string()))?;
    }

    out.flush()
        .map_err(|e| CalcError::export("csv", e.to_string()))?;
    Ok(())
}

/// Export history to a CSV file at `path`, with the BOM prefix.
pub fn export_history_csv(path: &Path, entries: &[HistoryEntry]) -> CalcResult<()> {
    let mut file = File::create(path).map_err(|e| CalcError::export("csv", e.to_string()))?;
    file.write_all(BOM)
        .map_err(|e| CalcError::export("csv", e.to_string()))?;
    write_history_csv(file, entries)
}

/// One `Label: value` line per map entry, newline-joined inside the cell.
fn labeled_lines(map: &ParamMap) -> String {
    map.iter()
        .map(|(key, value)| format!("{}: {}", labels::field_label(key), value.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
