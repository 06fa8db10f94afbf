//! # Calculation History Store
//!
//! SQLite-backed history of every executed calculation plus exported
//! report snapshots. Two tables:
//!
//! - `calculations` - one row per run: type tag, parameters, results
//! - `reports` - one row per exported report snapshot
//!
//! Parameters and results are stored as tagged JSON objects (see
//! [`crate::params::ParamMap`]) and parsed strictly on the way back out.
//! A row whose payload does not parse under the tagged grammar is never
//! evaluated or guessed at: [`Database::load_calculation`] rejects it and
//! [`Database::history`] skips it with a warning.

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::calculations::CalcKind;
use crate::errors::{CalcError, CalcResult};
use crate::params::ParamMap;
use crate::report::Report;

/// Default database filename, created in the working directory.
pub const DEFAULT_DB_FILE: &str = "vehicle_calculator.db";

/// Rows shown by the interactive history view.
pub const HISTORY_VIEW_LIMIT: u32 = 40;

/// Rows included in a CSV export.
pub const HISTORY_EXPORT_LIMIT: u32 = 1000;

/// One stored calculation, parsed back into typed form.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub calc_type: String,
    pub parameters: ParamMap,
    pub results: ParamMap,
    pub timestamp: String,
}

impl HistoryEntry {
    /// The typed calculation kind, when the stored tag is a known one.
    ///
    /// Audit rows written at report export carry synthetic
    /// `<section>_calculation` tags and return `None` here.
    pub fn kind(&self) -> Option<CalcKind> {
        CalcKind::from_tag(&self.calc_type)
    }
}

/// Connection handle over the two history tables.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open(path: &str) -> CalcResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| CalcError::storage("open", e.to_string()))?;
        Self::init(&conn)?;
        debug!(path, "history database opened");
        Ok(Self { conn })
    }

    /// In-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> CalcResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CalcError::storage("open", e.to_string()))?;
        Self::init(&conn)?;
        Ok(Self { conn })
    }

    fn init(conn: &Connection) -> CalcResult<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS calculations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                calculation_type TEXT NOT NULL,
                parameters TEXT NOT NULL,
                results TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                report_data TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            );",
        )
        .map_err(|e| CalcError::storage("create tables", e.to_string()))?;
        Ok(())
    }

    /// Insert one calculation row and return its id.
    pub fn save_calculation(
        &self,
        calc_type: &str,
        parameters: &ParamMap,
        results: &ParamMap,
    ) -> CalcResult<i64> {
        let params_json = parameters.to_json_string()?;
        let results_json = results.to_json_string()?;
        self.conn
            .execute(
                "INSERT INTO calculations (calculation_type, parameters, results)
                 VALUES (?1, ?2, ?3)",
                (calc_type, &params_json, &results_json),
            )
            .map_err(|e| CalcError::storage("save calculation", e.to_string()))?;
        let id = self.conn.last_insert_rowid();
        debug!(calc_type, id, "calculation saved");
        Ok(id)
    }

    /// Insert a report snapshot row and return its id.
    pub fn save_report(&self, report: &Report) -> CalcResult<i64> {
        let snapshot = report
            .to_snapshot()
            .map_err(|e| CalcError::serialization(e.to_string()))?;
        self.conn
            .execute("INSERT INTO reports (report_data) VALUES (?1)", (&snapshot,))
            .map_err(|e| CalcError::storage("save report", e.to_string()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Newest-first history, capped at `limit` rows.
    ///
    /// Rows whose stored payload fails the tagged-value parse are skipped,
    /// not surfaced as errors: exporting history should not be blocked by
    /// one corrupt row.
    pub fn history(&self, limit: u32) -> CalcResult<Vec<HistoryEntry>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, calculation_type, parameters, results, timestamp
                 FROM calculations
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1",
            )
            .map_err(|e| CalcError::storage("history", e.to_string()))?;

        let rows = stmt
            .query_map([limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|e| CalcError::storage("history", e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, calc_type, params_json, results_json, timestamp) =
                row.map_err(|e| CalcError::storage("history", e.to_string()))?;
            match parse_row(id, calc_type, &params_json, &results_json, timestamp) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(id, error = %e, "skipping unparseable history row"),
            }
        }
        Ok(entries)
    }

    /// Load a single calculation row, rejecting it if the stored payload
    /// does not parse under the tagged grammar.
    pub fn load_calculation(&self, id: i64) -> CalcResult<HistoryEntry> {
        let row = self.conn.query_row(
            "SELECT id, calculation_type, parameters, results, timestamp
             FROM calculations WHERE id = ?1",
            [id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        );
        let (id, calc_type, params_json, results_json, timestamp) = match row {
            Ok(r) => r,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(CalcError::storage(
                    "load calculation",
                    format!("no calculation with id {}", id),
                ));
            }
            Err(e) => return Err(CalcError::storage("load calculation", e.to_string())),
        };
        parse_row(id, calc_type, &params_json, &results_json, timestamp)
    }

    /// Delete all history and reset the id counters, so the next saved
    /// calculation gets id 1 again.
    pub fn clear(&self) -> CalcResult<()> {
        self.conn
            .execute_batch("DELETE FROM calculations; DELETE FROM reports;")
            .map_err(|e| CalcError::storage("clear history", e.to_string()))?;

        // sqlite_sequence only exists after the first AUTOINCREMENT insert
        let has_sequence: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE name = 'sqlite_sequence')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| CalcError::storage("clear history", e.to_string()))?;
        if has_sequence {
            self.conn
                .execute(
                    "DELETE FROM sqlite_sequence WHERE name IN ('calculations', 'reports')",
                    [],
                )
                .map_err(|e| CalcError::storage("clear history", e.to_string()))?;
        }
        debug!("history cleared");
        Ok(())
    }
}

fn parse_row(
    id: i64,
    calc_type: String,
    params_json: &str,
    results_json: &str,
    timestamp: String,
) -> CalcResult<HistoryEntry> {
    Ok(HistoryEntry {
        id,
        calc_type,
        parameters: ParamMap::from_json_str(params_json)?,
        results: ParamMap::from_json_str(results_json)?,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    fn sample_params() -> ParamMap {
        let mut map = ParamMap::new();
        map.insert("torque", ParamValue::Number(500.0));
        map.insert("rpm", ParamValue::Number(6000.0));
        map
    }

    fn sample_results() -> ParamMap {
        let mut map = ParamMap::new();
        map.insert("power_hp", ParamValue::Number(427.1));
        map
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .save_calculation("engine_power", &sample_params(), &sample_results())
            .unwrap();
        assert_eq!(id, 1);

        let entry = db.load_calculation(id).unwrap();
        assert_eq!(entry.calc_type, "engine_power");
        assert_eq!(entry.kind(), Some(CalcKind::EnginePower));
        assert_eq!(
            entry.parameters.get("torque"),
            Some(&ParamValue::Number(500.0))
        );
        assert_eq!(
            entry.results.get("power_hp"),
            Some(&ParamValue::Number(427.1))
        );
    }

    #[test]
    fn test_history_is_newest_first() {
        let db = Database::open_in_memory().unwrap();
        for tag in ["engine_power", "brake_torque", "injector_duty"] {
            db.save_calculation(tag, &sample_params(), &sample_results())
                .unwrap();
        }
        let entries = db.history(10).unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(entries[0].calc_type, "injector_duty");
    }

    #[test]
    fn test_history_respects_limit() {
        let db = Database::open_in_memory().unwrap();
        for _ in 0..5 {
            db.save_calculation("engine_power", &sample_params(), &sample_results())
                .unwrap();
        }
        assert_eq!(db.history(2).unwrap().len(), 2);
    }

    #[test]
    fn test_clear_resets_row_ids() {
        let db = Database::open_in_memory().unwrap();
        db.save_calculation("engine_power", &sample_params(), &sample_results())
            .unwrap();
        db.save_calculation("engine_power", &sample_params(), &sample_results())
            .unwrap();
        db.clear().unwrap();
        assert!(db.history(10).unwrap().is_empty());

        let id = db
            .save_calculation("engine_power", &sample_params(), &sample_results())
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_clear_on_fresh_database() {
        let db = Database::open_in_memory().unwrap();
        db.clear().unwrap();
    }

    #[test]
    fn test_load_rejects_untagged_payload() {
        let db = Database::open_in_memory().unwrap();
        // legacy-style row written as a language repr, not tagged JSON
        db.conn
            .execute(
                "INSERT INTO calculations (calculation_type, parameters, results)
                 VALUES ('engine_power', ?1, ?2)",
                ("{'torque': 500}", "{'power_hp': __import__('os')}"),
            )
            .unwrap();
        let err = db.load_calculation(1).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_history_skips_bad_rows() {
        let db = Database::open_in_memory().unwrap();
        db.save_calculation("engine_power", &sample_params(), &sample_results())
            .unwrap();
        db.conn
            .execute(
                "INSERT INTO calculations (calculation_type, parameters, results)
                 VALUES ('brake_torque', 'not json', 'not json')",
                [],
            )
            .unwrap();
        let entries = db.history(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].calc_type, "engine_power");
    }

    #[test]
    fn test_missing_row_is_storage_error() {
        let db = Database::open_in_memory().unwrap();
        let err = db.load_calculation(99).unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_save_report_snapshot() {
        let db = Database::open_in_memory().unwrap();
        let mut report = Report::new();
        report.record(
            "engine",
            vec![(
                "efficiency".into(),
                crate::report::ReportValue::Line("77.5%".into()),
            )],
        );
        let id = db.save_report(&report).unwrap();
        assert_eq!(id, 1);
    }
}
