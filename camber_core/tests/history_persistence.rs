//! File-backed history tests: persistence across reopen, report export
//! archiving and the CSV file format.

use std::fs;

use camber_core::calculations::braking::{brake_torque, BrakeTorqueInput};
use camber_core::calculations::engine::{power, PowerInput};
use camber_core::export;
use camber_core::{Database, Session};

fn run_power(session: &mut Session, db: &Database) -> i64 {
    let input = PowerInput {
        torque_nm: 500.0,
        rpm: 6000.0,
    };
    let eval = power(&input).unwrap().to_evaluation(&input);
    session.record(&eval);
    db.save_calculation(eval.kind.as_str(), &eval.params, &eval.results)
        .unwrap()
}

#[test]
fn history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("camber.db");
    let path_str = path.to_str().unwrap();

    {
        let db = Database::open(path_str).unwrap();
        let mut session = Session::new();
        let id = run_power(&mut session, &db);
        assert_eq!(id, 1);
    }

    let db = Database::open(path_str).unwrap();
    let entries = db.history(10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].calc_type, "engine_power");

    let loaded = db.load_calculation(1).unwrap();
    assert_eq!(
        loaded.results.get("power_hp").and_then(|v| v.as_number()),
        Some(500.0 * 6000.0 / 7024.0)
    );
}

#[test]
fn clear_resets_ids_in_file_backed_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("camber.db");
    let db = Database::open(path.to_str().unwrap()).unwrap();
    let mut session = Session::new();

    run_power(&mut session, &db);
    run_power(&mut session, &db);
    db.clear().unwrap();

    let id = run_power(&mut session, &db);
    assert_eq!(id, 1);
}

#[test]
fn pdf_export_archives_report() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("camber.db");
    let pdf_path = dir.path().join("report.pdf");
    let db = Database::open(db_path.to_str().unwrap()).unwrap();

    let mut session = Session::new();
    run_power(&mut session, &db);

    let torque_input = BrakeTorqueInput {
        piston_count: 4,
        piston_diameter_mm: 40.0,
        disc_diameter_mm: 320.0,
        pad_coefficient: 0.4,
        pressure_bar: 80.0,
    };
    let eval = brake_torque(&torque_input)
        .unwrap()
        .to_evaluation(&torque_input);
    session.record(&eval);
    db.save_calculation(eval.kind.as_str(), &eval.params, &eval.results)
        .unwrap();

    let summary = export::export_report_pdf(&db, session.report(), &pdf_path).unwrap();
    assert_eq!(summary.report_id, 1);
    // engine_power_calc and braking sections each get an audit row
    assert_eq!(summary.audit_rows, 2);

    let pdf_bytes = fs::read(&pdf_path).unwrap();
    assert!(pdf_bytes.starts_with(b"%PDF"));

    let entries = db.history(10).unwrap();
    let tags: Vec<&str> = entries.iter().map(|e| e.calc_type.as_str()).collect();
    assert!(tags.contains(&"engine_calculation"));
    assert!(tags.contains(&"braking_calculation"));

    // audit rows point back at the snapshot
    let audit = entries
        .iter()
        .find(|e| e.calc_type == "engine_calculation")
        .unwrap();
    assert_eq!(
        audit.parameters.get("report_id").and_then(|v| v.as_number()),
        Some(1.0)
    );
}

#[test]
fn csv_export_writes_bom_and_header() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("camber.db");
    let csv_path = dir.path().join("history.csv");
    let db = Database::open(db_path.to_str().unwrap()).unwrap();
    let mut session = Session::new();
    run_power(&mut session, &db);

    let entries = db.history(1000).unwrap();
    export::export_history_csv(&csv_path, &entries).unwrap();

    let bytes = fs::read(&csv_path).unwrap();
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("ID;Дата и время;Тип расчета;Параметры;Результаты"));
    assert!(text.contains("Мощность двигателя"));
}
