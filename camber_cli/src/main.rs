//! # Camber CLI Application
//!
//! Interactive terminal interface for the vehicle performance calculator.
//! A run is one session: calculations accumulate into the report, typed
//! carry-over links dependent calculations, and every executed calculation
//! lands in the SQLite history.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use camber_core::calculations::{braking, dynamics, engine, fuel, suspension, transmission};
use camber_core::export;
use camber_core::labels;
use camber_core::store::{DEFAULT_DB_FILE, HISTORY_EXPORT_LIMIT, HISTORY_VIEW_LIMIT};
use camber_core::{CalcResult, Database, Evaluation, Session};

// ============================================================================
// Input helpers
// ============================================================================

fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return String::new();
    }
    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    let input = prompt_line(&format!("{} [{}]: ", prompt, default));
    input.parse().unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    let input = prompt_line(&format!("{} [{}]: ", prompt, default));
    input.parse().unwrap_or(default)
}

fn prompt_ratios(prompt: &str, default: &[f64]) -> Vec<f64> {
    let default_str = default
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let input = prompt_line(&format!("{} [{}]: ", prompt, default_str));
    if input.is_empty() {
        return default.to_vec();
    }
    let parsed: Vec<f64> = input
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    if parsed.is_empty() {
        default.to_vec()
    } else {
        parsed
    }
}

fn prompt_choice(prompt: &str) -> u32 {
    prompt_line(&format!("{}: ", prompt)).parse().unwrap_or(0)
}

// ============================================================================
// Session plumbing
// ============================================================================

/// Record an evaluation into the session, save it to history and print
/// its results with translated labels.
fn finish(session: &mut Session, db: &Database, eval: Evaluation) {
    println!();
    println!("Результаты:");
    for (key, value) in eval.results.iter() {
        println!("  {}: {}", labels::field_label(key), value.display());
    }

    session.record(&eval);
    match db.save_calculation(eval.kind.as_str(), &eval.params, &eval.results) {
        Ok(id) => println!("Расчет сохранен в историю (id {})", id),
        Err(e) => {
            warn!(error = %e, "history save failed");
            eprintln!("Ошибка сохранения: {}", e);
        }
    }
}

fn report_error(e: camber_core::CalcError) {
    eprintln!("Ошибка: {}", e);
}

// ============================================================================
// Subsystem menus
// ============================================================================

fn engine_menu(session: &mut Session, db: &Database) {
    println!();
    println!("-- Двигатель --");
    println!("1. КПД двигателя");
    println!("2. Среднее эффективное давление");
    println!("3. Мощность двигателя");
    println!("4. Расход воздуха");
    println!("5. Степень сжатия");

    match prompt_choice("Выберите расчет") {
        1 => {
            let fuel_type = match prompt_choice("Тип топлива (1-Бензин, 2-Дизель, 3-Этанол)") {
                2 => engine::FuelType::Diesel,
                3 => engine::FuelType::Ethanol,
                _ => engine::FuelType::Petrol,
            };
            let input = engine::EfficiencyInput {
                power_hp: prompt_f64("Мощность (л.с.)", 150.0),
                fuel_consumption_kg_h: prompt_f64("Расход топлива (кг/ч)", 12.0),
                fuel_type,
            };
            match engine::efficiency(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        2 => {
            let input = engine::MepInput {
                torque_nm: prompt_f64("Крутящий момент (Н·м)", 300.0),
                displacement_cm3: prompt_f64("Объем двигателя (см³)", 2000.0),
            };
            match engine::mep(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        3 => {
            let input = engine::PowerInput {
                torque_nm: prompt_f64("Крутящий момент (Н·м)", 300.0),
                rpm: prompt_f64("Обороты (об/мин)", 6000.0),
            };
            match engine::power(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        4 => {
            let input = engine::AirFlowInput {
                displacement_l: prompt_f64("Объем двигателя (л)", 2.0),
                rpm: prompt_f64("Обороты (об/мин)", 6000.0),
                volumetric_efficiency: prompt_f64("КПД наполнения (0..1)", 0.85),
            };
            match engine::air_flow(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        5 => {
            let input = engine::CompressionInput {
                cylinder_volume_cm3: prompt_f64("Объем цилиндра (см³)", 450.0),
                chamber_volume_cm3: prompt_f64("Объем камеры сгорания (см³)", 50.0),
            };
            match engine::compression(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        _ => {}
    }
}

fn transmission_menu(session: &mut Session, db: &Database) {
    println!();
    println!("-- Трансмиссия --");
    println!("1. Скорости на передачах");
    println!("2. Расчет передаточного отношения");
    println!("3. КПД трансмиссии");

    match prompt_choice("Выберите расчет") {
        1 => {
            let input = transmission::GearSpeedsInput {
                gear_ratios: prompt_ratios(
                    "Передаточные числа (через запятую)",
                    &[3.5, 2.1, 1.5, 1.1, 0.9],
                ),
                final_drive: prompt_f64("Главная передача", 4.1),
                tire_diameter_mm: prompt_f64("Диаметр колеса (мм)", 650.0),
                redline_rpm: prompt_f64("Максимальные обороты (об/мин)", 6500.0),
            };
            match transmission::gear_speeds(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        2 => {
            let input = transmission::RatioInput {
                rpm1: prompt_f64("Обороты 1 (об/мин)", 3000.0),
                speed1_kmh: prompt_f64("Скорость 1 (км/ч)", 60.0),
                rpm2: prompt_f64("Обороты 2 (об/мин)", 3000.0),
                speed2_kmh: prompt_f64("Скорость 2 (км/ч)", 90.0),
            };
            match transmission::ratio_from_speeds(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        3 => {
            let input = transmission::TransEfficiencyInput {
                engine_power_hp: prompt_f64("Мощность двигателя (л.с.)", 200.0),
                wheel_power_hp: prompt_f64("Мощность на колесах (л.с.)", 170.0),
            };
            match transmission::efficiency(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        _ => {}
    }
}

fn dynamics_menu(session: &mut Session, db: &Database) {
    println!();
    println!("-- Динамика --");
    println!("1. Тяговая сила");
    println!("2. Разгонная динамика");
    println!("3. Точки переключения");

    match prompt_choice("Выберите расчет") {
        1 => {
            let input = dynamics::TractionInput {
                torque_nm: prompt_f64("Крутящий момент (Н·м)", 350.0),
                gear_ratio: prompt_f64("Передаточное число", 3.5),
                final_drive: prompt_f64("Главная передача", 4.1),
                tire_radius_m: prompt_f64("Радиус колеса (м)", 0.33),
            };
            match dynamics::traction_force(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        2 => {
            let input = dynamics::AccelerationInput {
                weight_kg: prompt_f64("Масса (кг)", 1500.0),
                power_hp: prompt_f64("Мощность (л.с.)", 200.0),
                drag_coefficient: prompt_f64("Коэффициент аэродинамического сопротивления", 0.3),
                frontal_area_m2: prompt_f64("Лобовая площадь (м²)", 2.2),
                rolling_resistance: prompt_f64("Коэффициент сопротивления качению", 0.015),
            };
            match dynamics::acceleration(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        3 => {
            let input = dynamics::ShiftPointsInput {
                peak_rpm: prompt_f64("Обороты пика мощности (об/мин)", 5500.0),
                power_hp: prompt_f64("Мощность (л.с.)", 200.0),
                torque_nm: prompt_f64("Крутящий момент (Н·м)", 350.0),
            };
            match dynamics::shift_points(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        _ => {}
    }
}

fn braking_menu(session: &mut Session, db: &Database) {
    println!();
    println!("-- Тормозная система --");
    println!("1. Тормозной момент");
    println!("2. Тормозной путь");
    println!("3. Баланс тормозов (нужен тормозной момент)");
    println!("4. Нагрев тормозов");

    match prompt_choice("Выберите расчет") {
        1 => {
            let input = braking::BrakeTorqueInput {
                piston_count: prompt_u32("Количество поршней", 4),
                piston_diameter_mm: prompt_f64("Диаметр поршня (мм)", 40.0),
                disc_diameter_mm: prompt_f64("Диаметр диска (мм)", 320.0),
                pad_coefficient: prompt_f64("Коэффициент трения колодок", 0.4),
                pressure_bar: prompt_f64("Давление в системе (бар)", 80.0),
            };
            match braking::brake_torque(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        2 => {
            let input = braking::StoppingDistanceInput {
                speed_kmh: prompt_f64("Скорость (км/ч)", 100.0),
                weight_kg: prompt_f64("Масса (кг)", 1500.0),
                road_coefficient: prompt_f64("Коэффициент сцепления с дорогой", 0.8),
                front_fraction: prompt_f64("Доля веса на передней оси (0..1)", 0.6),
            };
            match braking::stopping_distance(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        3 => {
            let brake_torque_nm = match session.brake_torque_nm() {
                Ok(v) => v,
                Err(e) => return report_error(e),
            };
            let input = braking::BrakeBalanceInput {
                front_fraction: prompt_f64("Передние тормоза (доля 0..1)", 0.6),
                brake_torque_nm,
                weight_kg: prompt_f64("Масса (кг)", 1500.0),
            };
            match braking::brake_balance(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        4 => {
            let input = braking::BrakeTemperatureInput {
                speed_kmh: prompt_f64("Скорость (км/ч)", 100.0),
                weight_kg: prompt_f64("Масса (кг)", 1500.0),
                disc_diameter_mm: prompt_f64("Диаметр диска (мм)", 320.0),
                disc_thickness_mm: prompt_f64("Толщина диска (мм)", 28.0),
            };
            match braking::brake_temperature(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        _ => {}
    }
}

fn suspension_menu(session: &mut Session, db: &Database) {
    println!();
    println!("-- Подвеска --");
    println!("1. Жесткость подвески");
    println!("2. Частота подвески (нужна жесткость)");
    println!("3. Демпфирование подвески");
    println!("4. Кинематика подвески");

    match prompt_choice("Выберите расчет") {
        1 => {
            let input = suspension::WheelRateInput {
                spring_rate_n_mm: prompt_f64("Жесткость пружины (Н/мм)", 60.0),
                motion_ratio: prompt_f64("Коэффициент рычага", 0.95),
                preload_mm: prompt_f64("Предварительная нагрузка (мм)", 5.0),
            };
            match suspension::wheel_rate(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        2 => {
            let wheel_rate_n_mm = match session.wheel_rate_n_mm() {
                Ok(v) => v,
                Err(e) => return report_error(e),
            };
            let input = suspension::FrequencyInput {
                weight_kg: prompt_f64("Масса автомобиля (кг)", 1500.0),
                corner_weight_kg: prompt_f64("Нагрузка на колесо (кг)", 375.0),
                wheel_rate_n_mm,
            };
            match suspension::frequency(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        3 => {
            let input = suspension::DampingInput {
                rebound: prompt_f64("Демпфирование отбоя (Н·с/м)", 3000.0),
                bump: prompt_f64("Демпфирование сжатия (Н·с/м)", 1800.0),
                critical_damping: prompt_f64("Критическое демпфирование (Н·с/м)", 4000.0),
            };
            match suspension::damping(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        4 => {
            let input = suspension::KinematicsInput {
                arm_length_mm: prompt_f64("Длина рычага (мм)", 350.0),
                pivot_height_mm: prompt_f64("Высота оси вращения (мм)", 120.0),
            };
            match suspension::kinematics(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        _ => {}
    }
}

fn fuel_menu(session: &mut Session, db: &Database) {
    println!();
    println!("-- Топливная система --");
    println!("1. Производительность системы");
    println!("2. Время впрыска (нужна производительность)");
    println!("3. Оптимизация системы (нужно время впрыска)");

    match prompt_choice("Выберите расчет") {
        1 => {
            let system_type =
                match prompt_choice("Тип системы (1-Карбюратор, 2-Инжектор, 3-Прямой впрыск)") {
                    1 => fuel::FuelSystemType::Carburetor,
                    3 => fuel::FuelSystemType::DirectInjection,
                    _ => fuel::FuelSystemType::PortInjection,
                };
            let input = fuel::SystemFlowInput {
                system_type,
                injector_count: prompt_u32("Количество форсунок", 4),
                injector_flow_g_min: prompt_f64("Производительность форсунки (г/мин)", 250.0),
                pressure_bar: prompt_f64("Давление в системе (бар)", 3.0),
                fuel_temperature_c: prompt_f64("Температура топлива (°C)", 20.0),
            };
            match fuel::system_flow(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        2 => {
            let total_flow_g_min = match session.fuel_flow_g_min() {
                Ok(v) => v,
                Err(e) => return report_error(e),
            };
            let input = fuel::InjectorDutyInput {
                power_hp: prompt_f64("Мощность (л.с.)", 200.0),
                bsfc: prompt_f64("Удельный расход топлива (кг/(л.с.*час))", 0.3),
                rpm: prompt_f64("Обороты (об/мин)", 6000.0),
                total_flow_g_min,
            };
            match fuel::injector_duty(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        3 => {
            let (required_flow_g_s, current_duty_percent) = match session.injector_duty() {
                Ok(v) => v,
                Err(e) => return report_error(e),
            };
            let current_total_flow_g_min = match session.fuel_flow_g_min() {
                Ok(v) => v,
                Err(e) => return report_error(e),
            };
            let input = fuel::FuelOptimizationInput {
                target_duty_percent: prompt_f64("Целевой цикл впрыска (%)", 80.0),
                required_flow_g_s,
                current_duty_percent,
                current_total_flow_g_min,
            };
            match fuel::optimize(&input) {
                Ok(result) => finish(session, db, result.to_evaluation(&input)),
                Err(e) => report_error(e),
            }
        }
        _ => {}
    }
}

// ============================================================================
// Report, history and export
// ============================================================================

fn show_report(session: &Session) {
    if session.report().is_empty() {
        println!("Отчет пуст. Сначала выполните расчеты.");
        return;
    }
    println!();
    print!("{}", session.report().render_text());
}

fn show_history(db: &Database) -> CalcResult<()> {
    let entries = db.history(HISTORY_VIEW_LIMIT)?;
    if entries.is_empty() {
        println!("История расчетов пуста.");
        return Ok(());
    }
    for entry in entries {
        println!();
        println!(
            "#{} [{}] {}",
            entry.id,
            entry.timestamp,
            labels::calc_type_title(&entry.calc_type)
        );
        println!("  Параметры:");
        for (key, value) in entry.parameters.iter() {
            println!("    {}: {}", labels::field_label(key), value.display());
        }
        println!("  Результаты:");
        for (key, value) in entry.results.iter() {
            println!("    {}: {}", labels::field_label(key), value.display());
        }
    }
    Ok(())
}

fn export_csv(db: &Database) -> CalcResult<()> {
    let entries = db.history(HISTORY_EXPORT_LIMIT)?;
    if entries.is_empty() {
        println!("Нет данных для экспорта.");
        return Ok(());
    }
    let default_name = format!(
        "История_расчетов_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let mut name = prompt_line(&format!("Имя файла [{}]: ", default_name));
    if name.is_empty() {
        name = default_name;
    }
    if !name.to_lowercase().ends_with(".csv") {
        name.push_str(".csv");
    }
    export::export_history_csv(&PathBuf::from(&name), &entries)?;
    println!("История расчетов экспортирована: {}", name);
    Ok(())
}

fn export_pdf(session: &Session, db: &Database) -> CalcResult<()> {
    if session.report().is_empty() {
        println!("Нет данных для экспорта. Сначала выполните расчеты.");
        return Ok(());
    }
    let default_name = format!(
        "Отчет_автомобиль_{}.pdf",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let mut name = prompt_line(&format!("Имя файла [{}]: ", default_name));
    if name.is_empty() {
        name = default_name;
    }
    if !name.to_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    let summary = export::export_report_pdf(db, session.report(), &PathBuf::from(&name))?;
    println!(
        "Отчет сохранен: {} (снимок id {}, записей в истории: {})",
        name, summary.report_id, summary.audit_rows
    );
    Ok(())
}

/// Print stand-in: write the HTML document the report tab renders.
fn export_html(session: &Session) -> CalcResult<()> {
    if session.report().is_empty() {
        println!("Нет данных для печати. Сначала выполните расчеты.");
        return Ok(());
    }
    let default_name = format!(
        "Отчет_автомобиль_{}.html",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let mut name = prompt_line(&format!("Имя файла [{}]: ", default_name));
    if name.is_empty() {
        name = default_name;
    }
    if !name.to_lowercase().ends_with(".html") {
        name.push_str(".html");
    }
    std::fs::write(&name, session.report().render_html())
        .map_err(|e| camber_core::CalcError::export("html", e.to_string()))?;
    println!("Отчет сохранен: {}", name);
    Ok(())
}

fn clear_history(db: &Database) -> CalcResult<()> {
    let answer = prompt_line("Удалить всю историю расчетов? (y/N): ");
    if answer.eq_ignore_ascii_case("y") {
        db.clear()?;
        println!("История очищена.");
    }
    Ok(())
}

// ============================================================================
// Entry point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Camber - Калькулятор характеристик автомобиля");
    println!("=============================================");

    let db = match Database::open(DEFAULT_DB_FILE) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Не удалось открыть базу данных: {}", e);
            std::process::exit(1);
        }
    };
    let mut session = Session::new();

    loop {
        println!();
        println!("1. Двигатель");
        println!("2. Трансмиссия");
        println!("3. Динамика");
        println!("4. Тормозная система");
        println!("5. Подвеска");
        println!("6. Топливная система");
        println!("7. Показать отчет");
        println!("8. История расчетов (последние {})", HISTORY_VIEW_LIMIT);
        println!("9. Экспорт истории в CSV");
        println!("10. Экспорт отчета в PDF");
        println!("11. Печать отчета (HTML)");
        println!("12. Очистить историю");
        println!("0. Выход");

        let choice = prompt_line("Выберите пункт: ");
        if choice == "0" {
            break;
        }
        let result = match choice.parse::<u32>().unwrap_or(0) {
            1 => {
                engine_menu(&mut session, &db);
                Ok(())
            }
            2 => {
                transmission_menu(&mut session, &db);
                Ok(())
            }
            3 => {
                dynamics_menu(&mut session, &db);
                Ok(())
            }
            4 => {
                braking_menu(&mut session, &db);
                Ok(())
            }
            5 => {
                suspension_menu(&mut session, &db);
                Ok(())
            }
            6 => {
                fuel_menu(&mut session, &db);
                Ok(())
            }
            7 => {
                show_report(&session);
                Ok(())
            }
            8 => show_history(&db),
            9 => export_csv(&db),
            10 => export_pdf(&session, &db),
            11 => export_html(&session),
            12 => clear_history(&db),
            _ => {
                println!("Неизвестный пункт меню.");
                Ok(())
            }
        };
        if let Err(e) = result {
            report_error(e);
        }
    }
}
