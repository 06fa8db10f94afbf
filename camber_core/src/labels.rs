//! # Russian Label Tables
//!
//! Single source for the Russian display strings used by the report
//! renderers and the history/CSV exports. Three lookups:
//!
//! - [`section_title`] - report section headers
//! - [`calc_type_title`] - calculation type names shown in history rows
//! - [`field_label`] - per-field labels with units
//!
//! Unknown keys pass through verbatim, so a new field renders with its
//! raw key until a translation is added here.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Report section header for a section name.
pub fn section_title(name: &str) -> &str {
    match name {
        "engine" => "Двигатель",
        "engine_power_calc" => "Расчет мощности двигателя",
        "engine_air_flow" => "Расход воздуха двигателя",
        "engine_compression" => "Степень сжатия двигателя",
        "transmission" => "Трансмиссия",
        "dynamics" => "Динамика",
        "braking" => "Тормозная система",
        "suspension" => "Подвеска",
        "fuel_system" => "Топливная система",
        other => other,
    }
}

/// History display name for a calculation type tag.
///
/// Covers the calculation tags plus the `<section>_calculation` audit
/// rows written when a report snapshot is exported.
pub fn calc_type_title(tag: &str) -> &str {
    match tag {
        "engine_efficiency" => "КПД двигателя",
        "engine_mep" => "Среднее эффективное давление",
        "engine_power" => "Мощность двигателя",
        "engine_air_flow" => "Расход воздуха",
        "engine_compression" => "Степень сжатия",
        "transmission_gear_speeds" => "Скорости на передачах",
        "transmission_ratio_calculation" => "Расчет передаточного отношения",
        "transmission_efficiency" => "КПД трансмиссии",
        "traction_force" => "Тяговая сила",
        "acceleration" => "Разгонная динамика",
        "shift_points" => "Точки переключения",
        "brake_torque" => "Тормозной момент",
        "stopping_distance" => "Тормозной путь",
        "brake_balance" => "Баланс тормозов",
        "brake_temperature" => "Нагрев тормозов",
        "suspension_wheel_rate" => "Жесткость подвески",
        "suspension_frequency" => "Частота подвески",
        "suspension_damping" => "Демпфирование подвески",
        "suspension_kinematics" => "Кинематика подвески",
        "fuel_system_flow" => "Производительность топливной системы",
        "injector_duty" => "Время впрыска",
        "fuel_optimization" => "Оптимизация топливной системы",
        "engine_calculation" => "Расчет двигателя",
        "transmission_calculation" => "Расчет трансмиссии",
        "dynamics_calculation" => "Расчет динамики",
        "braking_calculation" => "Расчет тормозной системы",
        "suspension_calculation" => "Расчет подвески",
        "fuel_system_calculation" => "Расчет топливной системы",
        other => other,
    }
}

static FIELD_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Общие
        ("id", "ID"),
        ("timestamp", "Дата и время"),
        ("calculation_type", "Тип расчета"),
        ("parameters", "Параметры"),
        ("results", "Результаты"),
        ("note", "Примечание"),
        ("weight", "Масса (кг)"),
        ("temperature", "Температура (°C)"),
        // Двигатель
        ("power_hp", "Мощность (л.с.)"),
        ("fuel_consumption", "Расход топлива (кг/ч)"),
        ("fuel_type", "Тип топлива"),
        ("efficiency", "Эффективный КПД (%)"),
        ("displacement", "Объем двигателя (см³)"),
        ("torque", "Крутящий момент (Н·м)"),
        ("mep", "Среднее эффективное давление (бар)"),
        ("mep_kgcm2", "Среднее эффективное давление (кгс/см²)"),
        ("rpm", "Обороты (об/мин)"),
        ("power_kw", "Мощность (кВт)"),
        ("volumetric_efficiency", "КПД наполнения"),
        ("air_flow", "Расход воздуха (кг/ч)"),
        ("cylinder_volume", "Объем цилиндра (см³)"),
        ("chamber_volume", "Объем камеры сгорания (см³)"),
        ("compression_ratio", "Степень сжатия"),
        // Трансмиссия
        ("gear_ratios", "Передаточные числа"),
        ("final_drive", "Главная передача"),
        ("tire_diameter", "Диаметр колеса (мм)"),
        ("redline_rpm", "Максимальные обороты (об/мин)"),
        ("speeds_at_redline", "Скорости на максимальных оборотах"),
        ("transmission_efficiency", "КПД трансмиссии (%)"),
        ("wheel_power", "Мощность на колесах (л.с.)"),
        ("engine_power", "Мощность двигателя (л.с.)"),
        ("calculated_gear_ratio", "Расчетное передаточное число"),
        ("calculated_ratio", "Расчетное передаточное число"),
        ("rpm1", "Обороты 1 (об/мин)"),
        ("rpm2", "Обороты 2 (об/мин)"),
        ("speed1", "Скорость 1 (км/ч)"),
        ("speed2", "Скорость 2 (км/ч)"),
        ("tire_radius", "Радиус колеса (м)"),
        // Динамика
        ("traction_force", "Тяговая сила (Н)"),
        ("gear_ratio", "Передаточное число"),
        ("equivalent_force", "Эквивалентная сила (кгс)"),
        ("specific_power", "Удельная мощность (кВт/т)"),
        ("max_speed", "Максимальная скорость (км/ч)"),
        ("acceleration_0_100", "Разгон 0-100 км/ч (с)"),
        ("optimal_rpm", "Оптимальные обороты (об/мин)"),
        ("shift_points", "Точки переключения передач"),
        ("acceleration", "Разгонная динамика"),
        ("drag_coef", "Коэффициент аэродинамического сопротивления"),
        ("frontal_area", "Лобовая площадь (м²)"),
        ("gear_1", "Передача 1"),
        ("gear_2", "Передача 2"),
        ("gear_3", "Передача 3"),
        ("gear_4", "Передача 4"),
        ("gear_5", "Передача 5"),
        ("gear_6", "Передача 6"),
        // Тормозная система
        ("brake_torque", "Тормозной момент (Н·м)"),
        ("piston_count", "Количество поршней"),
        ("piston_diameter", "Диаметр поршня (мм)"),
        ("disc_diameter", "Диаметр диска (мм)"),
        ("pad_coef", "Коэффициент трения колодок"),
        ("pressure", "Давление в системе (бар)"),
        ("friction_force", "Сила трения (Н)"),
        ("brake_balance", "Баланс тормозов"),
        ("front_percent", "Передние тормоза (%)"),
        ("rear_percent", "Задние тормоза (%)"),
        ("front_force", "Сила на передних тормозах (Н·м)"),
        ("rear_force", "Сила на задних тормозах (Н·м)"),
        ("optimal_percent", "Оптимальный баланс (%)"),
        ("balance_rating", "Оценка баланса"),
        ("stopping_distance", "Тормозной путь (м)"),
        ("speed", "Скорость (км/ч)"),
        ("road_coef", "Коэффициент сцепления с дорогой"),
        ("road_coeff", "Коэффициент сцепления с дорогой"),
        ("front_load", "Нагрузка на переднюю ось (Н)"),
        ("rear_load", "Нагрузка на заднюю ось (Н)"),
        ("stopping_time", "Время торможения (с)"),
        ("deceleration", "Замедление (g)"),
        ("brake_temperature", "Температура тормозов"),
        ("disc_thickness", "Толщина диска (мм)"),
        ("kinetic_energy", "Кинетическая энергия (кДж)"),
        ("heat_energy", "Тепловая энергия (кДж)"),
        ("temperature_rise", "Рост температуры (°C)"),
        ("vehicle_weight", "Масса автомобиля (кг)"),
        // Подвеска
        ("spring_rate", "Жесткость пружины (Н/мм)"),
        ("motion_ratio", "Коэффициент рычага"),
        ("preload", "Предварительная нагрузка (мм)"),
        ("wheel_rate", "Эффективная жесткость колеса (Н/мм)"),
        ("force_at_ride", "Сила в положении 'покоя' (Н)"),
        ("corner_weight", "Нагрузка на колесо (кг)"),
        ("frequency", "Частота подвески (Гц)"),
        ("ride_height_change", "Изменение клиренса (мм)"),
        ("rebound_coeff", "Коэффициент отбоя"),
        ("bump_coeff", "Коэффициент сжатия"),
        ("damping_ratio", "Коэффициент демпфирования"),
        ("instant_center_height", "Высота мгновенного центра (мм)"),
        ("arm_length", "Длина рычага (мм)"),
        ("pivot_height", "Высота оси вращения (мм)"),
        // Топливная система
        ("system_type", "Тип системы"),
        ("injector_count", "Количество форсунок"),
        ("injector_flow", "Производительность форсунки (г/мин)"),
        ("total_flow", "Общий расход топлива (г/мин)"),
        ("flow_per_second", "Расход топлива в секунду (г/сек)"),
        ("bsfc", "Удельный расход топлива (кг/(л.с.*час))"),
        ("duty_cycle", "Цикл впрыска (%)"),
        ("injector_open_time", "Время открытия форсунки (мс)"),
        ("required_volume", "Требуемый объем топлива (г/час)"),
        ("target_duty", "Целевой цикл впрыска (%)"),
        ("optimal_flow", "Оптимальный расход топлива (г/мин)"),
        ("optimal_pressure", "Оптимальное давление (бар)"),
        ("corrected_flow", "Производительность форсунки с поправкой (г/мин)"),
        ("safety_factor", "Коэффициент запаса"),
    ])
});

/// Field label with units, or the key itself when untranslated.
pub fn field_label(key: &str) -> &str {
    FIELD_LABELS.get(key).copied().unwrap_or(key)
}
