//! # Braking Calculations
//!
//! Brake torque from caliper geometry, stopping distance, front/rear
//! balance and disc heating. Brake balance consumes the brake-torque
//! result as a typed input carried by the session.
//!
//! ## Example
//!
//! ```rust
//! use camber_core::calculations::braking::{StoppingDistanceInput, stopping_distance};
//!
//! let input = StoppingDistanceInput {
//!     speed_kmh: 100.0,
//!     weight_kg: 1500.0,
//!     road_coefficient: 0.8,
//!     front_fraction: 0.6,
//! };
//!
//! let result = stopping_distance(&input).unwrap();
//! assert!((result.stopping_distance_m - 49.2).abs() < 0.1);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{CalcKind, CarryOver, Evaluation};
use crate::errors::{CalcError, CalcResult};
use crate::params::ParamMap;
use crate::units::{Bar, Kmh, Mps, Pascals, GRAVITY};

/// Fraction of the disc radius where the pad center acts
const EFFECTIVE_RADIUS_FACTOR: f64 = 0.4;
/// Share of kinetic energy absorbed by the discs
const HEAT_FRACTION: f64 = 0.9;
/// Cast iron disc density, kg/m³
const DISC_DENSITY: f64 = 7200.0;
/// Cast iron specific heat, J/(kg·K)
const DISC_SPECIFIC_HEAT: f64 = 500.0;
/// Forward weight transfer assumed under hard braking
const WEIGHT_TRANSFER: f64 = 0.3;
/// Tolerance around the optimal front fraction for an "optimal" rating
const BALANCE_TOLERANCE: f64 = 0.05;

// ============================================================================
// Brake torque
// ============================================================================

/// Input for brake torque from caliper geometry.
///
/// ## JSON Example
///
/// ```json
/// {
///   "piston_count": 4,
///   "piston_diameter_mm": 40.0,
///   "disc_diameter_mm": 320.0,
///   "pad_coefficient": 0.4,
///   "pressure_bar": 80.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrakeTorqueInput {
    pub piston_count: u32,
    pub piston_diameter_mm: f64,
    pub disc_diameter_mm: f64,
    /// Pad friction coefficient
    pub pad_coefficient: f64,
    /// Hydraulic line pressure, bar
    pub pressure_bar: f64,
}

impl BrakeTorqueInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.piston_count == 0 {
            return Err(CalcError::invalid_input(
                "piston_count",
                self.piston_count.to_string(),
                "At least one piston is required",
            ));
        }
        if self.piston_diameter_mm <= 0.0 || self.disc_diameter_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "piston_diameter_mm/disc_diameter_mm",
                format!("{}, {}", self.piston_diameter_mm, self.disc_diameter_mm),
                "Diameters must be positive",
            ));
        }
        if self.pad_coefficient <= 0.0 {
            return Err(CalcError::invalid_input(
                "pad_coefficient",
                self.pad_coefficient.to_string(),
                "Pad friction coefficient must be positive",
            ));
        }
        if self.pressure_bar <= 0.0 {
            return Err(CalcError::invalid_input(
                "pressure_bar",
                self.pressure_bar.to_string(),
                "Line pressure must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrakeTorqueResult {
    pub brake_torque_nm: f64,
    /// Total pad friction force, N
    pub friction_force_n: f64,
}

impl BrakeTorqueResult {
    pub fn to_evaluation(&self, input: &BrakeTorqueInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("piston_count", input.piston_count as f64);
        params.insert("piston_diameter", input.piston_diameter_mm / 1000.0);
        params.insert("disc_diameter", input.disc_diameter_mm / 1000.0);
        params.insert("pad_coef", input.pad_coefficient);
        params.insert("pressure", input.pressure_bar);

        let mut results = ParamMap::new();
        results.insert("brake_torque", self.brake_torque_nm);
        results.insert("friction_force", self.friction_force_n);

        Evaluation::new(CalcKind::BrakeTorque, params, results)
            .with_group(
                "brake_torque",
                vec![
                    ("piston_count".into(), format!("{}", input.piston_count)),
                    (
                        "piston_diameter".into(),
                        format!("{:.1} мм", input.piston_diameter_mm),
                    ),
                    (
                        "disc_diameter".into(),
                        format!("{:.1} мм", input.disc_diameter_mm),
                    ),
                    ("pad_coef".into(), format!("{:.2}", input.pad_coefficient)),
                    ("pressure".into(), format!("{:.1} бар", input.pressure_bar)),
                    (
                        "brake_torque".into(),
                        format!("{:.1} Н·м", self.brake_torque_nm),
                    ),
                    (
                        "friction_force".into(),
                        format!("{:.1} Н", self.friction_force_n),
                    ),
                ],
            )
            .with_carry(CarryOver::BrakeTorque {
                torque_nm: self.brake_torque_nm,
            })
    }
}

/// Clamp force from line pressure and piston area, torque at 40% of
/// the disc radius.
pub fn brake_torque(input: &BrakeTorqueInput) -> CalcResult<BrakeTorqueResult> {
    input.validate()?;

    let piston_dia_m = input.piston_diameter_mm / 1000.0;
    let disc_dia_m = input.disc_diameter_mm / 1000.0;
    let pressure_pa = Pascals::from(Bar(input.pressure_bar)).value();

    let piston_area = std::f64::consts::PI * piston_dia_m.powi(2) / 4.0;
    let normal_force = pressure_pa * piston_area * input.piston_count as f64;
    let effective_radius = EFFECTIVE_RADIUS_FACTOR * (disc_dia_m / 2.0);

    let friction_force_n = normal_force * input.pad_coefficient;
    let brake_torque_nm = friction_force_n * effective_radius;

    Ok(BrakeTorqueResult {
        brake_torque_nm,
        friction_force_n,
    })
}

// ============================================================================
// Stopping distance
// ============================================================================

/// Input for the stopping-distance calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoppingDistanceInput {
    pub speed_kmh: f64,
    pub weight_kg: f64,
    /// Tire/road friction coefficient
    pub road_coefficient: f64,
    /// Static front axle load fraction, 0..1
    pub front_fraction: f64,
}

impl StoppingDistanceInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.weight_kg == 0.0 {
            return Err(CalcError::domain(
                "stopping_distance",
                "Vehicle weight cannot be zero",
            ));
        }
        if self.weight_kg < 0.0 || self.speed_kmh < 0.0 {
            return Err(CalcError::invalid_input(
                "speed_kmh/weight_kg",
                format!("{}, {}", self.speed_kmh, self.weight_kg),
                "Speed and weight must be non-negative",
            ));
        }
        if self.road_coefficient <= 0.0 {
            return Err(CalcError::domain(
                "stopping_distance",
                "Road friction coefficient must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.front_fraction) {
            return Err(CalcError::invalid_input(
                "front_fraction",
                self.front_fraction.to_string(),
                "Front axle fraction must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoppingDistanceResult {
    pub stopping_distance_m: f64,
    pub stopping_time_s: f64,
    /// Deceleration, m/s²
    pub deceleration_ms2: f64,
    /// Front axle load under braking, N
    pub front_load_n: f64,
    /// Rear axle load under braking, N
    pub rear_load_n: f64,
}

impl StoppingDistanceResult {
    pub fn to_evaluation(&self, input: &StoppingDistanceInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("speed", input.speed_kmh);
        params.insert("weight", input.weight_kg);
        params.insert("road_coef", input.road_coefficient);
        params.insert("front_percent", input.front_fraction);

        let mut results = ParamMap::new();
        results.insert("stopping_distance", self.stopping_distance_m);
        results.insert("stopping_time", self.stopping_time_s);
        results.insert("deceleration", self.deceleration_ms2);

        Evaluation::new(CalcKind::StoppingDistance, params, results).with_group(
            "stopping_distance",
            vec![
                ("speed".into(), format!("{} км/ч", input.speed_kmh)),
                ("weight".into(), format!("{} кг", input.weight_kg)),
                ("road_coef".into(), format!("{:.2}", input.road_coefficient)),
                ("front_load".into(), format!("{:.1} Н", self.front_load_n)),
                ("rear_load".into(), format!("{:.1} Н", self.rear_load_n)),
                (
                    "stopping_distance".into(),
                    format!("{:.2} м", self.stopping_distance_m),
                ),
                (
                    "stopping_time".into(),
                    format!("{:.2} с", self.stopping_time_s),
                ),
                (
                    "deceleration".into(),
                    format!("{:.1} g", self.deceleration_ms2 / GRAVITY),
                ),
            ],
        )
    }
}

/// S = v²/(2μg), with axle loads shifted 30% forward under braking.
pub fn stopping_distance(input: &StoppingDistanceInput) -> CalcResult<StoppingDistanceResult> {
    input.validate()?;

    let speed_mps = Mps::from(Kmh(input.speed_kmh)).value();
    let front_load_n = input.weight_kg * GRAVITY * (input.front_fraction + WEIGHT_TRANSFER);
    let rear_load_n = input.weight_kg * GRAVITY * ((1.0 - input.front_fraction) - WEIGHT_TRANSFER);

    let deceleration_ms2 = input.road_coefficient * GRAVITY;
    let stopping_distance_m = speed_mps.powi(2) / (2.0 * deceleration_ms2);
    let stopping_time_s = speed_mps / deceleration_ms2;

    Ok(StoppingDistanceResult {
        stopping_distance_m,
        stopping_time_s,
        deceleration_ms2,
        front_load_n,
        rear_load_n,
    })
}

// ============================================================================
// Brake balance
// ============================================================================

/// Qualitative balance verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceRating {
    Optimal,
    FrontBiased,
    RearBiased,
}

impl BalanceRating {
    pub fn name_ru(self) -> &'static str {
        match self {
            BalanceRating::Optimal => "Оптимальный",
            BalanceRating::FrontBiased => "Смещен вперед",
            BalanceRating::RearBiased => "Смещен назад",
        }
    }
}

/// Input for front/rear balance. `brake_torque_nm` is the earlier
/// brake-torque result, supplied by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrakeBalanceInput {
    /// Front brake share, 0..1
    pub front_fraction: f64,
    /// Total brake torque from the brake-torque calculation, N·m
    pub brake_torque_nm: f64,
    pub weight_kg: f64,
}

impl BrakeBalanceInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.weight_kg == 0.0 {
            return Err(CalcError::domain(
                "brake_balance",
                "Vehicle weight cannot be zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.front_fraction) {
            return Err(CalcError::invalid_input(
                "front_fraction",
                self.front_fraction.to_string(),
                "Front brake fraction must be between 0 and 1",
            ));
        }
        if self.brake_torque_nm <= 0.0 {
            return Err(CalcError::invalid_input(
                "brake_torque_nm",
                self.brake_torque_nm.to_string(),
                "Brake torque must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrakeBalanceResult {
    pub front_torque_nm: f64,
    pub rear_torque_nm: f64,
    /// Weight-dependent optimal front share, 0..1
    pub optimal_fraction: f64,
    pub rating: BalanceRating,
}

impl BrakeBalanceResult {
    pub fn to_evaluation(&self, input: &BrakeBalanceInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("front_percent", input.front_fraction);
        params.insert("brake_torque", input.brake_torque_nm);
        params.insert("weight", input.weight_kg);

        let mut results = ParamMap::new();
        results.insert("front_force", self.front_torque_nm);
        results.insert("rear_force", self.rear_torque_nm);
        results.insert("optimal_percent", self.optimal_fraction);
        results.insert("balance_rating", self.rating.name_ru());

        Evaluation::new(CalcKind::BrakeBalance, params, results).with_group(
            "brake_balance",
            vec![
                (
                    "front_percent".into(),
                    format!("{:.1}%", input.front_fraction * 100.0),
                ),
                (
                    "rear_percent".into(),
                    format!("{:.1}%", (1.0 - input.front_fraction) * 100.0),
                ),
                (
                    "front_force".into(),
                    format!("{:.1} Н·м", self.front_torque_nm),
                ),
                (
                    "rear_force".into(),
                    format!("{:.1} Н·м", self.rear_torque_nm),
                ),
                (
                    "optimal_percent".into(),
                    format!("{:.1}%", self.optimal_fraction * 100.0),
                ),
                ("balance_rating".into(), self.rating.name_ru().to_string()),
            ],
        )
    }
}

/// Split the total torque by the dialed-in fraction and compare against
/// the weight-dependent optimum (0.6 at 1000 kg, +0.01 per 100 kg).
pub fn brake_balance(input: &BrakeBalanceInput) -> CalcResult<BrakeBalanceResult> {
    input.validate()?;

    let front_torque_nm = input.brake_torque_nm * input.front_fraction;
    let rear_torque_nm = input.brake_torque_nm * (1.0 - input.front_fraction);
    let optimal_fraction = 0.6 + (input.weight_kg - 1000.0) * 1e-4;

    let rating = if (input.front_fraction - optimal_fraction).abs() < BALANCE_TOLERANCE {
        BalanceRating::Optimal
    } else if input.front_fraction > optimal_fraction {
        BalanceRating::FrontBiased
    } else {
        BalanceRating::RearBiased
    };

    Ok(BrakeBalanceResult {
        front_torque_nm,
        rear_torque_nm,
        optimal_fraction,
        rating,
    })
}

// ============================================================================
// Disc heating
// ============================================================================

/// Input for the single-stop disc temperature rise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrakeTemperatureInput {
    pub speed_kmh: f64,
    pub weight_kg: f64,
    pub disc_diameter_mm: f64,
    pub disc_thickness_mm: f64,
}

impl BrakeTemperatureInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.weight_kg == 0.0 || self.disc_diameter_mm == 0.0 || self.disc_thickness_mm == 0.0 {
            return Err(CalcError::domain(
                "brake_temperature",
                "Weight, disc diameter and thickness cannot be zero",
            ));
        }
        if self.weight_kg < 0.0
            || self.speed_kmh < 0.0
            || self.disc_diameter_mm < 0.0
            || self.disc_thickness_mm < 0.0
        {
            return Err(CalcError::invalid_input(
                "speed_kmh/weight_kg/disc_diameter_mm/disc_thickness_mm",
                format!(
                    "{}, {}, {}, {}",
                    self.speed_kmh, self.weight_kg, self.disc_diameter_mm, self.disc_thickness_mm
                ),
                "Inputs must be non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrakeTemperatureResult {
    pub kinetic_energy_j: f64,
    pub heat_energy_j: f64,
    pub temperature_rise_c: f64,
}

impl BrakeTemperatureResult {
    pub fn to_evaluation(&self, input: &BrakeTemperatureInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("speed", input.speed_kmh);
        params.insert("weight", input.weight_kg);
        params.insert("disc_diameter", input.disc_diameter_mm / 1000.0);
        params.insert("disc_thickness", input.disc_thickness_mm / 1000.0);

        let mut results = ParamMap::new();
        results.insert("kinetic_energy", self.kinetic_energy_j);
        results.insert("heat_energy", self.heat_energy_j);
        results.insert("temperature_rise", self.temperature_rise_c);

        Evaluation::new(CalcKind::BrakeTemperature, params, results).with_group(
            "brake_temperature",
            vec![
                ("speed".into(), format!("{} км/ч", input.speed_kmh)),
                ("weight".into(), format!("{} кг", input.weight_kg)),
                (
                    "disc_diameter".into(),
                    format!("{:.1} мм", input.disc_diameter_mm),
                ),
                (
                    "disc_thickness".into(),
                    format!("{:.1} мм", input.disc_thickness_mm),
                ),
                (
                    "kinetic_energy".into(),
                    format!("{:.1} кДж", self.kinetic_energy_j / 1000.0),
                ),
                (
                    "heat_energy".into(),
                    format!("{:.1} кДж", self.heat_energy_j / 1000.0),
                ),
                (
                    "temperature_rise".into(),
                    format!("{:.1} °C", self.temperature_rise_c),
                ),
            ],
        )
    }
}

/// One full stop: 90% of kinetic energy into a solid cast-iron disc.
pub fn brake_temperature(input: &BrakeTemperatureInput) -> CalcResult<BrakeTemperatureResult> {
    input.validate()?;

    let speed_mps = Mps::from(Kmh(input.speed_kmh)).value();
    let kinetic_energy_j = 0.5 * input.weight_kg * speed_mps.powi(2);
    let heat_energy_j = kinetic_energy_j * HEAT_FRACTION;

    let disc_dia_m = input.disc_diameter_mm / 1000.0;
    let disc_thickness_m = input.disc_thickness_mm / 1000.0;
    let disc_volume = std::f64::consts::PI * (disc_dia_m / 2.0).powi(2) * disc_thickness_m;
    let disc_mass = disc_volume * DISC_DENSITY;
    let temperature_rise_c = heat_energy_j / (disc_mass * DISC_SPECIFIC_HEAT);

    Ok(BrakeTemperatureResult {
        kinetic_energy_j,
        heat_energy_j,
        temperature_rise_c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brake_torque() {
        let input = BrakeTorqueInput {
            piston_count: 4,
            piston_diameter_mm: 40.0,
            disc_diameter_mm: 320.0,
            pad_coefficient: 0.4,
            pressure_bar: 80.0,
        };
        let result = brake_torque(&input).unwrap();
        // area = π*0.04²/4 = 1.2566e-3 m²; F = 8e6*1.2566e-3*4 = 40212 N
        // friction = 16085 N; torque = 16085 * 0.4*0.16 = 1029 N·m
        assert!((result.friction_force_n - 16_085.0).abs() < 5.0);
        assert!((result.brake_torque_nm - 1029.4).abs() < 1.0);
    }

    #[test]
    fn test_brake_torque_carries_result() {
        let input = BrakeTorqueInput {
            piston_count: 4,
            piston_diameter_mm: 40.0,
            disc_diameter_mm: 320.0,
            pad_coefficient: 0.4,
            pressure_bar: 80.0,
        };
        let result = brake_torque(&input).unwrap();
        let eval = result.to_evaluation(&input);
        match eval.carry {
            Some(CarryOver::BrakeTorque { torque_nm }) => {
                assert_eq!(torque_nm, result.brake_torque_nm)
            }
            other => panic!("expected brake torque carry, got {:?}", other),
        }
    }

    #[test]
    fn test_stopping_distance_reference_case() {
        // 100 km/h, μ = 0.8: 27.78²/(2*0.8*9.81) ≈ 49.2 m
        let input = StoppingDistanceInput {
            speed_kmh: 100.0,
            weight_kg: 1500.0,
            road_coefficient: 0.8,
            front_fraction: 0.6,
        };
        let result = stopping_distance(&input).unwrap();
        assert!((result.stopping_distance_m - 49.2).abs() < 0.1);
        assert!((result.deceleration_ms2 - 7.848).abs() < 1e-9);
        assert!((result.stopping_time_s - 27.7778 / 7.848).abs() < 1e-3);
    }

    #[test]
    fn test_stopping_distance_axle_loads() {
        let input = StoppingDistanceInput {
            speed_kmh: 100.0,
            weight_kg: 1000.0,
            road_coefficient: 0.8,
            front_fraction: 0.6,
        };
        let result = stopping_distance(&input).unwrap();
        // front: 1000*9.81*0.9, rear: 1000*9.81*0.1
        assert!((result.front_load_n - 8829.0).abs() < 0.1);
        assert!((result.rear_load_n - 981.0).abs() < 0.1);
    }

    #[test]
    fn test_stopping_distance_zero_weight_is_domain_error() {
        let input = StoppingDistanceInput {
            speed_kmh: 100.0,
            weight_kg: 0.0,
            road_coefficient: 0.8,
            front_fraction: 0.6,
        };
        assert!(stopping_distance(&input).is_err());
    }

    #[test]
    fn test_brake_balance_optimal() {
        // 1500 kg: optimal = 0.6 + 500*1e-4 = 0.65; 0.62 is within 0.05
        let input = BrakeBalanceInput {
            front_fraction: 0.62,
            brake_torque_nm: 1000.0,
            weight_kg: 1500.0,
        };
        let result = brake_balance(&input).unwrap();
        assert!((result.optimal_fraction - 0.65).abs() < 1e-9);
        assert_eq!(result.rating, BalanceRating::Optimal);
        assert!((result.front_torque_nm - 620.0).abs() < 1e-9);
        assert!((result.rear_torque_nm - 380.0).abs() < 1e-9);
    }

    #[test]
    fn test_brake_balance_biased() {
        let mut input = BrakeBalanceInput {
            front_fraction: 0.75,
            brake_torque_nm: 1000.0,
            weight_kg: 1000.0,
        };
        assert_eq!(
            brake_balance(&input).unwrap().rating,
            BalanceRating::FrontBiased
        );
        input.front_fraction = 0.4;
        assert_eq!(
            brake_balance(&input).unwrap().rating,
            BalanceRating::RearBiased
        );
    }

    #[test]
    fn test_brake_temperature() {
        let input = BrakeTemperatureInput {
            speed_kmh: 100.0,
            weight_kg: 1500.0,
            disc_diameter_mm: 320.0,
            disc_thickness_mm: 28.0,
        };
        let result = brake_temperature(&input).unwrap();
        // KE = 0.5*1500*27.78² ≈ 578.7 kJ, heat ≈ 520.8 kJ
        assert!((result.kinetic_energy_j / 1000.0 - 578.7).abs() < 0.5);
        assert!((result.heat_energy_j - result.kinetic_energy_j * 0.9).abs() < 1e-6);
        assert!(result.temperature_rise_c > 0.0);
    }

    #[test]
    fn test_brake_temperature_zero_disc_is_domain_error() {
        let input = BrakeTemperatureInput {
            speed_kmh: 100.0,
            weight_kg: 1500.0,
            disc_diameter_mm: 0.0,
            disc_thickness_mm: 28.0,
        };
        let err = brake_temperature(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }
}
