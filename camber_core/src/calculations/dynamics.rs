//! # Vehicle Dynamics Calculations
//!
//! Traction force at the wheels, straight-line acceleration estimates and
//! optimal shift points. Each writes a named block into the dynamics
//! report section.

use serde::{Deserialize, Serialize};

use crate::calculations::{CalcKind, Evaluation};
use crate::errors::{CalcError, CalcResult};
use crate::params::{ParamMap, ParamValue};
use crate::units::GRAVITY;

/// Drivetrain efficiency assumed for the traction estimate
const DRIVELINE_EFFICIENCY: f64 = 0.9;

/// Air density at sea level, kg/m³
const AIR_DENSITY: f64 = 1.225;

// ============================================================================
// Traction force
// ============================================================================

/// Input for traction force at the driven wheels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TractionInput {
    /// Engine torque, N·m
    pub torque_nm: f64,
    /// Selected gear ratio
    pub gear_ratio: f64,
    pub final_drive: f64,
    /// Loaded tire radius, m
    pub tire_radius_m: f64,
}

impl TractionInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.tire_radius_m == 0.0 {
            return Err(CalcError::domain(
                "traction_force",
                "Tire radius cannot be zero",
            ));
        }
        if self.tire_radius_m < 0.0 {
            return Err(CalcError::invalid_input(
                "tire_radius_m",
                self.tire_radius_m.to_string(),
                "Tire radius must be positive",
            ));
        }
        if self.torque_nm < 0.0 || self.gear_ratio < 0.0 || self.final_drive < 0.0 {
            return Err(CalcError::invalid_input(
                "torque_nm/gear_ratio/final_drive",
                format!(
                    "{}, {}, {}",
                    self.torque_nm, self.gear_ratio, self.final_drive
                ),
                "Torque and ratios cannot be negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TractionResult {
    /// Force at the contact patch, N
    pub traction_force_n: f64,
    /// The same force expressed in kgf
    pub equivalent_force_kgf: f64,
    /// Overall drive ratio used
    pub total_ratio: f64,
}

impl TractionResult {
    pub fn to_evaluation(&self, input: &TractionInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("torque", input.torque_nm);
        params.insert("gear_ratio", input.gear_ratio);
        params.insert("final_drive", input.final_drive);
        params.insert("tire_radius", input.tire_radius_m);

        let mut results = ParamMap::new();
        results.insert("traction_force", self.traction_force_n);
        results.insert("equivalent_force", self.equivalent_force_kgf);

        Evaluation::new(CalcKind::TractionForce, params, results).with_group(
            "traction_force",
            vec![
                ("torque".into(), format!("{} Н·м", input.torque_nm)),
                ("gear_ratio".into(), format!("{:.2}", self.total_ratio)),
                (
                    "traction_force".into(),
                    format!("{:.2} Н", self.traction_force_n),
                ),
                (
                    "equivalent_force".into(),
                    format!("{:.2} кгс", self.equivalent_force_kgf),
                ),
            ],
        )
    }
}

/// Traction force F = T·i_g·i_f·η / r.
pub fn traction_force(input: &TractionInput) -> CalcResult<TractionResult> {
    input.validate()?;

    let total_ratio = input.gear_ratio * input.final_drive;
    let traction_force_n =
        input.torque_nm * total_ratio * DRIVELINE_EFFICIENCY / input.tire_radius_m;
    let equivalent_force_kgf = traction_force_n / GRAVITY;

    Ok(TractionResult {
        traction_force_n,
        equivalent_force_kgf,
        total_ratio,
    })
}

// ============================================================================
// Acceleration estimates
// ============================================================================

/// Input for straight-line performance estimates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccelerationInput {
    /// Curb weight, kg
    pub weight_kg: f64,
    /// Engine power, hp
    pub power_hp: f64,
    /// Aerodynamic drag coefficient
    pub drag_coefficient: f64,
    /// Frontal area, m²
    pub frontal_area_m2: f64,
    /// Rolling resistance coefficient (recorded, not used by the estimates)
    pub rolling_resistance: f64,
}

impl AccelerationInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.weight_kg == 0.0 {
            return Err(CalcError::domain(
                "acceleration",
                "Vehicle weight cannot be zero",
            ));
        }
        if self.weight_kg < 0.0 {
            return Err(CalcError::invalid_input(
                "weight_kg",
                self.weight_kg.to_string(),
                "Weight must be positive",
            ));
        }
        if self.power_hp <= 0.0 {
            return Err(CalcError::invalid_input(
                "power_hp",
                self.power_hp.to_string(),
                "Power must be positive",
            ));
        }
        if self.drag_coefficient <= 0.0 || self.frontal_area_m2 <= 0.0 {
            return Err(CalcError::invalid_input(
                "drag_coefficient/frontal_area_m2",
                format!("{}, {}", self.drag_coefficient, self.frontal_area_m2),
                "Drag coefficient and frontal area must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccelerationResult {
    /// Power-to-weight, kW/t
    pub specific_power_kw_t: f64,
    /// Drag-limited top speed, km/h
    pub max_speed_kmh: f64,
    /// Estimated 0–100 km/h time, s
    pub time_0_100_s: f64,
}

impl AccelerationResult {
    pub fn to_evaluation(&self, input: &AccelerationInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("weight", input.weight_kg);
        params.insert("power", input.power_hp);
        params.insert("drag_coef", input.drag_coefficient);
        params.insert("frontal_area", input.frontal_area_m2);
        params.insert("rolling_resist", input.rolling_resistance);

        let mut results = ParamMap::new();
        results.insert("specific_power", self.specific_power_kw_t);
        results.insert("max_speed", self.max_speed_kmh);
        results.insert("acceleration_0_100", self.time_0_100_s);

        Evaluation::new(CalcKind::Acceleration, params, results).with_group(
            "acceleration",
            vec![
                (
                    "specific_power".into(),
                    format!("{:.2} кВт/т", self.specific_power_kw_t),
                ),
                ("max_speed".into(), format!("{:.1} км/ч", self.max_speed_kmh)),
                (
                    "acceleration_0_100".into(),
                    format!("{:.2} сек", self.time_0_100_s),
                ),
            ],
        )
    }
}

/// Power-to-weight, drag-limited top speed (P = ½ρ·cd·A·v³) and an
/// empirical 0–100 estimate.
pub fn acceleration(input: &AccelerationInput) -> CalcResult<AccelerationResult> {
    input.validate()?;

    let specific_power_kw_t = input.power_hp * 1000.0 / (input.weight_kg * GRAVITY);

    let max_speed_ms = (2.0 * input.power_hp * 735.5
        / (AIR_DENSITY * input.drag_coefficient * input.frontal_area_m2))
        .powf(1.0 / 3.0);
    let max_speed_kmh = max_speed_ms * 3.6;

    let time_0_100_s = 2.5 * (input.weight_kg / (input.power_hp * 0.7)).sqrt();

    Ok(AccelerationResult {
        specific_power_kw_t,
        max_speed_kmh,
        time_0_100_s,
    })
}

// ============================================================================
// Shift points
// ============================================================================

/// Stock five-speed ratio set used for the shift-speed table
pub const STOCK_GEAR_RATIOS: [f64; 5] = [3.5, 2.1, 1.5, 1.1, 0.9];
/// Final drive used with the stock set
pub const STOCK_FINAL_DRIVE: f64 = 4.1;
/// Tire radius used with the stock set, m
pub const STOCK_TIRE_RADIUS_M: f64 = 0.33;

/// Input for the optimal-shift-point table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftPointsInput {
    /// Engine speed at peak power, rpm
    pub peak_rpm: f64,
    /// Peak power, hp
    pub power_hp: f64,
    /// Peak torque, N·m
    pub torque_nm: f64,
}

impl ShiftPointsInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.peak_rpm == 0.0 || self.power_hp == 0.0 || self.torque_nm == 0.0 {
            return Err(CalcError::domain(
                "shift_points",
                "Peak rpm, power and torque must all be set",
            ));
        }
        if self.peak_rpm < 0.0 || self.power_hp < 0.0 || self.torque_nm < 0.0 {
            return Err(CalcError::invalid_input(
                "peak_rpm/power_hp/torque_nm",
                format!("{}, {}, {}", self.peak_rpm, self.power_hp, self.torque_nm),
                "Engine parameters must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftPointsResult {
    /// Recommended shift rpm (10% past peak power)
    pub shift_rpm: f64,
    /// Road speed at the shift point per stock gear, km/h
    pub shift_speeds_kmh: Vec<f64>,
}

impl ShiftPointsResult {
    pub fn to_evaluation(&self, input: &ShiftPointsInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("rpm", input.peak_rpm);
        params.insert("power", input.power_hp);
        params.insert("torque", input.torque_nm);
        params.insert(
            "gear_ratios",
            ParamValue::list(STOCK_GEAR_RATIOS.iter().map(|r| format!("{:.1}", r))),
        );
        params.insert("final_drive", STOCK_FINAL_DRIVE);
        params.insert("tire_radius", STOCK_TIRE_RADIUS_M);

        let mut results = ParamMap::new();
        results.insert("optimal_rpm", self.shift_rpm);
        let mut fields = vec![("optimal_rpm".into(), format!("{:.0} об/мин", self.shift_rpm))];
        for (i, speed) in self.shift_speeds_kmh.iter().enumerate() {
            let key = format!("gear_{}", i + 1);
            results.insert(key.clone(), *speed);
            fields.push((key, format!("{:.1} км/ч", speed)));
        }

        Evaluation::new(CalcKind::ShiftPoints, params, results)
            .with_group("shift_points", fields)
    }
}

/// Shift 10% past peak power; speeds over the stock five-speed set.
pub fn shift_points(input: &ShiftPointsInput) -> CalcResult<ShiftPointsResult> {
    input.validate()?;

    let shift_rpm = input.peak_rpm * 1.1;

    let shift_speeds_kmh = STOCK_GEAR_RATIOS
        .iter()
        .map(|gear| {
            shift_rpm * 60.0 * 2.0 * std::f64::consts::PI * STOCK_TIRE_RADIUS_M
                / (gear * STOCK_FINAL_DRIVE * 1000.0)
                * 3.6
        })
        .collect();

    Ok(ShiftPointsResult {
        shift_rpm,
        shift_speeds_kmh,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traction_force() {
        // 350 * 3.5 * 4.1 * 0.9 / 0.33 ≈ 13698 N
        let input = TractionInput {
            torque_nm: 350.0,
            gear_ratio: 3.5,
            final_drive: 4.1,
            tire_radius_m: 0.33,
        };
        let result = traction_force(&input).unwrap();
        assert!((result.traction_force_n - 13_698.0).abs() < 5.0);
        assert!((result.equivalent_force_kgf - result.traction_force_n / 9.81).abs() < 1e-9);
    }

    #[test]
    fn test_traction_zero_radius_is_domain_error() {
        let input = TractionInput {
            torque_nm: 350.0,
            gear_ratio: 3.5,
            final_drive: 4.1,
            tire_radius_m: 0.0,
        };
        let err = traction_force(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_acceleration_estimates() {
        let input = AccelerationInput {
            weight_kg: 1400.0,
            power_hp: 200.0,
            drag_coefficient: 0.35,
            frontal_area_m2: 2.2,
            rolling_resistance: 0.015,
        };
        let result = acceleration(&input).unwrap();
        // 200*1000/(1400*9.81) ≈ 14.56 kW/t
        assert!((result.specific_power_kw_t - 14.56).abs() < 0.01);
        // t = 2.5*sqrt(1400/140) ≈ 7.91 s
        assert!((result.time_0_100_s - 7.91).abs() < 0.01);
        assert!(result.max_speed_kmh > 150.0 && result.max_speed_kmh < 300.0);
    }

    #[test]
    fn test_acceleration_zero_weight_is_domain_error() {
        let input = AccelerationInput {
            weight_kg: 0.0,
            power_hp: 200.0,
            drag_coefficient: 0.35,
            frontal_area_m2: 2.2,
            rolling_resistance: 0.015,
        };
        assert!(acceleration(&input).is_err());
    }

    #[test]
    fn test_more_power_means_higher_top_speed() {
        let mut input = AccelerationInput {
            weight_kg: 1400.0,
            power_hp: 150.0,
            drag_coefficient: 0.35,
            frontal_area_m2: 2.2,
            rolling_resistance: 0.015,
        };
        let low = acceleration(&input).unwrap().max_speed_kmh;
        input.power_hp = 300.0;
        let high = acceleration(&input).unwrap().max_speed_kmh;
        assert!(high > low);
    }

    #[test]
    fn test_shift_points() {
        let input = ShiftPointsInput {
            peak_rpm: 5500.0,
            power_hp: 200.0,
            torque_nm: 300.0,
        };
        let result = shift_points(&input).unwrap();
        assert!((result.shift_rpm - 6050.0).abs() < 1e-9);
        assert_eq!(result.shift_speeds_kmh.len(), 5);
        let expected = result.shift_rpm * 60.0 * 2.0 * std::f64::consts::PI * 0.33
            / (3.5 * 4.1 * 1000.0)
            * 3.6;
        assert!((result.shift_speeds_kmh[0] - expected).abs() < 1e-9);
        for pair in result.shift_speeds_kmh.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_shift_points_missing_parameter() {
        let input = ShiftPointsInput {
            peak_rpm: 5500.0,
            power_hp: 0.0,
            torque_nm: 300.0,
        };
        let err = shift_points(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_evaluations_write_named_blocks() {
        let input = TractionInput {
            torque_nm: 350.0,
            gear_ratio: 3.5,
            final_drive: 4.1,
            tire_radius_m: 0.33,
        };
        let eval = traction_force(&input).unwrap().to_evaluation(&input);
        assert_eq!(eval.kind.section(), "dynamics");
        assert!(eval.report_fields.iter().any(|(k, _)| k == "traction_force"));
    }
}
