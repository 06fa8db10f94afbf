//! # Transmission Calculations
//!
//! Road speed per gear at redline, gear ratio recovered from two
//! speed/rpm observations, and drivetrain efficiency.
//!
//! ## Example
//!
//! ```rust
//! use camber_core::calculations::transmission::{GearSpeedsInput, gear_speeds};
//!
//! let input = GearSpeedsInput {
//!     gear_ratios: vec![3.5, 2.1, 1.5, 1.1, 0.9],
//!     final_drive: 4.1,
//!     tire_diameter_mm: 650.0,
//!     redline_rpm: 6500.0,
//! };
//!
//! let result = gear_speeds(&input).unwrap();
//! assert_eq!(result.speeds_kmh.len(), 5);
//! // higher gears are faster
//! assert!(result.speeds_kmh[4] > result.speeds_kmh[0]);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{CalcKind, Evaluation};
use crate::errors::{CalcError, CalcResult};
use crate::params::{ParamMap, ParamValue};
use crate::units::{Kmh, Meters, Millimeters, Mps};

/// Gearbox ratio inputs are capped at six forward gears, like the form
/// the calculations came from.
pub const MAX_GEARS: usize = 6;

// ============================================================================
// Speed per gear at redline
// ============================================================================

/// Input for the per-gear speed table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "gear_ratios": [3.5, 2.1, 1.5, 1.1, 0.9],
///   "final_drive": 4.1,
///   "tire_diameter_mm": 650.0,
///   "redline_rpm": 6500.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearSpeedsInput {
    /// Forward gear ratios, first gear first (1 to 6 entries)
    pub gear_ratios: Vec<f64>,
    pub final_drive: f64,
    pub tire_diameter_mm: f64,
    pub redline_rpm: f64,
}

impl GearSpeedsInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.gear_ratios.is_empty() {
            return Err(CalcError::invalid_input(
                "gear_ratios",
                "[]",
                "At least one gear ratio is required",
            ));
        }
        if self.gear_ratios.len() > MAX_GEARS {
            return Err(CalcError::invalid_input(
                "gear_ratios",
                self.gear_ratios.len().to_string(),
                "At most six gear ratios are supported",
            ));
        }
        for (i, ratio) in self.gear_ratios.iter().enumerate() {
            if *ratio <= 0.0 {
                return Err(CalcError::invalid_input(
                    format!("gear_ratios[{}]", i),
                    ratio.to_string(),
                    "Gear ratio must be positive",
                ));
            }
        }
        if self.final_drive <= 0.0 {
            return Err(CalcError::invalid_input(
                "final_drive",
                self.final_drive.to_string(),
                "Final drive ratio must be positive",
            ));
        }
        if self.tire_diameter_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "tire_diameter_mm",
                self.tire_diameter_mm.to_string(),
                "Tire diameter must be positive",
            ));
        }
        if self.redline_rpm <= 0.0 {
            return Err(CalcError::invalid_input(
                "redline_rpm",
                self.redline_rpm.to_string(),
                "Redline must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearSpeedsResult {
    /// Road speed at redline per gear, km/h, first gear first
    pub speeds_kmh: Vec<f64>,
}

impl GearSpeedsResult {
    pub fn to_evaluation(&self, input: &GearSpeedsInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert(
            "gear_ratios",
            ParamValue::list(input.gear_ratios.iter().map(|r| format!("{:.2}", r))),
        );
        params.insert("final_drive", input.final_drive);
        params.insert("tire_diameter_mm", input.tire_diameter_mm);
        params.insert("redline_rpm", input.redline_rpm);

        let mut results = ParamMap::new();
        let mut speed_fields = Vec::new();
        for (i, speed) in self.speeds_kmh.iter().enumerate() {
            let key = format!("gear_{}", i + 1);
            results.insert(key.clone(), ParamValue::text(format!("{:.1} км/ч", speed)));
            speed_fields.push((key, format!("{:.1} км/ч", speed)));
        }

        Evaluation::new(CalcKind::TransmissionGearSpeeds, params, results)
            .with_field(
                "gear_ratios",
                input
                    .gear_ratios
                    .iter()
                    .map(|r| format!("{:.2}", r))
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .with_field("final_drive", format!("{:.2}", input.final_drive))
            .with_field(
                "tire_diameter",
                format!("{:.0} мм", input.tire_diameter_mm),
            )
            .with_field("redline_rpm", format!("{:.0} об/мин", input.redline_rpm))
            .with_group("speeds_at_redline", speed_fields)
    }
}

/// Road speed at redline per gear from the overall drive ratio and
/// wheel circumference.
pub fn gear_speeds(input: &GearSpeedsInput) -> CalcResult<GearSpeedsResult> {
    input.validate()?;

    let tire_diameter_m = Meters::from(Millimeters(input.tire_diameter_mm)).value();
    let circumference = std::f64::consts::PI * tire_diameter_m;

    let speeds_kmh = input
        .gear_ratios
        .iter()
        .map(|gear| {
            let total_ratio = gear * input.final_drive;
            let speed_ms = input.redline_rpm * circumference / (total_ratio * 60.0);
            Kmh::from(Mps(speed_ms)).value()
        })
        .collect();

    Ok(GearSpeedsResult { speeds_kmh })
}

// ============================================================================
// Ratio from two observations
// ============================================================================

/// Input for recovering a gear ratio from two rpm/speed pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    pub rpm1: f64,
    pub speed1_kmh: f64,
    pub rpm2: f64,
    pub speed2_kmh: f64,
}

impl RatioInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.speed1_kmh == 0.0 || self.speed2_kmh == 0.0 {
            return Err(CalcError::domain(
                "transmission_ratio_calculation",
                "Speed cannot be zero",
            ));
        }
        if self.rpm1 <= 0.0 || self.rpm2 <= 0.0 {
            return Err(CalcError::invalid_input(
                "rpm",
                format!("{}, {}", self.rpm1, self.rpm2),
                "Engine speeds must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioResult {
    pub ratio: f64,
}

impl RatioResult {
    pub fn to_evaluation(&self, input: &RatioInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("rpm1", input.rpm1);
        params.insert("speed1", input.speed1_kmh);
        params.insert("rpm2", input.rpm2);
        params.insert("speed2", input.speed2_kmh);

        let mut results = ParamMap::new();
        results.insert("calculated_ratio", self.ratio);

        Evaluation::new(CalcKind::TransmissionRatioCalculation, params, results).with_group(
            "calculated_gear_ratio",
            vec![
                ("rpm1".into(), format!("{:.0} об/мин", input.rpm1)),
                ("speed1".into(), format!("{:.1} км/ч", input.speed1_kmh)),
                ("rpm2".into(), format!("{:.0} об/мин", input.rpm2)),
                ("speed2".into(), format!("{:.1} км/ч", input.speed2_kmh)),
                ("calculated_ratio".into(), format!("{:.3}", self.ratio)),
            ],
        )
    }
}

/// Ratio between two gears observed at steady speed:
/// (n₁·v₂) / (n₂·v₁).
pub fn ratio_from_speeds(input: &RatioInput) -> CalcResult<RatioResult> {
    input.validate()?;

    let ratio = input.rpm1 * input.speed2_kmh / (input.rpm2 * input.speed1_kmh);

    Ok(RatioResult { ratio })
}

// ============================================================================
// Drivetrain efficiency
// ============================================================================

/// Input for drivetrain efficiency from dyno readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransEfficiencyInput {
    /// Crankshaft power, hp
    pub engine_power_hp: f64,
    /// Measured wheel power, hp
    pub wheel_power_hp: f64,
}

impl TransEfficiencyInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.engine_power_hp <= 0.0 {
            return Err(CalcError::domain(
                "transmission_efficiency",
                "Engine power must be greater than zero",
            ));
        }
        if self.wheel_power_hp < 0.0 {
            return Err(CalcError::invalid_input(
                "wheel_power_hp",
                self.wheel_power_hp.to_string(),
                "Wheel power cannot be negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransEfficiencyResult {
    pub efficiency_percent: f64,
}

impl TransEfficiencyResult {
    pub fn to_evaluation(&self, input: &TransEfficiencyInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("engine_power", input.engine_power_hp);
        params.insert("wheel_power", input.wheel_power_hp);

        let mut results = ParamMap::new();
        results.insert("efficiency", self.efficiency_percent);

        Evaluation::new(CalcKind::TransmissionEfficiency, params, results).with_group(
            "transmission_efficiency",
            vec![
                (
                    "engine_power".into(),
                    format!("{:.1} л.с.", input.engine_power_hp),
                ),
                (
                    "wheel_power".into(),
                    format!("{:.1} л.с.", input.wheel_power_hp),
                ),
                (
                    "efficiency".into(),
                    format!("{:.1}%", self.efficiency_percent),
                ),
            ],
        )
    }
}

/// Drivetrain efficiency: wheel power over crankshaft power.
pub fn efficiency(input: &TransEfficiencyInput) -> CalcResult<TransEfficiencyResult> {
    input.validate()?;

    let efficiency_percent = input.wheel_power_hp / input.engine_power_hp * 100.0;

    Ok(TransEfficiencyResult { efficiency_percent })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gear_speeds_decrease_with_ratio() {
        let input = GearSpeedsInput {
            gear_ratios: vec![3.5, 2.1, 1.5, 1.1, 0.9],
            final_drive: 4.1,
            tire_diameter_mm: 650.0,
            redline_rpm: 6500.0,
        };
        let result = gear_speeds(&input).unwrap();
        assert_eq!(result.speeds_kmh.len(), 5);
        for pair in result.speeds_kmh.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_gear_speeds_first_gear_value() {
        // v = 6500 * π*0.65 / (3.5*4.1*60) * 3.6 ≈ 55.5 km/h
        let input = GearSpeedsInput {
            gear_ratios: vec![3.5],
            final_drive: 4.1,
            tire_diameter_mm: 650.0,
            redline_rpm: 6500.0,
        };
        let result = gear_speeds(&input).unwrap();
        assert!((result.speeds_kmh[0] - 55.5).abs() < 0.2);
    }

    #[test]
    fn test_gear_speeds_rejects_empty_set() {
        let input = GearSpeedsInput {
            gear_ratios: vec![],
            final_drive: 4.1,
            tire_diameter_mm: 650.0,
            redline_rpm: 6500.0,
        };
        let err = gear_speeds(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_gear_speeds_rejects_seven_gears() {
        let input = GearSpeedsInput {
            gear_ratios: vec![4.0, 3.0, 2.2, 1.7, 1.3, 1.0, 0.8],
            final_drive: 3.9,
            tire_diameter_mm: 640.0,
            redline_rpm: 7000.0,
        };
        assert!(gear_speeds(&input).is_err());
    }

    #[test]
    fn test_ratio_identity_for_same_gear() {
        // Same gear at two engine speeds: rpm scales linearly with speed
        let input = RatioInput {
            rpm1: 3000.0,
            speed1_kmh: 60.0,
            rpm2: 4500.0,
            speed2_kmh: 90.0,
        };
        let result = ratio_from_speeds(&input).unwrap();
        assert!((result.ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_zero_speed_is_domain_error() {
        let input = RatioInput {
            rpm1: 3000.0,
            speed1_kmh: 0.0,
            rpm2: 4500.0,
            speed2_kmh: 90.0,
        };
        let err = ratio_from_speeds(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_efficiency() {
        let input = TransEfficiencyInput {
            engine_power_hp: 200.0,
            wheel_power_hp: 170.0,
        };
        let result = efficiency(&input).unwrap();
        assert!((result.efficiency_percent - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_zero_engine_power_is_domain_error() {
        let input = TransEfficiencyInput {
            engine_power_hp: 0.0,
            wheel_power_hp: 170.0,
        };
        assert!(efficiency(&input).is_err());
    }

    #[test]
    fn test_gear_speeds_evaluation_shape() {
        let input = GearSpeedsInput {
            gear_ratios: vec![3.5, 2.1],
            final_drive: 4.1,
            tire_diameter_mm: 650.0,
            redline_rpm: 6500.0,
        };
        let eval = gear_speeds(&input).unwrap().to_evaluation(&input);
        assert_eq!(eval.kind, CalcKind::TransmissionGearSpeeds);
        assert!(eval.results.contains_key("gear_1"));
        assert!(eval.results.contains_key("gear_2"));
        // speeds table is a nested block in the report
        assert!(eval
            .report_fields
            .iter()
            .any(|(k, _)| k == "speeds_at_redline"));
    }
}
