//! # Suspension Calculations
//!
//! Wheel rate through the linkage motion ratio, sprung natural frequency,
//! damper coefficients and a simplified instant-center estimate. Spring
//! frequency consumes the wheel-rate result carried by the session.

use serde::{Deserialize, Serialize};

use crate::calculations::{CalcKind, CarryOver, Evaluation};
use crate::errors::{CalcError, CalcResult};
use crate::params::ParamMap;
use crate::units::{NPerM, NPerMm, GRAVITY};

// ============================================================================
// Wheel rate
// ============================================================================

/// Input for effective wheel rate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "spring_rate_n_mm": 60.0,
///   "motion_ratio": 0.95,
///   "preload_mm": 5.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelRateInput {
    /// Spring stiffness, N/mm
    pub spring_rate_n_mm: f64,
    /// Wheel travel per unit spring travel
    pub motion_ratio: f64,
    /// Spring preload, mm
    pub preload_mm: f64,
}

impl WheelRateInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.spring_rate_n_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "spring_rate_n_mm",
                self.spring_rate_n_mm.to_string(),
                "Spring rate must be positive",
            ));
        }
        if self.motion_ratio <= 0.0 {
            return Err(CalcError::invalid_input(
                "motion_ratio",
                self.motion_ratio.to_string(),
                "Motion ratio must be positive",
            ));
        }
        if self.preload_mm < 0.0 {
            return Err(CalcError::invalid_input(
                "preload_mm",
                self.preload_mm.to_string(),
                "Preload cannot be negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelRateResult {
    /// Effective stiffness at the wheel, N/mm
    pub wheel_rate_n_mm: f64,
    /// Preload force through the linkage, N
    pub force_at_ride_n: f64,
}

impl WheelRateResult {
    pub fn to_evaluation(&self, input: &WheelRateInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("spring_rate", input.spring_rate_n_mm);
        params.insert("motion_ratio", input.motion_ratio);
        params.insert("preload", input.preload_mm);

        let mut results = ParamMap::new();
        results.insert("wheel_rate", self.wheel_rate_n_mm);
        results.insert("force_at_ride", self.force_at_ride_n);

        Evaluation::new(CalcKind::SuspensionWheelRate, params, results)
            .with_field("spring_rate", format!("{:.1} Н/мм", input.spring_rate_n_mm))
            .with_field("motion_ratio", format!("{:.2}", input.motion_ratio))
            .with_field("preload", format!("{:.1} мм", input.preload_mm))
            .with_field("wheel_rate", format!("{:.2} Н/мм", self.wheel_rate_n_mm))
            .with_field("force_at_ride", format!("{:.2} Н", self.force_at_ride_n))
            .with_carry(CarryOver::WheelRate {
                rate_n_per_mm: self.wheel_rate_n_mm,
            })
    }
}

/// Wheel rate k_w = k·MR², preload force F = k·preload·MR.
pub fn wheel_rate(input: &WheelRateInput) -> CalcResult<WheelRateResult> {
    input.validate()?;

    let wheel_rate_n_mm = input.spring_rate_n_mm * input.motion_ratio.powi(2);
    let force_at_ride_n = input.spring_rate_n_mm * input.preload_mm * input.motion_ratio;

    Ok(WheelRateResult {
        wheel_rate_n_mm,
        force_at_ride_n,
    })
}

// ============================================================================
// Natural frequency
// ============================================================================

/// Input for sprung natural frequency. `wheel_rate_n_mm` is the earlier
/// wheel-rate result, supplied by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyInput {
    /// Sprung mass per wheel, kg
    pub weight_kg: f64,
    /// Static corner load, kg
    pub corner_weight_kg: f64,
    /// Effective wheel rate from the wheel-rate calculation, N/mm
    pub wheel_rate_n_mm: f64,
}

impl FrequencyInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.weight_kg <= 0.0 || self.corner_weight_kg <= 0.0 {
            return Err(CalcError::invalid_input(
                "weight_kg/corner_weight_kg",
                format!("{}, {}", self.weight_kg, self.corner_weight_kg),
                "Wheel masses must be positive",
            ));
        }
        if self.wheel_rate_n_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "wheel_rate_n_mm",
                self.wheel_rate_n_mm.to_string(),
                "Wheel rate must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyResult {
    pub frequency_hz: f64,
    /// Static compression under the corner load, mm
    pub ride_height_change_mm: f64,
}

impl FrequencyResult {
    pub fn to_evaluation(&self, input: &FrequencyInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("weight", input.weight_kg);
        params.insert("corner_weight", input.corner_weight_kg);
        params.insert("wheel_rate", input.wheel_rate_n_mm);

        let mut results = ParamMap::new();
        results.insert("frequency", self.frequency_hz);
        results.insert("ride_height_change", self.ride_height_change_mm);

        Evaluation::new(CalcKind::SuspensionFrequency, params, results)
            .with_field("weight", format!("{:.1} кг", input.weight_kg))
            .with_field("corner_weight", format!("{:.1} кг", input.corner_weight_kg))
            .with_field("frequency", format!("{:.2} Гц", self.frequency_hz))
            .with_field(
                "ride_height_change",
                format!("{:.1} мм", self.ride_height_change_mm),
            )
    }
}

/// f = (1/2π)·√(k/m·g-normalized), with k taken at the wheel.
pub fn frequency(input: &FrequencyInput) -> CalcResult<FrequencyResult> {
    input.validate()?;

    let rate_n_m = NPerM::from(NPerMm(input.wheel_rate_n_mm)).value();
    let frequency_hz = 1.0 / (2.0 * std::f64::consts::PI)
        * (rate_n_m / (input.weight_kg * GRAVITY)).sqrt();
    let ride_height_change_mm = input.corner_weight_kg * GRAVITY / rate_n_m * 1000.0;

    Ok(FrequencyResult {
        frequency_hz,
        ride_height_change_mm,
    })
}

// ============================================================================
// Damping coefficients
// ============================================================================

/// Input for damper coefficients relative to critical damping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DampingInput {
    /// Rebound damping figure
    pub rebound: f64,
    /// Bump (compression) damping figure
    pub bump: f64,
    /// Critical damping reference
    pub critical_damping: f64,
}

impl DampingInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.critical_damping == 0.0 {
            return Err(CalcError::domain(
                "suspension_damping",
                "Critical damping cannot be zero",
            ));
        }
        if self.rebound < 0.0 || self.bump < 0.0 || self.critical_damping < 0.0 {
            return Err(CalcError::invalid_input(
                "rebound/bump/critical_damping",
                format!("{}, {}, {}", self.rebound, self.bump, self.critical_damping),
                "Damping figures must be non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DampingResult {
    pub rebound_coefficient: f64,
    pub bump_coefficient: f64,
    /// Mean of rebound and bump coefficients
    pub damping_ratio: f64,
}

impl DampingResult {
    pub fn to_evaluation(&self, input: &DampingInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("rebound", input.rebound);
        params.insert("bump", input.bump);
        params.insert("crit_damping", input.critical_damping);

        let mut results = ParamMap::new();
        results.insert("rebound_coeff", self.rebound_coefficient);
        results.insert("bump_coeff", self.bump_coefficient);
        results.insert("damping_ratio", self.damping_ratio);

        Evaluation::new(CalcKind::SuspensionDamping, params, results)
            .with_field("rebound_coeff", format!("{:.2}", self.rebound_coefficient))
            .with_field("bump_coeff", format!("{:.2}", self.bump_coefficient))
            .with_field("damping_ratio", format!("{:.2}", self.damping_ratio))
    }
}

/// Rebound and bump each relative to critical damping, plus their mean.
pub fn damping(input: &DampingInput) -> CalcResult<DampingResult> {
    input.validate()?;

    let rebound_coefficient = input.rebound / input.critical_damping;
    let bump_coefficient = input.bump / input.critical_damping;
    let damping_ratio = (rebound_coefficient + bump_coefficient) / 2.0;

    Ok(DampingResult {
        rebound_coefficient,
        bump_coefficient,
        damping_ratio,
    })
}

// ============================================================================
// Kinematics
// ============================================================================

/// Input for the instant-center height estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicsInput {
    /// Control arm length, mm
    pub arm_length_mm: f64,
    /// Inner pivot height above ground, mm
    pub pivot_height_mm: f64,
}

impl KinematicsInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.arm_length_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "arm_length_mm",
                self.arm_length_mm.to_string(),
                "Arm length must be positive",
            ));
        }
        if self.pivot_height_mm < 0.0 {
            return Err(CalcError::invalid_input(
                "pivot_height_mm",
                self.pivot_height_mm.to_string(),
                "Pivot height cannot be negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicsResult {
    /// Instant center height above ground, mm
    pub instant_center_height_mm: f64,
}

impl KinematicsResult {
    pub fn to_evaluation(&self, input: &KinematicsInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("arm_length", input.arm_length_mm);
        params.insert("pivot_height", input.pivot_height_mm);

        let mut results = ParamMap::new();
        results.insert("instant_center_height", self.instant_center_height_mm);

        Evaluation::new(CalcKind::SuspensionKinematics, params, results)
            .with_field("arm_length", format!("{:.1} мм", input.arm_length_mm))
            .with_field("pivot_height", format!("{:.1} мм", input.pivot_height_mm))
            .with_field(
                "instant_center_height",
                format!("{:.1} мм", self.instant_center_height_mm),
            )
    }
}

/// Simplified instant center: pivot height plus half the arm length.
pub fn kinematics(input: &KinematicsInput) -> CalcResult<KinematicsResult> {
    input.validate()?;

    let instant_center_height_mm = input.pivot_height_mm + input.arm_length_mm * 0.5;

    Ok(KinematicsResult {
        instant_center_height_mm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_rate() {
        let input = WheelRateInput {
            spring_rate_n_mm: 60.0,
            motion_ratio: 0.95,
            preload_mm: 5.0,
        };
        let result = wheel_rate(&input).unwrap();
        assert!((result.wheel_rate_n_mm - 54.15).abs() < 1e-9);
        assert!((result.force_at_ride_n - 285.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_rate_carries_result() {
        let input = WheelRateInput {
            spring_rate_n_mm: 60.0,
            motion_ratio: 1.0,
            preload_mm: 0.0,
        };
        let result = wheel_rate(&input).unwrap();
        let eval = result.to_evaluation(&input);
        assert_eq!(
            eval.carry,
            Some(CarryOver::WheelRate { rate_n_per_mm: 60.0 })
        );
    }

    #[test]
    fn test_frequency() {
        // 50 N/mm at 350 kg: f = (1/2π)·√(50000/(350·9.81)) ≈ 0.607 Hz
        let input = FrequencyInput {
            weight_kg: 350.0,
            corner_weight_kg: 380.0,
            wheel_rate_n_mm: 50.0,
        };
        let result = frequency(&input).unwrap();
        assert!((result.frequency_hz - 0.607).abs() < 0.001);
        // 380·9.81/50000·1000 ≈ 74.6 mm
        assert!((result.ride_height_change_mm - 74.556).abs() < 0.01);
    }

    #[test]
    fn test_frequency_requires_positive_rate() {
        let input = FrequencyInput {
            weight_kg: 350.0,
            corner_weight_kg: 380.0,
            wheel_rate_n_mm: 0.0,
        };
        assert!(frequency(&input).is_err());
    }

    #[test]
    fn test_damping() {
        let input = DampingInput {
            rebound: 1500.0,
            bump: 900.0,
            critical_damping: 2000.0,
        };
        let result = damping(&input).unwrap();
        assert!((result.rebound_coefficient - 0.75).abs() < 1e-9);
        assert!((result.bump_coefficient - 0.45).abs() < 1e-9);
        assert!((result.damping_ratio - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_damping_zero_critical_is_domain_error() {
        let input = DampingInput {
            rebound: 1500.0,
            bump: 900.0,
            critical_damping: 0.0,
        };
        let err = damping(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_kinematics() {
        let input = KinematicsInput {
            arm_length_mm: 350.0,
            pivot_height_mm: 120.0,
        };
        let result = kinematics(&input).unwrap();
        assert!((result.instant_center_height_mm - 295.0).abs() < 1e-9);
    }
}
