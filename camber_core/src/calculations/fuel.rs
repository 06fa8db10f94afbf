//! # Fuel System Calculations
//!
//! Delivered system flow with pressure/temperature correction, injector
//! duty cycle, and sizing recommendations for a target duty. Duty consumes
//! the flow result and optimization consumes both, via the session's
//! typed carry-over.

use serde::{Deserialize, Serialize};

use crate::calculations::{CalcKind, CarryOver, Evaluation};
use crate::errors::{CalcError, CalcResult};
use crate::params::ParamMap;

/// Rated-flow reference pressure, bar
const BASE_PRESSURE_BAR: f64 = 3.0;

/// Metering hardware, with its delivery factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelSystemType {
    Carburetor,
    PortInjection,
    DirectInjection,
}

impl FuelSystemType {
    pub fn factor(self) -> f64 {
        match self {
            FuelSystemType::Carburetor => 0.7,
            FuelSystemType::PortInjection => 1.0,
            FuelSystemType::DirectInjection => 0.9,
        }
    }

    pub fn name_ru(self) -> &'static str {
        match self {
            FuelSystemType::Carburetor => "Карбюратор",
            FuelSystemType::PortInjection => "Инжектор",
            FuelSystemType::DirectInjection => "Прямой впрыск",
        }
    }
}

// ============================================================================
// System flow
// ============================================================================

/// Input for delivered system flow.
///
/// ## JSON Example
///
/// ```json
/// {
///   "system_type": "PortInjection",
///   "injector_count": 4,
///   "injector_flow_g_min": 250.0,
///   "pressure_bar": 3.5,
///   "fuel_temperature_c": 25.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemFlowInput {
    pub system_type: FuelSystemType,
    pub injector_count: u32,
    /// Rated flow per injector at 3 bar, g/min
    pub injector_flow_g_min: f64,
    /// Rail pressure, bar
    pub pressure_bar: f64,
    /// Fuel temperature, °C
    pub fuel_temperature_c: f64,
}

impl SystemFlowInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.injector_count == 0 {
            return Err(CalcError::invalid_input(
                "injector_count",
                self.injector_count.to_string(),
                "At least one injector is required",
            ));
        }
        if self.injector_flow_g_min <= 0.0 {
            return Err(CalcError::invalid_input(
                "injector_flow_g_min",
                self.injector_flow_g_min.to_string(),
                "Injector flow must be positive",
            ));
        }
        if self.pressure_bar <= 0.0 {
            return Err(CalcError::invalid_input(
                "pressure_bar",
                self.pressure_bar.to_string(),
                "Rail pressure must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemFlowResult {
    /// Per-injector flow after corrections, g/min
    pub corrected_flow_g_min: f64,
    /// All injectors together, g/min
    pub total_flow_g_min: f64,
    /// Total flow, g/s
    pub flow_per_second_g: f64,
}

impl SystemFlowResult {
    pub fn to_evaluation(&self, input: &SystemFlowInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("system_type", input.system_type.name_ru());
        params.insert("injector_count", input.injector_count as f64);
        params.insert("injector_flow", input.injector_flow_g_min);
        params.insert("pressure", input.pressure_bar);
        params.insert("temperature", input.fuel_temperature_c);

        let mut results = ParamMap::new();
        results.insert("corrected_flow", self.corrected_flow_g_min);
        results.insert("total_flow", self.total_flow_g_min);
        results.insert("flow_per_second", self.flow_per_second_g);

        Evaluation::new(CalcKind::FuelSystemFlow, params, results)
            .with_field("system_type", input.system_type.name_ru())
            .with_field("injector_count", format!("{}", input.injector_count))
            .with_field(
                "injector_flow",
                format!("{:.1} г/мин", input.injector_flow_g_min),
            )
            .with_field("pressure", format!("{:.1} бар", input.pressure_bar))
            .with_field(
                "temperature",
                format!("{:.1} °C", input.fuel_temperature_c),
            )
            .with_field("total_flow", format!("{:.1} г/мин", self.total_flow_g_min))
            .with_field(
                "flow_per_second",
                format!("{:.2} г/сек", self.flow_per_second_g),
            )
            .with_carry(CarryOver::FuelFlow {
                total_g_min: self.total_flow_g_min,
            })
    }
}

/// Rated flow scaled by √(p/3), a 0.1%/°C temperature correction and
/// the hardware delivery factor.
pub fn system_flow(input: &SystemFlowInput) -> CalcResult<SystemFlowResult> {
    input.validate()?;

    let temp_correction = 1.0 + (input.fuel_temperature_c - 20.0) * 0.001;
    let corrected_flow_g_min = input.injector_flow_g_min
        * (input.pressure_bar / BASE_PRESSURE_BAR).sqrt()
        * temp_correction
        * input.system_type.factor();
    let total_flow_g_min = corrected_flow_g_min * input.injector_count as f64;

    Ok(SystemFlowResult {
        corrected_flow_g_min,
        total_flow_g_min,
        flow_per_second_g: total_flow_g_min / 60.0,
    })
}

// ============================================================================
// Injector duty
// ============================================================================

/// Input for injector duty cycle. `total_flow_g_min` is the system-flow
/// result, supplied by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectorDutyInput {
    /// Engine power, hp
    pub power_hp: f64,
    /// Brake-specific fuel consumption, kg/(hp·h)
    pub bsfc: f64,
    pub rpm: f64,
    /// Total system flow from the flow calculation, g/min
    pub total_flow_g_min: f64,
}

impl InjectorDutyInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.power_hp <= 0.0 || self.bsfc <= 0.0 {
            return Err(CalcError::invalid_input(
                "power_hp/bsfc",
                format!("{}, {}", self.power_hp, self.bsfc),
                "Power and BSFC must be positive",
            ));
        }
        if self.rpm <= 0.0 {
            return Err(CalcError::invalid_input(
                "rpm",
                self.rpm.to_string(),
                "Engine speed must be positive",
            ));
        }
        if self.total_flow_g_min <= 0.0 {
            return Err(CalcError::invalid_input(
                "total_flow_g_min",
                self.total_flow_g_min.to_string(),
                "System flow must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectorDutyResult {
    /// Fuel demand at rated power, g/s
    pub required_flow_g_s: f64,
    pub duty_cycle_percent: f64,
    /// One engine cycle at the given rpm, ms
    pub cycle_time_ms: f64,
    /// Injector open time per cycle, ms
    pub injector_open_time_ms: f64,
}

impl InjectorDutyResult {
    pub fn to_evaluation(&self, input: &InjectorDutyInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("power", input.power_hp);
        params.insert("bsfc", input.bsfc);
        params.insert("rpm", input.rpm);
        params.insert("total_flow", input.total_flow_g_min);

        let mut results = ParamMap::new();
        results.insert("duty_cycle", self.duty_cycle_percent);
        results.insert("injector_open_time", self.injector_open_time_ms);
        results.insert("required_volume", self.required_flow_g_s * 3600.0);

        Evaluation::new(CalcKind::InjectorDuty, params, results)
            .with_field("engine_power", format!("{:.1} л.с.", input.power_hp))
            .with_field("bsfc", format!("{:.2} кг/(л.с.*час)", input.bsfc))
            .with_field("rpm", format!("{:.0} об/мин", input.rpm))
            .with_field("duty_cycle", format!("{:.1}%", self.duty_cycle_percent))
            .with_field(
                "injector_open_time",
                format!("{:.2} мс", self.injector_open_time_ms),
            )
            .with_field(
                "required_volume",
                format!("{:.1} г/час", self.required_flow_g_s * 3600.0),
            )
            .with_carry(CarryOver::InjectorDuty {
                required_g_s: self.required_flow_g_s,
                duty_percent: self.duty_cycle_percent,
            })
    }
}

/// Fuel demand from power and BSFC against available system flow.
pub fn injector_duty(input: &InjectorDutyInput) -> CalcResult<InjectorDutyResult> {
    input.validate()?;

    let required_flow_g_s = input.power_hp * input.bsfc / 3600.0 * 1000.0;
    let available_g_s = input.total_flow_g_min / 60.0;
    let duty_cycle_percent = required_flow_g_s / available_g_s * 100.0;

    let cycle_time_ms = 60.0 / input.rpm * 1000.0;
    let injector_open_time_ms = cycle_time_ms * duty_cycle_percent / 100.0;

    Ok(InjectorDutyResult {
        required_flow_g_s,
        duty_cycle_percent,
        cycle_time_ms,
        injector_open_time_ms,
    })
}

// ============================================================================
// Optimization
// ============================================================================

/// Input for sizing toward a target duty. The flow and demand figures
/// come from the two earlier calculations via the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelOptimizationInput {
    /// Desired duty cycle, percent (50–95)
    pub target_duty_percent: f64,
    /// Fuel demand from the duty calculation, g/s
    pub required_flow_g_s: f64,
    /// Duty from the duty calculation, percent
    pub current_duty_percent: f64,
    /// Total flow from the flow calculation, g/min
    pub current_total_flow_g_min: f64,
}

impl FuelOptimizationInput {
    pub fn validate(&self) -> CalcResult<()> {
        if !(50.0..=95.0).contains(&self.target_duty_percent) {
            return Err(CalcError::invalid_input(
                "target_duty_percent",
                self.target_duty_percent.to_string(),
                "Target duty must be between 50% and 95%",
            ));
        }
        if self.required_flow_g_s <= 0.0 || self.current_total_flow_g_min <= 0.0 {
            return Err(CalcError::invalid_input(
                "required_flow_g_s/current_total_flow_g_min",
                format!(
                    "{}, {}",
                    self.required_flow_g_s, self.current_total_flow_g_min
                ),
                "Flow figures must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelOptimizationResult {
    /// Recommended total system flow, g/min
    pub optimal_flow_g_min: f64,
    /// Rail pressure reaching that flow with the current injectors, bar
    pub optimal_pressure_bar: f64,
}

impl FuelOptimizationResult {
    pub fn to_evaluation(&self, input: &FuelOptimizationInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("target_duty", input.target_duty_percent);
        params.insert("current_duty", input.current_duty_percent);
        params.insert("required_flow", input.required_flow_g_s * 3600.0);

        let mut results = ParamMap::new();
        results.insert("optimal_flow", self.optimal_flow_g_min);
        results.insert("optimal_pressure", self.optimal_pressure_bar);

        Evaluation::new(CalcKind::FuelOptimization, params, results)
            .with_field("target_duty", format!("{}%", input.target_duty_percent))
            .with_field(
                "optimal_flow",
                format!("{:.1} г/мин", self.optimal_flow_g_min),
            )
            .with_field(
                "optimal_pressure",
                format!("{:.1} бар", self.optimal_pressure_bar),
            )
    }
}

/// Flow needed to land on the target duty, and the square-law pressure
/// that delivers it with the current injectors.
pub fn optimize(input: &FuelOptimizationInput) -> CalcResult<FuelOptimizationResult> {
    input.validate()?;

    let optimal_flow_g_min = input.required_flow_g_s * 100.0 / input.target_duty_percent * 60.0;
    let optimal_pressure_bar =
        BASE_PRESSURE_BAR * (optimal_flow_g_min / input.current_total_flow_g_min).powi(2);

    Ok(FuelOptimizationResult {
        optimal_flow_g_min,
        optimal_pressure_bar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow_input() -> SystemFlowInput {
        SystemFlowInput {
            system_type: FuelSystemType::PortInjection,
            injector_count: 4,
            injector_flow_g_min: 250.0,
            pressure_bar: 3.0,
            fuel_temperature_c: 20.0,
        }
    }

    #[test]
    fn test_system_flow_at_reference_conditions() {
        // 3 bar, 20 °C, port injection: no corrections apply
        let result = system_flow(&flow_input()).unwrap();
        assert!((result.corrected_flow_g_min - 250.0).abs() < 1e-9);
        assert!((result.total_flow_g_min - 1000.0).abs() < 1e-9);
        assert!((result.flow_per_second_g - 1000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_system_flow_pressure_scaling() {
        let mut input = flow_input();
        input.pressure_bar = 4.0;
        let result = system_flow(&input).unwrap();
        let expected = 250.0 * (4.0f64 / 3.0).sqrt() * 4.0;
        assert!((result.total_flow_g_min - expected).abs() < 1e-9);
    }

    #[test]
    fn test_system_flow_type_factors() {
        let mut input = flow_input();
        input.system_type = FuelSystemType::Carburetor;
        let carb = system_flow(&input).unwrap().total_flow_g_min;
        input.system_type = FuelSystemType::DirectInjection;
        let direct = system_flow(&input).unwrap().total_flow_g_min;
        assert!((carb - 700.0).abs() < 1e-9);
        assert!((direct - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_injector_duty() {
        // 200 hp, 0.45 bsfc: 25 g/s demand; 2000 g/min = 33.33 g/s available
        let input = InjectorDutyInput {
            power_hp: 200.0,
            bsfc: 0.45,
            rpm: 6000.0,
            total_flow_g_min: 2000.0,
        };
        let result = injector_duty(&input).unwrap();
        assert!((result.required_flow_g_s - 25.0).abs() < 1e-9);
        assert!((result.duty_cycle_percent - 75.0).abs() < 1e-9);
        assert!((result.cycle_time_ms - 10.0).abs() < 1e-9);
        assert!((result.injector_open_time_ms - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_injector_duty_requires_flow() {
        let input = InjectorDutyInput {
            power_hp: 200.0,
            bsfc: 0.45,
            rpm: 6000.0,
            total_flow_g_min: 0.0,
        };
        assert!(injector_duty(&input).is_err());
    }

    #[test]
    fn test_optimization() {
        // demand 25 g/s at 80% target: 1875 g/min optimal
        let input = FuelOptimizationInput {
            target_duty_percent: 80.0,
            required_flow_g_s: 25.0,
            current_duty_percent: 75.0,
            current_total_flow_g_min: 2000.0,
        };
        let result = optimize(&input).unwrap();
        assert!((result.optimal_flow_g_min - 1875.0).abs() < 1e-9);
        let expected_p = 3.0 * (1875.0f64 / 2000.0).powi(2);
        assert!((result.optimal_pressure_bar - expected_p).abs() < 1e-9);
    }

    #[test]
    fn test_optimization_rejects_target_outside_band() {
        let mut input = FuelOptimizationInput {
            target_duty_percent: 40.0,
            required_flow_g_s: 25.0,
            current_duty_percent: 75.0,
            current_total_flow_g_min: 2000.0,
        };
        assert!(optimize(&input).is_err());
        input.target_duty_percent = 96.0;
        assert!(optimize(&input).is_err());
        input.target_duty_percent = 95.0;
        assert!(optimize(&input).is_ok());
    }

    #[test]
    fn test_flow_then_duty_chain() {
        let flow = system_flow(&flow_input()).unwrap();
        let duty_input = InjectorDutyInput {
            power_hp: 150.0,
            bsfc: 0.45,
            rpm: 6000.0,
            total_flow_g_min: flow.total_flow_g_min,
        };
        let duty = injector_duty(&duty_input).unwrap();
        // 18.75 g/s against 16.67 g/s: past 100%, undersized system
        assert!(duty.duty_cycle_percent > 100.0);
    }
}
