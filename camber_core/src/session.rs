//! # Calculation Session
//!
//! Owns everything one working session accumulates: the report document
//! and the typed carry-over slots that dependent calculations read.
//!
//! Recording an [`Evaluation`] merges its formatted fields into the
//! report and fills the matching carry-over slot. A dependent calculation
//! asks the session for its prerequisite and gets a
//! [`CalcError::MissingPrerequisite`] if that calculation has not run yet.
//!
//! ## Example
//!
//! ```rust
//! use camber_core::session::Session;
//! use camber_core::calculations::braking::{BrakeTorqueInput, brake_torque};
//!
//! let mut session = Session::new();
//!
//! // brake balance needs the torque result first
//! assert!(session.brake_torque_nm().is_err());
//!
//! let input = BrakeTorqueInput {
//!     piston_count: 4,
//!     piston_diameter_mm: 40.0,
//!     disc_diameter_mm: 320.0,
//!     pad_coefficient: 0.4,
//!     pressure_bar: 80.0,
//! };
//! let result = brake_torque(&input).unwrap();
//! session.record(&result.to_evaluation(&input));
//!
//! assert!(session.brake_torque_nm().is_ok());
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::calculations::{CarryOver, Evaluation};
use crate::errors::{CalcError, CalcResult};
use crate::report::Report;

/// One working session: report accumulator plus typed carry-over results
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    report: Report,
    brake_torque_nm: Option<f64>,
    wheel_rate_n_mm: Option<f64>,
    fuel_flow_g_min: Option<f64>,
    injector_duty: Option<(f64, f64)>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            report: Report::new(),
            brake_torque_nm: None,
            wheel_rate_n_mm: None,
            fuel_flow_g_min: None,
            injector_duty: None,
        }
    }

    /// Merge a calculation's output into the report and capture its
    /// carry-over, if it produces one.
    pub fn record(&mut self, eval: &Evaluation) {
        self.report
            .record(eval.kind.section(), eval.report_fields.clone());

        match eval.carry {
            Some(CarryOver::BrakeTorque { torque_nm }) => {
                self.brake_torque_nm = Some(torque_nm);
            }
            Some(CarryOver::WheelRate { rate_n_per_mm }) => {
                self.wheel_rate_n_mm = Some(rate_n_per_mm);
            }
            Some(CarryOver::FuelFlow { total_g_min }) => {
                self.fuel_flow_g_min = Some(total_g_min);
            }
            Some(CarryOver::InjectorDuty {
                required_g_s,
                duty_percent,
            }) => {
                self.injector_duty = Some((required_g_s, duty_percent));
            }
            None => {}
        }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Brake torque for the balance calculation
    pub fn brake_torque_nm(&self) -> CalcResult<f64> {
        self.brake_torque_nm
            .ok_or_else(|| CalcError::missing_prerequisite("brake_balance", "brake_torque"))
    }

    /// Wheel rate for the frequency calculation
    pub fn wheel_rate_n_mm(&self) -> CalcResult<f64> {
        self.wheel_rate_n_mm.ok_or_else(|| {
            CalcError::missing_prerequisite("suspension_frequency", "suspension_wheel_rate")
        })
    }

    /// Total system flow for the duty calculation
    pub fn fuel_flow_g_min(&self) -> CalcResult<f64> {
        self.fuel_flow_g_min
            .ok_or_else(|| CalcError::missing_prerequisite("injector_duty", "fuel_system_flow"))
    }

    /// Fuel demand (g/s) and duty (%) for the optimization calculation
    pub fn injector_duty(&self) -> CalcResult<(f64, f64)> {
        self.injector_duty
            .ok_or_else(|| CalcError::missing_prerequisite("fuel_optimization", "injector_duty"))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::braking::{brake_torque, BrakeTorqueInput};
    use crate::calculations::engine::{efficiency, EfficiencyInput, FuelType};
    use crate::calculations::fuel::{injector_duty, system_flow, InjectorDutyInput, SystemFlowInput};
    use crate::calculations::suspension::{wheel_rate, WheelRateInput};

    #[test]
    fn test_missing_prerequisites_before_recording() {
        let session = Session::new();
        for err in [
            session.brake_torque_nm().unwrap_err(),
            session.wheel_rate_n_mm().unwrap_err(),
            session.fuel_flow_g_min().unwrap_err(),
            session.injector_duty().map(|_| ()).unwrap_err(),
        ] {
            assert_eq!(err.error_code(), "MISSING_PREREQUISITE");
        }
    }

    #[test]
    fn test_carry_over_flows_through_session() {
        let mut session = Session::new();

        let input = WheelRateInput {
            spring_rate_n_mm: 60.0,
            motion_ratio: 1.0,
            preload_mm: 0.0,
        };
        let result = wheel_rate(&input).unwrap();
        session.record(&result.to_evaluation(&input));

        assert_eq!(session.wheel_rate_n_mm().unwrap(), 60.0);
        // unrelated slots stay empty
        assert!(session.brake_torque_nm().is_err());
    }

    #[test]
    fn test_repeated_recording_overwrites_carry() {
        let mut session = Session::new();
        let mut input = BrakeTorqueInput {
            piston_count: 4,
            piston_diameter_mm: 40.0,
            disc_diameter_mm: 320.0,
            pad_coefficient: 0.4,
            pressure_bar: 80.0,
        };
        let first = brake_torque(&input).unwrap();
        session.record(&first.to_evaluation(&input));

        input.pressure_bar = 100.0;
        let second = brake_torque(&input).unwrap();
        session.record(&second.to_evaluation(&input));

        assert_eq!(session.brake_torque_nm().unwrap(), second.brake_torque_nm);
    }

    #[test]
    fn test_fuel_chain_through_session() {
        let mut session = Session::new();

        let flow_input = SystemFlowInput {
            system_type: crate::calculations::fuel::FuelSystemType::PortInjection,
            injector_count: 4,
            injector_flow_g_min: 500.0,
            pressure_bar: 3.0,
            fuel_temperature_c: 20.0,
        };
        let flow = system_flow(&flow_input).unwrap();
        session.record(&flow.to_evaluation(&flow_input));

        let duty_input = InjectorDutyInput {
            power_hp: 200.0,
            bsfc: 0.45,
            rpm: 6000.0,
            total_flow_g_min: session.fuel_flow_g_min().unwrap(),
        };
        let duty = injector_duty(&duty_input).unwrap();
        session.record(&duty.to_evaluation(&duty_input));

        let (required, percent) = session.injector_duty().unwrap();
        assert_eq!(required, duty.required_flow_g_s);
        assert_eq!(percent, duty.duty_cycle_percent);
    }

    #[test]
    fn test_report_accumulates_across_calculations() {
        let mut session = Session::new();
        let input = EfficiencyInput {
            power_hp: 150.0,
            fuel_consumption_kg_h: 12.0,
            fuel_type: FuelType::Petrol,
        };
        let result = efficiency(&input).unwrap();
        session.record(&result.to_evaluation(&input));

        let report = session.report();
        assert!(report.section("engine").is_some());
        assert!(report.render_text().contains("77.5%"));
    }
}
