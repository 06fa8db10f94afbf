//! # Calculation Modules
//!
//! One module per vehicle subsystem, each exposing the same shape:
//!
//! - an `XInput` struct with a `validate()` method
//! - a pure `calculate(&XInput) -> CalcResult<XResult>` function
//! - an `XResult` with raw numeric outputs and a `to_evaluation()` method
//!   producing the typed record the session and the store consume
//!
//! Evaluators that build on an earlier result (brake balance on brake
//! torque, spring frequency on wheel rate, injector duty on system flow)
//! take that value as a typed input; the [`crate::session::Session`] hands
//! it over via a carry-over slot instead of the calculation re-deriving it.

pub mod braking;
pub mod dynamics;
pub mod engine;
pub mod fuel;
pub mod suspension;
pub mod transmission;

use crate::params::ParamMap;
use crate::report::ReportValue;
use serde::{Deserialize, Serialize};

/// Identifies one calculation type end to end: dispatch, the
/// `calculation_type` column in storage, and the history display.
///
/// The serialized names double as the wire/storage tags, so a stored row's
/// `calculation_type` always parses back into a `CalcKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcKind {
    EngineEfficiency,
    EngineMep,
    EnginePower,
    EngineAirFlow,
    EngineCompression,
    TransmissionGearSpeeds,
    TransmissionRatioCalculation,
    TransmissionEfficiency,
    TractionForce,
    Acceleration,
    ShiftPoints,
    BrakeTorque,
    StoppingDistance,
    BrakeBalance,
    BrakeTemperature,
    SuspensionWheelRate,
    SuspensionFrequency,
    SuspensionDamping,
    SuspensionKinematics,
    FuelSystemFlow,
    InjectorDuty,
    FuelOptimization,
}

impl CalcKind {
    /// All kinds, in menu/report order
    pub const ALL: [CalcKind; 22] = [
        CalcKind::EngineEfficiency,
        CalcKind::EngineMep,
        CalcKind::EnginePower,
        CalcKind::EngineAirFlow,
        CalcKind::EngineCompression,
        CalcKind::TransmissionGearSpeeds,
        CalcKind::TransmissionRatioCalculation,
        CalcKind::TransmissionEfficiency,
        CalcKind::TractionForce,
        CalcKind::Acceleration,
        CalcKind::ShiftPoints,
        CalcKind::BrakeTorque,
        CalcKind::StoppingDistance,
        CalcKind::BrakeBalance,
        CalcKind::BrakeTemperature,
        CalcKind::SuspensionWheelRate,
        CalcKind::SuspensionFrequency,
        CalcKind::SuspensionDamping,
        CalcKind::SuspensionKinematics,
        CalcKind::FuelSystemFlow,
        CalcKind::InjectorDuty,
        CalcKind::FuelOptimization,
    ];

    /// The storage tag (`calculation_type` column value)
    pub fn as_str(self) -> &'static str {
        match self {
            CalcKind::EngineEfficiency => "engine_efficiency",
            CalcKind::EngineMep => "engine_mep",
            CalcKind::EnginePower => "engine_power",
            CalcKind::EngineAirFlow => "engine_air_flow",
            CalcKind::EngineCompression => "engine_compression",
            CalcKind::TransmissionGearSpeeds => "transmission_gear_speeds",
            CalcKind::TransmissionRatioCalculation => "transmission_ratio_calculation",
            CalcKind::TransmissionEfficiency => "transmission_efficiency",
            CalcKind::TractionForce => "traction_force",
            CalcKind::Acceleration => "acceleration",
            CalcKind::ShiftPoints => "shift_points",
            CalcKind::BrakeTorque => "brake_torque",
            CalcKind::StoppingDistance => "stopping_distance",
            CalcKind::BrakeBalance => "brake_balance",
            CalcKind::BrakeTemperature => "brake_temperature",
            CalcKind::SuspensionWheelRate => "suspension_wheel_rate",
            CalcKind::SuspensionFrequency => "suspension_frequency",
            CalcKind::SuspensionDamping => "suspension_damping",
            CalcKind::SuspensionKinematics => "suspension_kinematics",
            CalcKind::FuelSystemFlow => "fuel_system_flow",
            CalcKind::InjectorDuty => "injector_duty",
            CalcKind::FuelOptimization => "fuel_optimization",
        }
    }

    /// Parse a storage tag back into a kind
    pub fn from_tag(tag: &str) -> Option<CalcKind> {
        CalcKind::ALL.iter().copied().find(|k| k.as_str() == tag)
    }

    /// Report section this calculation writes into
    pub fn section(self) -> &'static str {
        match self {
            CalcKind::EngineEfficiency | CalcKind::EngineMep => "engine",
            CalcKind::EnginePower => "engine_power_calc",
            CalcKind::EngineAirFlow => "engine_air_flow",
            CalcKind::EngineCompression => "engine_compression",
            CalcKind::TransmissionGearSpeeds
            | CalcKind::TransmissionRatioCalculation
            | CalcKind::TransmissionEfficiency => "transmission",
            CalcKind::TractionForce | CalcKind::Acceleration | CalcKind::ShiftPoints => "dynamics",
            CalcKind::BrakeTorque
            | CalcKind::StoppingDistance
            | CalcKind::BrakeBalance
            | CalcKind::BrakeTemperature => "braking",
            CalcKind::SuspensionWheelRate
            | CalcKind::SuspensionFrequency
            | CalcKind::SuspensionDamping
            | CalcKind::SuspensionKinematics => "suspension",
            CalcKind::FuelSystemFlow | CalcKind::InjectorDuty | CalcKind::FuelOptimization => {
                "fuel_system"
            }
        }
    }
}

/// A typed value handed from one calculation to a later one through the
/// session, replacing any re-derivation from rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CarryOver {
    /// Total brake torque (N·m), consumed by brake balance
    BrakeTorque { torque_nm: f64 },
    /// Effective wheel rate (N/mm), consumed by spring frequency
    WheelRate { rate_n_per_mm: f64 },
    /// Corrected total fuel flow (g/min), consumed by injector duty
    FuelFlow { total_g_min: f64 },
    /// Duty calculation outputs, consumed by fuel optimization
    InjectorDuty { required_g_s: f64, duty_percent: f64 },
}

/// One calculation's complete footprint: storage row content plus the
/// report fields it contributes.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub kind: CalcKind,
    /// Inputs as entered, for the audit row
    pub params: ParamMap,
    /// Derived values, for the audit row
    pub results: ParamMap,
    /// Formatted report lines and nested blocks, in display order
    pub report_fields: Vec<(String, ReportValue)>,
    /// Typed hand-off for dependent calculations, if any
    pub carry: Option<CarryOver>,
}

impl Evaluation {
    pub fn new(kind: CalcKind, params: ParamMap, results: ParamMap) -> Self {
        Evaluation {
            kind,
            params,
            results,
            report_fields: Vec::new(),
            carry: None,
        }
    }

    /// Append a flat report line
    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.report_fields
            .push((label.into(), ReportValue::Line(value.into())));
        self
    }

    /// Append a nested report block
    pub fn with_group(
        mut self,
        name: impl Into<String>,
        fields: Vec<(String, String)>,
    ) -> Self {
        self.report_fields
            .push((name.into(), ReportValue::Group(fields)));
        self
    }

    pub fn with_carry(mut self, carry: CarryOver) -> Self {
        self.carry = Some(carry);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for kind in CalcKind::ALL {
            assert_eq!(CalcKind::from_tag(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!(CalcKind::from_tag("engine_overdrive"), None);
        assert_eq!(CalcKind::from_tag(""), None);
    }

    #[test]
    fn test_serde_matches_tag() {
        let json = serde_json::to_string(&CalcKind::StoppingDistance).unwrap();
        assert_eq!(json, "\"stopping_distance\"");
    }

    #[test]
    fn test_sections() {
        assert_eq!(CalcKind::EngineEfficiency.section(), "engine");
        assert_eq!(CalcKind::BrakeBalance.section(), "braking");
        assert_eq!(CalcKind::FuelOptimization.section(), "fuel_system");
    }
}
