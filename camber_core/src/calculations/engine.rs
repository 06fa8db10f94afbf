//! # Engine Calculations
//!
//! Thermal efficiency, mean effective pressure, power from torque,
//! intake air flow and compression ratio.
//!
//! ## Example
//!
//! ```rust
//! use camber_core::calculations::engine::{EfficiencyInput, FuelType, efficiency};
//!
//! let input = EfficiencyInput {
//!     power_hp: 150.0,
//!     fuel_consumption_kg_h: 12.0,
//!     fuel_type: FuelType::Petrol,
//! };
//!
//! let result = efficiency(&input).unwrap();
//! assert!((result.efficiency_percent - 77.5).abs() < 0.1);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{CalcKind, Evaluation};
use crate::errors::{CalcError, CalcResult};
use crate::params::ParamMap;
use crate::units::{Bar, CubicCm, CubicMeters, Horsepower, Kilowatts, Pascals};

/// Fuel type with its lower heating value (MJ/kg)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Ethanol,
}

impl FuelType {
    /// Lower heating value, MJ/kg
    pub fn energy_mj_kg(self) -> f64 {
        match self {
            FuelType::Petrol => 42.7,
            FuelType::Diesel => 43.4,
            FuelType::Ethanol => 26.8,
        }
    }

    /// Russian display name, as shown in reports and history
    pub fn name_ru(self) -> &'static str {
        match self {
            FuelType::Petrol => "Бензин",
            FuelType::Diesel => "Дизель",
            FuelType::Ethanol => "Этанол",
        }
    }
}

// ============================================================================
// Thermal efficiency
// ============================================================================

/// Input for the thermal-efficiency calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "power_hp": 150.0,
///   "fuel_consumption_kg_h": 12.0,
///   "fuel_type": "Petrol"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyInput {
    /// Rated power in metric horsepower
    pub power_hp: f64,
    /// Fuel consumption at that power, kg/h
    pub fuel_consumption_kg_h: f64,
    pub fuel_type: FuelType,
}

impl EfficiencyInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.power_hp <= 0.0 {
            return Err(CalcError::invalid_input(
                "power_hp",
                self.power_hp.to_string(),
                "Power must be positive",
            ));
        }
        if self.fuel_consumption_kg_h <= 0.0 {
            return Err(CalcError::invalid_input(
                "fuel_consumption_kg_h",
                self.fuel_consumption_kg_h.to_string(),
                "Fuel consumption must be positive",
            ));
        }
        Ok(())
    }
}

/// Thermal-efficiency results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyResult {
    /// Power converted to kW
    pub power_kw: f64,
    /// Energy content of the hourly fuel mass, kJ
    pub fuel_energy_kj: f64,
    /// Brake thermal efficiency, percent
    pub efficiency_percent: f64,
}

impl EfficiencyResult {
    pub fn to_evaluation(&self, input: &EfficiencyInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("power_hp", input.power_hp);
        params.insert("fuel_consumption_kg_h", input.fuel_consumption_kg_h);
        params.insert("fuel_type", input.fuel_type.name_ru());

        let mut results = ParamMap::new();
        results.insert("power_kw", self.power_kw);
        results.insert("fuel_energy_kj", self.fuel_energy_kj);
        results.insert("efficiency_percent", self.efficiency_percent);

        Evaluation::new(CalcKind::EngineEfficiency, params, results)
            .with_field("power_hp", format!("{:.1} л.с.", input.power_hp))
            .with_field(
                "fuel_consumption",
                format!("{:.1} кг/ч", input.fuel_consumption_kg_h),
            )
            .with_field("fuel_type", input.fuel_type.name_ru())
            .with_field("efficiency", format!("{:.1}%", self.efficiency_percent))
    }
}

/// Brake thermal efficiency: output work over fuel energy input.
pub fn efficiency(input: &EfficiencyInput) -> CalcResult<EfficiencyResult> {
    input.validate()?;

    let power_kw = Kilowatts::from(Horsepower(input.power_hp)).value();
    let fuel_energy_kj = input.fuel_consumption_kg_h * input.fuel_type.energy_mj_kg() * 1000.0;
    let efficiency_percent = power_kw * 3600.0 / fuel_energy_kj * 100.0;

    Ok(EfficiencyResult {
        power_kw,
        fuel_energy_kj,
        efficiency_percent,
    })
}

// ============================================================================
// Mean effective pressure
// ============================================================================

/// Input for mean effective pressure (four-stroke)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MepInput {
    /// Peak torque, N·m
    pub torque_nm: f64,
    /// Engine displacement, cm³
    pub displacement_cm3: f64,
}

impl MepInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.torque_nm <= 0.0 {
            return Err(CalcError::invalid_input(
                "torque_nm",
                self.torque_nm.to_string(),
                "Torque must be positive",
            ));
        }
        if self.displacement_cm3 <= 0.0 {
            return Err(CalcError::invalid_input(
                "displacement_cm3",
                self.displacement_cm3.to_string(),
                "Displacement must be positive",
            ));
        }
        Ok(())
    }
}

/// Mean effective pressure in the two unit systems the report shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MepResult {
    pub mep_bar: f64,
    pub mep_kgf_cm2: f64,
}

impl MepResult {
    pub fn to_evaluation(&self, input: &MepInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("torque_nm", input.torque_nm);
        params.insert("displacement_cm3", input.displacement_cm3);

        let mut results = ParamMap::new();
        results.insert("mep_bar", self.mep_bar);
        results.insert("mep_kgf_cm2", self.mep_kgf_cm2);

        Evaluation::new(CalcKind::EngineMep, params, results)
            .with_field("displacement", format!("{:.0} см³", input.displacement_cm3))
            .with_field("torque", format!("{:.1} Н·м", input.torque_nm))
            .with_field("mep", format!("{:.2} бар", self.mep_bar))
            .with_field("mep_kgcm2", format!("{:.2} кгс/см²", self.mep_kgf_cm2))
    }
}

/// MEP for a four-stroke engine: p = 2π·T·4 / V_d, reported in bar and
/// kgf/cm².
pub fn mep(input: &MepInput) -> CalcResult<MepResult> {
    input.validate()?;

    let displacement_m3 = CubicMeters::from(CubicCm(input.displacement_cm3)).value();
    let mep_pa = 2.0 * std::f64::consts::PI * input.torque_nm * 4.0 / displacement_m3;
    let mep_bar = Bar::from(Pascals(mep_pa)).value();
    let mep_kgf_cm2 = mep_bar / 10.197;

    Ok(MepResult {
        mep_bar,
        mep_kgf_cm2,
    })
}

// ============================================================================
// Power from torque
// ============================================================================

/// Input for power from torque and engine speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerInput {
    /// Torque at the given speed, N·m
    pub torque_nm: f64,
    /// Engine speed, rpm
    pub rpm: f64,
}

impl PowerInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.torque_nm <= 0.0 {
            return Err(CalcError::invalid_input(
                "torque_nm",
                self.torque_nm.to_string(),
                "Torque must be positive",
            ));
        }
        if self.rpm <= 0.0 {
            return Err(CalcError::invalid_input(
                "rpm",
                self.rpm.to_string(),
                "Engine speed must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerResult {
    pub power_hp: f64,
    pub power_kw: f64,
}

impl PowerResult {
    pub fn to_evaluation(&self, input: &PowerInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("torque_nm", input.torque_nm);
        params.insert("rpm", input.rpm);

        let mut results = ParamMap::new();
        results.insert("power_hp", self.power_hp);
        results.insert("power_kw", self.power_kw);

        Evaluation::new(CalcKind::EnginePower, params, results)
            .with_field("torque", format!("{:.1} Н·м", input.torque_nm))
            .with_field("rpm", format!("{:.0} об/мин", input.rpm))
            .with_field("power_hp", format!("{:.1} л.с.", self.power_hp))
            .with_field("power_kw", format!("{:.1} кВт", self.power_kw))
    }
}

/// Power in metric horsepower from torque and speed (T·n / 7024).
pub fn power(input: &PowerInput) -> CalcResult<PowerResult> {
    input.validate()?;

    let power_hp = input.torque_nm * input.rpm / 7024.0;
    let power_kw = Kilowatts::from(Horsepower(power_hp)).value();

    Ok(PowerResult { power_hp, power_kw })
}

// ============================================================================
// Intake air flow
// ============================================================================

/// Input for the intake air mass flow estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirFlowInput {
    /// Displacement, liters
    pub displacement_l: f64,
    /// Engine speed, rpm
    pub rpm: f64,
    /// Volumetric efficiency, 0..1
    pub volumetric_efficiency: f64,
}

impl AirFlowInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.displacement_l <= 0.0 {
            return Err(CalcError::invalid_input(
                "displacement_l",
                self.displacement_l.to_string(),
                "Displacement must be positive",
            ));
        }
        if self.rpm <= 0.0 {
            return Err(CalcError::invalid_input(
                "rpm",
                self.rpm.to_string(),
                "Engine speed must be positive",
            ));
        }
        if self.volumetric_efficiency <= 0.0 || self.volumetric_efficiency > 1.5 {
            return Err(CalcError::invalid_input(
                "volumetric_efficiency",
                self.volumetric_efficiency.to_string(),
                "Volumetric efficiency must be in (0, 1.5]",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirFlowResult {
    /// Air mass flow, kg/h
    pub air_flow_kg_h: f64,
}

impl AirFlowResult {
    pub fn to_evaluation(&self, input: &AirFlowInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("displacement_l", input.displacement_l);
        params.insert("rpm", input.rpm);
        params.insert("volumetric_efficiency", input.volumetric_efficiency);

        let mut results = ParamMap::new();
        results.insert("air_flow_kg_h", self.air_flow_kg_h);

        Evaluation::new(CalcKind::EngineAirFlow, params, results)
            .with_field("displacement", format!("{:.1} л", input.displacement_l))
            .with_field("rpm", format!("{:.0} об/мин", input.rpm))
            .with_field(
                "volumetric_efficiency",
                format!("{:.2}", input.volumetric_efficiency),
            )
            .with_field("air_flow", format!("{:.2} кг/ч", self.air_flow_kg_h))
    }
}

/// Intake air mass flow at air density 1.2 kg/m³ (four-stroke: /120),
/// result in kg/h.
pub fn air_flow(input: &AirFlowInput) -> CalcResult<AirFlowResult> {
    input.validate()?;

    let air_flow_kg_h = input.displacement_l * input.rpm * input.volumetric_efficiency * 1.2 / 120.0;

    Ok(AirFlowResult { air_flow_kg_h })
}

// ============================================================================
// Compression ratio
// ============================================================================

/// Input for the static compression ratio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionInput {
    /// Swept volume of one cylinder, cm³
    pub cylinder_volume_cm3: f64,
    /// Combustion chamber volume, cm³
    pub chamber_volume_cm3: f64,
}

impl CompressionInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.cylinder_volume_cm3 <= 0.0 {
            return Err(CalcError::invalid_input(
                "cylinder_volume_cm3",
                self.cylinder_volume_cm3.to_string(),
                "Cylinder volume must be positive",
            ));
        }
        if self.chamber_volume_cm3 <= 0.0 {
            return Err(CalcError::domain(
                "engine_compression",
                "Chamber volume must be positive (zero would divide by zero)",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionResult {
    pub compression_ratio: f64,
}

impl CompressionResult {
    pub fn to_evaluation(&self, input: &CompressionInput) -> Evaluation {
        let mut params = ParamMap::new();
        params.insert("cylinder_volume_cm3", input.cylinder_volume_cm3);
        params.insert("chamber_volume_cm3", input.chamber_volume_cm3);

        let mut results = ParamMap::new();
        results.insert("compression_ratio", self.compression_ratio);

        Evaluation::new(CalcKind::EngineCompression, params, results)
            .with_field(
                "cylinder_volume",
                format!("{:.1} см³", input.cylinder_volume_cm3),
            )
            .with_field(
                "chamber_volume",
                format!("{:.1} см³", input.chamber_volume_cm3),
            )
            .with_field(
                "compression_ratio",
                format!("{:.2}:1", self.compression_ratio),
            )
    }
}

/// Static compression ratio: (V_swept + V_chamber) / V_chamber.
pub fn compression(input: &CompressionInput) -> CalcResult<CompressionResult> {
    input.validate()?;

    let compression_ratio =
        (input.cylinder_volume_cm3 + input.chamber_volume_cm3) / input.chamber_volume_cm3;

    Ok(CompressionResult { compression_ratio })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_reference_case() {
        // 150 hp, 12 kg/h petrol: 110.325 kW, 512400 kJ, ≈77.5%
        let input = EfficiencyInput {
            power_hp: 150.0,
            fuel_consumption_kg_h: 12.0,
            fuel_type: FuelType::Petrol,
        };
        let result = efficiency(&input).unwrap();
        assert!((result.power_kw - 110.325).abs() < 1e-9);
        assert!((result.fuel_energy_kj - 512_400.0).abs() < 1e-6);
        assert!((result.efficiency_percent - 77.5).abs() < 0.1);
    }

    #[test]
    fn test_efficiency_fuel_types_differ() {
        let mut input = EfficiencyInput {
            power_hp: 100.0,
            fuel_consumption_kg_h: 10.0,
            fuel_type: FuelType::Petrol,
        };
        let petrol = efficiency(&input).unwrap().efficiency_percent;
        input.fuel_type = FuelType::Ethanol;
        let ethanol = efficiency(&input).unwrap().efficiency_percent;
        // Ethanol carries less energy per kg, so the same output reads as
        // higher efficiency
        assert!(ethanol > petrol);
    }

    #[test]
    fn test_efficiency_rejects_zero_fuel() {
        let input = EfficiencyInput {
            power_hp: 150.0,
            fuel_consumption_kg_h: 0.0,
            fuel_type: FuelType::Diesel,
        };
        assert!(efficiency(&input).is_err());
    }

    #[test]
    fn test_compression_reference_case() {
        let input = CompressionInput {
            cylinder_volume_cm3: 500.0,
            chamber_volume_cm3: 50.0,
        };
        let result = compression(&input).unwrap();
        assert!((result.compression_ratio - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_compression_zero_chamber_is_domain_error() {
        let input = CompressionInput {
            cylinder_volume_cm3: 500.0,
            chamber_volume_cm3: 0.0,
        };
        let err = compression(&input).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_power_from_torque() {
        // 350 N·m at 6000 rpm: 350*6000/7024 ≈ 299.0 hp
        let input = PowerInput {
            torque_nm: 350.0,
            rpm: 6000.0,
        };
        let result = power(&input).unwrap();
        assert!((result.power_hp - 299.0).abs() < 0.1);
        assert!((result.power_kw - result.power_hp * 0.7355).abs() < 1e-9);
    }

    #[test]
    fn test_mep_is_positive_and_scales_with_torque() {
        let base = mep(&MepInput {
            torque_nm: 200.0,
            displacement_cm3: 2000.0,
        })
        .unwrap();
        let doubled = mep(&MepInput {
            torque_nm: 400.0,
            displacement_cm3: 2000.0,
        })
        .unwrap();
        assert!(base.mep_bar > 0.0);
        assert!((doubled.mep_bar - 2.0 * base.mep_bar).abs() < 1e-9);
    }

    #[test]
    fn test_air_flow_determinism() {
        let input = AirFlowInput {
            displacement_l: 2.0,
            rpm: 6000.0,
            volumetric_efficiency: 0.85,
        };
        let a = air_flow(&input).unwrap();
        let b = air_flow(&input).unwrap();
        assert_eq!(a.air_flow_kg_h, b.air_flow_kg_h);
        assert!(a.air_flow_kg_h > 0.0);
    }

    #[test]
    fn test_evaluation_round_trip_through_json() {
        let input = EfficiencyInput {
            power_hp: 150.0,
            fuel_consumption_kg_h: 12.0,
            fuel_type: FuelType::Petrol,
        };
        let result = efficiency(&input).unwrap();
        let eval = result.to_evaluation(&input);
        assert_eq!(eval.kind, CalcKind::EngineEfficiency);

        let json = eval.params.to_json_string().unwrap();
        let back = ParamMap::from_json_str(&json).unwrap();
        assert_eq!(eval.params, back);
    }
}
