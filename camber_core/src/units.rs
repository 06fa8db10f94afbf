//! # Unit Types
//!
//! Type-safe wrappers for the units the evaluators convert between. These are
//! lightweight f64 newtypes rather than a full units library:
//!
//! - the formula set uses a small, fixed vocabulary of units
//! - JSON serialization stays clean (just numbers)
//! - zero runtime overhead
//!
//! Inputs arrive in the units a workshop actually uses (km/h, mm, bar, hp,
//! cm³) and the formulas run in SI; the `From` impls are the single place the
//! conversion constants live.
//!
//! ## Example
//!
//! ```rust
//! use camber_core::units::{Kmh, Mps};
//!
//! let speed = Kmh(100.0);
//! let mps: Mps = speed.into();
//! assert!((mps.0 - 27.777).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Standard gravity (m/s²), used across braking, dynamics and suspension.
pub const GRAVITY: f64 = 9.81;

/// Metric horsepower to kilowatts.
pub const HP_TO_KW: f64 = 0.7355;

// ============================================================================
// Speed
// ============================================================================

/// Speed in kilometers per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kmh(pub f64);

/// Speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mps(pub f64);

impl From<Kmh> for Mps {
    fn from(v: Kmh) -> Self {
        Mps(v.0 / 3.6)
    }
}

impl From<Mps> for Kmh {
    fn from(v: Mps) -> Self {
        Kmh(v.0 * 3.6)
    }
}

// ============================================================================
// Length
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(v: Millimeters) -> Self {
        Meters(v.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(v: Meters) -> Self {
        Millimeters(v.0 * 1000.0)
    }
}

// ============================================================================
// Pressure
// ============================================================================

/// Pressure in bar
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bar(pub f64);

/// Pressure in pascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

impl From<Bar> for Pascals {
    fn from(v: Bar) -> Self {
        Pascals(v.0 * 1e5)
    }
}

impl From<Pascals> for Bar {
    fn from(v: Pascals) -> Self {
        Bar(v.0 / 1e5)
    }
}

// ============================================================================
// Power
// ============================================================================

/// Power in metric horsepower
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Horsepower(pub f64);

/// Power in kilowatts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

impl From<Horsepower> for Kilowatts {
    fn from(v: Horsepower) -> Self {
        Kilowatts(v.0 * HP_TO_KW)
    }
}

impl From<Kilowatts> for Horsepower {
    fn from(v: Kilowatts) -> Self {
        Horsepower(v.0 / HP_TO_KW)
    }
}

// ============================================================================
// Volume
// ============================================================================

/// Volume in cubic centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicCm(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl From<CubicCm> for CubicMeters {
    fn from(v: CubicCm) -> Self {
        CubicMeters(v.0 / 1e6)
    }
}

impl From<CubicMeters> for CubicCm {
    fn from(v: CubicMeters) -> Self {
        CubicCm(v.0 * 1e6)
    }
}

// ============================================================================
// Spring rate
// ============================================================================

/// Stiffness in newtons per millimeter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NPerMm(pub f64);

/// Stiffness in newtons per meter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NPerM(pub f64);

impl From<NPerMm> for NPerM {
    fn from(v: NPerMm) -> Self {
        NPerM(v.0 * 1000.0)
    }
}

impl From<NPerM> for NPerMm {
    fn from(v: NPerM) -> Self {
        NPerMm(v.0 / 1000.0)
    }
}

// ============================================================================
// Arithmetic implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Kmh);
impl_arithmetic!(Mps);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Bar);
impl_arithmetic!(Pascals);
impl_arithmetic!(Horsepower);
impl_arithmetic!(Kilowatts);
impl_arithmetic!(CubicCm);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(NPerMm);
impl_arithmetic!(NPerM);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmh_to_mps() {
        let v: Mps = Kmh(100.0).into();
        assert!((v.0 - 27.7778).abs() < 1e-3);
    }

    #[test]
    fn test_hp_to_kw() {
        let p: Kilowatts = Horsepower(150.0).into();
        assert!((p.0 - 110.325).abs() < 1e-9);
    }

    #[test]
    fn test_bar_to_pascals() {
        let p: Pascals = Bar(3.0).into();
        assert_eq!(p.0, 300_000.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(2.0);
        let b = Meters(0.5);
        assert_eq!((a + b).0, 2.5);
        assert_eq!((a - b).0, 1.5);
        assert_eq!((a * 2.0).0, 4.0);
        assert_eq!((a / 2.0).0, 1.0);
    }

    #[test]
    fn test_serialization() {
        let v = Kmh(60.5);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "60.5");
        let roundtrip: Kmh = serde_json::from_str(&json).unwrap();
        assert_eq!(v, roundtrip);
    }
}
