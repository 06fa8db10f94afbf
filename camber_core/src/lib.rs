//! # camber_core - Vehicle Performance Calculation Engine
//!
//! `camber_core` is the computational heart of Camber, a calculator for
//! vehicle performance characteristics: engine, transmission, dynamics,
//! braking, suspension and fuel system. Every calculation is a pure
//! function over a validated input struct, and every result can feed the
//! accumulated report, the history store and the exporters.
//!
//! ## Design Philosophy
//!
//! - **Stateless formulas**: pure functions that take input and return results
//! - **Typed chaining**: dependent calculations receive prior results through
//!   [`session::Session`], never by parsing display text
//! - **JSON-First**: stored parameters use a tagged value grammar that is
//!   parsed strictly, never evaluated
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use camber_core::calculations::engine::{power, PowerInput};
//! use camber_core::session::Session;
//!
//! let input = PowerInput {
//!     torque_nm: 500.0,
//!     rpm: 6000.0,
//! };
//! let result = power(&input).unwrap();
//!
//! let mut session = Session::new();
//! session.record(&result.to_evaluation(&input));
//! assert!(!session.report().is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - the calculation catalog (engine, transmission, dynamics,
//!   braking, suspension, fuel)
//! - [`session`] - per-run state: report accumulation and typed carry-over
//! - [`report`] - ordered report document with text and HTML rendering
//! - [`params`] - tagged parameter values and insertion-ordered maps
//! - [`store`] - SQLite calculation history
//! - [`export`] - CSV history export and PDF report export
//! - [`labels`] - Russian display labels
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types

pub mod calculations;
pub mod errors;
pub mod export;
pub mod labels;
pub mod params;
pub mod report;
pub mod session;
pub mod store;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalcKind, CarryOver, Evaluation};
pub use errors::{CalcError, CalcResult};
pub use params::{ParamMap, ParamValue};
pub use report::{Report, ReportValue};
pub use session::Session;
pub use store::{Database, HistoryEntry};
