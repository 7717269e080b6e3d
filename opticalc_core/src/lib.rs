//! # opticalc_core - Optical Calculation Data Layer
//!
//! `opticalc_core` is the data-shaping layer between glazing/shading
//! product records and an external optical/thermal calculation engine. It
//! validates raw measured spectral data, builds the call shapes the engine
//! expects, invokes it per calculation method, and reshapes the numeric
//! output into typed summary dataclasses. The physics lives entirely in
//! the engine; this crate exists so callers work with strict types and
//! actionable errors instead of raw engine structures.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions over their inputs; safe to call
//!   concurrently with distinct requests
//! - **JSON-First**: all inputs and outputs implement Serialize/Deserialize
//! - **Rich Errors**: structured error types that name the product,
//!   wavelength, and calculation stage - never bare engine messages
//! - **Validate Early**: malformed data is rejected at normalization time,
//!   before any engine call is spent on it
//!
//! ## Quick Start
//!
//! ```rust
//! use opticalc_core::spectral::{convert_wavelength_data, RawWavelengthRow};
//!
//! let rows = vec![
//!     RawWavelengthRow::new(0.3).with_direct_text("0.91"),
//!     RawWavelengthRow::new(0.32).with_diffuse_text("0.05"),
//! ];
//! let data_set = convert_wavelength_data(&rows).unwrap();
//! assert_eq!(data_set.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`spectral`] - raw wavelength row normalization and validation
//! - [`calc`] - engine invocation and failure translation
//! - [`standard`] - optical standard acquisition
//! - [`convert`] - engine call-shape assembly
//! - [`compat`] - engine-version-keyed defect workarounds
//! - [`product`] - product dataclasses
//! - [`results`] - typed summary-value dataclasses
//! - [`engine`] - the external engine trait seam
//! - [`errors`] - structured error types

pub mod calc;
pub mod compat;
pub mod convert;
pub mod engine;
pub mod errors;
pub mod product;
pub mod results;
pub mod spectral;
pub mod standard;

// Re-export commonly used types at crate root for convenience
pub use calc::{calc_optical, CalculationRequest, CalculationStage};
pub use errors::{OpticalcError, OpticalcResult, RowIssue};
pub use spectral::{convert_wavelength_data, RawWavelengthRow, WavelengthDataSet};
pub use standard::{get_optical_standard, CalculationMethod, OpticalStandard, StandardSource};
