//! # Calculation Engine Seam
//!
//! Trait boundary to the external optical/thermal calculation engine. The
//! engine owns the physics and the standard-definition file format; this
//! crate only builds its call shapes and reshapes its outputs.
//!
//! Implementations are expected to be stateless per call, so concurrent
//! invocation with distinct requests is safe provided the underlying
//! binding's own concurrency contract allows it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::standard::{CalculationMethod, OpticalStandard};

/// Failure raised by the engine binding. Opaque to this crate; the calc
/// module wraps it with product identity and calculation stage before it
/// reaches a caller.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        EngineError(message.into())
    }
}

/// Material types the engine recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineMaterialType {
    Monolithic,
    AppliedFilm,
    Coated,
    Laminate,
    Interlayer,
    Film,
}

/// Which side of a layer carries the coating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoatedSide {
    Front,
    Back,
    Both,
    Neither,
}

/// One wavelength entry in engine shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineWavelengthEntry {
    pub wavelength: f64,
    pub direct: Option<f64>,
    pub diffuse: Option<f64>,
}

/// A solid layer in the shape the engine's calculation entry points expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineLayer {
    pub material_type: EngineMaterialType,
    /// Thickness in millimeters
    pub thickness: f64,
    pub wavelength_data: Vec<EngineWavelengthEntry>,
    pub coated_side: CoatedSide,
    pub tir_front: Option<f64>,
    pub tir_back: Option<f64>,
    pub emissivity_front: Option<f64>,
    pub emissivity_back: Option<f64>,
    /// True when the direct components are the hemisphere-defect shim, not
    /// measured data (see the compat module)
    pub direct_placeholder_applied: bool,
}

/// One side of the engine's per-quantity flux results
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineFlux {
    pub direct_direct: Option<f64>,
    pub direct_diffuse: Option<f64>,
    pub direct_hemispherical: Option<f64>,
    pub diffuse_diffuse: Option<f64>,
}

/// Engine output for one optical method
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineOpticalResults {
    pub transmittance_front: EngineFlux,
    pub transmittance_back: EngineFlux,
    pub reflectance_front: EngineFlux,
    pub reflectance_back: EngineFlux,
    pub absorptance_front_direct: Option<f64>,
    pub absorptance_back_direct: Option<f64>,
    pub absorptance_front_diffuse: Option<f64>,
    pub absorptance_back_diffuse: Option<f64>,
}

/// Engine color output in its native renderings. Field names follow the
/// engine's conventions (uppercase tristimulus, L/a/b, 0-255 RGB).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineColor {
    pub trichromatic_x: f64,
    pub trichromatic_y: f64,
    pub trichromatic_z: f64,
    pub lab_l: f64,
    pub lab_a: f64,
    pub lab_b: f64,
    pub rgb_r: u8,
    pub rgb_g: u8,
    pub rgb_b: u8,
}

/// Engine color output across the four flux kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineColorFlux {
    pub direct_direct: EngineColor,
    pub direct_diffuse: EngineColor,
    pub direct_hemispherical: EngineColor,
    pub diffuse_diffuse: EngineColor,
}

/// Full engine color output for a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineColorResults {
    pub transmittance_front: EngineColorFlux,
    pub transmittance_back: EngineColorFlux,
    pub reflectance_front: EngineColorFlux,
    pub reflectance_back: EngineColorFlux,
}

/// Engine thermal-IR output
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineThermalIrResults {
    pub transmittance_front_diffuse_diffuse: Option<f64>,
    pub transmittance_back_diffuse_diffuse: Option<f64>,
    pub emissivity_front_hemispheric: Option<f64>,
    pub emissivity_back_hemispheric: Option<f64>,
}

/// The external calculation engine.
///
/// Object-safe so calculation code can hold `&dyn CalculationEngine` and
/// tests can substitute recording fakes.
pub trait CalculationEngine: Send + Sync {
    /// Version of the underlying engine binding. Consulted per call (no
    /// caching) to key the compat policy.
    fn version(&self) -> semver::Version;

    /// Parse an optical-standard definition (engine-owned file format)
    fn parse_standard(&self, contents: &str) -> Result<OpticalStandard, EngineError>;

    /// Solar/visible optical calculation for one method
    fn calc_optical(
        &self,
        layer: &EngineLayer,
        standard: &OpticalStandard,
        method: CalculationMethod,
    ) -> Result<EngineOpticalResults, EngineError>;

    /// Color calculation
    fn calc_color(
        &self,
        layer: &EngineLayer,
        standard: &OpticalStandard,
    ) -> Result<EngineColorResults, EngineError>;

    /// Thermal-IR calculation
    fn calc_thermal_ir(
        &self,
        layer: &EngineLayer,
        standard: &OpticalStandard,
    ) -> Result<EngineThermalIrResults, EngineError>;
}
