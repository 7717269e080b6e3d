//! # Summary Value Dataclasses
//!
//! Typed output shapes the engine's numeric results are reshaped into.
//! These are the values stored back onto product records; the engine's own
//! result structures never leak past the calc module.

use serde::{Deserialize, Serialize};

use crate::standard::CalculationMethod;

/// Flux breakdown for one direction of one quantity (transmittance or
/// reflectance, front or back)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FluxValues {
    pub direct_direct: Option<f64>,
    pub direct_diffuse: Option<f64>,
    pub direct_hemispherical: Option<f64>,
    pub diffuse_diffuse: Option<f64>,
}

/// Integrated results for one optical calculation method (solar, photopic, ...)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OpticalMethodSummary {
    pub transmittance_front: FluxValues,
    pub transmittance_back: FluxValues,
    pub reflectance_front: FluxValues,
    pub reflectance_back: FluxValues,

    pub absorptance_front_direct: Option<f64>,
    pub absorptance_back_direct: Option<f64>,
    pub absorptance_front_hemispheric: Option<f64>,
    pub absorptance_back_hemispheric: Option<f64>,
}

/// CIE tristimulus values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrichromaticValues {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// CIE L*a*b* values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabValues {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// sRGB rendering of a color result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbValues {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// One color result in its three renderings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorValues {
    pub trichromatic: TrichromaticValues,
    pub lab: LabValues,
    pub rgb: RgbValues,
}

/// Color results across the four flux kinds for one quantity/direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorFluxValues {
    pub direct_direct: ColorValues,
    pub direct_diffuse: ColorValues,
    pub direct_hemispherical: ColorValues,
    pub diffuse_diffuse: ColorValues,
}

/// Full color summary for a layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSummary {
    pub transmittance_front: ColorFluxValues,
    pub transmittance_back: ColorFluxValues,
    pub reflectance_front: ColorFluxValues,
    pub reflectance_back: ColorFluxValues,
}

/// Thermal-IR summary for a layer.
///
/// Emissivity fields are absent for shade-material products even when the
/// engine reports them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermalIrSummary {
    pub transmittance_front_diffuse_diffuse: Option<f64>,
    pub transmittance_back_diffuse_diffuse: Option<f64>,
    pub emissivity_front_hemispheric: Option<f64>,
    pub emissivity_back_hemispheric: Option<f64>,
}

impl ThermalIrSummary {
    /// Drop emissivity values, keeping transmittances
    pub fn without_emissivity(mut self) -> Self {
        self.emissivity_front_hemispheric = None;
        self.emissivity_back_hemispheric = None;
        self
    }
}

/// Integrated spectral averages summary for one product under one standard.
///
/// Per-method slots are populated only for the methods the standard
/// carries; `thermal_ir` only when IR wavelength data was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedSummary {
    /// Name of the optical standard these values were calculated under
    pub standard: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar: Option<OpticalMethodSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photopic: Option<OpticalMethodSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuv: Option<OpticalMethodSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spf: Option<OpticalMethodSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdw: Option<OpticalMethodSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tkr: Option<OpticalMethodSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermal_ir: Option<ThermalIrSummary>,
}

impl IntegratedSummary {
    pub fn new(standard: impl Into<String>) -> Self {
        IntegratedSummary {
            standard: standard.into(),
            solar: None,
            photopic: None,
            tuv: None,
            spf: None,
            tdw: None,
            tkr: None,
            color: None,
            thermal_ir: None,
        }
    }

    /// Store a per-method summary in the matching slot
    pub fn set_method(&mut self, method: CalculationMethod, summary: OpticalMethodSummary) {
        match method {
            CalculationMethod::Solar => self.solar = Some(summary),
            CalculationMethod::Photopic => self.photopic = Some(summary),
            CalculationMethod::Tuv => self.tuv = Some(summary),
            CalculationMethod::Spf => self.spf = Some(summary),
            CalculationMethod::Tdw => self.tdw = Some(summary),
            CalculationMethod::Tkr => self.tkr = Some(summary),
        }
    }

    /// Read the per-method slot
    pub fn method(&self, method: CalculationMethod) -> Option<&OpticalMethodSummary> {
        match method {
            CalculationMethod::Solar => self.solar.as_ref(),
            CalculationMethod::Photopic => self.photopic.as_ref(),
            CalculationMethod::Tuv => self.tuv.as_ref(),
            CalculationMethod::Spf => self.spf.as_ref(),
            CalculationMethod::Tdw => self.tdw.as_ref(),
            CalculationMethod::Tkr => self.tkr.as_ref(),
        }
    }
}
