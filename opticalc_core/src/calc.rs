//! # Optical Calculation Invoker
//!
//! Assembles a [`CalculationRequest`] into engine calls and reshapes the
//! engine's numeric output into an [`IntegratedSummary`]. Every engine
//! failure is caught at this boundary and re-raised as
//! [`OpticalcError::Calculation`] carrying the product identity, the stage
//! that was executing, and the original engine message.
//!
//! Stage rules:
//!
//! - each optical method the standard carries is calculated in turn;
//! - color is calculated when the standard carries color weighting;
//! - thermal-IR runs only when IR wavelength data was supplied with the
//!   request - it is skipped entirely otherwise, never defaulted;
//! - shade-material products get the emissivity fields of the thermal-IR
//!   summary cleared even if the engine reported values.
//!
//! The invoker holds no state between calls; concurrent invocation with
//! distinct requests is safe as far as the engine binding allows.

use serde::{Deserialize, Serialize};

use crate::compat::CompatPolicy;
use crate::convert::convert_product;
use crate::engine::{
    CalculationEngine, EngineColor, EngineColorFlux, EngineColorResults, EngineFlux,
    EngineOpticalResults, EngineThermalIrResults,
};
use crate::errors::{OpticalcError, OpticalcResult};
use crate::product::Product;
use crate::results::{
    ColorFluxValues, ColorSummary, ColorValues, FluxValues, IntegratedSummary, LabValues,
    OpticalMethodSummary, RgbValues, ThermalIrSummary, TrichromaticValues,
};
use crate::spectral::WavelengthDataSet;
use crate::standard::OpticalStandard;

/// Which calculation stage was executing when a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationStage {
    /// Solar/visible optical methods
    Solar,
    /// Color calculation
    Color,
    /// Thermal-IR calculation
    ThermalIr,
}

impl std::fmt::Display for CalculationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CalculationStage::Solar => "solar",
            CalculationStage::Color => "color",
            CalculationStage::ThermalIr => "thermal-IR",
        };
        write!(f, "{}", label)
    }
}

/// Everything one calculation run needs: the product, its validated
/// wavelength data per range, and the standard to calculate under.
#[derive(Debug, Clone)]
pub struct CalculationRequest {
    pub product: Product,
    /// Solar/visible range wavelength data
    pub solar_data: WavelengthDataSet,
    /// Thermal-IR range wavelength data; absent means the thermal-IR
    /// calculation is skipped for this request
    pub ir_data: Option<WavelengthDataSet>,
    pub standard: OpticalStandard,
}

impl CalculationRequest {
    pub fn new(
        product: Product,
        solar_data: WavelengthDataSet,
        standard: OpticalStandard,
    ) -> Self {
        CalculationRequest {
            product,
            solar_data,
            ir_data: None,
            standard,
        }
    }

    pub fn with_ir_data(mut self, ir_data: WavelengthDataSet) -> Self {
        self.ir_data = Some(ir_data);
        self
    }
}

/// Run the full calculation for one request.
///
/// Inputs are already validated (the normalizer rejects malformed data
/// before any engine call); failures here are either call-shape problems
/// or engine failures, all terminal for the request.
pub fn calc_optical(
    engine: &dyn CalculationEngine,
    request: &CalculationRequest,
) -> OpticalcResult<IntegratedSummary> {
    let standard = &request.standard;
    let product = &request.product;
    let policy = CompatPolicy::for_engine_version(&engine.version());

    let layer = convert_product(product, &request.solar_data, &standard.name, &policy)?;
    let mut summary = IntegratedSummary::new(&standard.name);

    for &method in &standard.methods {
        let results = engine
            .calc_optical(&layer, standard, method)
            .map_err(|e| {
                log::error!(
                    "calc_optical failed for product '{}' method {}: {}",
                    product.identity(),
                    method,
                    e
                );
                OpticalcError::calculation(product.identity(), CalculationStage::Solar, e.0)
            })?;
        summary.set_method(method, translate_optical(&results));
    }

    if standard.supports_color {
        let results = engine.calc_color(&layer, standard).map_err(|e| {
            log::error!(
                "calc_color failed for product '{}': {}",
                product.identity(),
                e
            );
            OpticalcError::calculation(product.identity(), CalculationStage::Color, e.0)
        })?;
        summary.color = Some(translate_color(&results));
    }

    if let Some(ir_data) = &request.ir_data {
        let ir_layer = convert_product(product, ir_data, &standard.name, &policy)?;
        let results = engine.calc_thermal_ir(&ir_layer, standard).map_err(|e| {
            log::error!(
                "calc_thermal_ir failed for product '{}': {}",
                product.identity(),
                e
            );
            OpticalcError::calculation(product.identity(), CalculationStage::ThermalIr, e.0)
        })?;
        let ir_summary = translate_thermal_ir(&results);
        summary.thermal_ir = Some(if product.subtype.is_shade_material() {
            // Engine emissivity values are not meaningful for shade
            // materials; report transmittances only.
            ir_summary.without_emissivity()
        } else {
            ir_summary
        });
    }

    Ok(summary)
}

fn translate_flux(flux: &EngineFlux) -> FluxValues {
    FluxValues {
        direct_direct: flux.direct_direct,
        direct_diffuse: flux.direct_diffuse,
        direct_hemispherical: flux.direct_hemispherical,
        diffuse_diffuse: flux.diffuse_diffuse,
    }
}

fn translate_optical(results: &EngineOpticalResults) -> OpticalMethodSummary {
    OpticalMethodSummary {
        transmittance_front: translate_flux(&results.transmittance_front),
        transmittance_back: translate_flux(&results.transmittance_back),
        reflectance_front: translate_flux(&results.reflectance_front),
        reflectance_back: translate_flux(&results.reflectance_back),
        absorptance_front_direct: results.absorptance_front_direct,
        absorptance_back_direct: results.absorptance_back_direct,
        absorptance_front_hemispheric: results.absorptance_front_diffuse,
        absorptance_back_hemispheric: results.absorptance_back_diffuse,
    }
}

fn translate_color_values(color: &EngineColor) -> ColorValues {
    ColorValues {
        trichromatic: TrichromaticValues {
            x: color.trichromatic_x,
            y: color.trichromatic_y,
            z: color.trichromatic_z,
        },
        lab: LabValues {
            l: color.lab_l,
            a: color.lab_a,
            b: color.lab_b,
        },
        rgb: RgbValues {
            r: color.rgb_r,
            g: color.rgb_g,
            b: color.rgb_b,
        },
    }
}

fn translate_color_flux(flux: &EngineColorFlux) -> ColorFluxValues {
    ColorFluxValues {
        direct_direct: translate_color_values(&flux.direct_direct),
        direct_diffuse: translate_color_values(&flux.direct_diffuse),
        direct_hemispherical: translate_color_values(&flux.direct_hemispherical),
        diffuse_diffuse: translate_color_values(&flux.diffuse_diffuse),
    }
}

fn translate_color(results: &EngineColorResults) -> ColorSummary {
    ColorSummary {
        transmittance_front: translate_color_flux(&results.transmittance_front),
        transmittance_back: translate_color_flux(&results.transmittance_back),
        reflectance_front: translate_color_flux(&results.reflectance_front),
        reflectance_back: translate_color_flux(&results.reflectance_back),
    }
}

fn translate_thermal_ir(results: &EngineThermalIrResults) -> ThermalIrSummary {
    ThermalIrSummary {
        transmittance_front_diffuse_diffuse: results.transmittance_front_diffuse_diffuse,
        transmittance_back_diffuse_diffuse: results.transmittance_back_diffuse_diffuse,
        emissivity_front_hemispheric: results.emissivity_front_hemispheric,
        emissivity_back_hemispheric: results.emissivity_back_hemispheric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::engine::{EngineError, EngineLayer, EngineMaterialType};
    use crate::product::{PhysicalProperties, ProductSubtype, ProductType};
    use crate::spectral::{convert_wavelength_data, RawWavelengthRow};
    use crate::standard::CalculationMethod;

    /// Recording fake engine: remembers every call and the layers it was
    /// handed, and can be told to fail or to reject diffuse-only layers
    /// the way defective versions do.
    struct SpyEngine {
        version: semver::Version,
        calls: Mutex<Vec<String>>,
        layers: Mutex<Vec<EngineLayer>>,
        fail_stage: Option<CalculationStage>,
        reject_diffuse_only: bool,
    }

    impl SpyEngine {
        fn new() -> Self {
            SpyEngine {
                version: semver::Version::new(2, 4, 0),
                calls: Mutex::new(Vec::new()),
                layers: Mutex::new(Vec::new()),
                fail_stage: None,
                reject_diffuse_only: false,
            }
        }

        fn with_version(mut self, major: u64, minor: u64, patch: u64) -> Self {
            self.version = semver::Version::new(major, minor, patch);
            self
        }

        fn failing_at(mut self, stage: CalculationStage) -> Self {
            self.fail_stage = Some(stage);
            self
        }

        /// Mimic the hemisphere defect: refuse layers without any direct
        /// component entry.
        fn rejecting_diffuse_only(mut self) -> Self {
            self.reject_diffuse_only = true;
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: impl Into<String>, layer: &EngineLayer) {
            self.calls.lock().unwrap().push(call.into());
            self.layers.lock().unwrap().push(layer.clone());
        }

        fn check_layer(&self, layer: &EngineLayer) -> Result<(), EngineError> {
            if self.reject_diffuse_only
                && layer.wavelength_data.iter().all(|e| e.direct.is_none())
            {
                return Err(EngineError::new(
                    "direct hemispherical data required for all layers",
                ));
            }
            Ok(())
        }
    }

    impl CalculationEngine for SpyEngine {
        fn version(&self) -> semver::Version {
            self.version.clone()
        }

        fn parse_standard(&self, _contents: &str) -> Result<OpticalStandard, EngineError> {
            Ok(OpticalStandard::new("NFRC", vec![CalculationMethod::Solar]))
        }

        fn calc_optical(
            &self,
            layer: &EngineLayer,
            _standard: &OpticalStandard,
            method: CalculationMethod,
        ) -> Result<EngineOpticalResults, EngineError> {
            self.record(format!("optical:{}", method), layer);
            if self.fail_stage == Some(CalculationStage::Solar) {
                return Err(EngineError::new("matrix inversion failed"));
            }
            self.check_layer(layer)?;
            Ok(EngineOpticalResults {
                transmittance_front: EngineFlux {
                    direct_direct: Some(0.77),
                    direct_hemispherical: Some(0.80),
                    ..EngineFlux::default()
                },
                absorptance_front_direct: Some(0.12),
                ..EngineOpticalResults::default()
            })
        }

        fn calc_color(
            &self,
            layer: &EngineLayer,
            _standard: &OpticalStandard,
        ) -> Result<EngineColorResults, EngineError> {
            self.record("color", layer);
            if self.fail_stage == Some(CalculationStage::Color) {
                return Err(EngineError::new("color weighting out of range"));
            }
            self.check_layer(layer)?;
            let gray = EngineColor {
                trichromatic_x: 85.0,
                trichromatic_y: 90.0,
                trichromatic_z: 95.0,
                lab_l: 96.0,
                lab_a: -0.5,
                lab_b: 0.4,
                rgb_r: 245,
                rgb_g: 246,
                rgb_b: 244,
            };
            let flux = EngineColorFlux {
                direct_direct: gray,
                direct_diffuse: gray,
                direct_hemispherical: gray,
                diffuse_diffuse: gray,
            };
            Ok(EngineColorResults {
                transmittance_front: flux,
                transmittance_back: flux,
                reflectance_front: flux,
                reflectance_back: flux,
            })
        }

        fn calc_thermal_ir(
            &self,
            layer: &EngineLayer,
            _standard: &OpticalStandard,
        ) -> Result<EngineThermalIrResults, EngineError> {
            self.record("thermal_ir", layer);
            if self.fail_stage == Some(CalculationStage::ThermalIr) {
                return Err(EngineError::new("IR integration failed"));
            }
            self.check_layer(layer)?;
            Ok(EngineThermalIrResults {
                transmittance_front_diffuse_diffuse: Some(0.0),
                transmittance_back_diffuse_diffuse: Some(0.0),
                emissivity_front_hemispheric: Some(0.84),
                emissivity_back_hemispheric: Some(0.82),
            })
        }
    }

    fn product(subtype: ProductSubtype) -> Product {
        Product::new(ProductType::Glazing, subtype)
            .with_token("IGSDB-9")
            .with_physical_properties(PhysicalProperties {
                thickness: Some(3.048),
                ..PhysicalProperties::default()
            })
    }

    fn solar_data() -> WavelengthDataSet {
        convert_wavelength_data(&[
            RawWavelengthRow::new(0.3).with_direct(0.91).with_diffuse(0.02),
            RawWavelengthRow::new(0.32).with_direct(0.89).with_diffuse(0.03),
        ])
        .unwrap()
    }

    fn diffuse_only_data() -> WavelengthDataSet {
        convert_wavelength_data(&[
            RawWavelengthRow::new(0.3).with_diffuse(0.05),
            RawWavelengthRow::new(0.32).with_diffuse(0.06),
        ])
        .unwrap()
    }

    fn ir_data() -> WavelengthDataSet {
        convert_wavelength_data(&[
            RawWavelengthRow::new(5.0).with_direct(0.01),
            RawWavelengthRow::new(25.0).with_direct(0.01),
        ])
        .unwrap()
    }

    fn standard() -> OpticalStandard {
        OpticalStandard::new(
            "NFRC",
            vec![CalculationMethod::Solar, CalculationMethod::Photopic],
        )
    }

    #[test]
    fn test_full_request_populates_summary() {
        let engine = SpyEngine::new();
        let request = CalculationRequest::new(
            product(ProductSubtype::Monolithic),
            solar_data(),
            standard(),
        )
        .with_ir_data(ir_data());

        let summary = calc_optical(&engine, &request).unwrap();
        assert!(summary.solar.is_some());
        assert!(summary.photopic.is_some());
        assert!(summary.tuv.is_none());
        assert!(summary.color.is_some());
        let ir = summary.thermal_ir.unwrap();
        assert_eq!(ir.emissivity_front_hemispheric, Some(0.84));
        assert_eq!(
            summary.solar.unwrap().transmittance_front.direct_direct,
            Some(0.77)
        );
        assert_eq!(
            engine.calls(),
            vec!["optical:SOLAR", "optical:PHOTOPIC", "color", "thermal_ir"]
        );
    }

    #[test]
    fn test_ir_skipped_without_ir_data() {
        let engine = SpyEngine::new();
        let request = CalculationRequest::new(
            product(ProductSubtype::Monolithic),
            solar_data(),
            standard(),
        );
        let summary = calc_optical(&engine, &request).unwrap();
        assert!(summary.thermal_ir.is_none());
        // The thermal-IR entry point was never invoked
        assert!(!engine.calls().iter().any(|c| c == "thermal_ir"));
    }

    #[test]
    fn test_roller_shade_dispatched_as_monolithic() {
        let engine = SpyEngine::new();
        let request = CalculationRequest::new(
            Product::new(ProductType::Shading, ProductSubtype::RollerShade)
                .with_token("IGSDB-9")
                .with_physical_properties(PhysicalProperties {
                    thickness: Some(0.33),
                    ..PhysicalProperties::default()
                }),
            solar_data(),
            standard(),
        );
        calc_optical(&engine, &request).unwrap();
        let layers = engine.layers.lock().unwrap();
        assert!(layers
            .iter()
            .all(|layer| layer.material_type == EngineMaterialType::Monolithic));
    }

    #[test]
    fn test_shade_material_emissivity_cleared() {
        let engine = SpyEngine::new();
        let request = CalculationRequest::new(
            Product::new(ProductType::Material, ProductSubtype::ShadeMaterial)
                .with_token("IGSDB-9")
                .with_physical_properties(PhysicalProperties {
                    thickness: Some(0.33),
                    ..PhysicalProperties::default()
                }),
            solar_data(),
            standard(),
        )
        .with_ir_data(ir_data());

        let summary = calc_optical(&engine, &request).unwrap();
        // The spy returned nonzero emissivity; the summary must not carry it.
        let ir = summary.thermal_ir.unwrap();
        assert_eq!(ir.emissivity_front_hemispheric, None);
        assert_eq!(ir.emissivity_back_hemispheric, None);
        assert_eq!(ir.transmittance_front_diffuse_diffuse, Some(0.0));
    }

    #[test]
    fn test_diffuse_only_succeeds_against_defective_engine() {
        // Regression for the hemisphere-requirement workaround: a defective
        // engine version rejects layers with no direct entries, and the
        // compat shim must satisfy it without touching the diffuse data.
        let engine = SpyEngine::new()
            .with_version(2, 3, 1)
            .rejecting_diffuse_only();
        let request = CalculationRequest::new(
            product(ProductSubtype::Monolithic),
            diffuse_only_data(),
            standard(),
        );
        let summary = calc_optical(&engine, &request).unwrap();
        assert!(summary.solar.is_some());

        let layers = engine.layers.lock().unwrap();
        assert!(layers.iter().all(|layer| layer.direct_placeholder_applied));
        assert!(layers
            .iter()
            .all(|layer| layer.wavelength_data.iter().all(|e| e.diffuse.is_some())));
    }

    #[test]
    fn test_fixed_engine_gets_unshimmed_diffuse_only_layer() {
        let engine = SpyEngine::new().with_version(2, 4, 0);
        let request = CalculationRequest::new(
            product(ProductSubtype::Monolithic),
            diffuse_only_data(),
            standard(),
        );
        calc_optical(&engine, &request).unwrap();
        let layers = engine.layers.lock().unwrap();
        assert!(layers.iter().all(|layer| !layer.direct_placeholder_applied));
        assert!(layers
            .iter()
            .all(|layer| layer.wavelength_data.iter().all(|e| e.direct.is_none())));
    }

    #[test]
    fn test_solar_failure_wrapped_with_stage_and_product() {
        let engine = SpyEngine::new().failing_at(CalculationStage::Solar);
        let request = CalculationRequest::new(
            product(ProductSubtype::Monolithic),
            solar_data(),
            standard(),
        );
        let error = calc_optical(&engine, &request).unwrap_err();
        match error {
            OpticalcError::Calculation {
                product,
                stage,
                engine_message,
            } => {
                assert_eq!(product, "IGSDB-9");
                assert_eq!(stage, CalculationStage::Solar);
                assert_eq!(engine_message, "matrix inversion failed");
            }
            other => panic!("expected Calculation, got {:?}", other),
        }
    }

    #[test]
    fn test_thermal_ir_failure_wrapped_with_stage() {
        let engine = SpyEngine::new().failing_at(CalculationStage::ThermalIr);
        let request = CalculationRequest::new(
            product(ProductSubtype::Monolithic),
            solar_data(),
            standard(),
        )
        .with_ir_data(ir_data());
        let error = calc_optical(&engine, &request).unwrap_err();
        match error {
            OpticalcError::Calculation { stage, .. } => {
                assert_eq!(stage, CalculationStage::ThermalIr);
            }
            other => panic!("expected Calculation, got {:?}", other),
        }
    }

    #[test]
    fn test_error_message_names_stage_and_product() {
        let engine = SpyEngine::new().failing_at(CalculationStage::Color);
        let request = CalculationRequest::new(
            product(ProductSubtype::Monolithic),
            solar_data(),
            standard(),
        );
        let message = calc_optical(&engine, &request).unwrap_err().to_string();
        assert!(message.contains("IGSDB-9"));
        assert!(message.contains("color stage"));
        assert!(message.contains("color weighting out of range"));
    }
}
