//! # Engine Compatibility Policy
//!
//! Workarounds for known defects in specific versions of the external
//! calculation engine, isolated behind one seam so they can be switched
//! off when the engine fixes them, without touching the normalizer.
//!
//! ## Known defect: hemisphere requirement for diffuse-only layers
//!
//! Affected engine versions refuse a layer whose wavelength data carries
//! only diffuse components, demanding a direct hemispherical entry that
//! was never measured. The policy satisfies the requirement with a single
//! flat placeholder value - a compatibility shim, not spectral-shape data.
//! The resulting engine layer is flagged so downstream code never mistakes
//! the shim for a measurement.

use once_cell::sync::Lazy;
use semver::{Version, VersionReq};

use crate::spectral::ComponentCoverage;

/// Placeholder satisfying the defective engine's direct-component
/// requirement for diffuse-only layers.
///
/// Compatibility shim only. The value is flat across all wavelengths and
/// carries no physical meaning; layers it was applied to are flagged via
/// `EngineLayer::direct_placeholder_applied`.
pub const DIFFUSE_ONLY_DIRECT_PLACEHOLDER: f64 = 0.0;

/// Engine versions that reject diffuse-only layers without a direct entry.
static HEMISPHERE_DEFECT_VERSIONS: Lazy<VersionReq> =
    Lazy::new(|| VersionReq::parse("<2.4.0").expect("valid version requirement"));

/// Per-engine-version workaround policy.
///
/// Built once per calculation from [`CalculationEngine::version`] and
/// consulted during call-shape assembly.
///
/// [`CalculationEngine::version`]: crate::engine::CalculationEngine::version
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompatPolicy {
    hemisphere_placeholder: Option<f64>,
}

impl CompatPolicy {
    /// Policy for the given engine version: enables the hemisphere shim
    /// only for versions inside the defective range.
    pub fn for_engine_version(version: &Version) -> Self {
        let hemisphere_placeholder = if HEMISPHERE_DEFECT_VERSIONS.matches(version) {
            Some(DIFFUSE_ONLY_DIRECT_PLACEHOLDER)
        } else {
            None
        };
        CompatPolicy {
            hemisphere_placeholder,
        }
    }

    /// Policy with no workarounds (fixed engine)
    pub fn none() -> Self {
        CompatPolicy {
            hemisphere_placeholder: None,
        }
    }

    /// Policy with the hemisphere shim forced on, using a caller-supplied
    /// placeholder value
    pub fn with_hemisphere_placeholder(value: f64) -> Self {
        CompatPolicy {
            hemisphere_placeholder: Some(value),
        }
    }

    /// The placeholder to supply as the direct component of a diffuse-only
    /// data set, if the shim applies to this coverage under this policy
    pub fn direct_placeholder(&self, coverage: ComponentCoverage) -> Option<f64> {
        match coverage {
            ComponentCoverage::DiffuseOnly => self.hemisphere_placeholder,
            _ => None,
        }
    }
}
