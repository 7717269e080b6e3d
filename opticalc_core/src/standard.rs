//! # Optical Standards
//!
//! An optical standard defines the wavelength ranges, weighting functions,
//! and integration method a calculation runs under. The definition file
//! format is owned by the engine; this module only handles acquiring the
//! file contents and wrapping load failures.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! # fn engine() -> Box<dyn opticalc_core::engine::CalculationEngine> { unimplemented!() }
//! use opticalc_core::standard::{get_optical_standard, StandardSource};
//!
//! let engine = engine();
//! let standard = get_optical_standard(
//!     engine.as_ref(),
//!     StandardSource::File(Path::new("standards/W5_NFRC_2003.std").to_path_buf()),
//! ).unwrap();
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::CalculationEngine;
use crate::errors::{OpticalcError, OpticalcResult};

/// Per-method optical calculations a standard may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationMethod {
    /// Solar spectrum integration
    Solar,
    /// Photopic (visible) response
    Photopic,
    /// UV transmittance
    Tuv,
    /// Skin protection factor
    Spf,
    /// Damage-weighted transmittance
    Tdw,
    /// Krochmann damage function
    Tkr,
}

impl CalculationMethod {
    /// All methods in standard order
    pub const ALL: [CalculationMethod; 6] = [
        CalculationMethod::Solar,
        CalculationMethod::Photopic,
        CalculationMethod::Tuv,
        CalculationMethod::Spf,
        CalculationMethod::Tdw,
        CalculationMethod::Tkr,
    ];

    /// Method name as it appears in standard definition files
    pub fn code(&self) -> &'static str {
        match self {
            CalculationMethod::Solar => "SOLAR",
            CalculationMethod::Photopic => "PHOTOPIC",
            CalculationMethod::Tuv => "TUV",
            CalculationMethod::Spf => "SPF",
            CalculationMethod::Tdw => "TDW",
            CalculationMethod::Tkr => "TKR",
        }
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An engine-consumable optical standard. Immutable once built; owned by
/// the calculation request that uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalStandard {
    /// Standard name (e.g. "NFRC")
    pub name: String,
    /// Methods this standard defines weighting data for
    pub methods: Vec<CalculationMethod>,
    /// Whether the standard carries color weighting functions
    pub supports_color: bool,
}

impl OpticalStandard {
    pub fn new(name: impl Into<String>, methods: Vec<CalculationMethod>) -> Self {
        OpticalStandard {
            name: name.into(),
            methods,
            supports_color: true,
        }
    }

    pub fn has_method(&self, method: CalculationMethod) -> bool {
        self.methods.contains(&method)
    }
}

/// Where an optical standard comes from: a definition file on disk, or a
/// standard object already built.
#[derive(Debug, Clone)]
pub enum StandardSource {
    File(PathBuf),
    Object(OpticalStandard),
}

impl From<PathBuf> for StandardSource {
    fn from(path: PathBuf) -> Self {
        StandardSource::File(path)
    }
}

impl From<OpticalStandard> for StandardSource {
    fn from(standard: OpticalStandard) -> Self {
        StandardSource::Object(standard)
    }
}

/// Obtain a ready-to-use [`OpticalStandard`].
///
/// For a file source the definition is read with scoped acquisition (the
/// handle closes on every exit path, parse failures included) and handed
/// to the engine's parser. Missing, unreadable, or malformed sources fail
/// with [`OpticalcError::StandardLoad`] naming the path.
pub fn get_optical_standard(
    engine: &dyn CalculationEngine,
    source: StandardSource,
) -> OpticalcResult<OpticalStandard> {
    match source {
        StandardSource::Object(standard) => Ok(standard),
        StandardSource::File(path) => {
            let display = path.display().to_string();
            let contents = fs::read_to_string(&path)
                .map_err(|e| OpticalcError::standard_load(&display, e.to_string()))?;
            engine
                .parse_standard(&contents)
                .map_err(|e| OpticalcError::standard_load(&display, e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        EngineColorResults, EngineError, EngineLayer, EngineOpticalResults,
        EngineThermalIrResults,
    };

    struct ParseOnlyEngine;

    impl CalculationEngine for ParseOnlyEngine {
        fn version(&self) -> semver::Version {
            semver::Version::new(2, 4, 0)
        }

        fn parse_standard(&self, contents: &str) -> Result<OpticalStandard, EngineError> {
            if contents.trim().is_empty() {
                return Err(EngineError::new("standard definition is empty"));
            }
            Ok(OpticalStandard::new(
                contents.trim(),
                vec![CalculationMethod::Solar],
            ))
        }

        fn calc_optical(
            &self,
            _layer: &EngineLayer,
            _standard: &OpticalStandard,
            _method: CalculationMethod,
        ) -> Result<EngineOpticalResults, EngineError> {
            unreachable!("not exercised in standard tests")
        }

        fn calc_color(
            &self,
            _layer: &EngineLayer,
            _standard: &OpticalStandard,
        ) -> Result<EngineColorResults, EngineError> {
            unreachable!("not exercised in standard tests")
        }

        fn calc_thermal_ir(
            &self,
            _layer: &EngineLayer,
            _standard: &OpticalStandard,
        ) -> Result<EngineThermalIrResults, EngineError> {
            unreachable!("not exercised in standard tests")
        }
    }

    #[test]
    fn test_object_source_passes_through() {
        let standard = OpticalStandard::new("NFRC", vec![CalculationMethod::Solar]);
        let loaded =
            get_optical_standard(&ParseOnlyEngine, StandardSource::Object(standard.clone()))
                .unwrap();
        assert_eq!(loaded, standard);
    }

    #[test]
    fn test_missing_file_fails_with_standard_load() {
        let error = get_optical_standard(
            &ParseOnlyEngine,
            StandardSource::File(PathBuf::from("/nonexistent/W5_NFRC_2003.std")),
        )
        .unwrap_err();
        assert_eq!(error.error_code(), "STANDARD_LOAD");
        assert!(error.to_string().contains("W5_NFRC_2003.std"));
    }

    #[test]
    fn test_malformed_file_fails_with_standard_load() {
        let dir = std::env::temp_dir();
        let path = dir.join("opticalc_empty_standard.std");
        std::fs::write(&path, "   \n").unwrap();
        let error =
            get_optical_standard(&ParseOnlyEngine, StandardSource::File(path.clone())).unwrap_err();
        std::fs::remove_file(&path).ok();
        match error {
            OpticalcError::StandardLoad { reason, .. } => {
                assert!(reason.contains("empty"));
            }
            other => panic!("expected StandardLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_method_codes() {
        assert_eq!(CalculationMethod::Solar.code(), "SOLAR");
        assert_eq!(CalculationMethod::Tkr.code(), "TKR");
        assert_eq!(CalculationMethod::ALL.len(), 6);
    }
}
