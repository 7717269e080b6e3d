//! # Spectral Data Normalizer
//!
//! Turns raw measured wavelength rows - as found in submission JSON, with
//! components given as numbers, text, or blanks - into a validated
//! [`WavelengthDataSet`] ready for engine call-shape assembly.
//!
//! ## Normalization contract
//!
//! 1. Blank or whitespace-only text is converted to an explicit absent
//!    marker *before* numeric parsing, so `"0.0"` and blank are never
//!    confused.
//! 2. Every row is classified as direct-only, diffuse-only, or both; a row
//!    with neither component is an error, never silently dropped.
//! 3. Non-blank text that fails to parse as a real number, or any value
//!    outside [0, 1], is an error naming the wavelength and component.
//! 4. Wavelengths must be positive, unique, and strictly ascending.
//!    Duplicates are an input error - deduplication is forbidden.
//!
//! All malformed rows are collected and reported together in one
//! [`OpticalcError::DataFormat`]; the batch fails as a whole.
//!
//! ## Example
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

use serde::{Deserialize, Serialize};

use crate::errors::{OpticalcError, OpticalcResult, RowIssue};

/// A raw component reading as it appears in submission data.
///
/// Measured values arrive either as JSON numbers or as text (legacy
/// submission files serialize everything as strings, blanks included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Already-numeric reading
    Number(f64),
    /// Textual reading; may be blank or whitespace-only
    Text(String),
}

/// One raw measured row: a wavelength plus optional direct and diffuse
/// component readings, any of which may be blank.
///
/// ## JSON Example
///
/// ```json
/// { "w": 0.3, "direct": "0.91", "diffuse": "" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWavelengthRow {
    /// Wavelength in microns
    #[serde(rename = "w")]
    pub wavelength: f64,

    /// Direct (specular) component reading, if measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct: Option<RawValue>,

    /// Diffuse (scattered) component reading, if measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffuse: Option<RawValue>,
}

impl RawWavelengthRow {
    /// Create a row with no component readings
    pub fn new(wavelength: f64) -> Self {
        RawWavelengthRow {
            wavelength,
            direct: None,
            diffuse: None,
        }
    }

    /// Set the direct component from a numeric reading
    pub fn with_direct(mut self, value: f64) -> Self {
        self.direct = Some(RawValue::Number(value));
        self
    }

    /// Set the direct component from a textual reading
    pub fn with_direct_text(mut self, value: impl Into<String>) -> Self {
        self.direct = Some(RawValue::Text(value.into()));
        self
    }

    /// Set the diffuse component from a numeric reading
    pub fn with_diffuse(mut self, value: f64) -> Self {
        self.diffuse = Some(RawValue::Number(value));
        self
    }

    /// Set the diffuse component from a textual reading
    pub fn with_diffuse_text(mut self, value: impl Into<String>) -> Self {
        self.diffuse = Some(RawValue::Text(value.into()));
        self
    }
}

/// One normalized measurement: wavelength plus whichever components were
/// actually measured. At least one component is always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavelengthMeasurement {
    /// Wavelength in microns (positive)
    pub wavelength: f64,

    /// Direct (specular) transmittance/reflectance in [0, 1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct: Option<f64>,

    /// Diffuse (scattered) transmittance/reflectance in [0, 1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diffuse: Option<f64>,
}

impl WavelengthMeasurement {
    /// Whether only the direct component was measured
    pub fn is_direct_only(&self) -> bool {
        self.direct.is_some() && self.diffuse.is_none()
    }

    /// Whether only the diffuse component was measured
    pub fn is_diffuse_only(&self) -> bool {
        self.diffuse.is_some() && self.direct.is_none()
    }
}

/// Set-level component coverage.
///
/// Diffuse-only data sets take a distinct downstream path: affected engine
/// versions spuriously require a direct hemispherical entry, and the
/// compat layer must know not to treat the shim value as measured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentCoverage {
    /// Every measurement carries a direct component and none carries diffuse
    DirectOnly,
    /// Every measurement carries a diffuse component and none carries direct
    DiffuseOnly,
    /// Anything else (both components, or coverage varying per wavelength)
    Mixed,
}

/// Ordered, validated wavelength measurements.
///
/// Invariants enforced at construction: wavelengths positive, unique, and
/// strictly ascending; every measurement has at least one component; input
/// order preserved. Given the same input the output is bit-identical, and
/// normalizing an already-normalized set changes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavelengthDataSet {
    measurements: Vec<WavelengthMeasurement>,
    coverage: ComponentCoverage,
}

impl WavelengthDataSet {
    /// Build a data set from normalized measurements, validating the
    /// set-level invariants. Collects every violation into one error.
    pub fn new(measurements: Vec<WavelengthMeasurement>) -> OpticalcResult<Self> {
        let mut issues = Vec::new();
        validate_measurements(&measurements, &mut issues);
        if !issues.is_empty() {
            return Err(OpticalcError::data_format(issues));
        }
        let coverage = classify_coverage(&measurements);
        Ok(WavelengthDataSet {
            measurements,
            coverage,
        })
    }

    /// The measurements, in submission order
    pub fn measurements(&self) -> &[WavelengthMeasurement] {
        &self.measurements
    }

    /// Set-level component coverage
    pub fn coverage(&self) -> ComponentCoverage {
        self.coverage
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Render back to raw rows (numeric readings, no blanks). Feeding the
    /// result through [`convert_wavelength_data`] reproduces this set.
    pub fn to_raw_rows(&self) -> Vec<RawWavelengthRow> {
        self.measurements
            .iter()
            .map(|m| RawWavelengthRow {
                wavelength: m.wavelength,
                direct: m.direct.map(RawValue::Number),
                diffuse: m.diffuse.map(RawValue::Number),
            })
            .collect()
    }
}

/// Normalize raw measured rows into a validated [`WavelengthDataSet`].
///
/// This is the entry point callers use on submission data before any
/// engine invocation. Fails with [`OpticalcError::DataFormat`] enumerating
/// *every* malformed row.
pub fn convert_wavelength_data(rows: &[RawWavelengthRow]) -> OpticalcResult<WavelengthDataSet> {
    let mut measurements = Vec::with_capacity(rows.len());
    let mut issues = Vec::new();

    for row in rows {
        let direct = match normalize_component(row.wavelength, "direct", &row.direct) {
            Ok(value) => value,
            Err(issue) => {
                issues.push(issue);
                None
            }
        };
        let diffuse = match normalize_component(row.wavelength, "diffuse", &row.diffuse) {
            Ok(value) => value,
            Err(issue) => {
                issues.push(issue);
                None
            }
        };

        if row.direct.is_some() || row.diffuse.is_some() {
            // Row had readings; classification only counts ones that survived
            // blank normalization and parsing.
            if direct.is_none() && diffuse.is_none() && !has_issue_for(&issues, row.wavelength) {
                issues.push(RowIssue::row(
                    row.wavelength,
                    "no direct or diffuse component present (all readings blank)",
                ));
                continue;
            }
        } else {
            issues.push(RowIssue::row(
                row.wavelength,
                "no direct or diffuse component present",
            ));
            continue;
        }

        if direct.is_none() && diffuse.is_none() {
            // Both readings were malformed; issues already recorded above.
            continue;
        }

        measurements.push(WavelengthMeasurement {
            wavelength: row.wavelength,
            direct,
            diffuse,
        });
    }

    validate_measurements(&measurements, &mut issues);

    if !issues.is_empty() {
        return Err(OpticalcError::data_format(issues));
    }

    let coverage = classify_coverage(&measurements);
    Ok(WavelengthDataSet {
        measurements,
        coverage,
    })
}

/// Blank-normalize and parse one component reading.
///
/// Blank and whitespace-only text map to absent *before* parsing is
/// attempted. Unparseable text and out-of-range values are issues naming
/// the wavelength and component.
fn normalize_component(
    wavelength: f64,
    component: &str,
    raw: &Option<RawValue>,
) -> Result<Option<f64>, RowIssue> {
    let value = match raw {
        None => return Ok(None),
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map_err(|_| {
                RowIssue::component(wavelength, component, text, "value is not a real number")
            })?
        }
    };

    if !(0.0..=1.0).contains(&value) {
        return Err(RowIssue::component(
            wavelength,
            component,
            value.to_string(),
            "value is outside [0, 1]",
        ));
    }

    Ok(Some(value))
}

fn has_issue_for(issues: &[RowIssue], wavelength: f64) -> bool {
    issues.iter().any(|issue| issue.wavelength == wavelength)
}

/// Set-level invariants: positive wavelengths, strictly ascending order,
/// no duplicates, at least one component per measurement.
fn validate_measurements(measurements: &[WavelengthMeasurement], issues: &mut Vec<RowIssue>) {
    let mut previous: Option<f64> = None;
    for measurement in measurements {
        if !(measurement.wavelength > 0.0) || !measurement.wavelength.is_finite() {
            issues.push(RowIssue::row(
                measurement.wavelength,
                "wavelength must be a positive number",
            ));
        }
        if measurement.direct.is_none() && measurement.diffuse.is_none() {
            issues.push(RowIssue::row(
                measurement.wavelength,
                "no direct or diffuse component present",
            ));
        }
        if let Some(prev) = previous {
            if measurement.wavelength == prev {
                issues.push(RowIssue::row(
                    measurement.wavelength,
                    "duplicate wavelength (deduplication is not performed)",
                ));
            } else if measurement.wavelength < prev {
                issues.push(RowIssue::row(
                    measurement.wavelength,
                    "wavelengths must be strictly ascending",
                ));
            }
        }
        previous = Some(measurement.wavelength);
    }
}

fn classify_coverage(measurements: &[WavelengthMeasurement]) -> ComponentCoverage {
    if !measurements.is_empty() && measurements.iter().all(|m| m.is_direct_only()) {
        ComponentCoverage::DirectOnly
    } else if !measurements.is_empty() && measurements.iter().all(|m| m.is_diffuse_only()) {
        ComponentCoverage::DiffuseOnly
    } else {
        ComponentCoverage::Mixed
    }
}
