//! # Error Types
//!
//! Structured error types for opticalc_core. Each variant carries enough
//! context for a caller to map a failure back to the product, wavelength,
//! or calculation stage that produced it - engine-internal vocabulary
//! never propagates un-annotated.
//!
//! ## Example
//!
//! ```rust
//! use opticalc_core::errors::{OpticalcError, OpticalcResult};
//!
//! fn check_thickness(thickness: Option<f64>) -> OpticalcResult<f64> {
//!     thickness.ok_or_else(|| {
//!         OpticalcError::missing_optical_data("GL-1", "product has no thickness")
//!     })
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calc::CalculationStage;

/// Result type alias for opticalc_core operations
pub type OpticalcResult<T> = Result<T, OpticalcError>;

/// One malformed raw wavelength row.
///
/// `DataFormat` errors enumerate *every* offending row, not just the first,
/// so data submitters can fix a file in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIssue {
    /// Wavelength of the offending row (microns)
    pub wavelength: f64,
    /// Offending component ("direct", "diffuse"), if the issue is
    /// component-level rather than row-level
    pub component: Option<String>,
    /// The raw value that failed conversion, if any
    pub value: Option<String>,
    /// What was wrong with it
    pub reason: String,
}

impl RowIssue {
    /// Issue with a specific component of a row
    pub fn component(
        wavelength: f64,
        component: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RowIssue {
            wavelength,
            component: Some(component.into()),
            value: Some(value.into()),
            reason: reason.into(),
        }
    }

    /// Issue with the row as a whole (no usable component, bad wavelength, ...)
    pub fn row(wavelength: f64, reason: impl Into<String>) -> Self {
        RowIssue {
            wavelength,
            component: None,
            value: None,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.component, &self.value) {
            (Some(component), Some(value)) => write!(
                f,
                "wavelength {}: {} '{}' - {}",
                self.wavelength, component, value, self.reason
            ),
            (Some(component), None) => {
                write!(f, "wavelength {}: {} - {}", self.wavelength, component, self.reason)
            }
            _ => write!(f, "wavelength {}: {}", self.wavelength, self.reason),
        }
    }
}

fn format_issues(issues: &[RowIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Structured error type for opticalc operations.
///
/// Serializes with a "type" discriminator so API consumers can branch on
/// the error kind without parsing messages.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum OpticalcError {
    /// Raw spectral data could not be normalized. Enumerates every
    /// malformed row; recoverable by correcting the submission data.
    #[error("Invalid spectral data ({} rows): {}", .issues.len(), format_issues(.issues))]
    DataFormat { issues: Vec<RowIssue> },

    /// The optical standard source was missing, unreadable, or malformed
    #[error("Failed to load optical standard from '{path}': {reason}")]
    StandardLoad { path: String, reason: String },

    /// The external engine failed during calculation. Carries the original
    /// engine message plus the product identity and the stage that was
    /// executing when it failed.
    #[error("Optical calculation failed for product '{product}' during {stage} stage: {engine_message}")]
    Calculation {
        product: String,
        stage: CalculationStage,
        engine_message: String,
    },

    /// Product subtype has no engine material mapping
    #[error("Unsupported product subtype: {subtype}")]
    UnsupportedSubtype { subtype: String },

    /// Coated-side label not recognized by the engine mapping
    #[error("Unsupported coated side: {value}")]
    UnsupportedCoatedSide { value: String },

    /// Product is missing data the engine call shape requires
    #[error("Missing optical data on product '{product}': {reason}")]
    MissingOpticalData { product: String, reason: String },
}

impl OpticalcError {
    /// Create a DataFormat error from collected row issues
    pub fn data_format(issues: Vec<RowIssue>) -> Self {
        OpticalcError::DataFormat { issues }
    }

    /// Create a StandardLoad error
    pub fn standard_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        OpticalcError::StandardLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Calculation error
    pub fn calculation(
        product: impl Into<String>,
        stage: CalculationStage,
        engine_message: impl Into<String>,
    ) -> Self {
        OpticalcError::Calculation {
            product: product.into(),
            stage,
            engine_message: engine_message.into(),
        }
    }

    /// Create an UnsupportedSubtype error
    pub fn unsupported_subtype(subtype: impl Into<String>) -> Self {
        OpticalcError::UnsupportedSubtype {
            subtype: subtype.into(),
        }
    }

    /// Create an UnsupportedCoatedSide error
    pub fn unsupported_coated_side(value: impl Into<String>) -> Self {
        OpticalcError::UnsupportedCoatedSide {
            value: value.into(),
        }
    }

    /// Create a MissingOpticalData error
    pub fn missing_optical_data(product: impl Into<String>, reason: impl Into<String>) -> Self {
        OpticalcError::MissingOpticalData {
            product: product.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable by correcting the input data
    pub fn is_recoverable(&self) -> bool {
        matches!(self, OpticalcError::DataFormat { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            OpticalcError::DataFormat { .. } => "DATA_FORMAT",
            OpticalcError::StandardLoad { .. } => "STANDARD_LOAD",
            OpticalcError::Calculation { .. } => "CALCULATION",
            OpticalcError::UnsupportedSubtype { .. } => "UNSUPPORTED_SUBTYPE",
            OpticalcError::UnsupportedCoatedSide { .. } => "UNSUPPORTED_COATED_SIDE",
            OpticalcError::MissingOpticalData { .. } => "MISSING_OPTICAL_DATA",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = OpticalcError::data_format(vec![RowIssue::component(
            0.3,
            "direct",
            "not-a-number",
            "value is not a real number",
        )]);
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: OpticalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_data_format_message_lists_every_issue() {
        let error = OpticalcError::data_format(vec![
            RowIssue::row(0.3, "no direct or diffuse component present"),
            RowIssue::component(0.32, "diffuse", "abc", "value is not a real number"),
        ]);
        let message = error.to_string();
        assert!(message.contains("2 rows"));
        assert!(message.contains("wavelength 0.3:"));
        assert!(message.contains("wavelength 0.32:"));
        assert!(message.contains("diffuse 'abc'"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            OpticalcError::standard_load("nfrc.std", "no such file").error_code(),
            "STANDARD_LOAD"
        );
        assert_eq!(
            OpticalcError::unsupported_subtype("Venetian blind").error_code(),
            "UNSUPPORTED_SUBTYPE"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(OpticalcError::data_format(vec![]).is_recoverable());
        assert!(!OpticalcError::standard_load("p", "r").is_recoverable());
    }
}
