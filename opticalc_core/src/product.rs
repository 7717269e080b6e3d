//! # Product Data Structures
//!
//! Glazing/shading product definitions consumed by the calculation layer.
//! These mirror the shared database records products are submitted as:
//! identity, subtype classification, coated side, physical properties, and
//! any previously calculated integrated summaries.
//!
//! ## Example
//!
//! ```rust
//! use opticalc_core::product::{PhysicalProperties, Product, ProductSubtype, ProductType};
//!
//! let product = Product::new(ProductType::Glazing, ProductSubtype::Monolithic)
//!     .with_token("IGSDB-1234")
//!     .with_physical_properties(PhysicalProperties {
//!         thickness: Some(3.048),
//!         ..PhysicalProperties::default()
//!     });
//! assert_eq!(product.identity(), "IGSDB-1234");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::results::IntegratedSummary;

/// Top-level product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    Glazing,
    Shading,
    Material,
}

/// Product subtype classification.
///
/// Glazing subtypes map directly onto engine material types. Shading
/// subtypes mostly do not; the ones this layer supports are dispatched to
/// the engine under a documented generic mapping (see the convert module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductSubtype {
    // Glazing subtypes
    Monolithic,
    Laminate,
    Interlayer,
    EmbeddedCoating,
    Coated,
    Coating,
    AppliedFilm,
    Film,

    // Hybrid glazing/shading subtypes
    FrittedGlass,
    SandblastedGlass,
    AcidEtchedGlass,
    Chromogenic,

    // Shading subtypes with an associated geometry
    VenetianBlind,
    VerticalLouver,
    PerforatedScreen,
    WovenShade,

    // Shading subtypes carrying a BSDF
    RollerShade,
    CellularShade,
    PleatedShade,
    RomanShade,

    DiffusingShade,
    SolarScreen,

    // Shading materials
    ShadeMaterial,

    Unknown,
}

impl ProductSubtype {
    /// Human-readable display name as stored in the product database
    pub fn display_name(&self) -> &'static str {
        match self {
            ProductSubtype::Monolithic => "Monolithic",
            ProductSubtype::Laminate => "Laminate",
            ProductSubtype::Interlayer => "Interlayer",
            ProductSubtype::EmbeddedCoating => "Embedded coating",
            ProductSubtype::Coated => "Coated glass",
            ProductSubtype::Coating => "Coating",
            ProductSubtype::AppliedFilm => "Applied film",
            ProductSubtype::Film => "Film",
            ProductSubtype::FrittedGlass => "Fritted glass",
            ProductSubtype::SandblastedGlass => "Sandblasted glass",
            ProductSubtype::AcidEtchedGlass => "Acid etched glass",
            ProductSubtype::Chromogenic => "Chromogenic",
            ProductSubtype::VenetianBlind => "Venetian blind",
            ProductSubtype::VerticalLouver => "Vertical louver",
            ProductSubtype::PerforatedScreen => "Perforated screen",
            ProductSubtype::WovenShade => "Woven shade",
            ProductSubtype::RollerShade => "Roller shade",
            ProductSubtype::CellularShade => "Cellular shade",
            ProductSubtype::PleatedShade => "Pleated shade",
            ProductSubtype::RomanShade => "Roman shade",
            ProductSubtype::DiffusingShade => "Diffusing shade",
            ProductSubtype::SolarScreen => "Solar screen",
            ProductSubtype::ShadeMaterial => "Shade material",
            ProductSubtype::Unknown => "Unknown",
        }
    }

    /// Whether this subtype is a shading material (emissivity results from
    /// the thermal-IR calculation are not reported for these)
    pub fn is_shade_material(&self) -> bool {
        matches!(self, ProductSubtype::ShadeMaterial)
    }
}

impl std::fmt::Display for ProductSubtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Physical properties of a product layer.
///
/// 'Predefined' emissivity and TIR values come from legacy submission file
/// headers; when present they win over any calculated value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicalProperties {
    pub predefined_emissivity_front: Option<f64>,
    pub predefined_emissivity_back: Option<f64>,
    pub predefined_tir_front: Option<f64>,
    pub predefined_tir_back: Option<f64>,

    /// Layer thickness in millimeters
    pub thickness: Option<f64>,
    pub permeability_factor: Option<f64>,
    pub optical_openness: Option<f64>,
}

/// A glazing or shading product record.
///
/// ## JSON Example
///
/// ```json
/// {
///   "product_type": "Glazing",
///   "subtype": "Monolithic",
///   "product_id": 1234,
///   "token": "IGSDB-1234",
///   "coated_side": "NA",
///   "physical_properties": { "thickness": 3.048 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_type: ProductType,
    pub subtype: ProductSubtype,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,

    /// Stable database token (e.g. "IGSDB-1234")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    /// Which side carries the coating ("FRONT", "BACK", "BOTH", "NEITHER",
    /// "NA", or absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coated_side: Option<String>,

    #[serde(default)]
    pub physical_properties: PhysicalProperties,

    /// Summaries from previous calculation runs, keyed by standard name.
    /// Consulted when resolving emissivity/TIR for a new run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub integrated_summaries: Vec<IntegratedSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(product_type: ProductType, subtype: ProductSubtype) -> Self {
        Product {
            product_type,
            subtype,
            product_id: None,
            token: None,
            manufacturer: None,
            coated_side: None,
            physical_properties: PhysicalProperties::default(),
            integrated_summaries: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_coated_side(mut self, coated_side: impl Into<String>) -> Self {
        self.coated_side = Some(coated_side.into());
        self
    }

    pub fn with_physical_properties(mut self, physical_properties: PhysicalProperties) -> Self {
        self.physical_properties = physical_properties;
        self
    }

    /// Identity string used in error messages and logs: the token if one
    /// exists, else the numeric id, else a placeholder.
    pub fn identity(&self) -> String {
        if let Some(token) = &self.token {
            token.clone()
        } else if let Some(id) = self.product_id {
            format!("product-{}", id)
        } else {
            "unidentified-product".to_string()
        }
    }

    /// Front emissivity for the given standard: predefined value wins
    /// (including an explicit 0), else the value from a prior thermal-IR
    /// summary for that standard.
    pub fn emissivity_front(&self, standard: &str) -> Option<f64> {
        if let Some(value) = self.physical_properties.predefined_emissivity_front {
            return Some(value);
        }
        self.prior_thermal_ir(standard)
            .and_then(|ir| ir.emissivity_front_hemispheric)
    }

    /// Back emissivity for the given standard; same resolution order as
    /// [`Self::emissivity_front`]
    pub fn emissivity_back(&self, standard: &str) -> Option<f64> {
        if let Some(value) = self.physical_properties.predefined_emissivity_back {
            return Some(value);
        }
        self.prior_thermal_ir(standard)
            .and_then(|ir| ir.emissivity_back_hemispheric)
    }

    /// Front IR transmittance for the given standard
    pub fn tir_front(&self, standard: &str) -> Option<f64> {
        if let Some(value) = self.physical_properties.predefined_tir_front {
            return Some(value);
        }
        self.prior_thermal_ir(standard)
            .and_then(|ir| ir.transmittance_front_diffuse_diffuse)
    }

    /// Back IR transmittance for the given standard
    pub fn tir_back(&self, standard: &str) -> Option<f64> {
        if let Some(value) = self.physical_properties.predefined_tir_back {
            return Some(value);
        }
        self.prior_thermal_ir(standard)
            .and_then(|ir| ir.transmittance_back_diffuse_diffuse)
    }

    fn prior_thermal_ir(&self, standard: &str) -> Option<&crate::results::ThermalIrSummary> {
        self.integrated_summaries
            .iter()
            .find(|summary| summary.standard == standard)
            .and_then(|summary| summary.thermal_ir.as_ref())
    }
}
