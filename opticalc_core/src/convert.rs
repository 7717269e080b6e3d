//! # Engine Call-Shape Assembly
//!
//! Converts application dataclasses into the shapes the engine's
//! calculation entry points expect: subtype to engine material type,
//! coated-side labels to the engine enum, and a product plus validated
//! wavelength data into an [`EngineLayer`].

use crate::compat::CompatPolicy;
use crate::engine::{CoatedSide, EngineLayer, EngineMaterialType, EngineWavelengthEntry};
use crate::errors::{OpticalcError, OpticalcResult};
use crate::product::{Product, ProductSubtype};
use crate::spectral::WavelengthDataSet;

/// Map a product subtype to the engine material type.
///
/// Roller shades and shade materials are dispatched to the engine as the
/// generic monolithic type - a documented mapping, the engine has no
/// dedicated type for them. Subtypes with no mapping fail rather than
/// guess.
pub fn convert_subtype(subtype: ProductSubtype) -> OpticalcResult<EngineMaterialType> {
    match subtype {
        ProductSubtype::Monolithic => Ok(EngineMaterialType::Monolithic),
        ProductSubtype::AppliedFilm => Ok(EngineMaterialType::AppliedFilm),
        ProductSubtype::Coated => Ok(EngineMaterialType::Coated),
        ProductSubtype::Laminate => Ok(EngineMaterialType::Laminate),
        ProductSubtype::Interlayer => Ok(EngineMaterialType::Interlayer),
        ProductSubtype::Film => Ok(EngineMaterialType::Film),
        // Shading products without a dedicated engine type dispatch as
        // monolithic.
        ProductSubtype::RollerShade | ProductSubtype::ShadeMaterial => {
            Ok(EngineMaterialType::Monolithic)
        }
        other => Err(OpticalcError::unsupported_subtype(other.display_name())),
    }
}

/// Map a coated-side label to the engine enum.
///
/// Case-insensitive; absent, empty, and "NA" all mean no coated side.
pub fn convert_coated_side(coated_side: Option<&str>) -> OpticalcResult<CoatedSide> {
    let label = match coated_side {
        None => return Ok(CoatedSide::Neither),
        Some(value) => value.trim(),
    };
    if label.is_empty() {
        return Ok(CoatedSide::Neither);
    }
    match label.to_ascii_uppercase().as_str() {
        "FRONT" => Ok(CoatedSide::Front),
        "BACK" => Ok(CoatedSide::Back),
        "BOTH" => Ok(CoatedSide::Both),
        "NEITHER" | "NA" => Ok(CoatedSide::Neither),
        _ => Err(OpticalcError::unsupported_coated_side(label)),
    }
}

/// Build the engine layer for a product and its validated wavelength data.
///
/// Applies the compat policy: for diffuse-only data under a defective
/// engine version, every entry's direct component is set to the flat
/// placeholder and the layer is flagged - measured data is never
/// overwritten.
pub fn convert_product(
    product: &Product,
    data: &WavelengthDataSet,
    standard_name: &str,
    policy: &CompatPolicy,
) -> OpticalcResult<EngineLayer> {
    if data.is_empty() {
        return Err(OpticalcError::missing_optical_data(
            product.identity(),
            "no wavelength measurements",
        ));
    }
    let thickness = product.physical_properties.thickness.ok_or_else(|| {
        OpticalcError::missing_optical_data(product.identity(), "product has no thickness")
    })?;

    let material_type = convert_subtype(product.subtype)?;
    let coated_side = convert_coated_side(product.coated_side.as_deref())?;

    let placeholder = policy.direct_placeholder(data.coverage());
    let wavelength_data = data
        .measurements()
        .iter()
        .map(|m| EngineWavelengthEntry {
            wavelength: m.wavelength,
            direct: m.direct.or(placeholder),
            diffuse: m.diffuse,
        })
        .collect();

    Ok(EngineLayer {
        material_type,
        thickness,
        wavelength_data,
        coated_side,
        tir_front: product.tir_front(standard_name),
        tir_back: product.tir_back(standard_name),
        emissivity_front: product.emissivity_front(standard_name),
        emissivity_back: product.emissivity_back(standard_name),
        direct_placeholder_applied: placeholder.is_some(),
    })
}
