//! Fused porosity + thickness compaction, and single-column conveniences.

use crate::porosity::compute_porosity;
use crate::thickness::compute_thickness;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use sc_core::{CompactionParams, Profile, Result};

/// Porosity and thickness after one compaction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Compacted {
    pub porosity: Array2<f64>,
    pub thickness: Array2<f64>,
}

/// Compact a `(layers, columns)` profile, layer 0 at the top.
pub fn compact(
    dz: ArrayView2<f64>,
    porosity: ArrayView2<f64>,
    params: &CompactionParams,
) -> Result<Compacted> {
    let porosity_new = compute_porosity(dz, porosity, params)?;
    let thickness = compute_thickness(dz, porosity, porosity_new.view())?;
    Ok(Compacted {
        porosity: porosity_new,
        thickness,
    })
}

/// View a single column as a `(layers, 1)` profile.
pub fn column_view(values: &[f64]) -> ArrayView2<'_, f64> {
    ArrayView1::from(values).insert_axis(Axis(1))
}

/// New porosity of a single column.
pub fn compact_porosity(
    dz: &[f64],
    porosity: &[f64],
    params: &CompactionParams,
) -> Result<Vec<f64>> {
    let porosity_new = compute_porosity(column_view(dz), column_view(porosity), params)?;
    Ok(porosity_new.column(0).to_vec())
}

/// New `(thickness, porosity)` of a single column.
pub fn compact_column(
    dz: &[f64],
    porosity: &[f64],
    params: &CompactionParams,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let out = compact(column_view(dz), column_view(porosity), params)?;
    Ok((out.thickness.column(0).to_vec(), out.porosity.column(0).to_vec()))
}

/// Compact a tabular profile.
pub fn compact_profile(profile: &Profile, params: &CompactionParams) -> Result<Profile> {
    let (thickness, porosity) = compact_column(&profile.thickness, &profile.porosity, params)?;
    Profile::new(thickness, porosity)
}
