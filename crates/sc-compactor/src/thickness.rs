//! Layer thickness from conservation of solid volume.

use crate::load::check_same_shape;
use ndarray::{Array2, ArrayView2, ArrayViewMut2, Zip};
use sc_core::{CompactionError, Result};

/// Thickness holding the same solids at `porosity_new`. A layer with no
/// solids left (`porosity_new >= 1`) has zero thickness; NaN propagates.
///
/// When `porosity_new <= porosity` the result never exceeds `dz`, including
/// by rounding. A porosity increase expands the layer.
#[inline]
pub fn conserved_thickness(dz: f64, porosity: f64, porosity_new: f64) -> f64 {
    if porosity_new >= 1.0 {
        return 0.0;
    }
    let thickness = dz * (1.0 - porosity) / (1.0 - porosity_new);
    if porosity_new <= porosity {
        thickness.min(dz)
    } else {
        thickness
    }
}

/// Compacted thickness of every layer, in a new array.
pub fn compute_thickness(
    dz: ArrayView2<f64>,
    porosity: ArrayView2<f64>,
    porosity_new: ArrayView2<f64>,
) -> Result<Array2<f64>> {
    let mut out = Array2::zeros(dz.raw_dim());
    compute_thickness_into(dz, porosity, porosity_new, out.view_mut())?;
    Ok(out)
}

/// Compacted thickness of every layer, written into `out`.
///
/// `out` must have the shape of `dz`; nothing is written otherwise.
pub fn compute_thickness_into(
    dz: ArrayView2<f64>,
    porosity: ArrayView2<f64>,
    porosity_new: ArrayView2<f64>,
    out: ArrayViewMut2<f64>,
) -> Result<()> {
    check_same_shape("porosity", &dz, &porosity)?;
    check_same_shape("new porosity", &dz, &porosity_new)?;
    if out.dim() != dz.dim() {
        return Err(CompactionError::shape_mismatch("output buffer", dz.shape(), out.shape()));
    }

    Zip::from(out)
        .and(&dz)
        .and(&porosity)
        .and(&porosity_new)
        .for_each(|out, &dz, &phi, &phi_new| *out = conserved_thickness(dz, phi, phi_new));
    Ok(())
}
