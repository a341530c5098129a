//! Overburden load integrated down each column.

use ndarray::{Array2, ArrayView2, Axis};
use sc_core::{CompactionError, CompactionParams, Result};

/// Buoyant weight per unit area of one layer's solids [Pa].
#[inline]
pub fn layer_load(dz: f64, porosity: f64, rho_grain: f64, rho_void: f64, gravity: f64) -> f64 {
    (rho_grain - rho_void) * dz * (1.0 - porosity) * gravity
}

pub(crate) fn check_same_shape(
    name: &'static str,
    dz: &ArrayView2<f64>,
    other: &ArrayView2<f64>,
) -> Result<()> {
    if dz.dim() != other.dim() {
        return Err(CompactionError::shape_mismatch(name, dz.shape(), other.shape()));
    }
    Ok(())
}

/// Load on the top of every layer: the weight of all shallower layers of the
/// same column, less the excess pore pressure.
///
/// Layer 0 is the top of each column, so it only sees `-excess_pressure`.
/// The running sum excludes the layer itself rather than subtracting it
/// afterwards, which keeps the top layer exact.
pub fn overlying_load(
    dz: ArrayView2<f64>,
    porosity: ArrayView2<f64>,
    params: &CompactionParams,
) -> Result<Array2<f64>> {
    check_same_shape("porosity", &dz, &porosity)?;
    params.check_shape(dz.dim())?;

    let mut out = Array2::zeros(dz.raw_dim());
    for (column, mut loads) in out.axis_iter_mut(Axis(1)).enumerate() {
        let mut above = 0.0;
        for (layer, load) in loads.iter_mut().enumerate() {
            let at = (layer, column);
            *load = above - params.excess_pressure.at(layer, column);
            above += layer_load(
                dz[at],
                porosity[at],
                params.rho_grain.at(layer, column),
                params.rho_void.at(layer, column),
                params.gravity.at(layer, column),
            );
        }
    }
    Ok(out)
}
