//! Exponential porosity-reduction law.

use crate::load::overlying_load;
use ndarray::{Array2, ArrayView2, Zip};
use sc_core::{CompactionParams, Result};
use tracing::debug;

/// Porosity in equilibrium with `load`, before clamping to the current value.
#[inline]
pub fn equilibrium_porosity(load: f64, c: f64, porosity_min: f64, porosity_max: f64) -> f64 {
    porosity_min + (porosity_max - porosity_min) * (-c * load).exp()
}

/// New porosity of every layer under the weight of the layers above it.
///
/// `dz` and `porosity` are `(layers, columns)` with layer 0 at the top. The
/// result never exceeds the input porosity: a layer that is already more
/// compacted than its load implies is left as is.
pub fn compute_porosity(
    dz: ArrayView2<f64>,
    porosity: ArrayView2<f64>,
    params: &CompactionParams,
) -> Result<Array2<f64>> {
    let mut out = overlying_load(dz, porosity, params)?;
    Zip::indexed(&mut out)
        .and(&porosity)
        .for_each(|(layer, column), value, &phi| {
            let phi_new = equilibrium_porosity(
                *value,
                params.c.at(layer, column),
                params.porosity_min.at(layer, column),
                params.porosity_max.at(layer, column),
            );
            *value = phi_new.min(phi);
        });
    debug!(layers = dz.nrows(), columns = dz.ncols(), "computed porosity");
    Ok(out)
}
