//! Layer storage for hosts that deposit sediment over time.
//!
//! A [`LayerStack`] keeps layers in deposition order: row 0 is the deepest
//! (oldest) layer and new layers are pushed on top. The engine works top
//! first, so [`Compact::run_one_step`] reverses the depth axis on the way in
//! and on the way out.

use crate::engine::{compact, Compacted};
use ndarray::{s, Array2, ArrayView1, ArrayView2};
use sc_core::types::check_porosity_bounds;
use sc_core::{CompactionError, CompactionParams, Constants, Param, Result};
use tracing::debug;

/// Layers of `n_columns` independent sediment columns, deepest first.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    dz: Array2<f64>,
    porosity: Array2<f64>,
}

impl LayerStack {
    pub fn new(n_columns: usize) -> Self {
        Self {
            dz: Array2::zeros((0, n_columns)),
            porosity: Array2::zeros((0, n_columns)),
        }
    }

    pub fn n_layers(&self) -> usize {
        self.dz.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.dz.ncols()
    }

    /// Layer thickness, row 0 deepest.
    pub fn dz(&self) -> ArrayView2<'_, f64> {
        self.dz.view()
    }

    /// Layer porosity, row 0 deepest.
    pub fn porosity(&self) -> ArrayView2<'_, f64> {
        self.porosity.view()
    }

    /// Deposit a uniform layer over every column.
    pub fn add(&mut self, thickness: f64, porosity: f64) -> Result<()> {
        let n = self.n_columns();
        self.add_layer(&vec![thickness; n], &vec![porosity; n])
    }

    /// Deposit a layer with per-column thickness and porosity.
    pub fn add_layer(&mut self, thickness: &[f64], porosity: &[f64]) -> Result<()> {
        let n = self.n_columns();
        if thickness.len() != n {
            return Err(CompactionError::shape_mismatch("thickness", &[n], &[thickness.len()]));
        }
        if porosity.len() != n {
            return Err(CompactionError::shape_mismatch("porosity", &[n], &[porosity.len()]));
        }
        self.dz
            .push_row(ArrayView1::from(thickness))
            .map_err(|_| CompactionError::shape_mismatch("thickness", &[n], &[thickness.len()]))?;
        self.porosity
            .push_row(ArrayView1::from(porosity))
            .map_err(|_| CompactionError::shape_mismatch("porosity", &[n], &[porosity.len()]))?;
        Ok(())
    }
}

/// Compacts a [`LayerStack`] in place once per step.
#[derive(Debug, Clone)]
pub struct Compact {
    params: CompactionParams,
}

impl Compact {
    /// Fails on the first constant outside its admissible range.
    pub fn new(constants: Constants) -> Result<Self> {
        constants.validate()?;
        Ok(Self {
            params: CompactionParams::from(&constants),
        })
    }

    /// Depth-varying parameters are given in stack order (row 0 deepest).
    pub fn with_params(params: CompactionParams) -> Result<Self> {
        params.check_values()?;
        if let (Param::Scalar(min), Param::Scalar(max)) =
            (&params.porosity_min, &params.porosity_max)
        {
            check_porosity_bounds(*min, *max)?;
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &CompactionParams {
        &self.params
    }

    pub fn run_one_step(&self, stack: &mut LayerStack) -> Result<()> {
        let params = self.params.flip_depth();
        params.validate(stack.dz.dim())?;

        let Compacted { porosity, thickness } = compact(
            stack.dz.slice(s![..;-1, ..]),
            stack.porosity.slice(s![..;-1, ..]),
            &params,
        )?;
        stack.dz.slice_mut(s![..;-1, ..]).assign(&thickness);
        stack.porosity.slice_mut(s![..;-1, ..]).assign(&porosity);

        debug!(layers = stack.n_layers(), columns = stack.n_columns(), "compacted layer stack");
        Ok(())
    }
}
