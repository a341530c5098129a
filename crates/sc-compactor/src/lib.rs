//! Sediment compaction engine.
//!
//! Porosity of each layer relaxes exponentially toward `porosity_min` with
//! the load of the layers above it, and never increases. Thickness follows
//! from keeping each layer's solid volume constant.
//!
//! Stages:
//! 1. Load: buoyant weight of overlying layers, less excess pore pressure
//! 2. Porosity: exponential law, clamped to the input porosity
//! 3. Thickness: solid-volume conservation, zero for fully void layers
//!
//! All profiles are `(layers, columns)` with layer 0 at the top of each column.

pub mod engine;
pub mod load;
pub mod porosity;
pub mod stack;
pub mod thickness;

pub use engine::{
    column_view, compact, compact_column, compact_porosity, compact_profile, Compacted,
};
pub use load::{layer_load, overlying_load};
pub use porosity::{compute_porosity, equilibrium_porosity};
pub use stack::{Compact, LayerStack};
pub use thickness::{compute_thickness, compute_thickness_into, conserved_thickness};

#[cfg(test)]
mod tests;
