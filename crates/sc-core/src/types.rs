use crate::config::{Constants, DEFAULT_CONSTANTS};
use crate::error::{CompactionError, Result};
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

/// Admissible range of a physical parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any finite value.
    Finite,
    /// Finite and `>= 0`.
    NonNegative,
    /// Finite and `> 0`.
    Positive,
    /// Finite and within `[0, 1]`.
    Fraction,
}

impl Rule {
    pub fn check(self, name: &'static str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(CompactionError::invalid_parameter(name, value, "must be finite"));
        }
        let (ok, reason) = match self {
            Self::Finite => (true, ""),
            Self::NonNegative => (value >= 0.0, "must be >= 0"),
            Self::Positive => (value > 0.0, "must be positive"),
            Self::Fraction => ((0.0..=1.0).contains(&value), "must be between 0 and 1"),
        };
        if ok {
            Ok(())
        } else {
            Err(CompactionError::invalid_parameter(name, value, reason))
        }
    }
}

/// Validation rule of every named parameter, in declaration order.
pub const PARAMETER_RULES: [(&str, Rule); 7] = [
    ("c", Rule::NonNegative),
    ("rho_grain", Rule::Positive),
    ("rho_void", Rule::NonNegative),
    ("porosity_min", Rule::Fraction),
    ("porosity_max", Rule::Fraction),
    ("excess_pressure", Rule::Finite),
    ("gravity", Rule::Positive),
];

/// `porosity_max` may not fall below `porosity_min`.
pub fn check_porosity_bounds(porosity_min: f64, porosity_max: f64) -> Result<()> {
    if porosity_max < porosity_min {
        return Err(CompactionError::invalid_parameter(
            "porosity_max",
            porosity_max,
            "must be >= porosity_min",
        ));
    }
    Ok(())
}

/// A compaction parameter broadcast against a `(layers, columns)` profile.
///
/// Broadcast rules:
/// - `Scalar` applies to every element.
/// - `PerLayer` must have one value per layer and is shared by all columns.
/// - `PerColumn` must have one value per column and is shared by all layers.
/// - `Field` must match the profile shape exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Scalar(f64),
    PerLayer(Array1<f64>),
    PerColumn(Array1<f64>),
    Field(Array2<f64>),
}

impl Param {
    /// Fail with `ShapeMismatch` unless the parameter broadcasts to `shape`.
    pub fn check_shape(&self, name: &'static str, shape: (usize, usize)) -> Result<()> {
        let (n_layers, n_columns) = shape;
        match self {
            Self::Scalar(_) => Ok(()),
            Self::PerLayer(v) if v.len() == n_layers => Ok(()),
            Self::PerLayer(v) => {
                Err(CompactionError::shape_mismatch(name, &[n_layers], &[v.len()]))
            }
            Self::PerColumn(v) if v.len() == n_columns => Ok(()),
            Self::PerColumn(v) => {
                Err(CompactionError::shape_mismatch(name, &[n_columns], &[v.len()]))
            }
            Self::Field(a) if a.dim() == shape => Ok(()),
            Self::Field(a) => Err(CompactionError::shape_mismatch(
                name,
                &[n_layers, n_columns],
                a.shape(),
            )),
        }
    }

    /// Value at `(layer, column)`. The shape must already have been checked.
    #[inline]
    pub fn at(&self, layer: usize, column: usize) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::PerLayer(v) => v[layer],
            Self::PerColumn(v) => v[column],
            Self::Field(a) => a[[layer, column]],
        }
    }

    /// Every stored value (a scalar yields one).
    pub fn values(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            Self::Scalar(v) => Box::new(std::iter::once(*v)),
            Self::PerLayer(v) | Self::PerColumn(v) => Box::new(v.iter().copied()),
            Self::Field(a) => Box::new(a.iter().copied()),
        }
    }

    /// The same parameter with its depth axis reversed.
    pub fn flip_depth(&self) -> Self {
        match self {
            Self::PerLayer(v) => Self::PerLayer(v.slice(s![..;-1]).to_owned()),
            Self::Field(a) => Self::Field(a.slice(s![..;-1, ..]).to_owned()),
            other => other.clone(),
        }
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for Param {
    fn from(values: Vec<f64>) -> Self {
        Self::PerLayer(Array1::from(values))
    }
}

impl From<Array2<f64>> for Param {
    fn from(values: Array2<f64>) -> Self {
        Self::Field(values)
    }
}

/// Full parameter set consumed by the compaction engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactionParams {
    /// Compaction coefficient [1/Pa].
    pub c: Param,
    /// Grain density [kg/m^3].
    pub rho_grain: Param,
    /// Density of the pore fluid [kg/m^3].
    pub rho_void: Param,
    /// Porosity of the closest-packed state [-].
    pub porosity_min: Param,
    /// Porosity of freshly deposited sediment [-].
    pub porosity_max: Param,
    /// Pore pressure in excess of hydrostatic [Pa].
    pub excess_pressure: Param,
    /// Gravitational acceleration [m/s^2].
    pub gravity: Param,
}

impl CompactionParams {
    pub fn c(mut self, value: impl Into<Param>) -> Self {
        self.c = value.into();
        self
    }

    pub fn rho_grain(mut self, value: impl Into<Param>) -> Self {
        self.rho_grain = value.into();
        self
    }

    pub fn rho_void(mut self, value: impl Into<Param>) -> Self {
        self.rho_void = value.into();
        self
    }

    pub fn porosity_min(mut self, value: impl Into<Param>) -> Self {
        self.porosity_min = value.into();
        self
    }

    pub fn porosity_max(mut self, value: impl Into<Param>) -> Self {
        self.porosity_max = value.into();
        self
    }

    pub fn excess_pressure(mut self, value: impl Into<Param>) -> Self {
        self.excess_pressure = value.into();
        self
    }

    pub fn gravity(mut self, value: impl Into<Param>) -> Self {
        self.gravity = value.into();
        self
    }

    /// Parameters paired with their names, in [`PARAMETER_RULES`] order.
    pub fn named(&self) -> [(&'static str, &Param); 7] {
        [
            ("c", &self.c),
            ("rho_grain", &self.rho_grain),
            ("rho_void", &self.rho_void),
            ("porosity_min", &self.porosity_min),
            ("porosity_max", &self.porosity_max),
            ("excess_pressure", &self.excess_pressure),
            ("gravity", &self.gravity),
        ]
    }

    pub fn check_shape(&self, shape: (usize, usize)) -> Result<()> {
        for (name, param) in self.named() {
            param.check_shape(name, shape)?;
        }
        Ok(())
    }

    /// Check every stored value against its rule, whatever the profile shape.
    pub fn check_values(&self) -> Result<()> {
        for ((name, param), (_, rule)) in self.named().into_iter().zip(PARAMETER_RULES) {
            for value in param.values() {
                rule.check(name, value)?;
            }
        }
        Ok(())
    }

    /// Check every stored value against its rule, and the porosity bounds
    /// against each other wherever both are defined for a `shape` element.
    pub fn validate(&self, shape: (usize, usize)) -> Result<()> {
        self.check_shape(shape)?;
        self.check_values()?;
        let (n_layers, n_columns) = shape;
        for layer in 0..n_layers {
            for column in 0..n_columns {
                check_porosity_bounds(
                    self.porosity_min.at(layer, column),
                    self.porosity_max.at(layer, column),
                )?;
            }
        }
        Ok(())
    }

    /// The same parameters with every depth-varying field reversed.
    pub fn flip_depth(&self) -> Self {
        Self {
            c: self.c.flip_depth(),
            rho_grain: self.rho_grain.flip_depth(),
            rho_void: self.rho_void.flip_depth(),
            porosity_min: self.porosity_min.flip_depth(),
            porosity_max: self.porosity_max.flip_depth(),
            excess_pressure: self.excess_pressure.flip_depth(),
            gravity: self.gravity.flip_depth(),
        }
    }
}

impl From<&Constants> for CompactionParams {
    fn from(constants: &Constants) -> Self {
        Self {
            c: constants.c.into(),
            rho_grain: constants.rho_grain.into(),
            rho_void: constants.rho_void.into(),
            porosity_min: constants.porosity_min.into(),
            porosity_max: constants.porosity_max.into(),
            excess_pressure: constants.excess_pressure.into(),
            gravity: constants.gravity.into(),
        }
    }
}

impl From<Constants> for CompactionParams {
    fn from(constants: Constants) -> Self {
        Self::from(&constants)
    }
}

impl Default for CompactionParams {
    fn default() -> Self {
        Self::from(&DEFAULT_CONSTANTS)
    }
}

/// A single sediment column as two parallel columns, index 0 at the top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Layer thickness [m].
    pub thickness: Vec<f64>,
    /// Layer porosity [-].
    pub porosity: Vec<f64>,
}

impl Profile {
    pub fn new(thickness: Vec<f64>, porosity: Vec<f64>) -> Result<Self> {
        if thickness.len() != porosity.len() {
            return Err(CompactionError::shape_mismatch(
                "porosity",
                &[thickness.len()],
                &[porosity.len()],
            ));
        }
        Ok(Self { thickness, porosity })
    }

    /// `n` identical layers.
    pub fn uniform(n: usize, thickness: f64, porosity: f64) -> Self {
        Self {
            thickness: vec![thickness; n],
            porosity: vec![porosity; n],
        }
    }

    pub fn len(&self) -> usize {
        self.thickness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thickness.is_empty()
    }

    pub fn push(&mut self, thickness: f64, porosity: f64) {
        self.thickness.push(thickness);
        self.porosity.push(porosity);
    }

    pub fn rows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.thickness.iter().copied().zip(self.porosity.iter().copied())
    }

    /// Reject negative thickness or porosity outside `[0, 1]`. Rows are 1-based.
    pub fn validate(&self) -> Result<()> {
        for (i, (dz, phi)) in self.rows().enumerate() {
            Self::check_layer(i + 1, dz, phi)?;
        }
        Ok(())
    }

    /// Range check of a single layer, reported against `row`.
    pub fn check_layer(row: usize, thickness: f64, porosity: f64) -> Result<()> {
        if !(thickness.is_finite() && thickness >= 0.0) {
            return Err(CompactionError::InvalidProfile {
                row,
                field: "thickness",
                value: thickness,
            });
        }
        if !(0.0..=1.0).contains(&porosity) {
            return Err(CompactionError::InvalidProfile {
                row,
                field: "porosity",
                value: porosity,
            });
        }
        Ok(())
    }
}
