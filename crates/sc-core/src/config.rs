//! Compaction constants: defaults, file formats, merging and validation.

use crate::error::{CompactionError, Result};
use crate::types::{check_porosity_bounds, PARAMETER_RULES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Standard gravity [m/s^2].
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Scalar compaction constants, one value per named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    pub c: f64,
    pub rho_grain: f64,
    pub rho_void: f64,
    pub porosity_min: f64,
    pub porosity_max: f64,
    pub excess_pressure: f64,
    pub gravity: f64,
}

/// Values used for every constant a configuration source leaves out.
pub const DEFAULT_CONSTANTS: Constants = Constants {
    c: 5e-8,
    rho_grain: 2650.0,
    rho_void: 1000.0,
    porosity_min: 0.0,
    porosity_max: 1.0,
    excess_pressure: 0.0,
    gravity: STANDARD_GRAVITY,
};

impl Default for Constants {
    fn default() -> Self {
        DEFAULT_CONSTANTS
    }
}

impl Constants {
    /// Constants paired with their names.
    pub fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("c", self.c),
            ("rho_grain", self.rho_grain),
            ("rho_void", self.rho_void),
            ("porosity_min", self.porosity_min),
            ("porosity_max", self.porosity_max),
            ("excess_pressure", self.excess_pressure),
            ("gravity", self.gravity),
        ]
    }

    /// Fail on the first constant outside its admissible range.
    pub fn validate(&self) -> Result<()> {
        for ((name, value), (_, rule)) in self.named().into_iter().zip(PARAMETER_RULES) {
            rule.check(name, value)?;
        }
        check_porosity_bounds(self.porosity_min, self.porosity_max)
    }

    /// Render as a `[compaction.constants]` TOML document.
    pub fn to_toml(&self) -> Result<String> {
        let doc = ConfigDoc {
            compaction: SectionDoc { constants: self },
        };
        toml::to_string(&doc).map_err(|e| CompactionError::Config(e.to_string()))
    }

    /// Render as the JSON equivalent of [`Constants::to_toml`].
    pub fn to_json_pretty(&self) -> Result<String> {
        let doc = ConfigDoc {
            compaction: SectionDoc { constants: self },
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

/// A subset of constants supplied by a configuration source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstantsOverrides {
    pub c: Option<f64>,
    pub rho_grain: Option<f64>,
    pub rho_void: Option<f64>,
    pub porosity_min: Option<f64>,
    pub porosity_max: Option<f64>,
    pub excess_pressure: Option<f64>,
    pub gravity: Option<f64>,
}

/// Overlay `overrides` on `defaults`.
pub fn merge(defaults: &Constants, overrides: &ConstantsOverrides) -> Constants {
    Constants {
        c: overrides.c.unwrap_or(defaults.c),
        rho_grain: overrides.rho_grain.unwrap_or(defaults.rho_grain),
        rho_void: overrides.rho_void.unwrap_or(defaults.rho_void),
        porosity_min: overrides.porosity_min.unwrap_or(defaults.porosity_min),
        porosity_max: overrides.porosity_max.unwrap_or(defaults.porosity_max),
        excess_pressure: overrides.excess_pressure.unwrap_or(defaults.excess_pressure),
        gravity: overrides.gravity.unwrap_or(defaults.gravity),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    compaction: Section,
}

#[derive(Debug, Default, Deserialize)]
struct Section {
    #[serde(default)]
    constants: ConstantsOverrides,
}

#[derive(Serialize)]
struct ConfigDoc<'a> {
    compaction: SectionDoc<'a>,
}

#[derive(Serialize)]
struct SectionDoc<'a> {
    constants: &'a Constants,
}

/// Configuration file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// JSON for a `.json` extension, TOML otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Parse the `compaction.constants` table; a missing table yields no overrides.
pub fn parse_overrides(contents: &str, format: ConfigFormat) -> Result<ConstantsOverrides> {
    let file: ConfigFile = match format {
        ConfigFormat::Toml => {
            toml::from_str(contents).map_err(|e| CompactionError::Config(e.to_string()))?
        }
        ConfigFormat::Json if contents.trim().is_empty() => ConfigFile::default(),
        ConfigFormat::Json => {
            serde_json::from_str(contents).map_err(|e| CompactionError::Config(e.to_string()))?
        }
    };
    Ok(file.compaction.constants)
}

/// Merge a configuration document over [`DEFAULT_CONSTANTS`] and validate it.
pub fn load_config_str(contents: &str, format: ConfigFormat) -> Result<Constants> {
    let overrides = parse_overrides(contents, format)?;
    let constants = merge(&DEFAULT_CONSTANTS, &overrides);
    constants.validate()?;
    Ok(constants)
}

/// Load constants from `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Constants> {
    let Some(path) = path else {
        debug!("no config file, using defaults");
        return Ok(DEFAULT_CONSTANTS);
    };
    let format = ConfigFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading config");
    let contents = std::fs::read_to_string(path)?;
    load_config_str(&contents, format)
}
