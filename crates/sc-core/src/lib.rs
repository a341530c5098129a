//! Shared types for sediment compaction: parameters, profiles, configuration and errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    load_config, load_config_str, merge, ConfigFormat, Constants, ConstantsOverrides,
    DEFAULT_CONSTANTS, STANDARD_GRAVITY,
};
pub use error::{CompactionError, Result};
pub use types::{CompactionParams, Param, Profile, Rule};
