//! Example input files for a new simulation folder.

use crate::table::CsvTable;
use crate::traits::ProfileFormat;
use sc_core::{Constants, Profile, Result, DEFAULT_CONSTANTS};

/// One of the files `setup` writes and `generate` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFile {
    Porosity,
    Config,
}

impl SampleFile {
    pub const ALL: [SampleFile; 2] = [SampleFile::Porosity, SampleFile::Config];

    pub fn name(self) -> &'static str {
        match self {
            Self::Porosity => "porosity.csv",
            Self::Config => "compaction.toml",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|file| file.name() == name)
    }

    /// Three 100 m layers at porosity 0.5, and constants whose
    /// `porosity_max` matches them.
    pub fn contents(self) -> Result<String> {
        match self {
            Self::Porosity => {
                let mut buf = Vec::new();
                CsvTable::new().write(&sample_profile(), &mut buf)?;
                Ok(String::from_utf8_lossy(&buf).into_owned())
            }
            Self::Config => sample_constants().to_toml(),
        }
    }
}

pub fn sample_profile() -> Profile {
    Profile::uniform(3, 100.0, 0.5)
}

pub fn sample_constants() -> Constants {
    Constants {
        porosity_max: 0.5,
        ..DEFAULT_CONSTANTS
    }
}
