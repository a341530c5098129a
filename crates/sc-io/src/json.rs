//! Profiles as a JSON object with parallel `thickness` and `porosity` arrays.

use crate::traits::ProfileFormat;
use sc_core::{Profile, Result};
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonProfile;

impl JsonProfile {
    pub fn new() -> Self {
        Self
    }
}

impl ProfileFormat for JsonProfile {
    fn read(&self, reader: &mut dyn Read) -> Result<Profile> {
        let raw: Profile = serde_json::from_reader(reader)?;
        let profile = Profile::new(raw.thickness, raw.porosity)?;
        profile.validate()?;
        Ok(profile)
    }

    fn write(&self, profile: &Profile, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, profile)?;
        writeln!(writer)?;
        Ok(())
    }

    fn supported_extensions(&self) -> Vec<String> {
        vec![".json".into()]
    }
}
