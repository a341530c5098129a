use sc_core::{Profile, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A file format holding one layer profile, top layer first.
pub trait ProfileFormat: Send + Sync {
    /// Read a whole profile. The result has passed [`Profile::validate`].
    fn read(&self, reader: &mut dyn Read) -> Result<Profile>;

    fn write(&self, profile: &Profile, writer: &mut dyn Write) -> Result<()>;

    /// Supported file extensions, with the leading dot.
    fn supported_extensions(&self) -> Vec<String>;

    fn read_str(&self, content: &str) -> Result<Profile> {
        self.read(&mut content.as_bytes())
    }

    fn read_file(&self, path: &Path) -> Result<Profile> {
        let mut reader = BufReader::new(File::open(path)?);
        self.read(&mut reader)
    }

    fn write_file(&self, profile: &Profile, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(profile, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn can_read(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let ext_with_dot = format!(".{}", ext.to_ascii_lowercase());
        self.supported_extensions().contains(&ext_with_dot)
    }
}
