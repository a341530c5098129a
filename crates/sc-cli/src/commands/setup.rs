use crate::Console;
use anyhow::{Context, Result};
use sc_io::SampleFile;
use std::path::Path;
use tracing::info;

/// Write every example file into `workdir`.
///
/// Nothing is written if any of them already exists; each one found is
/// reported on stderr and their number is returned.
pub fn execute(workdir: &Path, console: &mut Console<'_>) -> Result<usize> {
    let existing: Vec<&str> = SampleFile::ALL
        .iter()
        .map(|file| file.name())
        .filter(|name| workdir.join(name).exists())
        .collect();

    if !existing.is_empty() {
        for name in &existing {
            writeln!(
                console.stderr,
                "{name}: File exists. Either remove and then rerun or choose a \
                 different destination folder"
            )?;
        }
        return Ok(existing.len());
    }

    for file in SampleFile::ALL {
        let path = workdir.join(file.name());
        std::fs::write(&path, file.contents()?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "created example file");
    }
    writeln!(console.stdout, "{}", workdir.display())?;
    Ok(0)
}
