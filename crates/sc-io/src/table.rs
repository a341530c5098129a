//! Two-column delimited tables: `thickness,porosity` per row.

use crate::traits::ProfileFormat;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use sc_core::{CompactionError, Profile, Result};
use std::io::{Read, Write};
use tracing::debug;

/// First line of every table written with the default comment character.
pub const HEADER: &str = "# Layer Thickness [m], Porosity [-]";

const HEADER_TEXT: &str = "Layer Thickness [m], Porosity [-]";

/// Delimited table without a header row. Lines starting with the comment
/// character are skipped and fields are trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvTable {
    delimiter: u8,
    comment: Option<u8>,
}

impl CsvTable {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            comment: Some(b'#'),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// `None` disables comments, and with them the header line on output.
    pub fn with_comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    fn is_comment(&self, text: &str) -> bool {
        self.comment
            .is_some_and(|comment| text.as_bytes().first() == Some(&comment))
    }
}

impl Default for CsvTable {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_field(record: &StringRecord, index: usize, field: &str, line: usize) -> Result<f64> {
    let raw = &record[index];
    raw.parse::<f64>().map_err(|e| CompactionError::Parse {
        row: line,
        message: format!("{field} {raw:?}: {e}"),
    })
}

impl ProfileFormat for CsvTable {
    fn read(&self, reader: &mut dyn Read) -> Result<Profile> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true);

        // One record per physical line; error rows are source line numbers.
        let mut profile = Profile::default();
        let mut record = StringRecord::new();
        for (index, text) in content.lines().enumerate() {
            let line = index + 1;
            if text.trim().is_empty() || self.is_comment(text) {
                continue;
            }
            builder.from_reader(text.as_bytes()).read_record(&mut record)?;
            if record.len() != 2 {
                return Err(CompactionError::Parse {
                    row: line,
                    message: format!("expected 2 fields, found {}", record.len()),
                });
            }
            let dz = parse_field(&record, 0, "thickness", line)?;
            let phi = parse_field(&record, 1, "porosity", line)?;
            Profile::check_layer(line, dz, phi)?;
            profile.push(dz, phi);
        }

        debug!(layers = profile.len(), "read layer table");
        Ok(profile)
    }

    fn write(&self, profile: &Profile, writer: &mut dyn Write) -> Result<()> {
        if let Some(comment) = self.comment {
            writeln!(writer, "{} {HEADER_TEXT}", comment as char)?;
        }
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .from_writer(writer);
        for row in profile.rows() {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        debug!(layers = profile.len(), "wrote layer table");
        Ok(())
    }

    fn supported_extensions(&self) -> Vec<String> {
        match self.delimiter {
            b'\t' => vec![".tsv".into(), ".txt".into()],
            _ => vec![".csv".into(), ".txt".into()],
        }
    }
}
