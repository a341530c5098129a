//! Layer profile files: delimited tables, JSON, and the example inputs.

pub mod json;
pub mod samples;
pub mod table;
pub mod traits;

use std::path::Path;

pub use json::JsonProfile;
pub use samples::SampleFile;
pub use table::{CsvTable, HEADER};
pub use traits::ProfileFormat;

/// Format for `path`, chosen by extension. Anything that is not JSON is read
/// as a delimited table.
pub fn format_for_path(path: &Path) -> Box<dyn ProfileFormat> {
    let json = JsonProfile::new();
    if json.can_read(path) {
        Box::new(json)
    } else {
        Box::new(CsvTable::new())
    }
}
