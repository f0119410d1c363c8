//! CSV profile loader.
//!
//! Profile files are two-column CSVs (`key,value`) with a header row.
//! Extra columns are ignored, so localized helper columns in the source
//! spreadsheet don't break loading. Rows with a blank key or value are
//! skipped.

use std::path::Path;

use mascot_types::error::PersonaError;
use mascot_types::persona::ProfileTable;

/// Load a profile table from a CSV file.
///
/// The reader is flexible about row lengths; spreadsheet exports are often
/// ragged and a short row just means the missing cells are blank.
pub fn load_profile(path: &Path) -> Result<ProfileTable, PersonaError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            if e.is_io_error() {
                PersonaError::FileNotFound(path.display().to_string())
            } else {
                PersonaError::Parse(e.to_string())
            }
        })?;

    let headers = reader
        .headers()
        .map_err(|e| PersonaError::Parse(e.to_string()))?
        .clone();
    let key_idx = headers
        .iter()
        .position(|h| h.trim() == "key")
        .ok_or_else(|| PersonaError::Parse("missing 'key' column".to_string()))?;
    let value_idx = headers
        .iter()
        .position(|h| h.trim() == "value")
        .ok_or_else(|| PersonaError::Parse("missing 'value' column".to_string()))?;

    let mut table = ProfileTable::new();
    for record in reader.records() {
        let record = record.map_err(|e| PersonaError::Parse(e.to_string()))?;
        let key = record.get(key_idx).unwrap_or("");
        let value = record.get(value_idx).unwrap_or("");
        table.insert(key, value);
    }

    Ok(table)
}
