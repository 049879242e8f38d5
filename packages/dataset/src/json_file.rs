//! JSON array output, 4-space indented, non-ASCII text written as-is.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use cinedata_movie_models::MovieRecord;
use serde::Serialize as _;
use serde_json::ser::PrettyFormatter;

use crate::{DatasetError, ensure_parent};

const INDENT: &[u8] = b"    ";

/// Writes `records` as a pretty JSON array, creating parent directories.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be created or written.
pub fn write_json(records: &[MovieRecord], path: &Path) -> Result<(), DatasetError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| DatasetError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut serializer)?;

    writer.flush().map_err(|e| DatasetError::io(path, e))
}

/// Loads records written by [`write_json`].
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or is not an array
/// of records.
pub fn read_json(path: &Path) -> Result<Vec<MovieRecord>, DatasetError> {
    let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
