#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset output for assembled movie records.
//!
//! A crawl is written twice: as a pretty-printed JSON array that keeps the
//! full nested structure, and as a flat CSV where list and mapping fields
//! are stored as JSON text in their cell. Both files can be loaded back
//! into [`MovieRecord`] values.

pub mod csv_file;
pub mod json_file;

use std::path::{Path, PathBuf};

use cinedata_movie_models::MovieRecord;

pub use csv_file::{read_csv, write_csv};
pub use json_file::{read_json, write_json};

/// Directory of the default JSON output.
pub const JSON_DIR: &str = "data_collect";

/// Directory of the default CSV output.
pub const CSV_DIR: &str = "csv_files";

/// Errors that can occur while writing or loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A file or directory could not be created, read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV row could not be turned back into a record.
    #[error("CSV row {row}, column '{column}': {message}")]
    Cell {
        /// 1-based data row number.
        row: usize,
        /// Header of the offending column.
        column: String,
        /// What was wrong with the cell.
        message: String,
    },

    /// The file extension is neither `.json` nor `.csv`.
    #[error("unsupported dataset format: {}", .0.display())]
    UnknownFormat(PathBuf),
}

impl DatasetError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// `data_collect/movie_category-{genre}.json`
#[must_use]
pub fn default_json_path(genre: &str) -> PathBuf {
    Path::new(JSON_DIR).join(format!("movie_category-{genre}.json"))
}

/// `csv_files/movies_data-{genre}.csv`
#[must_use]
pub fn default_csv_path(genre: &str) -> PathBuf {
    Path::new(CSV_DIR).join(format!("movies_data-{genre}.csv"))
}

/// Creates the parent directory of `path` if it has one.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), DatasetError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Writes `records` to both files.
///
/// Returns the number of records written. Zero records is a no-op: nothing
/// is created and a warning is logged.
///
/// # Errors
///
/// Returns [`DatasetError`] if either file cannot be written.
pub fn write(
    records: &[MovieRecord],
    json_path: &Path,
    csv_path: &Path,
) -> Result<usize, DatasetError> {
    if records.is_empty() {
        log::warn!("No records to write; skipping dataset output");
        return Ok(0);
    }

    write_json(records, json_path)?;
    log::info!("JSON data saved to {}", json_path.display());

    write_csv(records, csv_path)?;
    log::info!("CSV data saved to {}", csv_path.display());

    Ok(records.len())
}

/// Loads a dataset, choosing the format from the file extension.
///
/// # Errors
///
/// Returns [`DatasetError::UnknownFormat`] for other extensions, or the
/// error of the format-specific loader.
pub fn read(path: &Path) -> Result<Vec<MovieRecord>, DatasetError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => read_json(path),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => read_csv(path),
        _ => Err(DatasetError::UnknownFormat(path.to_path_buf())),
    }
}
