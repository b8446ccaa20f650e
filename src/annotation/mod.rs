//! Annotation files: CSV manifests mapping dataset entries to file paths.
//!
//! - `writer`: builds a manifest from a directory of downloaded images
//! - `iterator`: single-pass reader yielding one image path per row

pub mod iterator;
pub mod writer;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

pub use iterator::{AnnotationIterator, AnnotationOptions, Delimiter, PathColumn};
pub use writer::write_annotation_csv;

/// Header name of the column holding absolute image paths.
pub const ABSOLUTE_PATH: &str = "absolute_path";
/// Header name of the column holding paths relative to the dataset root.
pub const RELATIVE_PATH: &str = "relative_path";

/// One row of an annotation file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub absolute_path: String,
    /// Absent in single-column manifests.
    #[serde(default)]
    pub relative_path: Option<String>,
}

/// Read every record of a comma or semicolon delimited annotation file.
///
/// Fails with [`Error::MissingColumn`] when the header has no
/// `absolute_path` column.
pub fn read_annotation_records(path: &Path) -> Result<Vec<AnnotationRecord>> {
    let delimiter = Delimiter::Auto.resolve(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?;

    if !reader.headers()?.iter().any(|name| name == ABSOLUTE_PATH) {
        return Err(Error::MissingColumn(ABSOLUTE_PATH.to_string()));
    }

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
