use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{AnnotationRecord, ABSOLUTE_PATH, RELATIVE_PATH};
use crate::Result;

/// Write an annotation file listing every file under `image_dir`.
///
/// The walk is recursive and sorted by file name so the manifest is
/// reproducible. Returns the number of rows written.
pub fn write_annotation_csv(image_dir: &Path, csv_path: &Path) -> Result<usize> {
    let root = fs::canonicalize(image_dir)?;
    // Header written up front so an empty directory still yields a valid manifest.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(csv_path)?;
    writer.write_record([ABSOLUTE_PATH, RELATIVE_PATH])?;
    let mut rows = 0;

    log::info!("Scanning folder: {}", root.display());

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let absolute_path = entry.path();
        let relative_path = absolute_path.strip_prefix(&root).unwrap_or(absolute_path);

        writer.serialize(AnnotationRecord {
            absolute_path: absolute_path.to_string_lossy().to_string(),
            relative_path: Some(relative_path.to_string_lossy().to_string()),
        })?;
        rows += 1;
    }

    writer.flush()?;
    log::info!("Wrote {} rows to {}", rows, csv_path.display());
    Ok(rows)
}
