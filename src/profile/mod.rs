//! Profile tables: an annotation manifest extended with per-image
//! dimensions, plus the filtering, area and sorting operations run on it.

pub mod histogram;
pub mod stats;

use image::{ImageDecoder, ImageReader};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use crate::annotation::{read_annotation_records, AnnotationRecord};
use crate::{Error, Result};

pub use histogram::AreaHistogram;
pub use stats::{ColumnSummary, Describe};

pub const HEIGHT: &str = "Height";
pub const WIDTH: &str = "Width";
pub const DEPTH: &str = "Depth";
pub const AREA: &str = "Area";

/// One annotation row with the shape of the image it points to.
///
/// Dimensions are `None` when the image could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRow {
    /// Position of the row in the source manifest; kept through filter and sort.
    pub index: usize,
    pub absolute_path: String,
    pub relative_path: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub depth: Option<u8>,
    /// Filled by [`ProfileTable::add_area_column`].
    pub area: Option<u64>,
}

impl ProfileRow {
    /// Read the shape of the image behind `record` from its header.
    pub fn probe(index: usize, record: AnnotationRecord) -> Self {
        let shape = probe_shape(Path::new(&record.absolute_path));
        if let Err(err) = &shape {
            log::warn!(
                "Failed to load image: {}. Check the path! ({})",
                record.absolute_path,
                err
            );
        }
        let (height, width, depth) = match shape {
            Ok((height, width, depth)) => (Some(height), Some(width), Some(depth)),
            Err(_) => (None, None, None),
        };

        Self {
            index,
            absolute_path: record.absolute_path,
            relative_path: record.relative_path,
            height,
            width,
            depth,
            area: None,
        }
    }
}

/// `(height, width, channels)` without decoding pixel data.
fn probe_shape(path: &Path) -> Result<(u32, u32, u8)> {
    let decoder = ImageReader::open(path)?.with_guessed_format()?.into_decoder()?;
    let (width, height) = decoder.dimensions();
    Ok((height, width, decoder.color_type().channel_count()))
}

/// In-memory table of profile rows for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileTable {
    rows: Vec<ProfileRow>,
    has_area: bool,
}

impl ProfileTable {
    pub fn new(rows: Vec<ProfileRow>) -> Self {
        let has_area = rows.iter().any(|row| row.area.is_some());
        Self { rows, has_area }
    }

    /// Load an annotation file and probe every image it lists.
    pub fn from_csv(csv_path: &Path) -> Result<Self> {
        let records = read_annotation_records(csv_path)?;
        log::info!("Profiling {} images from {}", records.len(), csv_path.display());
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<AnnotationRecord>) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| ProfileRow::probe(index, record))
            .collect();
        Self {
            rows,
            has_area: false,
        }
    }

    pub fn rows(&self) -> &[ProfileRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_area(&self) -> bool {
        self.has_area
    }

    /// Descriptive statistics of the Height, Width and Depth columns.
    pub fn describe(&self) -> Describe {
        let column = |value: fn(&ProfileRow) -> Option<f64>| {
            ColumnSummary::from_values(self.rows.iter().filter_map(value))
        };
        Describe {
            columns: vec![
                (HEIGHT.to_string(), column(|row| row.height.map(f64::from))),
                (WIDTH.to_string(), column(|row| row.width.map(f64::from))),
                (DEPTH.to_string(), column(|row| row.depth.map(f64::from))),
            ],
        }
    }

    /// Rows no wider than `max_width` and no taller than `max_height`.
    ///
    /// Rows with unknown dimensions never match. Everything else about the
    /// kept rows, including their index, is unchanged.
    pub fn filter_by_max(&self, max_width: u32, max_height: u32) -> ProfileTable {
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                matches!(
                    (row.width, row.height),
                    (Some(width), Some(height)) if width <= max_width && height <= max_height
                )
            })
            .cloned()
            .collect();
        ProfileTable {
            rows,
            has_area: self.has_area,
        }
    }

    /// Set `area = height * width` on every row.
    pub fn add_area_column(&mut self) {
        for row in &mut self.rows {
            row.area = match (row.height, row.width) {
                (Some(height), Some(width)) => Some(u64::from(height) * u64::from(width)),
                _ => None,
            };
        }
        self.has_area = true;
    }

    /// Stable ascending sort by area; rows without an area go last.
    pub fn sort_by_area(&self) -> Result<ProfileTable> {
        if !self.has_area {
            return Err(Error::MissingColumn(AREA.to_string()));
        }

        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| match (a.area, b.area) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(ProfileTable {
            rows,
            has_area: true,
        })
    }

    /// Histogram of known areas with one bin per table row.
    pub fn area_histogram(&self) -> Result<AreaHistogram> {
        if !self.has_area {
            return Err(Error::MissingColumn(AREA.to_string()));
        }
        let areas: Vec<u64> = self.rows.iter().filter_map(|row| row.area).collect();
        Ok(AreaHistogram::compute(&areas, self.rows.len()))
    }
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| v.to_string())
}

impl fmt::Display for ProfileTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec![
            String::new(),
            "absolute_path".to_string(),
            "relative_path".to_string(),
            HEIGHT.to_string(),
            WIDTH.to_string(),
            DEPTH.to_string(),
        ];
        if self.has_area {
            header.push(AREA.to_string());
        }

        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.index.to_string(),
                    row.absolute_path.clone(),
                    cell(row.relative_path.as_deref()),
                    cell(row.height),
                    cell(row.width),
                    cell(row.depth),
                ];
                if self.has_area {
                    cells.push(cell(row.area));
                }
                cells
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                body.iter()
                    .map(|cells| cells[col].len())
                    .chain([header[col].len()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for line in std::iter::once(&header).chain(&body) {
            let mut cells = line.iter().zip(&widths);
            if let Some((index, &width)) = cells.next() {
                write!(f, "{index:<width$}")?;
            }
            for (value, &width) in cells {
                write!(f, "  {value:>width$}")?;
            }
            writeln!(f)?;
        }
        write!(f, "\n[{} rows x {} columns]", self.rows.len(), header.len() - 1)
    }
}
