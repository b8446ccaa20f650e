use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use super::ABSOLUTE_PATH;
use crate::{Error, Result};

/// Field separator of an annotation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    Comma,
    Semicolon,
    /// Pick `;` when the header line holds more semicolons than commas.
    #[default]
    Auto,
}

impl Delimiter {
    /// Resolve to a concrete delimiter byte, sniffing the header for `Auto`.
    pub fn resolve(self, path: &Path) -> Result<u8> {
        match self {
            Delimiter::Comma => Ok(b','),
            Delimiter::Semicolon => Ok(b';'),
            Delimiter::Auto => {
                let mut header = String::new();
                BufReader::new(File::open(path)?).read_line(&mut header)?;
                let semicolons = header.matches(';').count();
                let commas = header.matches(',').count();
                Ok(if semicolons > commas { b';' } else { b',' })
            }
        }
    }
}

/// Which column of each row holds the image path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathColumn {
    /// Column located by header name.
    Named(String),
    /// First column, whatever its header says.
    Leading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationOptions {
    pub delimiter: Delimiter,
    pub column: PathColumn,
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            column: PathColumn::Named(ABSOLUTE_PATH.to_string()),
        }
    }
}

impl AnnotationOptions {
    /// Options for manifests whose first column is the image path.
    pub fn leading_column() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            column: PathColumn::Leading,
        }
    }
}

/// Sequential iterator over the image paths of an annotation file.
///
/// The header is consumed on open. Each call to `next` reads exactly one row.
/// Once the rows run out, or a row fails to parse, the file is closed and the
/// iterator stays exhausted.
pub struct AnnotationIterator {
    reader: Option<csv::Reader<File>>,
    column: usize,
    column_name: String,
    record: csv::StringRecord,
}

impl AnnotationIterator {
    pub fn open(path: &Path, options: &AnnotationOptions) -> Result<Self> {
        let delimiter = options.delimiter.resolve(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let (column, column_name) = match &options.column {
            PathColumn::Named(name) => {
                let index = reader
                    .headers()?
                    .iter()
                    .position(|header| header == name)
                    .ok_or_else(|| Error::MissingColumn(name.clone()))?;
                (index, name.clone())
            }
            PathColumn::Leading => {
                let name = reader.headers()?.get(0).unwrap_or_default().to_string();
                (0, name)
            }
        };

        log::debug!(
            "Opened annotation file {} (column {} '{}', delimiter '{}')",
            path.display(),
            column,
            column_name,
            delimiter as char
        );

        Ok(Self {
            reader: Some(reader),
            column,
            column_name,
            record: csv::StringRecord::new(),
        })
    }

    /// True once the underlying file has been closed.
    pub fn is_exhausted(&self) -> bool {
        self.reader.is_none()
    }
}

impl Iterator for AnnotationIterator {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        match reader.read_record(&mut self.record) {
            Ok(true) => match self.record.get(self.column) {
                Some(field) => Some(Ok(PathBuf::from(field))),
                None => {
                    self.reader = None;
                    Some(Err(Error::MissingColumn(self.column_name.clone())))
                }
            },
            Ok(false) => {
                self.reader = None;
                None
            }
            Err(err) => {
                self.reader = None;
                Some(Err(err.into()))
            }
        }
    }
}

impl FusedIterator for AnnotationIterator {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("annotation.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_yields_every_row_in_order_then_exhausts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "absolute_path,relative_path\n/d/0.jpg,0.jpg\n/d/1.jpg,1.jpg\n/d/2.jpg,2.jpg\n",
        );

        let mut iter = AnnotationIterator::open(&path, &AnnotationOptions::default()).unwrap();
        let paths: Vec<PathBuf> = iter.by_ref().map(|p| p.unwrap()).collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/d/0.jpg"),
                PathBuf::from("/d/1.jpg"),
                PathBuf::from("/d/2.jpg"),
            ]
        );
        assert!(iter.is_exhausted());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_named_column_need_not_be_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "relative_path,absolute_path\na.jpg,/d/a.jpg\n");

        let paths: Vec<PathBuf> = AnnotationIterator::open(&path, &AnnotationOptions::default())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(paths, vec![PathBuf::from("/d/a.jpg")]);
    }

    #[test]
    fn test_leading_column_semicolon_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "Absolute path;Relative path\n /d/a.jpg ;a.jpg\n/d/b.jpg;b.jpg\n",
        );

        let paths: Vec<PathBuf> = AnnotationIterator::open(&path, &AnnotationOptions::leading_column())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(paths, vec![PathBuf::from("/d/a.jpg"), PathBuf::from("/d/b.jpg")]);
    }

    #[test]
    fn test_header_only_file_is_immediately_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "absolute_path,relative_path\n");

        let mut iter = AnnotationIterator::open(&path, &AnnotationOptions::default()).unwrap();
        assert!(!iter.is_exhausted());
        assert!(iter.next().is_none());
        assert!(iter.is_exhausted());
    }

    #[test]
    fn test_missing_named_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "file,label\n/d/a.jpg,cow\n");

        let result = AnnotationIterator::open(&path, &AnnotationOptions::default());
        assert!(matches!(result, Err(Error::MissingColumn(_))));
    }

    #[test]
    fn test_malformed_row_ends_iteration() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "absolute_path,relative_path\n/d/a.jpg,a.jpg\n/d/b.jpg\n/d/c.jpg,c.jpg\n",
        );

        let mut iter = AnnotationIterator::open(&path, &AnnotationOptions::default()).unwrap();
        assert_eq!(iter.next().unwrap().unwrap(), PathBuf::from("/d/a.jpg"));
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_delimiter_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let semicolon = write_csv(dir.path(), "a;b\n");
        assert_eq!(Delimiter::Auto.resolve(&semicolon).unwrap(), b';');

        let comma = write_csv(dir.path(), "a,b\n");
        assert_eq!(Delimiter::Auto.resolve(&comma).unwrap(), b',');
        assert_eq!(Delimiter::Semicolon.resolve(&comma).unwrap(), b';');
    }

    #[test]
    fn test_open_missing_file() {
        let result = AnnotationIterator::open(
            Path::new("/nonexistent/annotation.csv"),
            &AnnotationOptions::default(),
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
