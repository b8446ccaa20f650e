use std::path::PathBuf;

/// Errors shared by every imagelab tool.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed annotation CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Encoding or decoding failure not tied to a specific input file.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// An input image could not be decoded.
    #[error("Failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The annotation CSV lacks a column the caller needs.
    #[error("The CSV must contain the '{0}' column.")]
    MissingColumn(String),

    /// A crop or filter asked for more than the source holds.
    #[error("Requested size {requested_height}x{requested_width} exceeds source {height}x{width}")]
    ExceedsSource {
        requested_height: u32,
        requested_width: u32,
        height: u32,
        width: u32,
    },

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A crawler worker panicked or the crawl could not be set up.
    #[error("Crawler error: {0}")]
    Crawler(String),

    #[error("Window error: {0}")]
    Gui(#[from] iced::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
