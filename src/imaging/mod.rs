//! Single-image operations used by the inspector.
//!
//! Decoding and encoding are handled by the `image` crate; this module only
//! validates requests and reads image shape.

pub mod histogram;

use image::{DynamicImage, GenericImageView};
use std::path::Path;

use crate::{Error, Result};

pub use histogram::ChannelHistogram;

/// Decode an image from disk.
pub fn read_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Image size as `(height, width)`.
pub fn image_size(image: &DynamicImage) -> (u32, u32) {
    let (width, height) = image.dimensions();
    (height, width)
}

/// Crop the `height` x `width` region anchored at the top-left corner.
///
/// Requests larger than the source in either dimension are rejected.
pub fn crop_top_left(image: &DynamicImage, height: u32, width: u32) -> Result<DynamicImage> {
    if height == 0 || width == 0 {
        return Err(Error::InvalidDimensions(format!(
            "crop size must be positive, got {height}x{width}"
        )));
    }

    let (source_height, source_width) = image_size(image);
    if height > source_height || width > source_width {
        return Err(Error::ExceedsSource {
            requested_height: height,
            requested_width: width,
            height: source_height,
            width: source_width,
        });
    }

    Ok(image.crop_imm(0, 0, width, height))
}

/// Encode `image` to `path`; the format follows the extension.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save(path)?;
    log::info!("Saved image to {}", path.display());
    Ok(())
}
