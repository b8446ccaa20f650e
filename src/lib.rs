//! Image dataset tools.
//!
//! The library backs four independent binaries:
//! - `imagelab-inspect`: size, histogram, crop, display and save of one image
//! - `imagelab-crawl`: keyword image download plus annotation CSV
//! - `imagelab-profile`: dimension statistics over an annotation CSV
//! - `imagelab-viewer`: desktop window stepping through an annotation file

pub mod annotation;
pub mod crawler;
pub mod error;
pub mod imaging;
pub mod logging;
pub mod profile;
pub mod ui;

pub use error::{Error, Result};
