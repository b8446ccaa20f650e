//! Desktop windows built on iced.
//!
//! - `plot`: shared axes drawing for canvas charts
//! - `histogram`: RGB channel histogram chart
//! - `area_chart`: bar chart of image areas
//! - `figure`: blocking window showing a chart and/or an image
//! - `viewer`: annotation-driven image viewer

pub mod area_chart;
pub mod figure;
pub mod histogram;
pub mod plot;
pub mod viewer;

pub use figure::{Figure, Plot};
