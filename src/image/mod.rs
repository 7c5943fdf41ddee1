//! Raster images handed between pipeline stages.
//!
//! `RasterImage` is the owned capture/template representation. Matching works
//! on its grayscale plane (`image::GrayImage`) directly.

pub mod io;
pub(crate) mod raster;

pub use raster::RasterImage;
