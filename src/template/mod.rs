//! Named tag templates and per-grid-point planning.

use crate::image::io::load_raster;
use crate::image::RasterImage;
use crate::util::{TagMatchError, TagMatchResult};
use std::path::Path;

mod plan;
pub mod rotate;

pub use plan::TemplatePlan;

/// A reference icon for one recognizable tag.
#[derive(Clone, Debug)]
pub struct Template {
    name: String,
    img: RasterImage,
}

impl Template {
    /// Creates a template from an in-memory raster.
    pub fn new(name: impl Into<String>, img: RasterImage) -> TagMatchResult<Self> {
        if img.width() == 0 || img.height() == 0 {
            return Err(TagMatchError::InvalidDimensions {
                width: img.width() as usize,
                height: img.height() as usize,
            });
        }
        Ok(Self {
            name: name.into(),
            img,
        })
    }

    /// Loads a template image from disk.
    pub fn load<P: AsRef<Path>>(name: impl Into<String>, path: P) -> TagMatchResult<Self> {
        Self::new(name, load_raster(path)?)
    }

    /// Returns the tag label this template identifies.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the template raster.
    pub fn image(&self) -> &RasterImage {
        &self.img
    }
}
