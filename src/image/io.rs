//! Loading and saving rasters through the `image` crate.

use crate::image::RasterImage;
use crate::util::{TagMatchError, TagMatchResult};
use std::path::Path;

/// Loads an image from disk, keeping color when the file has it.
pub fn load_raster<P: AsRef<Path>>(path: P) -> TagMatchResult<RasterImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| TagMatchError::ImageIo {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let raster = RasterImage::from_dynamic(img);
    if raster.width() == 0 || raster.height() == 0 {
        return Err(TagMatchError::InvalidDimensions {
            width: raster.width() as usize,
            height: raster.height() as usize,
        });
    }
    Ok(raster)
}

/// Writes a raster to disk; the format follows the file extension.
pub fn save_raster<P: AsRef<Path>>(raster: &RasterImage, path: P) -> TagMatchResult<()> {
    let path = path.as_ref();
    let result = match raster {
        RasterImage::Gray(img) => img.save(path),
        RasterImage::Rgb(img) => img.save(path),
    };
    result.map_err(|err| TagMatchError::ImageIo {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
