//! Owned color or grayscale rasters.

use crate::util::math::saturate_u8;
use crate::util::{TagMatchError, TagMatchResult};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// Owned raster produced by capture or loaded from the template catalog.
///
/// Transformations return new rasters; nothing mutates a raster in place once
/// it has been handed to the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterImage {
    /// Single-channel intensity image.
    Gray(GrayImage),
    /// Three-channel RGB image.
    Rgb(RgbImage),
}

impl RasterImage {
    /// Converts a decoded image, keeping three channels only when it has color.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_color() {
            Self::Rgb(img.to_rgb8())
        } else {
            Self::Gray(img.to_luma8())
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            Self::Gray(img) => img.width(),
            Self::Rgb(img) => img.width(),
        }
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            Self::Gray(img) => img.height(),
            Self::Rgb(img) => img.height(),
        }
    }

    /// Returns the number of channels per pixel (1 or 3).
    pub fn channels(&self) -> u8 {
        match self {
            Self::Gray(_) => 1,
            Self::Rgb(_) => 3,
        }
    }

    /// Returns true for three-channel rasters.
    pub fn is_color(&self) -> bool {
        matches!(self, Self::Rgb(_))
    }

    /// Converts to intensity with BT.601 luma weights.
    pub fn to_gray(&self) -> GrayImage {
        match self {
            Self::Gray(img) => img.clone(),
            Self::Rgb(img) => GrayImage::from_fn(img.width(), img.height(), |x, y| {
                let [r, g, b] = img.get_pixel(x, y).0;
                Luma([luma_601(r, g, b)])
            }),
        }
    }

    /// Resizes to exact dimensions with cubic (Catmull-Rom) interpolation.
    pub fn resize_cubic(&self, width: u32, height: u32) -> TagMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(TagMatchError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        Ok(match self {
            Self::Gray(img) => Self::Gray(imageops::resize(img, width, height, FilterType::CatmullRom)),
            Self::Rgb(img) => Self::Rgb(imageops::resize(img, width, height, FilterType::CatmullRom)),
        })
    }

    /// Scales both dimensions by `factor`, truncating to whole pixels.
    pub fn scale_by(&self, factor: f32) -> TagMatchResult<Self> {
        let (width, height) = scaled_dims(self.width(), self.height(), factor);
        self.resize_cubic(width, height)
    }

    /// Copies the full-width band of rows `[y0, y0 + height)`.
    pub fn crop_rows(&self, y0: u32, height: u32) -> TagMatchResult<Self> {
        let width = self.width();
        if height == 0 || width == 0 || y0.saturating_add(height) > self.height() {
            return Err(TagMatchError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        Ok(match self {
            Self::Gray(img) => Self::Gray(imageops::crop_imm(img, 0, y0, width, height).to_image()),
            Self::Rgb(img) => Self::Rgb(imageops::crop_imm(img, 0, y0, width, height).to_image()),
        })
    }
}

impl From<GrayImage> for RasterImage {
    fn from(img: GrayImage) -> Self {
        Self::Gray(img)
    }
}

impl From<RgbImage> for RasterImage {
    fn from(img: RgbImage) -> Self {
        Self::Rgb(img)
    }
}

/// BT.601 luma of an RGB triple.
pub(crate) fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    saturate_u8(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
}

/// Dimensions after scaling by `factor`, truncated toward zero.
pub(crate) fn scaled_dims(width: u32, height: u32, factor: f32) -> (u32, u32) {
    let w = (width as f32 * factor).floor();
    let h = (height as f32 * factor).floor();
    let clamp = |v: f32| if v.is_finite() && v > 0.0 { v as u32 } else { 0 };
    (clamp(w), clamp(h))
}
