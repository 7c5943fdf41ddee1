//! Normalization of captures and templates into a comparable representation.
//!
//! Under [`Policy::Simple`] both sides are converted to grayscale and nothing
//! else. Under [`Policy::HighQuality`] the chain is: upscale small inputs with
//! cubic interpolation, bilateral denoise (tuned per color/gray input; color
//! inputs are smoothed per YCbCr plane), CLAHE on the luma plane only, then an
//! optional 3x3 sharpen.
//!
//! Preprocessing is best-effort: if any step fails the caller receives the
//! unmodified input.

mod clahe;
mod color;
pub(crate) mod filters;

pub use clahe::ClaheParams;
pub use filters::DenoiseParams;

use crate::config::Policy;
use crate::image::RasterImage;
use crate::trace::trace_warn;
use crate::util::TagMatchResult;
use filters::{denoise, sharpen_gray, sharpen_rgb};

/// Parameters of the high-quality preprocessing chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreprocessParams {
    /// Inputs narrower than this are upscaled.
    pub min_width: u32,
    /// Inputs shorter than this are upscaled.
    pub min_height: u32,
    /// Upscale factor applied to undersized inputs.
    pub upscale: f32,
    /// Denoise settings for three-channel inputs.
    pub denoise_color: DenoiseParams,
    /// Denoise settings for single-channel inputs.
    pub denoise_gray: DenoiseParams,
    /// Local contrast settings for the luma plane.
    pub clahe: ClaheParams,
    /// Apply the 3x3 sharpening kernel after enhancement.
    pub sharpen: bool,
}

impl PreprocessParams {
    /// Settings for captured target images.
    pub fn target() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
            upscale: 2.0,
            denoise_color: DenoiseParams {
                radius: 3,
                sigma_color: 12.0,
                sigma_space: 3.0,
            },
            denoise_gray: DenoiseParams {
                radius: 2,
                sigma_color: 10.0,
                sigma_space: 2.0,
            },
            clahe: ClaheParams {
                clip_limit: 2.0,
                grid_x: 8,
                grid_y: 8,
            },
            sharpen: true,
        }
    }

    /// Settings for tag templates: lighter smoothing, finer contrast tiles,
    /// no sharpening.
    pub fn template() -> Self {
        Self {
            min_width: 50,
            min_height: 50,
            upscale: 1.5,
            denoise_color: DenoiseParams {
                radius: 2,
                sigma_color: 8.0,
                sigma_space: 2.0,
            },
            denoise_gray: DenoiseParams {
                radius: 1,
                sigma_color: 8.0,
                sigma_space: 1.5,
            },
            clahe: ClaheParams {
                clip_limit: 1.5,
                grid_x: 4,
                grid_y: 4,
            },
            sharpen: false,
        }
    }
}

/// Normalizes a captured target image.
pub fn preprocess(image: &RasterImage, policy: Policy) -> RasterImage {
    preprocess_with(image, policy, &PreprocessParams::target())
}

/// Normalizes a tag template.
pub fn preprocess_template(template: &RasterImage, policy: Policy) -> RasterImage {
    preprocess_with(template, policy, &PreprocessParams::template())
}

/// Normalizes `image` with explicit high-quality parameters.
pub fn preprocess_with(image: &RasterImage, policy: Policy, params: &PreprocessParams) -> RasterImage {
    match policy {
        Policy::Simple => RasterImage::Gray(image.to_gray()),
        Policy::HighQuality => match high_quality(image, params) {
            Ok(out) => out,
            Err(err) => {
                trace_warn!("preprocess_fallback", error = err.to_string());
                image.clone()
            }
        },
    }
}

fn high_quality(image: &RasterImage, params: &PreprocessParams) -> TagMatchResult<RasterImage> {
    let upscaled = if image.width() < params.min_width || image.height() < params.min_height {
        Some(image.scale_by(params.upscale)?)
    } else {
        None
    };
    let base = upscaled.as_ref().unwrap_or(image);

    Ok(match base {
        RasterImage::Gray(img) => {
            let denoised = denoise(img, params.denoise_gray);
            let enhanced = clahe::clahe(&denoised, params.clahe);
            if params.sharpen {
                RasterImage::Gray(sharpen_gray(&enhanced))
            } else {
                RasterImage::Gray(enhanced)
            }
        }
        RasterImage::Rgb(img) => {
            let [luma, cb, cr] = color::split_ycbcr(img).map(|plane| denoise(&plane, params.denoise_color));
            let enhanced = color::merge_ycbcr(&[clahe::clahe(&luma, params.clahe), cb, cr]);
            if params.sharpen {
                RasterImage::Rgb(sharpen_rgb(&enhanced))
            } else {
                RasterImage::Rgb(enhanced)
            }
        }
    })
}
