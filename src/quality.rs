//! Image statistics feeding the adaptive threshold.
//!
//! A target's [`QualityProfile`] combines contrast, sharpness (Laplacian
//! variance), Canny edge density and a blur-ratio noise estimate. A template's
//! quality combines its area, contrast, edge density and how distinct its
//! border is from its interior.

use crate::image::io::load_raster;
use crate::image::RasterImage;
use crate::preprocess::filters::{gaussian_blur_3x3, laplacian};
use crate::trace::trace_warn;
use crate::util::math::mean_std;
use crate::util::{TagMatchError, TagMatchResult};
use image::GrayImage;
use imageproc::edges::canny;
use std::path::Path;

const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;
const SHARPNESS_NORM: f64 = 1000.0;
const TEMPLATE_REFERENCE_AREA: f64 = 100.0 * 100.0;
const BORDER_GAIN: f64 = 3.0;

/// Neutral template quality used when a template cannot be measured.
pub const NEUTRAL_TEMPLATE_QUALITY: f64 = 0.5;

/// Derived statistics of a target image, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityProfile {
    /// Intensity standard deviation over 255.
    pub contrast: f64,
    /// Laplacian variance over 1000, capped at 1.
    pub sharpness: f64,
    /// Fraction of Canny edge pixels.
    pub edge_density: f64,
    /// `1 - std(blurred) / std(original)`; 0 for flat images.
    pub noise: f64,
}

impl QualityProfile {
    /// Measures `image` on its grayscale plane.
    pub fn measure(image: &RasterImage) -> TagMatchResult<Self> {
        Self::measure_gray(&image.to_gray())
    }

    /// Measures a grayscale plane; empty images are rejected.
    pub fn measure_gray(gray: &GrayImage) -> TagMatchResult<Self> {
        ensure_non_empty(gray)?;
        let (_, std) = mean_std(gray.as_raw());
        let lap = laplacian(gray);
        let sharpness = (variance_f32(&lap) / SHARPNESS_NORM).min(1.0);
        let noise = if std > 0.0 {
            let (_, blurred_std) = mean_std(gaussian_blur_3x3(gray).as_raw());
            1.0 - blurred_std / std
        } else {
            0.0
        };
        Ok(Self {
            contrast: std / 255.0,
            sharpness,
            edge_density: edge_fraction(gray),
            noise,
        })
    }

    /// Weighted quality score combined with a template's own quality.
    pub fn score(&self, template_quality: f64) -> f64 {
        self.contrast * 0.25
            + self.sharpness * 0.25
            + self.edge_density * 0.2
            + self.noise * 0.15
            + template_quality * 0.15
    }
}

/// Fraction of pixels marked by a Canny detector (thresholds 50/150).
///
/// Images smaller than 3x3 have no interior for gradients and report 0.
pub fn edge_fraction(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }
    let edges = canny(gray, CANNY_LOW, CANNY_HIGH);
    let count = edges.as_raw().iter().filter(|&&v| v > 0).count();
    count as f64 / (width as f64 * height as f64)
}

/// Absolute difference between the mean of the outermost rows and columns
/// and the mean of the interior `[2..h-2, 2..w-2]`, over 255, scaled by 3
/// and capped at 1. `None` when the interior is empty.
pub fn border_difference(gray: &GrayImage) -> Option<f64> {
    let (width, height) = gray.dimensions();
    if width <= 4 || height <= 4 {
        return None;
    }
    let (w, h) = (width as usize, height as usize);
    let data = gray.as_raw();

    let mut border_sum = 0.0f64;
    let mut border_count = 0usize;
    for &y in &[0, h - 1] {
        border_sum += data[y * w..(y + 1) * w].iter().map(|&v| v as f64).sum::<f64>();
        border_count += w;
    }
    for &x in &[0, w - 1] {
        border_sum += (0..h).map(|y| data[y * w + x] as f64).sum::<f64>();
        border_count += h;
    }

    let mut inner_sum = 0.0f64;
    let mut inner_count = 0usize;
    for y in 2..h - 2 {
        inner_sum += data[y * w + 2..y * w + w - 2]
            .iter()
            .map(|&v| v as f64)
            .sum::<f64>();
        inner_count += w - 4;
    }

    let border_mean = border_sum / border_count as f64;
    let inner_mean = inner_sum / inner_count as f64;
    Some(((border_mean - inner_mean).abs() / 255.0 * BORDER_GAIN).min(1.0))
}

/// Quality of a template icon in `[0, 1]`.
///
/// Templates too small to have an interior get [`NEUTRAL_TEMPLATE_QUALITY`].
pub fn template_quality(template: &RasterImage) -> f64 {
    let gray = template.to_gray();
    let Some(border) = border_difference(&gray) else {
        return NEUTRAL_TEMPLATE_QUALITY;
    };
    let (width, height) = gray.dimensions();
    let area = (width as f64 * height as f64 / TEMPLATE_REFERENCE_AREA).min(1.0);
    let (_, std) = mean_std(gray.as_raw());
    area * 0.2 + (std / 255.0) * 0.3 + edge_fraction(&gray) * 0.3 + border * 0.2
}

/// Loads the template at `path` and measures it; unreadable files get
/// [`NEUTRAL_TEMPLATE_QUALITY`].
pub fn template_quality_at<P: AsRef<Path>>(path: P) -> f64 {
    match load_raster(path) {
        Ok(template) => template_quality(&template),
        Err(err) => {
            trace_warn!("template_quality_fallback", error = err);
            NEUTRAL_TEMPLATE_QUALITY
        }
    }
}

fn ensure_non_empty(gray: &GrayImage) -> TagMatchResult<()> {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(TagMatchError::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        });
    }
    Ok(())
}

fn variance_f32(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}
