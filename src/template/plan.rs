//! Template statistics shared by the correlation metrics.

use crate::util::{TagMatchError, TagMatchResult};
use image::GrayImage;

/// Precomputed template intensities and moments for one (scale, angle) grid
/// point.
///
/// Every metric at a grid point reads the same raw dot products, so the plan
/// only keeps the raw buffer plus the moments each metric normalizes with.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f64,
    sum: f64,
    sum_sq: f64,
    var_t: f64,
    data: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a grayscale template.
    pub fn from_gray(tpl: &GrayImage) -> TagMatchResult<Self> {
        let width = tpl.width() as usize;
        let height = tpl.height() as usize;
        if width == 0 || height == 0 {
            return Err(TagMatchError::InvalidDimensions { width, height });
        }

        let data: Vec<f64> = tpl.as_raw().iter().map(|&v| f64::from(v)).collect();
        let sum: f64 = data.iter().sum();
        let sum_sq: f64 = data.iter().map(|v| v * v).sum();
        let mean = sum / data.len() as f64;
        let var_t = (sum_sq - sum * mean).max(0.0);

        Ok(Self {
            width,
            height,
            mean,
            sum,
            sum_sq,
            var_t,
            data,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of template pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if the template has no pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the sum of intensities.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the sum of squared intensities.
    pub fn sum_sq(&self) -> f64 {
        self.sum_sq
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns the raw template buffer in row-major order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns row `y` of the raw buffer.
    pub(crate) fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }
}
