//! Target image with summed-area tables for O(1) window statistics.

use crate::kernel::dots::DotMap;
use crate::kernel::spectral::SpectralTarget;
use crate::template::TemplatePlan;
use crate::util::{TagMatchError, TagMatchResult};
use image::GrayImage;
use std::sync::OnceLock;

/// Templates up to this many pixels are correlated by direct summation;
/// larger ones go through the frequency domain.
const DIRECT_MAX_TEMPLATE_AREA: usize = 144;

/// Intensity moments of one image window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    /// Sum of intensities.
    pub sum: f64,
    /// Sum of squared intensities.
    pub sum_sq: f64,
    /// Sum of squared deviations from the window mean.
    pub var: f64,
}

/// Grayscale target plus integral images of intensity and squared intensity.
///
/// Sums are kept in `f64`; for 8-bit input they are exact integers well below
/// 2^53 for any realistic capture size. The target spectrum is built on first
/// use and shared by every later correlation.
pub struct PreparedTarget {
    img: GrayImage,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
    spectrum: OnceLock<SpectralTarget>,
}

impl PreparedTarget {
    /// Builds the summed-area tables for `img`.
    pub fn new(img: GrayImage) -> TagMatchResult<Self> {
        let width = img.width() as usize;
        let height = img.height() as usize;
        if width == 0 || height == 0 {
            return Err(TagMatchError::InvalidDimensions { width, height });
        }
        let stride = width + 1;
        let mut sum = vec![0.0f64; stride * (height + 1)];
        let mut sum_sq = vec![0.0f64; stride * (height + 1)];

        for (y, row) in img.as_raw().chunks_exact(width).enumerate() {
            let mut row_sum = 0.0f64;
            let mut row_sq = 0.0f64;
            for (x, &value) in row.iter().enumerate() {
                let v = value as f64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sum_sq[idx] = sum_sq[idx - stride] + row_sq;
            }
        }

        Ok(Self {
            img,
            sum,
            sum_sq,
            spectrum: OnceLock::new(),
        })
    }

    /// Returns the target width in pixels.
    pub fn width(&self) -> usize {
        self.img.width() as usize
    }

    /// Returns the target height in pixels.
    pub fn height(&self) -> usize {
        self.img.height() as usize
    }

    /// Returns a contiguous slice for row `y`.
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        let width = self.width();
        &self.img.as_raw()[y * width..(y + 1) * width]
    }

    /// Returns `(sum, sum of squares)` over the window at `(x, y)`.
    pub fn window_sums(&self, x: usize, y: usize, width: usize, height: usize) -> (f64, f64) {
        let stride = self.width() + 1;
        let a = y * stride + x;
        let b = y * stride + x + width;
        let c = (y + height) * stride + x;
        let d = (y + height) * stride + x + width;
        (
            self.sum[d] - self.sum[b] - self.sum[c] + self.sum[a],
            self.sum_sq[d] - self.sum_sq[b] - self.sum_sq[c] + self.sum_sq[a],
        )
    }

    /// Returns the moments of the window at `(x, y)`.
    pub fn window(&self, x: usize, y: usize, width: usize, height: usize) -> WindowStats {
        let (sum, sum_sq) = self.window_sums(x, y, width, height);
        let n = (width * height) as f64;
        WindowStats {
            sum,
            sum_sq,
            var: (sum_sq - sum * sum / n).max(0.0),
        }
    }

    /// Raw dot products of `plan` with every valid placement.
    ///
    /// Small templates are summed directly; larger ones are correlated through
    /// the cached target spectrum.
    pub fn dots(&self, plan: &TemplatePlan) -> TagMatchResult<DotMap> {
        placement_range(self, plan)?;
        if plan.len() <= DIRECT_MAX_TEMPLATE_AREA {
            return Ok(DotMap::direct(self, plan));
        }
        Ok(self.spectrum().correlate(plan))
    }

    fn spectrum(&self) -> &SpectralTarget {
        self.spectrum.get_or_init(|| SpectralTarget::new(&self.img))
    }
}

/// Returns the inclusive maximum top-left placement for `plan` in `target`.
pub(crate) fn placement_range(
    target: &PreparedTarget,
    plan: &TemplatePlan,
) -> TagMatchResult<(usize, usize)> {
    let img_width = target.width();
    let img_height = target.height();
    if plan.width() > img_width || plan.height() > img_height || plan.is_empty() {
        return Err(TagMatchError::TemplateTooLarge {
            tpl_width: plan.width(),
            tpl_height: plan.height(),
            img_width,
            img_height,
        });
    }
    Ok((img_width - plan.width(), img_height - plan.height()))
}
