//! Frequency-domain cross-correlation against a fixed target.
//!
//! The target is zero-padded to 5-smooth dimensions and transformed once.
//! Each template is padded to the same size, transformed, multiplied with the
//! conjugate spectrum and transformed back, which yields the raw dot products
//! for every placement in `O(N log N)` instead of `O(N · template area)`.
//! Placements that fit inside the unpadded target never wrap around, so the
//! circular correlation equals the direct one there.
//!
//! The 2D transforms run rows first, then columns on a transposed buffer; the
//! spectrum is stored in that transposed layout.

use crate::kernel::dots::DotMap;
use crate::template::TemplatePlan;
use image::GrayImage;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Cached spectrum of a target plus the transforms sized for it.
pub(crate) struct SpectralTarget {
    width: usize,
    height: usize,
    pad_width: usize,
    pad_height: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
    spectrum: Vec<Complex<f64>>,
}

impl SpectralTarget {
    pub(crate) fn new(img: &GrayImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        let pad_width = smooth_len(width);
        let pad_height = smooth_len(height);

        let mut planner = FftPlanner::<f64>::new();
        let row_forward = planner.plan_fft_forward(pad_width);
        let row_inverse = planner.plan_fft_inverse(pad_width);
        let col_forward = planner.plan_fft_forward(pad_height);
        let col_inverse = planner.plan_fft_inverse(pad_height);

        let mut target = Self {
            width,
            height,
            pad_width,
            pad_height,
            row_forward,
            row_inverse,
            col_forward,
            col_inverse,
            spectrum: Vec::new(),
        };
        let rows: Vec<&[u8]> = img.as_raw().chunks_exact(width).collect();
        target.spectrum = target.forward(width, height, |y, x| f64::from(rows[y][x]));
        target
    }

    /// Raw dot products of `plan` with every placement inside the target.
    ///
    /// The template must fit inside the target.
    pub(crate) fn correlate(&self, plan: &TemplatePlan) -> DotMap {
        let mut product = self.forward(plan.width(), plan.height(), |y, x| plan.row(y)[x]);
        for (p, i) in product.iter_mut().zip(&self.spectrum) {
            *p = i * p.conj();
        }
        self.col_inverse.process(&mut product);

        let out_width = self.width - plan.width() + 1;
        let out_height = self.height - plan.height() + 1;
        let mut rows = transpose(&product, self.pad_height, self.pad_width);
        let live = &mut rows[..out_height * self.pad_width];
        self.row_inverse.process(live);

        let scale = 1.0 / (self.pad_width * self.pad_height) as f64;
        let mut values = Vec::with_capacity(out_width * out_height);
        for row in live.chunks_exact(self.pad_width) {
            values.extend(row[..out_width].iter().map(|c| c.re * scale));
        }
        DotMap::from_values(out_width, out_height, values)
    }

    /// Pads a `width x height` source into the transform grid and returns its
    /// spectrum in transposed layout.
    fn forward(
        &self,
        width: usize,
        height: usize,
        sample: impl Fn(usize, usize) -> f64,
    ) -> Vec<Complex<f64>> {
        let mut buf = vec![Complex::new(0.0, 0.0); self.pad_width * self.pad_height];
        for y in 0..height {
            let row = &mut buf[y * self.pad_width..y * self.pad_width + width];
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = Complex::new(sample(y, x), 0.0);
            }
        }
        // Rows past `height` are zero and stay zero.
        self.row_forward.process(&mut buf[..height * self.pad_width]);
        let mut cols = transpose(&buf, self.pad_width, self.pad_height);
        self.col_forward.process(&mut cols);
        cols
    }
}

/// Transposes a row-major `width x height` buffer.
fn transpose(src: &[Complex<f64>], width: usize, height: usize) -> Vec<Complex<f64>> {
    let mut out = vec![Complex::new(0.0, 0.0); src.len()];
    for (y, row) in src.chunks_exact(width).enumerate() {
        for (x, &value) in row.iter().enumerate() {
            out[x * height + y] = value;
        }
    }
    out
}

/// Smallest length `>= len` whose only prime factors are 2, 3 and 5.
fn smooth_len(len: usize) -> usize {
    let mut n = len.max(1);
    loop {
        let mut m = n;
        for p in [2, 3, 5] {
            while m % p == 0 {
                m /= p;
            }
        }
        if m == 1 {
            return n;
        }
        n += 1;
    }
}
