//! Neighborhood filters on 8-bit planes, backed by `imageproc`.
//!
//! `imageproc` pads by edge continuity, so border pixels see a replicated
//! neighborhood. Outputs are truncated into `u8` unless stated otherwise.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::{bilateral_filter, filter3x3, laplacian_filter, separable_filter_equal};

/// Parameters for edge-preserving bilateral smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DenoiseParams {
    /// Window radius in pixels (window side is `2 * radius + 1`).
    pub radius: u32,
    /// Intensity sigma; larger values smooth across stronger edges.
    pub sigma_color: f32,
    /// Spatial sigma in pixels.
    pub sigma_space: f32,
}

impl DenoiseParams {
    fn is_identity(&self) -> bool {
        self.radius == 0 || self.sigma_color <= 0.0 || self.sigma_space <= 0.0
    }
}

/// Bilateral filter over a single plane; identity for disabled parameters.
pub(crate) fn denoise(src: &GrayImage, params: DenoiseParams) -> GrayImage {
    if params.is_identity() || src.width() == 0 || src.height() == 0 {
        return src.clone();
    }
    bilateral_filter(src, 2 * params.radius + 1, params.sigma_color, params.sigma_space)
}

/// 3x3 sharpening kernel: center 9, the eight neighbors -1.
const SHARPEN_3X3: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];

pub(crate) fn sharpen_gray(src: &GrayImage) -> GrayImage {
    filter3x3::<Luma<u8>, f32, u8>(src, &SHARPEN_3X3)
}

/// Per-channel sharpen of an RGB image.
pub(crate) fn sharpen_rgb(src: &RgbImage) -> RgbImage {
    filter3x3::<Rgb<u8>, f32, u8>(src, &SHARPEN_3X3)
}

/// 3x3 Gaussian blur with the fixed `[1, 2, 1] / 4` separable kernel.
pub(crate) fn gaussian_blur_3x3(src: &GrayImage) -> GrayImage {
    separable_filter_equal(src, &[0.25f32, 0.5, 0.25])
}

/// Laplacian response with the 4-neighbor kernel, left unsaturated.
pub(crate) fn laplacian(src: &GrayImage) -> Vec<f32> {
    laplacian_filter(src).pixels().map(|p| f32::from(p.0[0])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sharpen_leaves_flat_regions_unchanged() {
        let img = GrayImage::from_pixel(6, 5, Luma([90]));
        let out = sharpen_gray(&img);
        assert!(out.pixels().all(|p| p.0[0] == 90));
    }

    #[test]
    fn sharpen_amplifies_isolated_peak() {
        let mut img = GrayImage::from_pixel(5, 5, Luma([100]));
        img.put_pixel(2, 2, Luma([120]));
        let out = sharpen_gray(&img);
        assert_eq!(out.get_pixel(2, 2).0[0], 255);
        assert_eq!(out.get_pixel(1, 1).0[0], 80);
    }

    #[test]
    fn sharpen_rgb_works_per_channel() {
        let mut img = RgbImage::from_pixel(5, 5, Rgb([100, 50, 10]));
        img.put_pixel(2, 2, Rgb([110, 50, 10]));
        let out = sharpen_rgb(&img);
        assert_eq!(out.get_pixel(2, 2).0, [190, 50, 10]);
        assert_eq!(out.get_pixel(0, 0).0, [100, 50, 10]);
    }

    #[test]
    fn bilateral_preserves_step_edge() {
        let img = GrayImage::from_fn(12, 8, |x, _| if x < 6 { Luma([20]) } else { Luma([220]) });
        let params = DenoiseParams {
            radius: 2,
            sigma_color: 10.0,
            sigma_space: 2.0,
        };
        let out = denoise(&img, params);
        assert_eq!(out.get_pixel(5, 4).0[0], 20);
        assert_eq!(out.get_pixel(6, 4).0[0], 220);
    }

    #[test]
    fn disabled_denoise_is_identity() {
        let img = GrayImage::from_fn(7, 5, |x, y| Luma([(x * 30 + y) as u8]));
        let params = DenoiseParams {
            radius: 0,
            sigma_color: 10.0,
            sigma_space: 2.0,
        };
        assert_eq!(denoise(&img, params), img);
    }

    #[test]
    fn gaussian_blur_keeps_constant_plane() {
        let img = GrayImage::from_pixel(7, 4, Luma([33]));
        let out = gaussian_blur_3x3(&img);
        assert!(out.pixels().all(|p| p.0[0] == 33));
    }

    #[test]
    fn laplacian_of_constant_is_zero() {
        let img = GrayImage::from_pixel(4, 4, Luma([200]));
        assert!(laplacian(&img).iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn laplacian_marks_isolated_peak() {
        let mut img = GrayImage::from_pixel(5, 5, Luma([10]));
        img.put_pixel(2, 2, Luma([50]));
        let lap = laplacian(&img);
        assert_eq!(lap[2 * 5 + 2], -160.0);
        assert_eq!(lap[2 * 5 + 1], 40.0);
    }
}
