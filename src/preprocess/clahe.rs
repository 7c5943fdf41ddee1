//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! The plane is split into a `grid_x` x `grid_y` tile grid. Each tile gets a
//! clipped-histogram equalization LUT; clipped counts are redistributed evenly
//! over all bins. Output pixels blend the LUTs of the four nearest tile centers
//! bilinearly, which removes visible tile seams.

use crate::util::math::saturate_u8;
use image::{GrayImage, Luma};

/// CLAHE parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClaheParams {
    /// Clip limit relative to a uniform histogram (1.0 disables clipping gain).
    pub clip_limit: f32,
    /// Number of tiles across.
    pub grid_x: u32,
    /// Number of tiles down.
    pub grid_y: u32,
}

fn tile_bounds(len: u32, tiles: u32, idx: u32) -> (u32, u32) {
    let start = (idx as u64 * len as u64 / tiles as u64) as u32;
    let end = ((idx as u64 + 1) * len as u64 / tiles as u64) as u32;
    (start, end)
}

fn tile_lut(src: &GrayImage, x0: u32, x1: u32, y0: u32, y1: u32, clip_limit: f32) -> [u8; 256] {
    let mut hist = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            hist[src.get_pixel(x, y).0[0] as usize] += 1;
        }
    }
    let area = (x1 - x0) * (y1 - y0);

    let limit = ((clip_limit * area as f32 / 256.0) as u32).max(1);
    let mut excess = 0u32;
    for count in hist.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }
    let batch = excess / 256;
    let residual = (excess % 256) as usize;
    for count in hist.iter_mut() {
        *count += batch;
    }
    if residual > 0 {
        let step = (256 / residual).max(1);
        for idx in (0..256).step_by(step).take(residual) {
            hist[idx] += 1;
        }
    }

    let scale = 255.0 / area.max(1) as f32;
    let mut lut = [0u8; 256];
    let mut cdf = 0u32;
    for (value, count) in hist.iter().enumerate() {
        cdf += count;
        lut[value] = saturate_u8(cdf as f32 * scale);
    }
    lut
}

/// Applies CLAHE to a single-channel plane.
pub(crate) fn clahe(src: &GrayImage, params: ClaheParams) -> GrayImage {
    let (width, height) = src.dimensions();
    let grid_x = params.grid_x.clamp(1, width.max(1));
    let grid_y = params.grid_y.clamp(1, height.max(1));

    let mut luts = Vec::with_capacity((grid_x * grid_y) as usize);
    for ty in 0..grid_y {
        let (y0, y1) = tile_bounds(height, grid_y, ty);
        for tx in 0..grid_x {
            let (x0, x1) = tile_bounds(width, grid_x, tx);
            luts.push(tile_lut(src, x0, x1, y0, y1, params.clip_limit));
        }
    }

    let tile_w = width as f32 / grid_x as f32;
    let tile_h = height as f32 / grid_y as f32;
    let neighbors = |pos: f32, tile: f32, tiles: u32| -> (usize, usize, f32) {
        let f = (pos + 0.5) / tile - 0.5;
        let lo = f.floor();
        let weight = f - lo;
        let max_idx = tiles as i64 - 1;
        let i0 = (lo as i64).clamp(0, max_idx) as usize;
        let i1 = (lo as i64 + 1).clamp(0, max_idx) as usize;
        (i0, i1, weight)
    };

    GrayImage::from_fn(width, height, |x, y| {
        let value = src.get_pixel(x, y).0[0] as usize;
        let (tx0, tx1, ax) = neighbors(x as f32, tile_w, grid_x);
        let (ty0, ty1, ay) = neighbors(y as f32, tile_h, grid_y);
        let gx = grid_x as usize;
        let v00 = luts[ty0 * gx + tx0][value] as f32;
        let v01 = luts[ty0 * gx + tx1][value] as f32;
        let v10 = luts[ty1 * gx + tx0][value] as f32;
        let v11 = luts[ty1 * gx + tx1][value] as f32;
        let top = v00 * (1.0 - ax) + v01 * ax;
        let bottom = v10 * (1.0 - ax) + v11 * ax;
        Luma([saturate_u8(top * (1.0 - ay) + bottom * ay)])
    })
}

#[cfg(test)]
mod tests {
    use super::{clahe, ClaheParams};
    use image::{GrayImage, Luma};

    #[test]
    fn clahe_stretches_low_contrast_ramp() {
        let img = GrayImage::from_fn(64, 64, |x, _| Luma([100 + (x / 8) as u8]));
        let params = ClaheParams {
            clip_limit: 4.0,
            grid_x: 1,
            grid_y: 1,
        };
        let out = clahe(&img, params);
        let min = out.pixels().map(|p| p.0[0]).min().unwrap();
        let max = out.pixels().map(|p| p.0[0]).max().unwrap();
        assert!(max - min > 7, "range {min}..{max} not stretched");
    }

    #[test]
    fn clahe_keeps_dimensions_with_oversized_grid() {
        let img = GrayImage::from_fn(5, 3, |x, y| Luma([(x * 40 + y * 10) as u8]));
        let params = ClaheParams {
            clip_limit: 2.0,
            grid_x: 8,
            grid_y: 8,
        };
        let out = clahe(&img, params);
        assert_eq!(out.dimensions(), (5, 3));
    }
}
