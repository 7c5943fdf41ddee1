//! Numeric helpers shared by filters and quality metrics.

/// Converts degrees to radians.
pub(crate) fn deg_to_rad(angle_deg: f32) -> f32 {
    angle_deg.to_radians()
}

/// Computes sine and cosine for an angle in degrees.
pub(crate) fn sin_cos_deg(angle_deg: f32) -> (f32, f32) {
    let radians = deg_to_rad(angle_deg);
    radians.sin_cos()
}

/// Rounds and saturates a float to the `u8` range.
pub(crate) fn saturate_u8(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Population mean and standard deviation of a byte buffer.
pub(crate) fn mean_std(data: &[u8]) -> (f64, f64) {
    if data.is_empty() {
        return (0.0, 0.0);
    }
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &value in data {
        let v = value as f64;
        sum += v;
        sum_sq += v * v;
    }
    let n = data.len() as f64;
    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::{deg_to_rad, mean_std, saturate_u8, sin_cos_deg};

    #[test]
    fn deg_to_rad_matches_pi() {
        let radians = deg_to_rad(180.0);
        assert!((radians - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn sin_cos_deg_matches_quadrants() {
        let (sin, cos) = sin_cos_deg(90.0);
        assert!(sin > 0.999);
        assert!(cos.abs() < 1e-6);
    }

    #[test]
    fn saturate_u8_clamps_and_rounds() {
        assert_eq!(saturate_u8(-4.0), 0);
        assert_eq!(saturate_u8(300.0), 255);
        assert_eq!(saturate_u8(12.5), 13);
        assert_eq!(saturate_u8(f32::NAN), 0);
    }

    #[test]
    fn mean_std_of_constant_buffer() {
        let (mean, std) = mean_std(&[7u8; 16]);
        assert!((mean - 7.0).abs() < 1e-12);
        assert!(std.abs() < 1e-12);
    }
}
