use image::{GrayImage, Luma, Rgb, RgbImage};
use tagmatch::{classify_size, crop_recruitment_area, RasterImage, SizePolicy, SizeTier};

#[test]
fn tier_boundaries() {
    assert_eq!(classify_size(640, 480), SizeTier::TooSmall);
    assert_eq!(classify_size(799, 600), SizeTier::TooSmall);
    assert_eq!(classify_size(800, 599), SizeTier::TooSmall);
    assert_eq!(classify_size(800, 600), SizeTier::Acceptable);
    assert_eq!(classify_size(1023, 768), SizeTier::Acceptable);
    assert_eq!(classify_size(1024, 767), SizeTier::Acceptable);
    assert_eq!(classify_size(1024, 768), SizeTier::Good);
    assert_eq!(classify_size(1920, 1080), SizeTier::Good);
}

#[test]
fn tier_multipliers_and_advice() {
    let policy = SizePolicy::default();
    assert_eq!(policy.multiplier(SizeTier::TooSmall), 0.7);
    assert_eq!(policy.multiplier(SizeTier::Acceptable), 0.85);
    assert_eq!(policy.multiplier(SizeTier::Good), 1.0);

    assert!(SizeTier::TooSmall.advice().is_some());
    assert!(SizeTier::Acceptable.advice().is_some());
    assert!(SizeTier::Good.advice().is_none());
}

#[test]
fn custom_bounds_are_respected() {
    let policy = SizePolicy {
        min_width: 100,
        min_height: 100,
        recommended_width: 200,
        recommended_height: 200,
        ..SizePolicy::default()
    };
    assert_eq!(policy.classify(150, 150), SizeTier::Acceptable);
    assert_eq!(policy.classify(200, 200), SizeTier::Good);
    assert!(policy.validate().is_ok());

    let inverted = SizePolicy {
        min_width: 300,
        ..policy
    };
    assert!(inverted.validate().is_err());
}

#[test]
fn crop_keeps_middle_third_rows() {
    let img = GrayImage::from_fn(7, 90, |_, y| Luma([y as u8]));
    let area = crop_recruitment_area(&RasterImage::Gray(img)).unwrap();
    assert_eq!((area.width(), area.height()), (7, 30));
    let gray = area.to_gray();
    assert_eq!(gray.get_pixel(0, 0).0[0], 30);
    assert_eq!(gray.get_pixel(6, 29).0[0], 59);
}

#[test]
fn crop_uses_integer_division_bounds() {
    // 100 rows: 33..66
    let img = RgbImage::from_fn(4, 100, |_, y| Rgb([y as u8, 0, 0]));
    let area = crop_recruitment_area(&RasterImage::Rgb(img)).unwrap();
    assert!(area.is_color());
    assert_eq!(area.height(), 33);
    let RasterImage::Rgb(rgb) = area else {
        panic!("expected color crop");
    };
    assert_eq!(rgb.get_pixel(0, 0).0[0], 33);
    assert_eq!(rgb.get_pixel(0, 32).0[0], 65);
}

#[test]
fn crop_rejects_captures_without_a_middle_band() {
    let img = GrayImage::new(10, 1);
    assert!(crop_recruitment_area(&RasterImage::Gray(img)).is_err());
}
