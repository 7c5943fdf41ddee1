use image::{GrayImage, Luma, Rgb, RgbImage};
use tagmatch::{PreparedTarget, RasterImage, TagMatchError, Template, TemplatePlan};

#[test]
fn template_rejects_empty_raster() {
    let err = Template::new("火力", RasterImage::Gray(GrayImage::new(0, 5))).unwrap_err();
    assert_eq!(
        err,
        TagMatchError::InvalidDimensions {
            width: 0,
            height: 5,
        }
    );
}

#[test]
fn raster_color_detection_and_gray_conversion() {
    let rgb = RgbImage::from_pixel(4, 3, Rgb([255, 0, 0]));
    let raster = RasterImage::from(rgb);
    assert!(raster.is_color());
    assert_eq!(raster.channels(), 3);
    let gray = raster.to_gray();
    assert_eq!(gray.dimensions(), (4, 3));
    // BT.601: 0.299 * 255
    assert_eq!(gray.get_pixel(0, 0).0[0], 76);

    let gray_raster = RasterImage::from(GrayImage::from_pixel(2, 2, Luma([9])));
    assert!(!gray_raster.is_color());
    assert_eq!(gray_raster.channels(), 1);
}

#[test]
fn template_plan_statistics() {
    let tpl = GrayImage::from_raw(2, 2, vec![10u8, 20, 30, 40]).unwrap();
    let plan = TemplatePlan::from_gray(&tpl).unwrap();
    assert_eq!(plan.len(), 4);
    assert_eq!((plan.width(), plan.height()), (2, 2));
    assert!((plan.mean() - 25.0).abs() < 1e-9);
    assert!((plan.sum() - 100.0).abs() < 1e-9);
    assert!((plan.sum_sq() - 3000.0).abs() < 1e-9);
    // sum of squared deviations: 225 + 25 + 25 + 225
    assert!((plan.var_t() - 500.0).abs() < 1e-9);
    assert_eq!(plan.data(), &[10.0, 20.0, 30.0, 40.0]);
}

#[test]
fn template_plan_rejects_empty_template() {
    let err = TemplatePlan::from_gray(&GrayImage::new(3, 0)).err().unwrap();
    assert_eq!(
        err,
        TagMatchError::InvalidDimensions {
            width: 3,
            height: 0,
        }
    );
}

#[test]
fn prepared_target_window_moments() {
    let img = GrayImage::from_raw(3, 2, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
    let target = PreparedTarget::new(img).unwrap();
    let window = target.window(1, 0, 2, 2);
    // 2 + 3 + 5 + 6
    assert_eq!(window.sum, 16.0);
    assert_eq!(window.sum_sq, 74.0);
    assert!((window.var - 10.0).abs() < 1e-12);
    assert!(PreparedTarget::new(GrayImage::new(0, 4)).is_err());
}
