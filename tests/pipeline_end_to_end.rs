use image::imageops::crop_imm;
use image::{GrayImage, Luma, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tagmatch::{
    analyze, AnalysisConfig, Analyzer, CancelToken, Catalog, RasterImage, SizeTier, TagMatchError,
    Template,
};

fn random_rgb(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| {
        Rgb([rng.random(), rng.random(), rng.random()])
    })
}

fn crop_template(img: &RgbImage, name: &str, x: u32, y: u32) -> Template {
    let patch = crop_imm(img, x, y, 24, 24).to_image();
    Template::new(name, RasterImage::Rgb(patch)).unwrap()
}

#[test]
fn missing_capture_is_reported_as_no_input() {
    let catalog = Catalog::default();
    let err = analyze(None, &catalog, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(err, TagMatchError::NoInput);
}

#[test]
fn tags_in_the_middle_band_are_found() {
    // 300x240 capture; the middle band is rows 80..160.
    let capture = random_rgb(300, 240, 31);
    let catalog = Catalog::from_templates(vec![
        crop_template(&capture, "COST回復", 10, 5),
        crop_template(&capture, "範囲攻撃", 150, 100),
        crop_template(&capture, "強制移動", 40, 120),
    ]);

    let analysis = analyze(
        Some(RasterImage::Rgb(capture.clone())),
        &catalog,
        &AnalysisConfig::default(),
    )
    .unwrap();

    assert_eq!(analysis.tier(), SizeTier::TooSmall);
    assert_eq!(analysis.capture_size(), (300, 240));
    assert_eq!(analysis.capture(), &RasterImage::Rgb(capture));

    let names = analysis.tag_names();
    assert_eq!(names.len(), 2, "{names:?}");
    assert!(names.contains(&"範囲攻撃"));
    assert!(names.contains(&"強制移動"));
    assert!(!names.contains(&"COST回復"));
    assert!(analysis.tags().iter().all(|t| t.score >= 0.99));
    assert_eq!(analysis.text(), names.join("\n"));
}

#[test]
fn analyzer_rejects_invalid_config() {
    let cfg = AnalysisConfig {
        result_cap: 0,
        ..AnalysisConfig::default()
    };
    assert!(Analyzer::new(cfg, Catalog::default()).is_err());
}

#[test]
fn analyzer_honours_cancellation() {
    let capture = random_rgb(120, 90, 32);
    let catalog = Catalog::from_templates(vec![crop_template(&capture, "火力", 10, 35)]);
    let analyzer = Analyzer::new(AnalysisConfig::default(), catalog).unwrap();
    let token = CancelToken::new();
    token.cancel();

    let err = analyzer
        .analyze_with_cancel(Some(RasterImage::Rgb(capture)), &token)
        .unwrap_err();
    assert_eq!(err, TagMatchError::Cancelled);
}

#[test]
fn analyzer_runs_repeatedly_with_identical_results() {
    let capture = random_rgb(150, 120, 33);
    let catalog = Catalog::from_templates(vec![crop_template(&capture, "ロボット", 60, 50)]);
    let analyzer = Analyzer::new(AnalysisConfig::default(), catalog).unwrap();

    let first = analyzer.analyze(Some(RasterImage::Rgb(capture.clone()))).unwrap();
    let second = analyzer.analyze(Some(RasterImage::Rgb(capture))).unwrap();
    assert_eq!(first.tags(), second.tags());
    assert_eq!(first.tag_names(), ["ロボット"]);
}

#[test]
fn single_row_capture_yields_an_empty_analysis() {
    let icons = random_rgb(40, 40, 34);
    let catalog = Catalog::from_templates(vec![crop_template(&icons, "火力", 0, 0)]);
    let capture = RasterImage::Gray(GrayImage::from_pixel(50, 1, Luma([3])));

    let analysis = analyze(Some(capture), &catalog, &AnalysisConfig::default()).unwrap();
    assert!(analysis.tags().is_empty());
    assert_eq!(analysis.text(), "");
    assert_eq!(analysis.tier(), SizeTier::TooSmall);
    assert_eq!(analysis.capture_size(), (50, 1));
}
