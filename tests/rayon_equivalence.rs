#![cfg(feature = "rayon")]

use image::imageops::crop_imm;
use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tagmatch::{
    rank, AnalysisConfig, Catalog, Policy, RasterImage, SearchConfig, Searcher, Template,
};

fn random_gray(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(width, height, |_, _| Luma([rng.random_range(0..=255u8)]))
}

fn crop_template(img: &GrayImage, name: &str, x: u32, y: u32) -> Template {
    let patch = crop_imm(img, x, y, 24, 24).to_image();
    Template::new(name, RasterImage::Gray(patch)).unwrap()
}

#[test]
fn parallel_catalog_scan_matches_sequential() {
    let img = random_gray(200, 150, 41);
    let decoys = random_gray(200, 150, 42);
    let catalog = Catalog::from_templates(vec![
        crop_template(&img, "火力", 10, 10),
        crop_template(&decoys, "防御", 30, 30),
        crop_template(&img, "生存", 90, 60),
        crop_template(&img, "治療", 150, 100),
        crop_template(&decoys, "支援", 70, 20),
        crop_template(&img, "減速", 40, 110),
        crop_template(&img, "召喚", 120, 15),
    ]);
    let target = RasterImage::Gray(img);

    let sequential = rank(&target, &catalog, &AnalysisConfig::default());
    let parallel = rank(
        &target,
        &catalog,
        &AnalysisConfig {
            parallel: true,
            ..AnalysisConfig::default()
        },
    );
    assert_eq!(sequential, parallel);
    assert_eq!(sequential.len(), 5);
}

#[test]
fn parallel_scan_matches_sequential_scan() {
    let img = random_gray(48, 40, 43);
    let template = crop_template(&img, "弱化", 12, 8);
    let target = RasterImage::Gray(img);
    let base = SearchConfig {
        scales: vec![1.3],
        angles_deg: vec![0.0, 5.0],
        ..SearchConfig::default()
    };
    let par = SearchConfig {
        parallel_scan: true,
        ..base.clone()
    };

    for policy in [Policy::Simple, Policy::HighQuality] {
        let a = Searcher::new(&target, policy, &base).score(&template);
        let b = Searcher::new(&target, policy, &par).score(&template);
        assert_eq!(a, b);
    }
}
