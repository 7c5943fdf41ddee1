use criterion::{criterion_group, criterion_main, Criterion};
use image::imageops::crop_imm;
use image::{GrayImage, Luma};
use std::hint::black_box;
use tagmatch::{
    rank, AnalysisConfig, Catalog, Policy, RasterImage, SearchConfig, Searcher, Template,
};

fn make_image(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([(((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8])
    })
}

fn bench_search(c: &mut Criterion) {
    let image = make_image(320, 120);
    let patch = crop_imm(&image, 120, 40, 32, 32).to_image();
    let template = Template::new("火力", RasterImage::Gray(patch)).unwrap();
    let target = RasterImage::Gray(image.clone());

    let simple = Searcher::new(&target, Policy::Simple, &SearchConfig::default());
    c.bench_function("simple_single_shot", |b| {
        b.iter(|| black_box(simple.score(&template)));
    });

    let small_grid = SearchConfig {
        scales: vec![0.9, 1.0, 1.1],
        angles_deg: vec![-5.0, 0.0, 5.0],
        ..SearchConfig::default()
    };
    let high = Searcher::new(&target, Policy::HighQuality, &small_grid);
    c.bench_function("high_quality_3x3_grid", |b| {
        b.iter(|| black_box(high.score(&template)));
    });

    // Capture scale: a 1024x256 band, doubled by preprocessing, against one
    // 40x40 icon at a single grid cell.
    let band = make_image(1024, 256);
    let icon_patch = crop_imm(&band, 500, 100, 40, 40).to_image();
    let icon = Template::new("火力", RasterImage::Gray(icon_patch)).unwrap();
    let one_cell = SearchConfig {
        scales: vec![1.0],
        angles_deg: vec![0.0],
        ..SearchConfig::default()
    };
    let capture = Searcher::new(&RasterImage::Gray(band), Policy::HighQuality, &one_cell);
    c.bench_function("high_quality_capture_band_cell", |b| {
        b.iter(|| black_box(capture.score(&icon)));
    });

    let catalog = Catalog::from_templates(
        [(0, "火力"), (40, "防御"), (80, "生存"), (160, "治療"), (240, "支援")]
            .into_iter()
            .map(|(x, tag)| {
                let patch = crop_imm(&image, x, 50, 32, 32).to_image();
                Template::new(tag, RasterImage::Gray(patch)).unwrap()
            }),
    );
    let cfg = AnalysisConfig::default();
    c.bench_function("rank_five_templates", |b| {
        b.iter(|| black_box(rank(&target, &catalog, &cfg)));
    });

    if cfg!(feature = "rayon") {
        let par_cfg = AnalysisConfig {
            parallel: true,
            ..AnalysisConfig::default()
        };
        c.bench_function("rank_five_templates_parallel", |b| {
            b.iter(|| black_box(rank(&target, &catalog, &par_cfg)));
        });
    }
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
