use image::imageops::crop_imm;
use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use tagmatch::catalog::TemplateSource;
use tagmatch::{rank, AnalysisConfig, Catalog, CatalogEntry, RasterImage, TagMatchError};

fn random_gray(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(width, height, |_, _| Luma([rng.random_range(0..=255u8)]))
}

#[test]
fn load_intersects_listing_with_table_in_table_order() {
    let dir = tempfile::tempdir().unwrap();
    let icon = random_gray(24, 24, 1);
    icon.save(dir.path().join("iryo.png")).unwrap();
    icon.save(dir.path().join("zenei.png")).unwrap();
    icon.save(dir.path().join("unlisted.png")).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let catalog = Catalog::load(dir.path()).unwrap();
    let tags: Vec<_> = catalog.iter().map(CatalogEntry::tag).collect();
    assert_eq!(tags, ["前衛タイプ", "医療タイプ"]);

    match catalog.entries()[0].source() {
        TemplateSource::File(path) => assert_eq!(path, &dir.path().join("zenei.png")),
        TemplateSource::Memory(_) => panic!("expected file-backed entry"),
    }
}

#[test]
fn custom_table_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    random_gray(8, 8, 2).save(dir.path().join("a.png")).unwrap();

    let catalog = Catalog::load_with_table(dir.path(), &[("a.png", "火力"), ("b.png", "防御")]).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.entries()[0].tag(), "火力");
}

#[test]
fn missing_directory_is_a_catalog_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let err = Catalog::load(&missing).unwrap_err();
    assert!(matches!(err, TagMatchError::CatalogIo { .. }), "{err:?}");
}

#[test]
fn empty_directory_gives_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(dir.path()).unwrap();
    assert!(catalog.is_empty());
}

#[test]
fn file_entries_load_on_demand() {
    let dir = tempfile::tempdir().unwrap();
    let icon = random_gray(12, 10, 3);
    icon.save(dir.path().join("karyoku.png")).unwrap();

    let catalog = Catalog::load(dir.path()).unwrap();
    let template = catalog.entries()[0].template().unwrap();
    assert_eq!(template.name(), "火力");
    assert_eq!(template.image(), &RasterImage::Gray(icon));
}

#[test]
fn corrupt_icon_scores_zero_without_aborting_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    let target = random_gray(200, 150, 4);
    crop_imm(&target, 50, 60, 24, 24)
        .to_image()
        .save(dir.path().join("zenei.png"))
        .unwrap();
    fs::write(dir.path().join("iryo.png"), b"not a png").unwrap();

    let catalog = Catalog::load(dir.path()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.entries()[1].template().is_err());

    let tags = rank(&RasterImage::Gray(target), &catalog, &AnalysisConfig::default());
    let names: Vec<_> = tags.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(names, ["前衛タイプ"]);
}

#[test]
fn in_memory_entries_borrow_their_template() {
    let entry = CatalogEntry::from_raster("元素", RasterImage::Gray(random_gray(10, 10, 5))).unwrap();
    let mut catalog = Catalog::from_entries(vec![entry]);
    catalog.push(CatalogEntry::from_file("防御", "/nonexistent/bougyo.png"));

    assert!(matches!(catalog.entries()[0].source(), TemplateSource::Memory(_)));
    assert!(matches!(
        catalog.entries()[0].template().unwrap(),
        std::borrow::Cow::Borrowed(_)
    ));
    assert!(catalog.entries()[1].template().is_err());
    assert!(CatalogEntry::from_raster("空", RasterImage::Gray(GrayImage::new(0, 3))).is_err());
}
