use super::*;
use image::Rgb;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "panelreel_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const TWO_BOX_PAGE: &str = r#"{
    "texts": [[2, 2, 6, 6], [10, 10, 14, 14], [0, 0, 1, 1]],
    "is_essential_text": [true, true, false],
    "panels": [[0, 0, 8, 8], [8, 8, 20, 20]]
}"#;

fn write_page(images: &Path, annotations: &Path, stem: &str, ext: &str, json: &str) {
    RgbImage::from_pixel(20, 20, Rgb([30, 30, 30]))
        .save(images.join(format!("{stem}.{ext}")))
        .unwrap();
    std::fs::write(annotations.join(format!("{stem}.json")), json).unwrap();
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn pairs_by_stem_in_natural_order() {
    let images = temp_dir("batch_pair_img");
    let annotations = temp_dir("batch_pair_ann");
    for stem in ["10", "2", "1"] {
        write_page(&images, &annotations, stem, "png", TWO_BOX_PAGE);
    }
    let (pairs, unpaired) = pair_pages(&images, &annotations).unwrap();
    let pages: Vec<u32> = pairs.iter().map(|p| p.page).collect();
    assert_eq!(pages, vec![1, 2, 10]);
    assert!(unpaired.is_empty());
}

#[test]
fn unmatched_files_are_reported_not_processed() {
    let images = temp_dir("batch_unpaired_img");
    let annotations = temp_dir("batch_unpaired_ann");
    write_page(&images, &annotations, "1", "png", TWO_BOX_PAGE);
    RgbImage::new(4, 4).save(images.join("2.png")).unwrap();
    std::fs::write(annotations.join("3.json"), TWO_BOX_PAGE).unwrap();

    let (pairs, unpaired) = pair_pages(&images, &annotations).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(names(&unpaired), vec!["2.png", "3.json"]);
}

#[test]
fn non_numeric_stem_falls_back_to_position() {
    let images = temp_dir("batch_stem_img");
    let annotations = temp_dir("batch_stem_ann");
    write_page(&images, &annotations, "a_cover", "png", TWO_BOX_PAGE);
    write_page(&images, &annotations, "b_intro", "png", TWO_BOX_PAGE);
    let (pairs, _) = pair_pages(&images, &annotations).unwrap();
    assert_eq!(pairs[0].page, 0);
    assert_eq!(pairs[1].page, 1);
}

#[test]
fn full_page_mode_writes_k_plus_one_variants_in_save_order() {
    let images = temp_dir("batch_full_img");
    let annotations = temp_dir("batch_full_ann");
    let out = temp_dir("batch_full_out");
    write_page(&images, &annotations, "4", "png", TWO_BOX_PAGE);
    let cfg = PipelineConfig {
        mode: RedactionMode::FullPage,
        ..PipelineConfig::default()
    };

    let report = process_batch(&images, &annotations, &out, NameFormat::new(2).unwrap(), &cfg)
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(
        names(&report.pages[0].variants),
        vec![
            "page_04_panel_00_bubble_02.png",
            "page_04_panel_00_bubble_01.png",
            "page_04_panel_00_bubble_00.png",
        ]
    );
}

#[test]
fn panel_mode_keeps_page_level_bubble_indices() {
    let images = temp_dir("batch_panel_img");
    let annotations = temp_dir("batch_panel_ann");
    let out = temp_dir("batch_panel_out");
    write_page(&images, &annotations, "1", "png", TWO_BOX_PAGE);

    let report = process_batch(
        &images,
        &annotations,
        &out,
        NameFormat::new(2).unwrap(),
        &PipelineConfig::default(),
    )
    .unwrap();
    // box 1 (center 12,12) belongs to panel 1 and is redacted first; box 0 to panel 0
    assert_eq!(
        names(&report.pages[0].variants),
        vec![
            "page_01_panel_00_bubble_02.png",
            "page_01_panel_00_bubble_00.png",
            "page_01_panel_01_bubble_02.png",
            "page_01_panel_01_bubble_01.png",
        ]
    );
}

#[test]
fn variants_keep_the_source_extension() {
    let images = temp_dir("batch_ext_img");
    let annotations = temp_dir("batch_ext_ann");
    let out = temp_dir("batch_ext_out");
    write_page(&images, &annotations, "1", "jpg", TWO_BOX_PAGE);
    let cfg = PipelineConfig {
        mode: RedactionMode::FullPage,
        ..PipelineConfig::default()
    };
    let report = process_batch(&images, &annotations, &out, NameFormat::new(3).unwrap(), &cfg)
        .unwrap();
    assert!(
        report.pages[0]
            .variants
            .iter()
            .all(|p| p.extension().unwrap() == "jpg")
    );
    assert!(report.pages[0].variants[0].exists());
}

#[test]
fn malformed_annotation_fails_only_its_page() {
    let images = temp_dir("batch_bad_img");
    let annotations = temp_dir("batch_bad_ann");
    let out = temp_dir("batch_bad_out");
    write_page(&images, &annotations, "1", "png", "{ not json");
    write_page(&images, &annotations, "2", "png", TWO_BOX_PAGE);

    let report = process_batch(
        &images,
        &annotations,
        &out,
        NameFormat::new(2).unwrap(),
        &PipelineConfig::default(),
    )
    .unwrap();
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].page, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, ReelError::Annotation(_)));
}

#[test]
fn nuke_clears_stale_images_before_redacting() {
    let images = temp_dir("batch_nuke_img");
    let annotations = temp_dir("batch_nuke_ann");
    let out = temp_dir("batch_nuke_out");
    RgbImage::new(2, 2)
        .save(out.join("page_09_panel_00_bubble_00.png"))
        .unwrap();
    std::fs::write(out.join("notes.txt"), "keep").unwrap();
    write_page(&images, &annotations, "1", "png", TWO_BOX_PAGE);

    let report = process_batch(
        &images,
        &annotations,
        &out,
        NameFormat::new(2).unwrap(),
        &PipelineConfig::default(),
    )
    .unwrap();
    assert_eq!(report.nuked, 1);
    assert!(!out.join("page_09_panel_00_bubble_00.png").exists());
    assert!(out.join("notes.txt").exists());
}

#[test]
fn failed_page_leaves_no_partial_variants() {
    let images = temp_dir("batch_partial_img");
    let annotations = temp_dir("batch_partial_ann");
    let out = temp_dir("batch_partial_out");
    let json = r#"{
        "texts": [[1, 1, 4, 4]],
        "is_essential_text": [true],
        "panels": [[0, 0, 10, 10], [5, 5, 5, 9]]
    }"#;
    write_page(&images, &annotations, "1", "png", json);

    let report = process_batch(
        &images,
        &annotations,
        &out,
        NameFormat::new(2).unwrap(),
        &PipelineConfig::default(),
    )
    .unwrap();
    assert!(report.pages.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, ReelError::Annotation(_)));
    let left: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("page_01_"))
        .collect();
    assert!(left.is_empty(), "{left:?}");
}
