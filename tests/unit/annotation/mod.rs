use super::*;

const PAGE: &str = r#"{
    "texts": [[10, 10, 20, 20], [30.7, 30.2, 40.9, 40.1], [50, 50, 60, 60]],
    "is_essential_text": [true, false, true],
    "panels": [[0, 0, 100, 100], [100, 0, 200, 100]],
    "ocr": ["hello", "sfx", "bye"],
    "character_names": ["ruri", "other"],
    "text_character_associations": [[0, 0], [2, 1]],
    "characters": [[1, 2, 3, 4]]
}"#;

#[test]
fn essential_boxes_keep_relative_order_and_ordinals() {
    let ann = PageAnnotation::from_json_str(PAGE).unwrap();
    let boxes = ann.essential_text_boxes().unwrap();
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0].ordinal, 0);
    assert_eq!(boxes[1].ordinal, 2);
    assert_eq!(boxes[1].rect, PixelRect::new(50, 50, 60, 60));
}

#[test]
fn coordinates_are_truncated() {
    let ann = PageAnnotation::from_json_str(PAGE).unwrap();
    let all = ann.text_boxes().unwrap();
    assert_eq!(all[1].rect, PixelRect::new(30, 30, 40, 40));
    assert!(!all[1].essential);
}

#[test]
fn panels_are_in_forward_order() {
    let ann = PageAnnotation::from_json_str(PAGE).unwrap();
    let panels = ann.panel_boxes().unwrap();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[1].ordinal, 1);
    assert_eq!(panels[1].rect.x1, 100);
}

#[test]
fn speaker_lookup_follows_associations() {
    let ann = PageAnnotation::from_json_str(PAGE).unwrap();
    assert_eq!(ann.speaker_for(0), Some("ruri"));
    assert_eq!(ann.speaker_for(1), None);
    assert_eq!(ann.speaker_for(2), Some("other"));
}

#[test]
fn mismatched_essential_flags_are_rejected() {
    let err = PageAnnotation::from_json_str(
        r#"{ "texts": [[0,0,1,1]], "is_essential_text": [], "panels": [] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Annotation(_)));
}

#[test]
fn missing_required_field_is_an_annotation_error() {
    let err = PageAnnotation::from_json_str(r#"{ "texts": [] }"#).unwrap_err();
    assert!(matches!(err, ReelError::Annotation(_)));
}

#[test]
fn missing_file_is_an_annotation_error() {
    let err = PageAnnotation::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("annotation error:"));
}

#[test]
fn annotation_extension_ignores_case() {
    assert!(is_annotation_path(Path::new("pages/3.json")));
    assert!(is_annotation_path(Path::new("pages/3.JSON")));
    assert!(!is_annotation_path(Path::new("pages/3.png")));
    assert!(!is_annotation_path(Path::new("pages/json")));
}

#[test]
fn huge_coordinates_are_an_annotation_error() {
    let ann = PageAnnotation::from_json_str(
        r#"{ "texts": [[9e18, 0, 9e18, 4]], "is_essential_text": [true], "panels": [[0, 0, 10, 10]] }"#,
    )
    .and_then(|ann| ann.essential_text_boxes().map(|_| ann));
    assert!(matches!(ann, Err(ReelError::Annotation(_))));
}
