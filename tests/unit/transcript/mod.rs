use super::*;

const SAMPLE: &str = "\
<name>ghost<endname>: before any page
<page>3<endpage>
<name>Hero_Male<endname>: We made it.
not a transcript line
<name>unsure<endname>:   Huh?
<page>4<endpage>
<name>Rival_Female<endname>: Not yet.
<name>broken<endname>
";

#[test]
fn parse_groups_lines_by_page_and_lowercases_speakers() {
    let t = Transcript::parse(SAMPLE).unwrap();
    assert_eq!(t.pages.len(), 2);
    assert_eq!(t.pages[0].id, "3");
    assert_eq!(
        t.pages[0].lines,
        vec![
            DialogueLine {
                speaker: "hero_male".into(),
                text: "We made it.".into(),
            },
            DialogueLine {
                speaker: "unsure".into(),
                text: "Huh?".into(),
            },
        ]
    );
    assert_eq!(t.pages[1].lines.len(), 1);
    assert_eq!(t.pages[1].page_number().unwrap(), 4);
}

#[test]
fn malformed_page_header_is_an_error() {
    let err = Transcript::parse("<page>12\n").unwrap_err();
    assert!(matches!(err, ReelError::Transcript(_)));
}

#[test]
fn non_numeric_page_id_cannot_name_clips() {
    let t = Transcript::parse("<page>cover<endpage>\n").unwrap();
    assert!(t.pages[0].page_number().is_err());
}

#[test]
fn render_then_parse_preserves_content() {
    let t = Transcript::parse(SAMPLE).unwrap();
    let again = Transcript::parse(&t.render()).unwrap();
    assert_eq!(t, again);
    assert!(t.render().starts_with("<page>3<endpage>\n<name>hero_male<endname>: We made it.\n"));
}

#[test]
fn characters_are_distinct_and_sorted() {
    let t = Transcript::parse(SAMPLE).unwrap();
    assert_eq!(
        t.characters(),
        vec!["hero_male", "rival_female", "unsure"]
    );
}

#[test]
fn build_uses_essential_texts_and_associations() {
    let ann = PageAnnotation::from_json_str(
        r#"{
            "texts": [[0,0,1,1],[0,0,1,1],[0,0,1,1]],
            "is_essential_text": [true, false, true],
            "panels": [],
            "ocr": ["Hello\nthere", "SFX", "Bye"],
            "character_names": ["Aki_female"],
            "text_character_associations": [[0, 0]]
        }"#,
    )
    .unwrap();
    let t = build_transcript([("7", &ann)]).unwrap();
    assert_eq!(t.pages[0].id, "7");
    assert_eq!(
        t.pages[0].lines,
        vec![
            DialogueLine {
                speaker: "Aki_female".into(),
                text: "Hello there".into(),
            },
            DialogueLine {
                speaker: UNKNOWN_SPEAKER.into(),
                text: "Bye".into(),
            },
        ]
    );
}

#[test]
fn build_without_ocr_fails() {
    let ann = PageAnnotation::from_json_str(
        r#"{"texts": [[0,0,1,1]], "is_essential_text": [true], "panels": []}"#,
    )
    .unwrap();
    assert!(matches!(
        build_transcript([("1", &ann)]),
        Err(ReelError::Transcript(_))
    ));
}
