use super::*;

#[test]
fn from_f64_truncates_toward_zero() {
    let r = PixelRect::from_f64([10.9, 20.2, 30.5, 40.99]).unwrap();
    assert_eq!(r, PixelRect::new(10, 20, 30, 40));
    assert!(PixelRect::from_f64([f64::NAN, 0.0, 1.0, 1.0]).is_err());
}

#[test]
fn center_uses_floor_division() {
    assert_eq!(PixelRect::new(0, 0, 5, 7).center(), (2, 3));
    assert_eq!(PixelRect::new(-3, -3, 0, 0).center(), (-2, -2));
}

#[test]
fn from_f64_rejects_coordinates_beyond_i32() {
    let err = PixelRect::from_f64([9e18, 0.0, 9e18, 4.0]).unwrap_err();
    assert!(matches!(err, ReelError::Annotation(_)));
    assert!(PixelRect::from_f64([-3e9, 0.0, 1.0, 1.0]).is_err());
    assert!(PixelRect::from_f64([f64::from(i32::MAX), 0.0, 1.0, 1.0]).is_ok());
}

#[test]
fn center_and_translate_do_not_overflow_at_extremes() {
    assert_eq!(
        PixelRect::new(i64::MAX, 0, i64::MAX, 4).center(),
        (i64::MAX, 2)
    );
    assert_eq!(PixelRect::new(i64::MIN, 0, i64::MIN + 1, 0).center(), (i64::MIN, 0));
    assert_eq!(PixelRect::new(-1, 0, 2, 0).center(), (0, 0));
    let moved = PixelRect::new(i64::MAX - 1, 0, i64::MAX, 1).translate(5, 0);
    assert_eq!(moved.x2, i64::MAX);
}

#[test]
fn inclusive_containment_accepts_edges() {
    let r = PixelRect::new(0, 0, 10, 10);
    assert!(r.contains_inclusive(10, 10));
    assert!(r.contains_inclusive(0, 0));
    assert!(!r.contains_inclusive(11, 5));
    assert!(!r.contains_inclusive(5, -1));
}

#[test]
fn empty_and_inverted_boxes_have_zero_extent() {
    assert!(PixelRect::new(4, 4, 4, 9).is_empty());
    assert!(PixelRect::new(9, 0, 4, 9).is_empty());
    assert_eq!(PixelRect::new(9, 0, 4, 9).width(), 0);
    assert!(!PixelRect::new(0, 0, 1, 1).is_empty());
}

#[test]
fn frame_key_orders_by_page_panel_bubble() {
    let mut keys = vec![
        FrameKey::new(1, 0, 0),
        FrameKey::new(0, 1, 0),
        FrameKey::new(0, 0, 2),
        FrameKey::new(0, 0, 1),
    ];
    keys.sort();
    assert_eq!(
        keys,
        vec![
            FrameKey::new(0, 0, 1),
            FrameKey::new(0, 0, 2),
            FrameKey::new(0, 1, 0),
            FrameKey::new(1, 0, 0),
        ]
    );
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
    assert_eq!(Fps::integer(24).unwrap().as_f64(), 24.0);
    assert!((Fps::integer(10).unwrap().frames_to_secs(15) - 1.5).abs() < 1e-12);
}
