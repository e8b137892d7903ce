use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::FrameKey;
use image::Rgb;
use std::path::PathBuf;

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

fn write_png(dir: &Path, bubble: u32, w: u32, h: u32, color: [u8; 3]) -> FrameVariant {
    let path = dir.join(format!("page_000_panel_000_bubble_{bubble:03}.png"));
    RgbImage::from_pixel(w, h, Rgb(color)).save(&path).unwrap();
    FrameVariant {
        key: FrameKey::new(0, 0, bubble),
        path,
        extension: ".png".to_string(),
    }
}

#[test]
fn repeat_count_rounds_fps_times_duration() {
    let fps = Fps::integer(24).unwrap();
    assert_eq!(frame_repeat_count(fps, 2.0), 48);
    assert_eq!(frame_repeat_count(fps, 0.5), 12);
    assert_eq!(frame_repeat_count(Fps::integer(10).unwrap(), 0.26), 3);
    assert_eq!(frame_repeat_count(fps, 0.0), 0);
}

#[test]
fn pad_centers_unscaled_with_floor_offsets() {
    let img = RgbImage::from_pixel(3, 2, Rgb([9, 9, 9]));
    let out = normalize_frame(
        &img,
        Canvas {
            width: 6,
            height: 5,
        },
        LayoutMode::Pad,
    );
    assert_eq!(out.dimensions(), (6, 5));
    // x offset (6-3)/2 = 1, y offset (5-2)/2 = 1
    assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
    assert_eq!(*out.get_pixel(1, 1), Rgb([9, 9, 9]));
    assert_eq!(*out.get_pixel(3, 2), Rgb([9, 9, 9]));
    assert_eq!(*out.get_pixel(4, 1), Rgb([0, 0, 0]));
    assert_eq!(*out.get_pixel(1, 3), Rgb([0, 0, 0]));
}

#[test]
fn fit_scales_uniformly_and_letterboxes() {
    let img = RgbImage::from_pixel(10, 5, Rgb([200, 100, 50]));
    let out = normalize_frame(
        &img,
        Canvas {
            width: 20,
            height: 20,
        },
        LayoutMode::Fit,
    );
    // scale = min(2, 4) = 2 -> 20x10 placed at y = 5
    assert_eq!(*out.get_pixel(0, 4), Rgb([0, 0, 0]));
    assert_eq!(*out.get_pixel(0, 5), Rgb([200, 100, 50]));
    assert_eq!(*out.get_pixel(19, 14), Rgb([200, 100, 50]));
    assert_eq!(*out.get_pixel(19, 15), Rgb([0, 0, 0]));
}

#[test]
fn canvas_takes_max_width_and_height_independently() {
    let dir = temp_dir("canvas_max");
    let a = write_png(&dir, 0, 10, 30, [1, 1, 1]);
    let b = write_png(&dir, 1, 25, 5, [1, 1, 1]);
    let canvas = canvas_for([a.path.as_path(), b.path.as_path()]).unwrap();
    assert_eq!(
        canvas,
        Canvas {
            width: 25,
            height: 30
        }
    );
}

#[test]
fn frames_repeat_for_their_duration() {
    let dir = temp_dir("compose_repeat");
    let frames = vec![
        write_png(&dir, 0, 4, 4, [255, 0, 0]),
        write_png(&dir, 1, 4, 4, [0, 255, 0]),
    ];
    let durations = [2.0, 0.5];
    let mut sink = InMemorySink::new();
    let stats = compose(
        &frames,
        Fps::integer(24).unwrap(),
        |i, _| Ok(durations[i]),
        LayoutMode::Pad,
        &mut sink,
    )
    .unwrap();

    assert_eq!(stats.frames_written, 60);
    assert_eq!(sink.frames().len(), 60);
    assert!(sink.is_finished());
    assert_eq!(*sink.frames()[47].1.get_pixel(0, 0), Rgb([255, 0, 0]));
    assert_eq!(*sink.frames()[48].1.get_pixel(0, 0), Rgb([0, 255, 0]));
    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, (0..60).collect::<Vec<_>>());
    assert!((stats.duration_secs - 2.5).abs() < 1e-9);
}

#[test]
fn mixed_sizes_share_one_canvas() {
    let dir = temp_dir("compose_canvas");
    let frames = vec![
        write_png(&dir, 0, 8, 2, [10, 10, 10]),
        write_png(&dir, 1, 2, 6, [20, 20, 20]),
    ];
    let mut sink = InMemorySink::new();
    compose(
        &frames,
        Fps::integer(2).unwrap(),
        |_, _| Ok(0.5),
        LayoutMode::Pad,
        &mut sink,
    )
    .unwrap();
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (8, 6));
    assert!(sink.frames().iter().all(|(_, f)| f.dimensions() == (8, 6)));
}

#[test]
fn duration_errors_abort_composition() {
    let dir = temp_dir("compose_err");
    let frames = vec![write_png(&dir, 0, 2, 2, [1, 2, 3])];
    let mut sink = InMemorySink::new();
    let res = compose(
        &frames,
        Fps::integer(24).unwrap(),
        |_, _| Err(ReelError::decode("bad clip")),
        LayoutMode::Pad,
        &mut sink,
    );
    assert!(matches!(res, Err(ReelError::Decode(_))));
}

#[test]
fn empty_input_is_rejected() {
    let mut sink = InMemorySink::new();
    assert!(
        compose(
            &[],
            Fps::integer(24).unwrap(),
            |_, _| Ok(1.0),
            LayoutMode::Pad,
            &mut sink
        )
        .is_err()
    );
}
