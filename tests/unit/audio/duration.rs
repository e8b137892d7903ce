use super::*;
use crate::foundation::core::FrameKey;
use crate::foundation::error::ReelError;

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

fn variant(dir: &Path, name: &str) -> FrameVariant {
    FrameVariant {
        key: FrameKey::new(0, 0, 1),
        path: dir.join(format!("{name}.jpg")),
        extension: ".jpg".to_string(),
    }
}

fn write_clip(path: &Path, secs: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..(secs * 16_000.0) as usize {
        w.write_sample(0i16).unwrap();
    }
    w.finalize().unwrap();
}

#[test]
fn audio_path_swaps_extension() {
    let dir = temp_dir("audio_path");
    let v = variant(&dir, "page_000_panel_000_bubble_001");
    assert_eq!(
        audio_path_for(&v, Path::new("/audio"), "wav"),
        PathBuf::from("/audio/page_000_panel_000_bubble_001.wav")
    );
}

#[test]
fn matching_clip_sets_duration() {
    let dir = temp_dir("resolve_clip");
    write_clip(&dir.join("page_000_panel_000_bubble_001.wav"), 2.0);
    let v = variant(&dir, "page_000_panel_000_bubble_001");
    let secs = resolve_duration(&v, &dir, 0.5, "wav").unwrap();
    assert!((secs - 2.0).abs() < 1e-9);
}

#[test]
fn missing_clip_falls_back_to_default() {
    let dir = temp_dir("resolve_default");
    let v = variant(&dir, "page_000_panel_000_bubble_000");
    assert_eq!(resolve_duration(&v, &dir, 0.5, "wav").unwrap(), 0.5);
}

#[test]
fn corrupt_clip_is_fatal() {
    let dir = temp_dir("resolve_corrupt");
    std::fs::write(dir.join("page_000_panel_000_bubble_001.wav"), b"RIFFjunk").unwrap();
    let v = variant(&dir, "page_000_panel_000_bubble_001");
    let err = resolve_duration(&v, &dir, 0.5, "wav").unwrap_err();
    assert!(matches!(err, ReelError::Decode(_)));
}
