//! Narration audio: clip decoding, duration lookup and soundtrack assembly.

/// Clip lookup and durations.
pub mod duration;
/// WAV decoding, writing and resampling.
pub mod pcm;
/// Soundtrack concatenation.
pub mod track;
