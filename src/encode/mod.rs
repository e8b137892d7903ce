//! Video encoding sinks.
//!
//! Sinks consume composed canvas frames in output order.

/// `ffmpeg`-based sink (silent H.264 MP4 via the system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
