//! panelreel turns annotated manga pages into a narrated slideshow video.
//!
//! The pipeline runs in stages, each finishing before the next starts:
//!
//! - [`process_batch`] redacts essential text bubbles one by one and writes every intermediate
//!   image as a frame variant named `page_P_panel_N_bubble_B`
//! - [`build_transcript`], [`assign_voices`] and [`narrate`] produce one narration clip per
//!   dialogue line, named after the frame it accompanies
//! - [`render_video`] plans the frame sequence, composes a silent H.264 video through
//!   `ffmpeg` and muxes the concatenated narration onto it
#![forbid(unsafe_code)]

mod foundation;

/// Page annotation documents.
pub mod annotation;
/// Narration audio.
pub mod audio;
/// Page batch driver.
pub mod batch;
/// Canvas normalization and duration-driven frame repetition.
pub mod compose;
/// Video encoding sinks.
pub mod encode;
/// Audio/video multiplexing.
pub mod mux;
/// Frame variant naming and discovery.
pub mod naming;
/// Panel crops.
pub mod panel;
/// Frame plans and the render driver.
pub mod plan;
/// Bubble redaction.
pub mod redact;
/// Narration synthesis.
pub mod speech;
/// Transcript interchange format.
pub mod transcript;
/// Voice bank and voice assignment.
pub mod voice;

pub use crate::foundation::config::{LayoutMode, PipelineConfig, RedactionMode};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameKey, PixelRect};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::annotation::{PageAnnotation, PanelBox, TextBox};
pub use crate::audio::duration::{audio_path_for, clip_duration_secs, find_clip, resolve_duration};
pub use crate::audio::pcm::{AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, decode_wav, write_wav};
pub use crate::audio::track::{Soundtrack, SoundtrackSegment, build_soundtrack};
pub use crate::batch::{BatchReport, PagePair, PageReport, process_batch, process_page};
pub use crate::compose::{ComposeStats, compose, frame_repeat_count};
pub use crate::encode::ffmpeg::{EncodeConfig, FfmpegEncoder, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::mux::{FfmpegMuxer, MuxOpts, MuxOutput, Muxer, mux};
pub use crate::naming::{FrameVariant, NameFormat, compute_digit_width, list_variants};
pub use crate::plan::{FramePlan, RenderReport, plan_frames, render_into, render_video};
pub use crate::redact::{RedactedVariant, redact_sequence};
pub use crate::speech::{CommandSynthesizer, NarrationReport, SpeechSynthesizer, narrate};
pub use crate::transcript::{Transcript, TranscriptPage, build_transcript};
pub use crate::voice::{VoiceAssignment, VoiceBank, assign_voices};
