use std::path::Path;

use crate::audio::pcm::{AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, decode_wav, resample_linear};
use crate::foundation::error::ReelResult;
use crate::plan::FramePlan;

/// One soundtrack segment, aligned with one planned frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundtrackSegment {
    /// Start offset in sample frames.
    pub start_frame: usize,
    /// Length in sample frames.
    pub frames: usize,
    /// `false` when the segment is generated silence.
    pub voiced: bool,
}

/// Concatenated narration for a whole frame sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Soundtrack {
    pub pcm: AudioPcm,
    pub segments: Vec<SoundtrackSegment>,
}

impl Soundtrack {
    pub fn duration_secs(&self) -> f64 {
        self.pcm.duration_secs()
    }

    pub fn write_wav(&self, out_path: &Path) -> ReelResult<()> {
        crate::audio::pcm::write_wav(&self.pcm, out_path)
    }
}

/// Number of mix-rate sample frames covering `secs`.
pub fn silence_frames(secs: f64) -> usize {
    (secs * f64::from(MIX_SAMPLE_RATE)).round().max(0.0) as usize
}

/// Concatenate each plan's clip, or silence of its duration, in plan order.
///
/// Clips are converted to the mix format (48 kHz stereo) before being appended.
pub fn build_soundtrack(plans: &[FramePlan]) -> ReelResult<Soundtrack> {
    let ch = usize::from(MIX_CHANNELS);
    let mut samples = Vec::<f32>::new();
    let mut segments = Vec::with_capacity(plans.len());

    for plan in plans {
        let start_frame = samples.len() / ch;
        let voiced = match &plan.clip {
            Some(path) => {
                let clip = decode_wav(path)?;
                let mixed = resample_linear(&clip, MIX_SAMPLE_RATE, MIX_CHANNELS);
                samples.extend_from_slice(&mixed.interleaved_f32);
                true
            }
            None => {
                let frames = silence_frames(plan.duration_secs);
                samples.resize(samples.len() + frames * ch, 0.0);
                false
            }
        };
        segments.push(SoundtrackSegment {
            start_frame,
            frames: samples.len() / ch - start_frame,
            voiced,
        });
    }

    Ok(Soundtrack {
        pcm: AudioPcm {
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
            interleaved_f32: samples,
        },
        segments,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
