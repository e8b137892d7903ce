use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate of the concatenated soundtrack.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
/// Channel count of the concatenated soundtrack.
pub const MIX_CHANNELS: u16 = 2;

/// Decoded interleaved PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    pub fn silence(sample_rate: u32, channels: u16, frames: usize) -> Self {
        Self {
            sample_rate,
            channels,
            interleaved_f32: vec![0.0; frames * usize::from(channels)],
        }
    }

    /// Sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.interleaved_f32.len() / usize::from(self.channels.max(1))
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Fully decode a WAV file. Every sample is read so that truncated or corrupt data fails here.
pub fn decode_wav(path: &Path) -> ReelResult<AudioPcm> {
    let mut reader = hound::WavReader::open(path).map_err(|e| {
        ReelError::decode(format!("failed to open audio '{}': {e}", path.display()))
    })?;
    let spec = reader.spec();
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(ReelError::decode(format!(
            "audio '{}' declares zero channels or sample rate",
            path.display()
        )));
    }

    let read_err =
        |e: hound::Error| ReelError::decode(format!("corrupt audio '{}': {e}", path.display()));
    let interleaved_f32: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(read_err)?
        }
    };

    if !interleaved_f32
        .len()
        .is_multiple_of(usize::from(spec.channels))
    {
        return Err(ReelError::decode(format!(
            "audio '{}' ends in a partial sample frame",
            path.display()
        )));
    }

    Ok(AudioPcm {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        interleaved_f32,
    })
}

/// Write interleaved `f32` PCM as a 32-bit float WAV file.
pub fn write_wav(pcm: &AudioPcm, out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::encode(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let spec = hound::WavSpec {
        channels: pcm.channels,
        sample_rate: pcm.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let write_err = |e: hound::Error| {
        ReelError::encode(format!(
            "failed to write audio '{}': {e}",
            out_path.display()
        ))
    };
    let mut writer = hound::WavWriter::create(out_path, spec).map_err(write_err)?;
    for &sample in &pcm.interleaved_f32 {
        writer.write_sample(sample).map_err(write_err)?;
    }
    writer.finalize().map_err(write_err)
}

/// Linearly resample `pcm` to `sample_rate`, mapping channels onto mono or stereo output.
///
/// Mono sources are duplicated to both stereo channels; sources with more than two channels
/// contribute their first two.
pub fn resample_linear(pcm: &AudioPcm, sample_rate: u32, channels: u16) -> AudioPcm {
    let src_frames = pcm.frames();
    let out_frames = if pcm.sample_rate == 0 {
        0
    } else {
        ((src_frames as u128 * u128::from(sample_rate) + u128::from(pcm.sample_rate) / 2)
            / u128::from(pcm.sample_rate)) as usize
    };
    let out_ch = usize::from(channels.max(1));
    let mut out = vec![0.0f32; out_frames * out_ch];
    if src_frames == 0 {
        return AudioPcm {
            sample_rate,
            channels,
            interleaved_f32: out,
        };
    }

    let src = &pcm.interleaved_f32;
    let src_ch = usize::from(pcm.channels);
    let ratio = f64::from(pcm.sample_rate) / f64::from(sample_rate);

    for frame in 0..out_frames {
        let src_pos = frame as f64 * ratio;
        let f0 = (src_pos.floor() as usize).min(src_frames - 1);
        let f1 = (f0 + 1).min(src_frames - 1);
        let frac = (src_pos - f0 as f64) as f32;

        let sample = |f: usize, c: usize| src[f * src_ch + c.min(src_ch - 1)];
        let lerp = |c: usize| {
            let v0 = sample(f0, c);
            let v1 = sample(f1, c);
            v0 + (v1 - v0) * frac
        };

        let dst = frame * out_ch;
        if out_ch == 1 {
            out[dst] = if src_ch == 1 {
                lerp(0)
            } else {
                (lerp(0) + lerp(1)) * 0.5
            };
        } else {
            out[dst] = lerp(0);
            out[dst + 1] = lerp(1);
        }
    }

    AudioPcm {
        sample_rate,
        channels,
        interleaved_f32: out,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pcm.rs"]
mod tests;
