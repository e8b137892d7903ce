//! Narration clip synthesis.
//!
//! Text-to-speech is an external collaborator behind [`SpeechSynthesizer`]; the crate only
//! decides which line gets which voice and where each clip lands so that the render driver
//! finds it by name.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::core::FrameKey;
use crate::foundation::error::{ReelError, ReelResult};
use crate::naming::NameFormat;
use crate::transcript::Transcript;
use crate::voice::VoiceAssignment;

/// Speaks `text` in the style of the `voice` reference recording into a WAV at `out`.
pub trait SpeechSynthesizer {
    fn synthesize(
        &mut self,
        text: &str,
        voice: &Path,
        language: &str,
        out: &Path,
    ) -> ReelResult<()>;
}

/// [`SpeechSynthesizer`] that runs an external program once per line.
///
/// Arguments may contain the placeholders `{text}`, `{voice}`, `{language}` and `{out}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSynthesizer {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSynthesizer {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Arguments with every placeholder substituted.
    pub fn expand_args(
        &self,
        text: &str,
        voice: &Path,
        language: &str,
        out: &Path,
    ) -> Vec<String> {
        let voice = voice.to_string_lossy();
        let out = out.to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace("{voice}", &voice)
                    .replace("{language}", language)
                    .replace("{out}", &out)
                    .replace("{text}", text)
            })
            .collect()
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn synthesize(
        &mut self,
        text: &str,
        voice: &Path,
        language: &str,
        out: &Path,
    ) -> ReelResult<()> {
        let output = Command::new(&self.program)
            .args(self.expand_args(text, voice, language, out))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ReelError::speech(format!("failed to spawn '{}': {e}", self.program))
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelError::speech(format!(
                "'{}' exited with status {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        if !out.is_file() {
            return Err(ReelError::speech(format!(
                "'{}' succeeded but wrote no clip at '{}'",
                self.program,
                out.display()
            )));
        }
        Ok(())
    }
}

/// A transcript line that got no clip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLine {
    pub page: u32,
    pub line: usize,
    pub speaker: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NarrationReport {
    pub clips: Vec<PathBuf>,
    pub skipped: Vec<SkippedLine>,
}

/// Path of the clip for line `line` (0-based) of `page`: the panel-0 frame with bubble
/// index `line + 1`.
pub fn clip_path_for(audio_dir: &Path, format: NameFormat, page: u32, line: usize) -> PathBuf {
    let key = FrameKey::new(page, 0, line as u32 + 1);
    audio_dir.join(format.file_name(key, ".wav"))
}

/// Synthesize one clip per transcript line into `audio_dir`.
///
/// Lines whose speaker has no voice are skipped with a warning; any synthesis failure aborts.
#[tracing::instrument(skip_all, fields(pages = transcript.pages.len(), out = %audio_dir.display()))]
pub fn narrate(
    transcript: &Transcript,
    voices: &VoiceAssignment,
    synth: &mut dyn SpeechSynthesizer,
    audio_dir: &Path,
    format: NameFormat,
    language: &str,
) -> ReelResult<NarrationReport> {
    std::fs::create_dir_all(audio_dir)
        .with_context(|| format!("create audio directory '{}'", audio_dir.display()))?;

    let mut report = NarrationReport::default();
    for page in &transcript.pages {
        let page_number = page.page_number()?;
        for (j, line) in page.lines.iter().enumerate() {
            let Some(voice) = voices.get(&line.speaker) else {
                tracing::warn!(
                    page = page_number,
                    line = j,
                    speaker = %line.speaker,
                    "speaker has no voice, skipping line"
                );
                report.skipped.push(SkippedLine {
                    page: page_number,
                    line: j,
                    speaker: line.speaker.clone(),
                });
                continue;
            };
            let out = clip_path_for(audio_dir, format, page_number, j);
            ensure_parent_dir(&out)?;
            tracing::debug!(speaker = %line.speaker, clip = %out.display(), "synthesizing");
            synth.synthesize(&line.text, voice, language, &out)?;
            report.clips.push(out);
        }
    }
    tracing::info!(
        clips = report.clips.len(),
        skipped = report.skipped.len(),
        "narration finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/speech/mod.rs"]
mod tests;
