//! Speaker-attributed transcript interchange format.
//!
//! ```text
//! <page>12<endpage>
//! <name>hero_male<endname>: We made it.
//! <name>unsure<endname>: ...
//! ```
//!
//! One dialogue line per essential text box, in detection order. The line's position within
//! its page is what pairs it with a frame: line `j` is narrated over the frame in which it is
//! the most recently revealed text.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context as _;
use regex::Regex;

use crate::annotation::PageAnnotation;
use crate::foundation::error::{ReelError, ReelResult};

/// Speaker used for text the detector could not attribute.
pub const UNKNOWN_SPEAKER: &str = "unsure";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptPage {
    pub id: String,
    pub lines: Vec<DialogueLine>,
}

impl TranscriptPage {
    /// The page id as a page number, for naming narration clips.
    pub fn page_number(&self) -> ReelResult<u32> {
        self.id.trim().parse().map_err(|_| {
            ReelError::transcript(format!("page id '{}' is not a page number", self.id))
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    pub pages: Vec<TranscriptPage>,
}

fn page_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<page>(.+?)<endpage>").expect("static page regex"))
}

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^<name>([^<]+)<endname>:\s*(.+)$").expect("static dialogue regex")
    })
}

impl Transcript {
    /// Parse transcript text. Speaker names are lowercased; dialogue before the first page
    /// header and lines outside the grammar are ignored.
    pub fn parse(text: &str) -> ReelResult<Self> {
        let mut pages: Vec<TranscriptPage> = Vec::new();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim_end();
            if line.starts_with("<page>") {
                let caps = page_re().captures(line).ok_or_else(|| {
                    ReelError::transcript(format!(
                        "line {}: malformed page header '{line}'",
                        lineno + 1
                    ))
                })?;
                pages.push(TranscriptPage {
                    id: caps[1].to_string(),
                    lines: Vec::new(),
                });
            } else if line.starts_with("<name>") {
                let Some(page) = pages.last_mut() else {
                    continue;
                };
                if let Some(caps) = line_re().captures(line) {
                    page.lines.push(DialogueLine {
                        speaker: caps[1].to_lowercase(),
                        text: caps[2].to_string(),
                    });
                }
            }
        }
        Ok(Self { pages })
    }

    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read transcript '{}'", path.display()))?;
        Self::parse(&text)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            let _ = writeln!(out, "<page>{}<endpage>", page.id);
            for line in &page.lines {
                let _ = writeln!(out, "<name>{}<endname>: {}", line.speaker, line.text);
            }
        }
        out
    }

    pub fn write(&self, path: &Path) -> ReelResult<()> {
        crate::encode::ffmpeg::ensure_parent_dir(path)?;
        std::fs::write(path, self.render())
            .with_context(|| format!("write transcript '{}'", path.display()))?;
        Ok(())
    }

    /// Distinct speakers, sorted.
    pub fn characters(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|p| &p.lines)
            .map(|l| l.speaker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Build a transcript from `(page_id, annotation)` pairs, one line per essential text.
pub fn build_transcript<'a>(
    pages: impl IntoIterator<Item = (&'a str, &'a PageAnnotation)>,
) -> ReelResult<Transcript> {
    let mut out = Transcript::default();
    for (id, ann) in pages {
        let mut lines = Vec::new();
        for (idx, &essential) in ann.is_essential_text.iter().enumerate() {
            if !essential {
                continue;
            }
            let text = ann.ocr.get(idx).ok_or_else(|| {
                ReelError::transcript(format!("page '{id}': no OCR text for text box {idx}"))
            })?;
            let speaker = ann.speaker_for(idx).unwrap_or(UNKNOWN_SPEAKER);
            lines.push(DialogueLine {
                speaker: speaker.to_string(),
                text: text.replace('\n', " "),
            });
        }
        out.pages.push(TranscriptPage {
            id: id.to_string(),
            lines,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/transcript/mod.rs"]
mod tests;
