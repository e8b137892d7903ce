//! Reference-voice assignment for transcript speakers.
//!
//! A voice bank is a directory tree of `.wav` reference recordings. Recordings under `male/`
//! and `female/` form gendered sub-pools; a speaker named `<name>_male` or `<name>_female`
//! draws from the matching sub-pool and everyone else from the whole bank.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::foundation::error::{ReelError, ReelResult};
use crate::naming::natural_cmp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Gender encoded in the suffix after the speaker name's last `_`.
    pub fn from_speaker(speaker: &str) -> Option<Self> {
        match speaker.rsplit_once('_')?.1 {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    fn dir_name(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoiceBank {
    pub all: Vec<PathBuf>,
    pub male: Vec<PathBuf>,
    pub female: Vec<PathBuf>,
}

impl VoiceBank {
    /// Collect every `.wav` under `dir`, recursively, in natural path order.
    pub fn scan(dir: &Path) -> ReelResult<Self> {
        if !dir.is_dir() {
            return Err(ReelError::validation(format!(
                "voice bank '{}' is not a directory",
                dir.display()
            )));
        }
        let scan_pool = |sub: &Path| -> ReelResult<Vec<PathBuf>> {
            let mut files = Vec::new();
            if sub.is_dir() {
                collect_wavs(sub, &mut files)?;
            }
            files.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
            Ok(files)
        };
        let bank = Self {
            all: scan_pool(dir)?,
            male: scan_pool(&dir.join(Gender::Male.dir_name()))?,
            female: scan_pool(&dir.join(Gender::Female.dir_name()))?,
        };
        tracing::debug!(
            all = bank.all.len(),
            male = bank.male.len(),
            female = bank.female.len(),
            "scanned voice bank"
        );
        Ok(bank)
    }

    pub fn pool(&self, gender: Option<Gender>) -> &[PathBuf] {
        match gender {
            Some(Gender::Male) => &self.male,
            Some(Gender::Female) => &self.female,
            None => &self.all,
        }
    }
}

fn collect_wavs(dir: &Path, out: &mut Vec<PathBuf>) -> ReelResult<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read voice dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read entry in '{}'", dir.display()))?
            .path();
        if path.is_dir() {
            collect_wavs(&path, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Speaker → reference voice file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoiceAssignment {
    voices: BTreeMap<String, PathBuf>,
}

impl VoiceAssignment {
    pub fn get(&self, speaker: &str) -> Option<&Path> {
        self.voices.get(speaker).map(PathBuf::as_path)
    }

    pub fn insert(&mut self, speaker: impl Into<String>, voice: impl Into<PathBuf>) {
        self.voices.insert(speaker.into(), voice.into());
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.voices.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

/// Give each character a voice, preferring files no one else has.
///
/// Once a pool has no unused file left, characters reuse one from the full pool. The same
/// `seed` with the same inputs always yields the same assignment.
pub fn assign_voices(
    characters: &[String],
    bank: &VoiceBank,
    seed: u64,
) -> ReelResult<VoiceAssignment> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut used: HashSet<&Path> = HashSet::new();
    let mut out = VoiceAssignment::default();

    for character in characters {
        let gender = Gender::from_speaker(character);
        let pool = bank.pool(gender);
        if pool.is_empty() {
            return Err(ReelError::validation(format!(
                "no voices available for '{character}' ({} pool is empty)",
                gender.map_or("shared", Gender::dir_name)
            )));
        }

        let available: Vec<&PathBuf> = pool
            .iter()
            .filter(|p| !used.contains(p.as_path()))
            .collect();
        let voice = match available.choose(&mut rng) {
            Some(&voice) => {
                used.insert(voice.as_path());
                voice
            }
            None => {
                tracing::warn!(character, "voice pool exhausted, reusing a voice");
                pool.choose(&mut rng)
                    .ok_or_else(|| ReelError::validation("voice pool is empty"))?
            }
        };
        tracing::debug!(character, voice = %voice.display(), "assigned voice");
        out.insert(character.clone(), voice.clone());
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/voice/mod.rs"]
mod tests;
