// File: src/core/result.rs
//! Output container and export views.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::core::location::Location;
use crate::error::{PhonemizerError, Result};

/// The phonemization of one resolved reference: per-word phoneme lists in
/// reading order, alongside the locations and source text they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonemizeResult {
    pub reference: String,
    pub text: Vec<String>,
    pub locations: Vec<Location>,
    pub phonemes: Vec<Vec<String>>,
}

impl PhonemizeResult {
    /// Per-word view, one phoneme list per word.
    pub fn phonemes_nested(&self) -> &[Vec<String>] {
        &self.phonemes
    }

    /// Flat phoneme stream with word boundaries erased.
    pub fn phonemes_flat(&self) -> Vec<String> {
        self.phonemes.iter().flatten().cloned().collect()
    }

    /// Render the result as one string: phonemes joined by `phoneme_sep`,
    /// words by `word_sep`, and verses by `verse_sep`.
    pub fn joined(&self, phoneme_sep: &str, word_sep: &str, verse_sep: &str) -> String {
        let mut out = String::new();
        for (i, word) in self.phonemes.iter().enumerate() {
            if i > 0 {
                let prev = self.locations[i - 1];
                let cur = self.locations[i];
                if (prev.surah, prev.verse) != (cur.surah, cur.verse) {
                    out.push_str(verse_sep);
                } else {
                    out.push_str(word_sep);
                }
            }
            out.push_str(&word.join(phoneme_sep));
        }
        out
    }

    /// Write the result as JSON, atomically: serialize into a temp file in
    /// the target directory, then rename over the destination.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let parent_dir = parent_dir.unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir).map_err(|source| PhonemizerError::Io {
            path: parent_dir.to_path_buf(),
            source,
        })?;

        let temp_file = NamedTempFile::new_in(parent_dir).map_err(|source| PhonemizerError::Io {
            path: parent_dir.to_path_buf(),
            source,
        })?;
        let writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(writer, self).map_err(|source| {
            PhonemizerError::MalformedTable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        temp_file.persist(path).map_err(|e| PhonemizerError::Io {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PhonemizeResult {
        PhonemizeResult {
            reference: "1:1:1-1:2:1".to_string(),
            text: vec!["a".into(), "b".into(), "c".into()],
            locations: vec![
                Location::new(1, 1, 1),
                Location::new(1, 1, 2),
                Location::new(1, 2, 1),
            ],
            phonemes: vec![
                vec!["b".into(), "i".into()],
                vec!["s".into(), "m".into()],
                vec!["i".into()],
            ],
        }
    }

    #[test]
    fn joined_marks_word_and_verse_breaks() {
        let result = sample();
        assert_eq!(result.joined("", " ", " | "), "bi sm | i");
    }

    #[test]
    fn flat_view_erases_word_boundaries() {
        assert_eq!(
            sample().phonemes_flat(),
            vec!["b", "i", "s", "m", "i"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let result = sample();
        result.save(&path).unwrap();
        let loaded: PhonemizeResult =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.reference, result.reference);
        assert_eq!(loaded.phonemes, result.phonemes);
    }
}
