// File: src/core/phonemizer.rs
//! Public facade tying the registry, database and engine together.

use std::path::Path;

use crate::core::engine::Engine;
use crate::core::loader::{SpecialWords, WordDatabase};
use crate::core::parser::Parser;
use crate::core::post;
use crate::core::registry::PhonemeRegistry;
use crate::core::result::PhonemizeResult;
use crate::core::symbols::StopType;
use crate::error::Result;

pub struct Phonemizer {
    registry: PhonemeRegistry,
    db: WordDatabase,
    special: SpecialWords,
}

impl Phonemizer {
    pub fn new(registry: PhonemeRegistry, db: WordDatabase, special: SpecialWords) -> Self {
        Self {
            registry,
            db,
            special,
        }
    }

    /// Load every table from explicit paths. Fails fast on any missing or
    /// malformed file.
    pub fn from_paths(
        base_path: &Path,
        rule_path: &Path,
        special_path: &Path,
        db_path: &Path,
    ) -> Result<Self> {
        let registry = PhonemeRegistry::from_files(base_path, rule_path)?;
        let special = SpecialWords::from_path(special_path)?;
        let db = WordDatabase::from_path(db_path)?;
        Ok(Self::new(registry, db, special))
    }

    /// Load a word database from disk and the phoneme tables bundled into
    /// the binary.
    pub fn with_bundled_tables(db_path: &Path) -> Result<Self> {
        let registry = PhonemeRegistry::bundled()?;
        let special = SpecialWords::bundled()?;
        let db = WordDatabase::from_path(db_path)?;
        Ok(Self::new(registry, db, special))
    }

    pub fn registry(&self) -> &PhonemeRegistry {
        &self.registry
    }

    /// Phonemize a reference ("2", "2:255", "1:1:1", or a "start-end"
    /// range of such keys) under the given pause selection.
    pub fn phonemize(&self, reference: &str, stops: &[StopType]) -> Result<PhonemizeResult> {
        let locations = self.db.keys_for_reference(reference)?;
        log::info!(
            "phonemizing {} ({} words, {} stop types)",
            reference,
            locations.len(),
            stops.len()
        );

        let parser = Parser::new(&self.registry);
        let mut graph = parser.build_graph(&locations, &self.db, &self.special, stops)?;

        let engine = Engine::new(&self.registry);
        for word_index in 0..graph.words.len() {
            engine.resolve_word(&mut graph, word_index)?;
        }

        let mut phonemes: Vec<Vec<String>> =
            graph.words.iter().map(|w| w.phonemes()).collect();
        let shadda_mark = self
            .registry
            .lookup('ّ')
            .map(|s| s.phoneme.clone())
            .unwrap_or_default();
        post::run_all(&mut phonemes, &shadda_mark);

        let text = graph.words.iter().map(|w| w.text.clone()).collect();
        Ok(PhonemizeResult {
            reference: reference.to_string(),
            text,
            locations: graph.words.iter().map(|w| w.location).collect(),
            phonemes,
        })
    }
}
