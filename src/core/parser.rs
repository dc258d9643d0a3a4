// File: src/core/parser.rs
//! Character-to-symbol parsing and word graph construction.

use std::collections::HashSet;

use crate::core::loader::{strip_rule_tags, SpecialWords, WordDatabase};
use crate::core::location::Location;
use crate::core::registry::{PhonemeRegistry, SymbolCategory};
use crate::core::symbols::{
    Diacritic, DiacriticKind, Extension, OtherSymbol, StopKind, StopSign, StopType, SHADDA,
};
use crate::core::word::{Letter, Word, WordGraph};
use crate::error::{PhonemizerError, Result};

pub struct Parser<'a> {
    registry: &'a PhonemeRegistry,
}

impl<'a> Parser<'a> {
    pub fn new(registry: &'a PhonemeRegistry) -> Self {
        Self { registry }
    }

    /// Parse one word's raw text into a `Word` with correctly attached
    /// diacritics, extensions, shaddah and other marks.
    ///
    /// Scan left to right: a stop mark becomes the word's pause sign, a
    /// letter opens a bounded lookahead that consumes the marks attached to
    /// it, and anything else is folded into the nearest letter (or a fresh
    /// placeholder when no letter exists yet) so no input character is
    /// silently dropped.
    pub fn parse_word(&self, raw_text: &str, location: Location) -> Result<Word> {
        let stripped = strip_rule_tags(raw_text);
        let mut word = Word::new(location, stripped.clone());
        let chars: Vec<char> = stripped.chars().collect();

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];
            if ch.is_whitespace() {
                i += 1;
                continue;
            }

            match self.registry.lookup(ch) {
                Some(spec) if spec.category == SymbolCategory::StopSign => {
                    let kind = StopKind::from_name(&spec.name).ok_or_else(|| {
                        PhonemizerError::Config(format!("unknown stop sign name '{}'", spec.name))
                    })?;
                    word.stop_sign = Some(StopSign { kind, ch });
                    i += 1;
                }
                Some(spec) if spec.category == SymbolCategory::Letter => {
                    let mut letter =
                        Letter::new(ch, spec.name.clone(), spec.phoneme.clone(), word.letters.len());
                    i += 1;
                    i = self.attach_marks(&chars, i, &mut letter)?;
                    word.letters.push(letter);
                }
                _ => {
                    // Unassociated mark or out-of-catalog character: keep it
                    // as a silent "other" symbol.
                    let name = self
                        .registry
                        .lookup(ch)
                        .map(|s| s.name.clone())
                        .unwrap_or_default();
                    if name.is_empty() {
                        log::debug!("unknown character U+{:04X} at {location}", ch as u32);
                    }
                    let other = OtherSymbol { name, ch };
                    match word.letters.last_mut() {
                        Some(letter) => letter.others.push(other),
                        None => {
                            let mut placeholder =
                                Letter::new(ch, String::new(), String::new(), 0);
                            placeholder.others.push(other);
                            word.letters.push(placeholder);
                        }
                    }
                    i += 1;
                }
            }
        }

        Ok(word)
    }

    /// Consume the run of diacritic/extension/shaddah/other characters that
    /// belongs to the letter just opened. Stops at the next letter, stop
    /// sign, or unrecognized character.
    fn attach_marks(&self, chars: &[char], mut i: usize, letter: &mut Letter) -> Result<usize> {
        while i < chars.len() {
            let ch = chars[i];
            let Some(spec) = self.registry.lookup(ch) else {
                break;
            };
            match spec.category {
                SymbolCategory::Diacritic => {
                    let kind = DiacriticKind::from_name(&spec.name).ok_or_else(|| {
                        PhonemizerError::Config(format!("unknown diacritic name '{}'", spec.name))
                    })?;
                    letter.diacritic = Some(Diacritic {
                        kind,
                        ch,
                        phoneme: spec.phoneme.clone(),
                    });
                }
                SymbolCategory::Extension => {
                    letter.extension = Some(Extension {
                        name: spec.name.clone(),
                        ch,
                    });
                }
                SymbolCategory::Other if spec.name == SHADDA => {
                    letter.has_shaddah = true;
                }
                SymbolCategory::Other => {
                    letter.others.push(OtherSymbol {
                        name: spec.name.clone(),
                        ch,
                    });
                }
                SymbolCategory::Letter | SymbolCategory::StopSign => break,
            }
            i += 1;
        }
        Ok(i)
    }

    /// Build the linked word graph for a resolved reference range: parse
    /// every word (special-cased fixed pronunciations bypass parsing), then
    /// set the recitation boundary flags from the stop-type selection.
    pub fn build_graph(
        &self,
        locations: &[Location],
        db: &WordDatabase,
        special: &SpecialWords,
        stops: &[StopType],
    ) -> Result<WordGraph> {
        let mut words = Vec::with_capacity(locations.len());
        for &loc in locations {
            let Some(raw) = db.text(loc) else { continue };
            if let Some(phonemes) = special.phonemes_at(loc) {
                let mut word = Word::new(loc, strip_rule_tags(raw));
                word.fixed_phonemes = Some(phonemes.to_vec());
                words.push(word);
            } else {
                words.push(self.parse_word(raw, loc)?);
            }
        }
        annotate_boundaries(&mut words, stops);
        Ok(WordGraph::new(words))
    }
}

/// Set is_starting / is_stopping: the first word of the range always starts
/// and the last always stops; a word whose pause mark is in the selected set
/// stops (and its successor starts); verse edges count when "verse" is
/// selected.
fn annotate_boundaries(words: &mut [Word], stops: &[StopType]) {
    let Some(last) = words.len().checked_sub(1) else {
        return;
    };
    words[0].is_starting = true;
    words[last].is_stopping = true;

    let sign_kinds: HashSet<_> = stops
        .iter()
        .filter_map(|s| match s {
            StopType::Sign(kind) => Some(*kind),
            StopType::Verse => None,
        })
        .collect();

    for i in 0..words.len() {
        let stops_here = words[i]
            .stop_sign
            .as_ref()
            .is_some_and(|sign| sign_kinds.contains(&sign.kind));
        if stops_here {
            words[i].is_stopping = true;
            if i + 1 < words.len() {
                words[i + 1].is_starting = true;
            }
        }
    }

    if stops.contains(&StopType::Verse) {
        for i in 0..words.len() {
            let cur = words[i].location;
            let same_verse =
                |other: Location| (other.surah, other.verse) == (cur.surah, cur.verse);
            if i == 0 || !same_verse(words[i - 1].location) {
                words[i].is_starting = true;
            }
            if i + 1 == words.len() || !same_verse(words[i + 1].location) {
                words[i].is_stopping = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbols::{LetterKind, SILENT_ALWAYS};

    fn registry() -> PhonemeRegistry {
        PhonemeRegistry::bundled().unwrap()
    }

    fn parse(text: &str) -> Word {
        let reg = registry();
        Parser::new(&reg)
            .parse_word(text, Location::new(1, 1, 1))
            .unwrap()
    }

    #[test]
    fn bismi_structure() {
        let word = parse("بِسۡمِ");
        assert_eq!(word.letters.len(), 3);
        assert_eq!(word.letters[0].base, "b");
        assert_eq!(word.letters[0].diacritic_kind(), Some(DiacriticKind::Kasra));
        assert!(word.letters[1].has_sukun());
        assert_eq!(word.letters[2].diacritic_kind(), Some(DiacriticKind::Kasra));
        assert_eq!(word.letters[2].index_in_word, 2);
    }

    #[test]
    fn shaddah_and_stop_sign_attach() {
        let word = parse("ٱللَّهِۚ");
        assert_eq!(word.letters.len(), 4);
        assert!(word.letters[2].has_shaddah);
        assert_eq!(word.stop_sign.as_ref().unwrap().kind, StopKind::OptionalStop);
        assert_eq!(word.letters[0].kind, LetterKind::HamzaWasl);
    }

    #[test]
    fn silent_marks_fold_into_their_letter() {
        let word = parse("أُو۟لَٰٓئِكَ");
        let waw = &word.letters[1];
        assert_eq!(waw.ch, 'و');
        assert!(waw.has_other(SILENT_ALWAYS));
    }

    #[test]
    fn unknown_leading_character_becomes_placeholder() {
        let word = parse("؞بِ");
        assert_eq!(word.letters.len(), 2);
        assert!(word.letters[0].base.is_empty());
        assert_eq!(word.letters[1].base, "b");
    }

    #[test]
    fn boundary_flags_from_stop_signs() {
        let reg = registry();
        let parser = Parser::new(&reg);
        let mut words = vec![
            parser.parse_word("عَلِيمٌۚ", Location::new(2, 1, 1)).unwrap(),
            parser.parse_word("قَالَ", Location::new(2, 1, 2)).unwrap(),
            parser.parse_word("رَبِّ", Location::new(2, 2, 1)).unwrap(),
        ];
        annotate_boundaries(
            &mut words,
            &[StopType::Sign(StopKind::OptionalStop), StopType::Verse],
        );
        assert!(words[0].is_starting && words[0].is_stopping);
        assert!(words[1].is_starting);
        assert!(words[1].is_stopping); // verse edge
        assert!(words[2].is_starting && words[2].is_stopping);
    }
}
