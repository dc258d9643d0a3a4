// File: src/core/word.rs
//! The word/letter arena. Words own their letters in recitation order; all
//! cross-letter navigation works on stable indices instead of live
//! references, so rules can write ahead into not-yet-visited letters without
//! aliasing hazards.

use crate::core::location::Location;
use crate::core::symbols::{
    Diacritic, DiacriticKind, Extension, LetterKind, OtherSymbol, StopSign, HEAVY_LETTERS,
    IDGHAM_GHUNNAH_LETTERS, IDGHAM_LETTERS, IKHFAA_LETTERS,
};

/// Stable address of one letter inside a `WordGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterRef {
    pub word: usize,
    pub letter: usize,
}

/// One consonant or vowel letter with everything the parser attached to it,
/// plus its mutable resolution state.
#[derive(Debug, Clone)]
pub struct Letter {
    pub ch: char,
    pub name: String,
    pub base: String,
    pub kind: LetterKind,
    pub index_in_word: usize,
    pub diacritic: Option<Diacritic>,
    pub extension: Option<Extension>,
    pub others: Vec<OtherSymbol>,
    pub has_shaddah: bool,
    /// Computed output; written exactly once.
    pub phonemes: Vec<String>,
    pub is_resolved: bool,
    /// The neighbor whose rule produced this letter's output, if any.
    pub resolved_by: Option<LetterRef>,
}

impl Letter {
    pub fn new(ch: char, name: String, base: String, index_in_word: usize) -> Self {
        Self {
            ch,
            name,
            base,
            kind: LetterKind::classify(ch),
            index_in_word,
            diacritic: None,
            extension: None,
            others: Vec::new(),
            has_shaddah: false,
            phonemes: Vec::new(),
            is_resolved: false,
            resolved_by: None,
        }
    }

    pub fn mark_resolved(&mut self, phonemes: Vec<String>, resolved_by: Option<LetterRef>) {
        self.phonemes = phonemes;
        self.is_resolved = true;
        self.resolved_by = resolved_by;
    }

    pub fn diacritic_kind(&self) -> Option<DiacriticKind> {
        self.diacritic.as_ref().map(|d| d.kind)
    }

    pub fn has_sukun(&self) -> bool {
        matches!(self.diacritic_kind(), Some(k) if k.is_sukun())
    }

    pub fn has_tanween(&self) -> bool {
        matches!(self.diacritic_kind(), Some(k) if k.is_tanween())
    }

    pub fn has_other(&self, name: &str) -> bool {
        self.others.iter().any(|o| o.name == name)
    }

    pub fn is_heavy(&self) -> bool {
        HEAVY_LETTERS.contains(&self.ch)
    }

    pub fn is_ikhfaa_trigger(&self) -> bool {
        IKHFAA_LETTERS.contains(&self.ch)
    }

    pub fn is_idgham_trigger(&self) -> bool {
        IDGHAM_LETTERS.contains(&self.ch)
    }

    pub fn is_idgham_ghunnah_trigger(&self) -> bool {
        IDGHAM_GHUNNAH_LETTERS.contains(&self.ch)
    }
}

/// A single word: its letters, original text, optional pause mark and the
/// recitation boundary flags computed once after linking.
#[derive(Debug, Clone)]
pub struct Word {
    pub location: Location,
    pub text: String,
    pub letters: Vec<Letter>,
    pub stop_sign: Option<StopSign>,
    pub is_starting: bool,
    pub is_stopping: bool,
    /// Fixed pronunciation from the special-words table; bypasses the engine.
    pub fixed_phonemes: Option<Vec<String>>,
}

impl Word {
    pub fn new(location: Location, text: String) -> Self {
        Self {
            location,
            text,
            letters: Vec::new(),
            stop_sign: None,
            is_starting: false,
            is_stopping: false,
            fixed_phonemes: None,
        }
    }

    /// Collected phoneme stream for this word, in letter order.
    pub fn phonemes(&self) -> Vec<String> {
        if let Some(fixed) = &self.fixed_phonemes {
            return fixed.clone();
        }
        self.letters
            .iter()
            .flat_map(|l| l.phonemes.iter().cloned())
            .collect()
    }
}

/// An ordered range of words. Previous/next word is index arithmetic: the
/// parser emits words in strict location order and never reorders them.
#[derive(Debug, Default)]
pub struct WordGraph {
    pub words: Vec<Word>,
}

impl WordGraph {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    pub fn letter(&self, r: LetterRef) -> &Letter {
        &self.words[r.word].letters[r.letter]
    }

    pub fn letter_mut(&mut self, r: LetterRef) -> &mut Letter {
        &mut self.words[r.word].letters[r.letter]
    }

    pub fn word_of(&self, r: LetterRef) -> &Word {
        &self.words[r.word]
    }

    pub fn is_first_in_word(&self, r: LetterRef) -> bool {
        r.letter == 0
    }

    pub fn is_last_in_word(&self, r: LetterRef) -> bool {
        r.letter + 1 == self.words[r.word].letters.len()
    }

    /// The n-th following letter, crossing into later words when needed.
    /// Words with a fixed pronunciation have no letters and are skipped.
    pub fn next_letter(&self, r: LetterRef, n: usize) -> Option<LetterRef> {
        let mut remaining = n;
        let mut word = r.word;
        let mut letter = r.letter;
        while remaining > 0 {
            if letter + 1 < self.words[word].letters.len() {
                letter += 1;
            } else {
                word += 1;
                while word < self.words.len() && self.words[word].letters.is_empty() {
                    word += 1;
                }
                if word >= self.words.len() {
                    return None;
                }
                letter = 0;
            }
            remaining -= 1;
        }
        Some(LetterRef { word, letter })
    }

    /// The n-th preceding letter, crossing into earlier words when needed.
    pub fn prev_letter(&self, r: LetterRef, n: usize) -> Option<LetterRef> {
        let mut remaining = n;
        let mut word = r.word;
        let mut letter = r.letter;
        while remaining > 0 {
            if letter > 0 {
                letter -= 1;
            } else {
                loop {
                    if word == 0 {
                        return None;
                    }
                    word -= 1;
                    if !self.words[word].letters.is_empty() {
                        break;
                    }
                }
                letter = self.words[word].letters.len() - 1;
            }
            remaining -= 1;
        }
        Some(LetterRef { word, letter })
    }

    /// The letter holding the nearest preceding non-empty phoneme output and
    /// the index of that phoneme, searching backwards across words. Only
    /// already-resolved letters can match, which the left-to-right resolution
    /// order guarantees for every predecessor.
    pub fn find_prev_phoneme(&self, r: LetterRef) -> Option<(LetterRef, usize)> {
        let mut cur = r;
        while let Some(prev) = self.prev_letter(cur, 1) {
            let letter = self.letter(prev);
            if !letter.phonemes.is_empty() {
                return Some((prev, letter.phonemes.len() - 1));
            }
            cur = prev;
        }
        None
    }

    /// Last emitted phoneme before this letter, if any.
    pub fn prev_phoneme(&self, r: LetterRef) -> Option<&str> {
        self.find_prev_phoneme(r)
            .map(|(l, i)| self.letter(l).phonemes[i].as_str())
    }

    /// Rewrite the nearest preceding phoneme in place. Returns false when no
    /// earlier phoneme exists.
    pub fn modify_prev_phoneme(&mut self, r: LetterRef, new_phoneme: String) -> bool {
        if let Some((l, i)) = self.find_prev_phoneme(r) {
            self.letter_mut(l).phonemes[i] = new_phoneme;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> WordGraph {
        let mut w1 = Word::new(Location::new(1, 1, 1), "ab".into());
        w1.letters.push(Letter::new('ب', "BA".into(), "b".into(), 0));
        w1.letters.push(Letter::new('س', "SEEN".into(), "s".into(), 1));
        let mut w2 = Word::new(Location::new(1, 1, 2), "cd".into());
        w2.letters.push(Letter::new('م', "MEEM".into(), "m".into(), 0));
        WordGraph::new(vec![w1, w2])
    }

    #[test]
    fn navigation_crosses_word_boundaries() {
        let g = graph();
        let at = LetterRef { word: 0, letter: 1 };
        assert_eq!(g.next_letter(at, 1), Some(LetterRef { word: 1, letter: 0 }));
        assert_eq!(g.next_letter(at, 2), None);
        let back = LetterRef { word: 1, letter: 0 };
        assert_eq!(g.prev_letter(back, 1), Some(at));
        assert_eq!(g.prev_letter(back, 3), None);
    }

    #[test]
    fn prev_phoneme_skips_silent_letters() {
        let mut g = graph();
        g.letter_mut(LetterRef { word: 0, letter: 0 })
            .mark_resolved(vec!["b".into(), "i".into()], None);
        // the seen stays silent
        g.letter_mut(LetterRef { word: 0, letter: 1 })
            .mark_resolved(vec![], None);
        let at = LetterRef { word: 1, letter: 0 };
        assert_eq!(g.prev_phoneme(at), Some("i"));
        assert!(g.modify_prev_phoneme(at, "i:".into()));
        assert_eq!(g.prev_phoneme(at), Some("i:"));
    }
}
