// File: src/core/engine.rs
//! Single-pass resolution engine.
//!
//! Letters are resolved in reading order. A rule may reach ahead and resolve
//! a later letter early (an assimilation target); the driver skips anything
//! already resolved, so a second pass over the same graph changes nothing.

use crate::core::registry::PhonemeRegistry;
use crate::core::rules;
use crate::core::symbols::{Diacritic, DiacriticKind, LetterKind, SILENT_ALWAYS};
use crate::core::word::{LetterRef, WordGraph};
use crate::error::{PhonemizerError, Result};

pub struct Engine<'a> {
    pub(crate) registry: &'a PhonemeRegistry,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a PhonemeRegistry) -> Self {
        Self { registry }
    }

    /// Resolve every unresolved letter of one word, in order. Words with a
    /// fixed pronunciation are left untouched.
    pub fn resolve_word(&self, g: &mut WordGraph, word_index: usize) -> Result<()> {
        if g.words[word_index].fixed_phonemes.is_some() {
            return Ok(());
        }
        for letter_index in 0..g.words[word_index].letters.len() {
            let r = LetterRef {
                word: word_index,
                letter: letter_index,
            };
            if g.letter(r).is_resolved {
                continue;
            }
            let phonemes = self.phonemize_at(g, r)?;
            g.letter_mut(r).mark_resolved(phonemes, None);
        }
        Ok(())
    }

    /// Produce the phoneme output for one letter: rewrite its marks at a
    /// recitation boundary, dispatch on letter kind, then append the
    /// diacritic contribution.
    pub(crate) fn phonemize_at(&self, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
        self.prepare_boundary(g, r);

        let kind = g.letter(r).kind;
        let mut phonemes = match kind {
            LetterKind::Noon => rules::noon(self, g, r)?,
            LetterKind::Meem => rules::meem(self, g, r)?,
            LetterKind::Qalqala => rules::qalqala(self, g, r)?,
            LetterKind::Raa => rules::raa(self, g, r)?,
            LetterKind::Lam => rules::lam(self, g, r)?,
            LetterKind::HamzaWasl => rules::hamza_wasl(self, g, r)?,
            LetterKind::TaaMarbuta => rules::taa_marbuta(self, g, r)?,
            LetterKind::LongVowel(vowel) => rules::long_vowel(self, g, r, vowel)?,
            LetterKind::Default => self.default_letter(g, r),
        };
        phonemes.extend(self.modifiers(g, r)?);
        Ok(phonemes)
    }

    /// Neutralize the marks recitation drops at an utterance edge: no
    /// gemination on the first spoken letter, and no final short vowel or
    /// tanween when pausing. Long-vowel letters keep their bare form so the
    /// lengthening still sounds at the pause.
    fn prepare_boundary(&self, g: &mut WordGraph, r: LetterRef) {
        let starting = g.word_of(r).is_starting;
        let stopping = g.word_of(r).is_stopping;

        if starting && g.is_first_in_word(r) {
            g.letter_mut(r).has_shaddah = false;
        }
        if stopping && g.is_last_in_word(r) {
            let letter = g.letter_mut(r);
            match (letter.ch, letter.diacritic_kind()) {
                ('ء', Some(DiacriticKind::Fathatan)) => {
                    letter.diacritic = Some(Diacritic::synthetic_fatha());
                }
                (_, Some(k)) if k.is_sukun() => {}
                // Vowel letters lose their diacritic entirely, so a bare
                // waw/yaa still lengthens a compatible vowel at the pause.
                _ if matches!(letter.kind, LetterKind::LongVowel(_)) => {
                    letter.diacritic = None;
                }
                _ => {
                    letter.diacritic = Some(Diacritic::synthetic_sukun());
                }
            }
        }
    }

    /// Resolve an assimilation target ahead of the cursor with its own
    /// ordinary output, recording which letter consumed it.
    pub(crate) fn resolve_trigger(
        &self,
        g: &mut WordGraph,
        trigger: LetterRef,
        by: LetterRef,
    ) -> Result<()> {
        let phonemes = self.phonemize_at(g, trigger)?;
        g.letter_mut(trigger).mark_resolved(phonemes, Some(by));
        Ok(())
    }

    /// Merge an idgham target into a single nasalized articulation: the
    /// gemination mark is discarded and the base consonant is swapped for
    /// its nasal counterpart, followed by the target's own vowel.
    pub(crate) fn nasalize_trigger(
        &self,
        g: &mut WordGraph,
        trigger: LetterRef,
        by: LetterRef,
    ) -> Result<()> {
        g.letter_mut(trigger).has_shaddah = false;
        let base = g.letter(trigger).base.clone();
        let nasal = self
            .registry
            .rule_map_phoneme("idgham", "nasalized_map", &base)?
            .map(str::to_owned)
            .unwrap_or(base);
        let mut phonemes = vec![nasal];
        phonemes.extend(self.modifiers(g, trigger)?);
        g.letter_mut(trigger).mark_resolved(phonemes, Some(by));
        Ok(())
    }

    /// Base articulation with gemination applied. An unmarked letter is
    /// silent, except alef-madda whose base already carries its vowel.
    pub(crate) fn default_letter(&self, g: &WordGraph, r: LetterRef) -> Vec<String> {
        let letter = g.letter(r);
        if letter.base.is_empty() || letter.has_other(SILENT_ALWAYS) {
            return Vec::new();
        }
        if letter.diacritic.is_none() && !letter.has_shaddah {
            if letter.name == "ALEF_MADDA" {
                return vec![letter.base.clone()];
            }
            return Vec::new();
        }
        let base = letter.base.clone();
        vec![self.apply_shaddah(g, r, &base)]
    }

    /// Geminate a consonant phoneme when its letter carries shaddah.
    pub(crate) fn apply_shaddah(&self, g: &WordGraph, r: LetterRef, phoneme: &str) -> String {
        if g.letter(r).has_shaddah {
            format!("{phoneme}{phoneme}")
        } else {
            phoneme.to_string()
        }
    }

    /// Diacritic contribution appended after the base articulation: nothing
    /// for sukun, the short vowel (lengthened when an extension mark sits on
    /// the letter), or the expanded tanween.
    pub(crate) fn modifiers(&self, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
        let Some(diacritic) = g.letter(r).diacritic.clone() else {
            return Ok(Vec::new());
        };
        match diacritic.kind {
            DiacriticKind::Sukun => Ok(Vec::new()),
            DiacriticKind::Fatha | DiacriticKind::Damma | DiacriticKind::Kasra => {
                if g.letter(r).extension.is_some() {
                    Ok(vec![format!("{}:", diacritic.phoneme)])
                } else {
                    Ok(vec![diacritic.phoneme])
                }
            }
            DiacriticKind::Fathatan | DiacriticKind::Dammatan | DiacriticKind::Kasratan => {
                self.apply_tanween(g, r, &diacritic)
            }
        }
    }

    /// Expand tanween into its short vowel plus a final nasal, rewritten by
    /// whatever consonant follows across the word boundary.
    fn apply_tanween(
        &self,
        g: &mut WordGraph,
        r: LetterRef,
        diacritic: &Diacritic,
    ) -> Result<Vec<String>> {
        let mut chars = diacritic.phoneme.chars();
        let short = chars.next();
        let nasal: String = chars.collect();
        let Some(short) = short.filter(|_| !nasal.is_empty()) else {
            return Err(PhonemizerError::Config(format!(
                "tanween diacritic '{}' must map to a vowel plus a nasal, got '{}'",
                diacritic.ch, diacritic.phoneme
            )));
        };
        let short = short.to_string();

        let mut target = g.next_letter(r, 1);

        // A bare alef (or alef-maksura) written after tanween is a seat, not
        // a sound. Pausing turns the tanween into its long vowel; otherwise
        // the rewrite looks one letter further.
        if let Some(t) = target {
            let seat = g.letter(t);
            if matches!(seat.ch, 'ا' | 'ى') && seat.diacritic.is_none() && !seat.is_resolved {
                g.letter_mut(t).mark_resolved(Vec::new(), Some(r));
                if g.word_of(r).is_stopping {
                    return Ok(vec![format!("{short}:")]);
                }
                target = g.next_letter(r, 2);
            }
        }

        let Some(t) = target else {
            return Ok(vec![format!("{short}:")]);
        };

        let next = g.letter(t);
        if next.ch == 'ب' {
            let iqlab = self.registry.rule_phoneme("iqlab", "phoneme")?.to_string();
            return Ok(vec![short, iqlab]);
        }
        if next.is_ikhfaa_trigger() {
            let key = if next.is_heavy() {
                "heavy_phoneme"
            } else {
                "light_phoneme"
            };
            let hidden = self.registry.rule_phoneme("ikhfaa", key)?.to_string();
            return Ok(vec![short, hidden]);
        }
        if next.is_idgham_ghunnah_trigger() {
            self.nasalize_trigger(g, t, r)?;
            return Ok(vec![short]);
        }
        if matches!(next.ch, 'ل' | 'ر') {
            return Ok(vec![short]);
        }
        Ok(vec![short, nasal])
    }
}
