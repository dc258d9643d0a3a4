// File: src/core/rules.rs
//! Per-letter-kind rewrite rules.
//!
//! Each rule receives the whole graph plus the position of the letter under
//! the cursor, and returns the base articulation for that letter. Diacritic
//! output is appended by the engine afterwards, so a rule that falls through
//! to `default_letter` still gets its vowel.

use crate::core::engine::Engine;
use crate::core::symbols::{DiacriticKind, Extension, VowelKind, SILENT_ALWAYS, SILENT_AT_CONTINUATION};
use crate::core::word::{LetterRef, WordGraph};
use crate::error::{PhonemizerError, Result};

fn rule_gap(g: &WordGraph, r: LetterRef, detail: impl Into<String>) -> PhonemizerError {
    PhonemizerError::RuleGap {
        location: g.word_of(r).location.key(),
        detail: detail.into(),
    }
}

/// Noon: ghunnah under shaddah, otherwise the sakin rewrites driven by the
/// following consonant (iqlab, idgham, ikhfaa), izhar as the fallback.
pub(crate) fn noon(eng: &Engine, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
    let letter = g.letter(r);
    if letter.has_shaddah {
        let nasal = eng
            .registry
            .rule_map_phoneme("ghunnah", "nasalized_map", "n")?
            .ok_or_else(|| rule_gap(g, r, "no nasalized form for noon"))?
            .to_string();
        return Ok(vec![nasal]);
    }
    if letter.diacritic.is_some() {
        return Ok(eng.default_letter(g, r));
    }
    let base = letter.base.clone();
    let Some(t) = g.next_letter(r, 1) else {
        return Ok(vec![base]);
    };

    let next = g.letter(t);
    if next.ch == 'ب' {
        let iqlab = eng.registry.rule_phoneme("iqlab", "phoneme")?.to_string();
        eng.resolve_trigger(g, t, r)?;
        return Ok(vec![iqlab]);
    }
    if next.is_idgham_ghunnah_trigger() {
        eng.nasalize_trigger(g, t, r)?;
        return Ok(Vec::new());
    }
    if matches!(next.ch, 'ل' | 'ر') {
        // Idgham without ghunnah: the noon vanishes and the target keeps
        // its written gemination.
        return Ok(Vec::new());
    }
    if next.is_ikhfaa_trigger() {
        let key = if next.is_heavy() {
            "heavy_phoneme"
        } else {
            "light_phoneme"
        };
        let hidden = eng.registry.rule_phoneme("ikhfaa", key)?.to_string();
        eng.resolve_trigger(g, t, r)?;
        return Ok(vec![hidden]);
    }
    // Izhar before the throat letters.
    Ok(vec![base])
}

/// Meem: ghunnah under shaddah, the shafawi rewrites before baa and meem,
/// izhar otherwise.
pub(crate) fn meem(eng: &Engine, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
    let letter = g.letter(r);
    if letter.has_shaddah {
        let nasal = eng
            .registry
            .rule_map_phoneme("ghunnah", "nasalized_map", "m")?
            .ok_or_else(|| rule_gap(g, r, "no nasalized form for meem"))?
            .to_string();
        return Ok(vec![nasal]);
    }
    if letter.diacritic.is_some() {
        return Ok(eng.default_letter(g, r));
    }
    let base = letter.base.clone();
    let Some(t) = g.next_letter(r, 1) else {
        return Ok(vec![base]);
    };

    let next_ch = g.letter(t).ch;
    if next_ch == 'ب' {
        let hidden = eng
            .registry
            .rule_phoneme("ikhfaa", "shafawi_phoneme")?
            .to_string();
        eng.resolve_trigger(g, t, r)?;
        return Ok(vec![hidden]);
    }
    if next_ch == 'م' {
        eng.nasalize_trigger(g, t, r)?;
        return Ok(Vec::new());
    }
    Ok(vec![base])
}

/// Qalqala: an unvowelled qalqala letter gets an echo vowel, stronger at a
/// pause than mid-word.
pub(crate) fn qalqala(eng: &Engine, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
    let letter = g.letter(r);
    if !letter.has_sukun() {
        return Ok(eng.default_letter(g, r));
    }
    let at_pause = g.word_of(r).is_stopping && g.is_last_in_word(r);
    let echo = if at_pause {
        eng.registry.rule_phoneme("qalqala", "kubra")?
    } else {
        eng.registry.rule_phoneme("qalqala", "sughra")?
    }
    .to_string();
    let base = letter.base.clone();
    Ok(vec![eng.apply_shaddah(g, r, &base), echo])
}

/// Raa: heaviness follows the raa's own vowel, or when sakin the vowel of
/// the letter before it, walking back over stacked sukuns.
pub(crate) fn raa(eng: &Engine, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
    let letter = g.letter(r);
    match letter.diacritic_kind() {
        Some(
            DiacriticKind::Fatha
            | DiacriticKind::Damma
            | DiacriticKind::Fathatan
            | DiacriticKind::Dammatan,
        ) => heavy_raa(eng, g, r),
        Some(DiacriticKind::Kasra | DiacriticKind::Kasratan) => Ok(eng.default_letter(g, r)),
        Some(DiacriticKind::Sukun) => raa_from_context(eng, g, r),
        None => Ok(eng.default_letter(g, r)),
    }
}

fn heavy_raa(eng: &Engine, g: &WordGraph, r: LetterRef) -> Result<Vec<String>> {
    let heavy = eng.registry.rule_phoneme("raa_heavy", "phoneme")?.to_string();
    Ok(vec![eng.apply_shaddah(g, r, &heavy)])
}

fn raa_from_context(eng: &Engine, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
    let mut cursor = r;
    loop {
        let Some(prev) = g.prev_letter(cursor, 1) else {
            return Err(rule_gap(g, r, "sakin raa with no preceding letter"));
        };
        let prev_letter = g.letter(prev);
        match prev_letter.diacritic_kind() {
            Some(DiacriticKind::Fatha | DiacriticKind::Fathatan) => return heavy_raa(eng, g, r),
            Some(DiacriticKind::Damma | DiacriticKind::Dammatan) => return heavy_raa(eng, g, r),
            Some(DiacriticKind::Kasra | DiacriticKind::Kasratan) => {
                // Kasra before a sakin raa keeps it light unless a heavy
                // consonant follows the raa.
                let next_is_heavy = g
                    .next_letter(r, 1)
                    .is_some_and(|n| g.letter(n).is_heavy());
                return if next_is_heavy {
                    heavy_raa(eng, g, r)
                } else {
                    Ok(eng.default_letter(g, r))
                };
            }
            Some(DiacriticKind::Sukun) => {
                cursor = prev;
            }
            None => {
                return match prev_letter.ch {
                    'ٱ' | 'ا' | 'و' => heavy_raa(eng, g, r),
                    'ي' | 'ى' => Ok(eng.default_letter(g, r)),
                    _ => Err(rule_gap(
                        g,
                        r,
                        format!("cannot grade raa after bare '{}'", prev_letter.ch),
                    )),
                };
            }
        }
    }
}

/// Written shapes of the divine name, letter chars in reading order.
const ALLAH_PATTERNS: &[&[char]] = &[
    &['ء', 'ا', 'ل', 'ل', 'ه'],
    &['و', 'ٱ', 'ل', 'ل', 'ه'],
    &['ف', 'ٱ', 'ل', 'ل', 'ه'],
    &['ت', 'ٱ', 'ل', 'ل', 'ه'],
    &['و', 'ت', 'ٱ', 'ل', 'ل', 'ه'],
    &['ل', 'ل', 'ه'],
    &['و', 'ل', 'ل', 'ه'],
    &['ف', 'ل', 'ل', 'ه'],
    &['ب', 'ٱ', 'ل', 'ل', 'ه'],
    &['أ', 'ب', 'ٱ', 'ل', 'ل', 'ه'],
    &['ٱ', 'ل', 'ل', 'ه', 'م'],
    &['ٱ', 'ل', 'ل', 'ه'],
];

fn is_divine_name(g: &WordGraph, r: LetterRef) -> bool {
    let chars: Vec<char> = g.word_of(r).letters.iter().map(|l| l.ch).collect();
    ALLAH_PATTERNS.iter().any(|p| *p == chars.as_slice())
}

/// Lam: in the divine name the geminated lam lengthens its fatha and turns
/// heavy after a preceding "a" or "u" sound; everywhere else the lam is an
/// ordinary consonant.
pub(crate) fn lam(eng: &Engine, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
    let letter = g.letter(r);
    if !letter.has_shaddah || g.is_first_in_word(r) || !is_divine_name(g, r) {
        return Ok(eng.default_letter(g, r));
    }
    if g.letter(r).extension.is_none() {
        g.letter_mut(r).extension = Some(Extension {
            name: "DAGGER_ALEF".to_string(),
            ch: 'ٰ',
        });
    }
    let heavy = matches!(g.prev_phoneme(r), Some("a" | "a:" | "u"));
    if heavy {
        let phoneme = eng.registry.rule_phoneme("lam_heavy", "phoneme")?.to_string();
        // The heavy lam is already one long articulation; no doubling.
        Ok(vec![phoneme])
    } else {
        Ok(eng.default_letter(g, r))
    }
}

/// Hamzat-ul-wasl: pronounced with a harmonized vowel only at an utterance
/// start, silent otherwise. When silent it may force a repair on the sound
/// before it so two sakin sounds never meet.
pub(crate) fn hamza_wasl(eng: &Engine, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
    if !g.is_first_in_word(r) || !g.word_of(r).is_starting {
        repair_sakin_meeting(g, r);
        return Ok(Vec::new());
    }

    let glottal = eng.registry.rule_phoneme("ham_wasl", "phoneme")?.to_string();
    let word = g.word_of(r);
    if word.letters.get(1).is_some_and(|l| l.ch == 'ل') {
        // The definite article always opens with a fatha.
        return Ok(vec![glottal, "a".to_string()]);
    }
    let third = word
        .letters
        .get(2)
        .ok_or_else(|| rule_gap(g, r, "word too short to harmonize hamzat-ul-wasl"))?;
    match third.diacritic_kind() {
        Some(DiacriticKind::Damma | DiacriticKind::Dammatan) => Ok(vec![glottal, "u".to_string()]),
        Some(DiacriticKind::Fatha | DiacriticKind::Kasra) => Ok(vec![glottal, "i".to_string()]),
        other => Err(rule_gap(
            g,
            r,
            format!("cannot harmonize hamzat-ul-wasl over {other:?}"),
        )),
    }
}

/// A silent connecting hamza leaves the previous word's final sound exposed
/// to the consonant cluster that follows: a trailing tanween gains a kasra,
/// and a trailing long vowel is shortened.
fn repair_sakin_meeting(g: &mut WordGraph, r: LetterRef) {
    let Some((slot, index)) = g.find_prev_phoneme(r) else {
        return;
    };
    if g.letter(slot).has_tanween() {
        g.letter_mut(slot).phonemes.push("i".to_string());
        return;
    }
    let phoneme = g.letter(slot).phonemes[index].clone();
    if let Some(shortened) = phoneme.strip_suffix(':') {
        g.modify_prev_phoneme(r, shortened.to_string());
    }
}

/// Taa marbuta closes as "h" at a pause, elsewhere it is a plain "t".
pub(crate) fn taa_marbuta(eng: &Engine, g: &mut WordGraph, r: LetterRef) -> Result<Vec<String>> {
    if g.word_of(r).is_stopping && g.is_last_in_word(r) {
        return Ok(vec!["h".to_string()]);
    }
    Ok(eng.default_letter(g, r))
}

/// Bare alef, waw, yaa and alef-maksura lengthen a compatible short vowel
/// before them; with their own vowel or shaddah they are ordinary
/// consonants, and the explicit silence marks win over everything.
pub(crate) fn long_vowel(
    eng: &Engine,
    g: &mut WordGraph,
    r: LetterRef,
    vowel: VowelKind,
) -> Result<Vec<String>> {
    let letter = g.letter(r);
    if letter.has_other(SILENT_ALWAYS) {
        return Ok(Vec::new());
    }
    if letter.has_other(SILENT_AT_CONTINUATION) && !g.word_of(r).is_stopping {
        return Ok(Vec::new());
    }
    if letter.diacritic.is_some() || letter.has_shaddah {
        return Ok(eng.default_letter(g, r));
    }
    let compatible = match (vowel, g.prev_phoneme(r)) {
        (VowelKind::Alef, Some("a")) => true,
        (VowelKind::AlefMaksura, Some("a" | "i")) => true,
        (VowelKind::Waw, Some("u")) => true,
        (VowelKind::Ya, Some("i")) => true,
        _ => false,
    };
    if compatible {
        Ok(vec![":".to_string()])
    } else {
        Ok(eng.default_letter(g, r))
    }
}
