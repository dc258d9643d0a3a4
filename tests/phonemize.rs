// File: tests/phonemize.rs
//! End-to-end phonemization over a small hand-built word database.

use phonemizer_core::core::engine::Engine;
use phonemizer_core::core::loader::{SpecialWords, WordDatabase};
use phonemizer_core::core::parser::Parser;
use phonemizer_core::core::registry::PhonemeRegistry;
use phonemizer_core::{Phonemizer, PhonemizerError, StopKind, StopType};

fn database() -> WordDatabase {
    WordDatabase::from_json_str(
        r#"{
            "1:1:1":  { "text": "بِسۡمِ" },
            "1:1:2":  { "text": "ٱللَّهِ" },
            "1:1:3":  { "text": "ٱلرَّحۡمَٰنِ" },
            "1:1:4":  { "text": "ٱلرَّحِيمِ" },
            "1:2:1":  { "text": "ٱلۡحَمۡدُ" },
            "2:1:1":  { "text": "مِنۢ" },
            "2:1:2":  { "text": "بَعۡدِ" },
            "3:2:1":  { "text": "إِنَّ" },
            "3:2:2":  { "text": "ٱللَّهَ" },
            "4:1:1":  { "text": "قَدۡ" },
            "4:1:2":  { "text": "سَمِعَ" },
            "5:1:1":  { "text": "غَفُورًا" },
            "5:1:2":  { "text": "حَلِيمًا" },
            "5:2:1":  { "text": "ٱهۡدِنَا" },
            "6:1:1":  { "text": "لَهُم" },
            "6:1:2":  { "text": "مَّا" },
            "7:1:1":  { "text": "فِرۡعَوۡنَ" },
            "8:1:1":  { "text": "رَحۡمَةُ" },
            "8:1:2":  { "text": "لَكُمۡ" },
            "9:1:1":  { "text": "مِن" },
            "9:1:2":  { "text": "قَبۡلُ" },
            "10:1:1": { "text": "مِن" },
            "10:1:2": { "text": "رَّبِّهِمۡ" },
            "11:41:4": { "text": "مَجۡر۪ىٰهَا" },
            "12:1:1": { "text": "عَلِيمٌۚ" },
            "12:1:2": { "text": "قَالَ" },
            "13:1:1": { "text": "هُوَ" },
            "14:1:1": { "text": "رۡبِ" }
        }"#,
    )
    .unwrap()
}

fn phonemizer() -> Phonemizer {
    Phonemizer::new(
        PhonemeRegistry::bundled().unwrap(),
        database(),
        SpecialWords::bundled().unwrap(),
    )
}

fn seq(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn words(reference: &str, stops: &[StopType]) -> Vec<Vec<String>> {
    phonemizer().phonemize(reference, stops).unwrap().phonemes
}

const VERSE: &[StopType] = &[StopType::Verse];

#[test]
fn basmala() {
    let result = words("1:1:1-1:1:4", VERSE);
    assert_eq!(result[0], seq(&["b", "i", "s", "m", "i"]));
    assert_eq!(result[1], seq(&["ll", "a:", "h", "i"]));
    assert_eq!(result[2], seq(&["rˤrˤ", "a", "ħ", "m", "a:", "n", "i"]));
    assert_eq!(result[3], seq(&["rˤrˤ", "a", "ħ", "i:", "m"]));
}

#[test]
fn hamzat_wasl_spoken_at_utterance_start() {
    // The definite article opens with a fatha, and pausing on the final
    // dal releases the strong echo vowel.
    let result = words("1:2:1", VERSE);
    assert_eq!(result[0], seq(&["ʔ", "a", "l", "ħ", "a", "m", "d", "ᵊː"]));
}

#[test]
fn hamzat_wasl_harmonizes_with_third_letter() {
    let result = words("5:2:1", VERSE);
    assert_eq!(result[0], seq(&["ʔ", "i", "h", "d", "i", "n", "a:"]));
}

#[test]
fn iqlab_converts_noon_before_baa() {
    let result = words("2:1:1-2:1:2", VERSE);
    assert_eq!(result[0], seq(&["m", "i", "m̃"]));
    assert_eq!(result[1], seq(&["b", "a", "ʕ", "d", "ᵊː"]));
}

#[test]
fn ghunnah_on_doubled_noon_and_heavy_lam() {
    let result = words("3:2:1-3:2:2", VERSE);
    assert_eq!(result[0], seq(&["ʔ", "i", "ñ", "a"]));
    assert_eq!(result[1], seq(&["lˤ", "a:", "h"]));
}

#[test]
fn qalqala_minor_midword_major_at_pause() {
    let result = words("4:1:1-4:1:2", VERSE);
    assert_eq!(result[0], seq(&["q", "a", "d", "ᵊ"]));
    assert_eq!(result[1], seq(&["s", "a", "m", "i", "ʕ"]));

    let paused = words("4:1:1", VERSE);
    assert_eq!(paused[0], seq(&["q", "a", "d", "ᵊː"]));
}

#[test]
fn tanween_izhar_skips_the_seat_alef() {
    let result = words("5:1:1-5:1:2", VERSE);
    assert_eq!(result[0], seq(&["ɣ", "a", "f", "u:", "rˤ", "a", "n"]));
    // At the pause the tanween collapses into a plain long vowel.
    assert_eq!(result[1], seq(&["ħ", "a", "l", "i:", "m", "a:"]));
}

#[test]
fn meem_assimilates_into_following_meem() {
    let result = words("6:1:1-6:1:2", VERSE);
    assert_eq!(result[0], seq(&["l", "a", "h", "u"]));
    assert_eq!(result[1], seq(&["m̃", "a:"]));
}

#[test]
fn sakin_raa_stays_light_after_kasra() {
    let result = words("7:1:1", VERSE);
    assert_eq!(result[0], seq(&["f", "i", "r", "ʕ", "a", "w", "n"]));
}

#[test]
fn sakin_raa_without_a_preceding_letter_is_a_rule_gap() {
    let err = phonemizer().phonemize("14:1:1", VERSE).unwrap_err();
    assert!(matches!(err, PhonemizerError::RuleGap { .. }));
}

#[test]
fn taa_marbuta_closes_as_h_only_at_pause() {
    let joined = words("8:1:1-8:1:2", VERSE);
    assert_eq!(joined[0], seq(&["rˤ", "a", "ħ", "m", "a", "t", "u"]));
    assert_eq!(joined[1], seq(&["l", "a", "k", "u", "m"]));

    let paused = words("8:1:1", VERSE);
    assert_eq!(paused[0], seq(&["rˤ", "a", "ħ", "m", "a", "h"]));
}

#[test]
fn final_voweled_waw_lengthens_at_pause() {
    // Pausing on a word silences the last letter's vowel, and a vowel
    // letter then stretches the preceding short vowel instead.
    let result = words("13:1:1", VERSE);
    assert_eq!(result[0], seq(&["h", "u:"]));
}

#[test]
fn ikhfaa_hides_noon_before_qaf() {
    let result = words("9:1:1-9:1:2", VERSE);
    assert_eq!(result[0], seq(&["m", "i", "ŋˤ"]));
    assert_eq!(result[1], seq(&["q", "a", "b", "ᵊ", "l"]));
}

#[test]
fn idgham_without_ghunnah_drops_the_noon() {
    let result = words("10:1:1-10:1:2", VERSE);
    assert_eq!(result[0], seq(&["m", "i"]));
    assert_eq!(result[1], seq(&["rˤrˤ", "a", "bb", "i", "h", "i", "m"]));
}

#[test]
fn special_word_bypasses_the_rules() {
    let result = words("11:41:4", VERSE);
    assert_eq!(result[0], seq(&["m", "a", "d͡ʒ", "r", "e:", "h", "a:"]));
}

#[test]
fn selected_stop_sign_splits_the_utterance() {
    let stopped = words(
        "12:1:1-12:1:2",
        &[StopType::Sign(StopKind::OptionalStop)],
    );
    assert_eq!(stopped[0], seq(&["ʕ", "a", "l", "i:", "m"]));
    assert_eq!(stopped[1], seq(&["q", "a:", "l"]));

    // With the sign unselected, the tanween instead hides into the qaf.
    let joined = words("12:1:1-12:1:2", VERSE);
    assert_eq!(joined[0], seq(&["ʕ", "a", "l", "i:", "m", "u", "ŋˤ"]));
    assert_eq!(joined[1], seq(&["q", "a:", "l"]));
}

#[test]
fn phonemization_is_deterministic() {
    let first = phonemizer().phonemize("1:1:1-1:1:4", VERSE).unwrap();
    let second = phonemizer().phonemize("1:1:1-1:1:4", VERSE).unwrap();
    assert_eq!(first.phonemes, second.phonemes);
    assert_eq!(first.locations, second.locations);
}

#[test]
fn one_pass_resolves_every_letter_and_resolve_is_a_noop_after() {
    let registry = PhonemeRegistry::bundled().unwrap();
    let db = database();
    let special = SpecialWords::bundled().unwrap();
    let locations = db.keys_for_reference("1:1:1-1:1:4").unwrap();
    let parser = Parser::new(&registry);
    let mut graph = parser
        .build_graph(&locations, &db, &special, VERSE)
        .unwrap();

    let engine = Engine::new(&registry);
    for i in 0..graph.words.len() {
        engine.resolve_word(&mut graph, i).unwrap();
    }
    assert!(graph
        .words
        .iter()
        .flat_map(|w| &w.letters)
        .all(|l| l.is_resolved));

    let first: Vec<Vec<String>> = graph.words.iter().map(|w| w.phonemes()).collect();
    for i in 0..graph.words.len() {
        engine.resolve_word(&mut graph, i).unwrap();
    }
    let second: Vec<Vec<String>> = graph.words.iter().map(|w| w.phonemes()).collect();
    assert_eq!(first, second);
}

#[test]
fn flat_view_regroups_to_the_nested_view() {
    let result = phonemizer().phonemize("1:1:1-1:1:4", VERSE).unwrap();
    let mut flat = result.phonemes_flat().into_iter();
    let regrouped: Vec<Vec<String>> = result
        .phonemes_nested()
        .iter()
        .map(|word| flat.by_ref().take(word.len()).collect())
        .collect();
    assert_eq!(regrouped, result.phonemes);
}

#[test]
fn verse_reference_selects_the_whole_verse() {
    let result = phonemizer().phonemize("1:1", VERSE).unwrap();
    assert_eq!(result.locations.len(), 4);
}

#[test]
fn unknown_reference_is_rejected() {
    let err = phonemizer().phonemize("99", VERSE).unwrap_err();
    assert!(matches!(err, PhonemizerError::InvalidReference(_)));
}

#[test]
fn unknown_stop_type_is_rejected() {
    let err = StopType::parse("sometimes").unwrap_err();
    assert!(matches!(err, PhonemizerError::InvalidStopType(_)));
}
