// File: src/core/post.rs
//! Whole-sequence passes run after every letter is resolved.
//!
//! These operate on the per-word phoneme lists, so cross-word effects (a
//! gemination reaching back into the previous word, a lengthening mark at a
//! word's first slot) are handled here rather than in the letter rules.

/// Index of the last phoneme slot strictly before `(word, index)`, searching
/// backwards across word boundaries.
fn prev_slot(words: &[Vec<String>], word: usize, index: usize) -> Option<(usize, usize)> {
    if index > 0 {
        return Some((word, index - 1));
    }
    let mut w = word;
    while w > 0 {
        w -= 1;
        if let Some(last) = words[w].len().checked_sub(1) {
            return Some((w, last));
        }
    }
    None
}

/// Fold a residual gemination marker into the preceding phoneme by doubling
/// it in place. `mark` is the shaddah's own configured output; when the
/// tables give it no output this pass has nothing to find and returns
/// immediately.
pub fn geminate(words: &mut [Vec<String>], mark: &str) {
    if mark.is_empty() {
        return;
    }
    for w in 0..words.len() {
        for i in 0..words[w].len() {
            if words[w][i] != mark {
                continue;
            }
            words[w][i].clear();
            if let Some((pw, pi)) = prev_slot(words, w, i) {
                let doubled = format!("{0}{0}", words[pw][pi]);
                words[pw][pi] = doubled;
            }
        }
    }
    for word in words.iter_mut() {
        word.retain(|p| !p.is_empty());
    }
}

/// Merge standalone ":" lengthening tokens into the vowel before them and
/// drop empty slots left behind by silent letters.
pub fn merge_long_vowels(words: &mut [Vec<String>]) {
    for w in 0..words.len() {
        for i in 0..words[w].len() {
            if words[w][i] != ":" {
                continue;
            }
            words[w][i].clear();
            if let Some((pw, pi)) = prev_slot(words, w, i) {
                if !words[pw][pi].ends_with(':') {
                    words[pw][pi].push(':');
                }
            }
        }
    }
    for word in words.iter_mut() {
        word.retain(|p| !p.is_empty());
    }
}

/// Split surviving tanween pairs into their short vowel and nasal.
pub fn split_tanween(words: &mut [Vec<String>]) {
    for word in words.iter_mut() {
        let mut out = Vec::with_capacity(word.len());
        for phoneme in word.drain(..) {
            match phoneme.as_str() {
                "an" | "un" | "in" => {
                    let (short, nasal) = phoneme.split_at(1);
                    out.push(short.to_string());
                    out.push(nasal.to_string());
                }
                _ => out.push(phoneme),
            }
        }
        *word = out;
    }
}

/// All passes, in their fixed order.
pub fn run_all(words: &mut [Vec<String>], shadda_mark: &str) {
    geminate(words, shadda_mark);
    merge_long_vowels(words);
    split_tanween(words);
}
