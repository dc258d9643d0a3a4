// File: src/core/loader.rs
//! Word-by-word database loading and reference-range resolution.
//!
//! Accepted reference formats, all 1-based and inclusive:
//!   "32"           whole surah
//!   "32:5"         one verse
//!   "32:5:3"       one word
//!   "32:5-32:8"    verse range, valid across surahs
//!   "32:5:3-33:1:2" word range, valid across verses/surahs

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::core::location::Location;
use crate::error::{PhonemizerError, Result};

fn rule_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?rule[^>]*?>").expect("static pattern"))
}

/// Remove embedded `<rule class=...>...</rule>` annotation spans, keeping the
/// script text between them.
pub fn strip_rule_tags(text: &str) -> String {
    rule_tag_re().replace_all(text, "").into_owned()
}

fn is_verse_number(text: &str) -> bool {
    let stripped = text.trim();
    !stripped.is_empty() && stripped.chars().all(|c| ('\u{0660}'..='\u{0669}').contains(&c))
}

#[derive(Deserialize)]
struct DbEntry {
    text: String,
}

/// The word-by-word scripture database, indexed by location triple.
pub struct WordDatabase {
    entries: BTreeMap<(u32, u32, u32), String>,
}

impl WordDatabase {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| PhonemizerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|e| match e {
            PhonemizerError::Config(msg) => PhonemizerError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, DbEntry> = serde_json::from_str(json)
            .map_err(|e| PhonemizerError::Config(format!("word database: {e}")))?;
        let mut entries = BTreeMap::new();
        for (key, entry) in raw {
            let loc = Location::from_key(&key)?;
            // Verse-number markers are layout, not recitation.
            if is_verse_number(&strip_rule_tags(&entry.text)) {
                log::debug!("skipping verse-number entry at {loc}");
                continue;
            }
            entries.insert((loc.surah, loc.verse, loc.word), entry.text);
        }
        Ok(Self { entries })
    }

    pub fn text(&self, loc: Location) -> Option<&str> {
        self.entries
            .get(&(loc.surah, loc.verse, loc.word))
            .map(String::as_str)
    }

    /// Resolve a reference into the ordered list of locations it covers.
    /// A malformed reference or one selecting nothing is rejected up front.
    pub fn keys_for_reference(&self, reference: &str) -> Result<Vec<Location>> {
        let (start, end) = match reference.split_once('-') {
            Some((left, right)) => (parse_endpoint(left)?, parse_endpoint(right)?),
            None => {
                let single = parse_endpoint(reference)?;
                (single, single)
            }
        };
        let lo = canonicalize(start, false);
        let hi = canonicalize(end, true);

        let selected: Vec<Location> = self
            .entries
            .range(lo..=hi)
            .map(|(&(s, v, w), _)| Location::new(s, v, w))
            .collect();

        if selected.is_empty() {
            return Err(PhonemizerError::InvalidReference(reference.to_string()));
        }
        Ok(selected)
    }
}

/// (surah, verse, word) with trailing components optional.
type Endpoint = (u32, Option<u32>, Option<u32>);

fn parse_endpoint(spec: &str) -> Result<Endpoint> {
    let bad = || PhonemizerError::InvalidReference(spec.to_string());
    let parts: Vec<u32> = spec
        .split(':')
        .map(|p| p.trim().parse::<u32>().map_err(|_| bad()))
        .collect::<Result<_>>()?;
    match parts.as_slice() {
        [s] => Ok((*s, None, None)),
        [s, v] => Ok((*s, Some(*v), None)),
        [s, v, w] => Ok((*s, Some(*v), Some(*w))),
        _ => Err(bad()),
    }
}

fn canonicalize(ep: Endpoint, is_end: bool) -> (u32, u32, u32) {
    let fill = if is_end { u32::MAX } else { 0 };
    let (s, v, w) = ep;
    (s, v.unwrap_or(fill), w.unwrap_or(fill))
}

#[derive(Deserialize)]
struct SpecialWordEntry {
    text: String,
    phonemes: Vec<String>,
    locations: Vec<String>,
}

#[derive(Deserialize)]
struct SpecialWordsFile {
    #[serde(default)]
    special_words: Vec<SpecialWordEntry>,
}

/// Irregular pronunciations that defeat the general rules, looked up by
/// location key.
#[derive(Default)]
pub struct SpecialWords {
    by_location: HashMap<(u32, u32, u32), Vec<String>>,
}

const BUNDLED_SPECIAL: &str = include_str!("../../data/special_words.json");

impl SpecialWords {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| PhonemizerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: SpecialWordsFile = serde_json::from_str(json)
            .map_err(|e| PhonemizerError::Config(format!("special words: {e}")))?;
        let mut by_location = HashMap::new();
        for entry in file.special_words {
            for key in &entry.locations {
                let loc = Location::from_key(key)?;
                log::debug!("special pronunciation for '{}' at {loc}", entry.text);
                by_location.insert((loc.surah, loc.verse, loc.word), entry.phonemes.clone());
            }
        }
        Ok(Self { by_location })
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_SPECIAL)
    }

    pub fn phonemes_at(&self, loc: Location) -> Option<&[String]> {
        self.by_location
            .get(&(loc.surah, loc.verse, loc.word))
            .map(Vec::as_slice)
    }
}
