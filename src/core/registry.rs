// File: src/core/registry.rs
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PhonemizerError, Result};

/// Which section of the base table a script character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolCategory {
    Letter,
    Diacritic,
    Extension,
    StopSign,
    Other,
}

/// One entry of the base table: a named script character with its (possibly
/// empty) base phoneme.
#[derive(Debug, Clone)]
pub struct SymbolSpec {
    pub name: String,
    pub category: SymbolCategory,
    pub ch: char,
    pub phoneme: String,
}

#[derive(Deserialize)]
struct RawEntry {
    char: String,
    #[serde(default)]
    phoneme: String,
}

#[derive(Deserialize)]
struct RawBaseTable {
    #[serde(default)]
    letters: BTreeMap<String, RawEntry>,
    #[serde(default)]
    diacritics: BTreeMap<String, RawEntry>,
    #[serde(default)]
    extensions: BTreeMap<String, RawEntry>,
    #[serde(default)]
    stop_signs: BTreeMap<String, RawEntry>,
    #[serde(default)]
    other: BTreeMap<String, RawEntry>,
}

/// A named rule section: flat phoneme values plus optional nested maps such
/// as `nasalized_map` (base letter phoneme -> nasalized equivalent).
#[derive(Debug, Clone, Default)]
struct RuleSpec {
    values: HashMap<String, String>,
    maps: HashMap<String, HashMap<String, String>>,
}

/// Immutable lookup tables for base and rule phonemes.
///
/// Built once at startup from the two declarative JSON sources; loading fails
/// fast if either source is missing or malformed, since the engine cannot
/// produce any output without them.
pub struct PhonemeRegistry {
    by_char: HashMap<char, SymbolSpec>,
    rules: HashMap<String, RuleSpec>,
}

const BUNDLED_BASE: &str = include_str!("../../data/base_phonemes.json");
const BUNDLED_RULES: &str = include_str!("../../data/rule_phonemes.json");

impl PhonemeRegistry {
    pub fn from_files(base_path: &Path, rule_path: &Path) -> Result<Self> {
        let base = fs::read_to_string(base_path).map_err(|source| PhonemizerError::Io {
            path: base_path.to_path_buf(),
            source,
        })?;
        let rules = fs::read_to_string(rule_path).map_err(|source| PhonemizerError::Io {
            path: rule_path.to_path_buf(),
            source,
        })?;
        let base: RawBaseTable =
            serde_json::from_str(&base).map_err(|source| PhonemizerError::MalformedTable {
                path: base_path.to_path_buf(),
                source,
            })?;
        let rules: HashMap<String, HashMap<String, serde_json::Value>> =
            serde_json::from_str(&rules).map_err(|source| PhonemizerError::MalformedTable {
                path: rule_path.to_path_buf(),
                source,
            })?;
        Self::build(base, rules)
    }

    /// Parse the registry from in-memory JSON documents.
    pub fn from_json_strs(base_json: &str, rule_json: &str) -> Result<Self> {
        let base: RawBaseTable = serde_json::from_str(base_json)
            .map_err(|e| PhonemizerError::Config(format!("base table: {e}")))?;
        let rules: HashMap<String, HashMap<String, serde_json::Value>> =
            serde_json::from_str(rule_json)
                .map_err(|e| PhonemizerError::Config(format!("rule table: {e}")))?;
        Self::build(base, rules)
    }

    /// The tables shipped with the crate under `data/`.
    pub fn bundled() -> Result<Self> {
        Self::from_json_strs(BUNDLED_BASE, BUNDLED_RULES)
    }

    fn build(
        base: RawBaseTable,
        raw_rules: HashMap<String, HashMap<String, serde_json::Value>>,
    ) -> Result<Self> {
        let mut by_char = HashMap::new();
        let sections = [
            (SymbolCategory::Letter, base.letters),
            (SymbolCategory::Diacritic, base.diacritics),
            (SymbolCategory::Extension, base.extensions),
            (SymbolCategory::StopSign, base.stop_signs),
            (SymbolCategory::Other, base.other),
        ];
        for (category, entries) in sections {
            for (name, entry) in entries {
                let mut chars = entry.char.chars();
                let ch = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(PhonemizerError::Config(format!(
                            "entry '{name}' must map exactly one character, got '{}'",
                            entry.char
                        )))
                    }
                };
                by_char.insert(
                    ch,
                    SymbolSpec {
                        name,
                        category,
                        ch,
                        phoneme: entry.phoneme,
                    },
                );
            }
        }

        let mut rules = HashMap::new();
        for (rule_name, section) in raw_rules {
            let mut spec = RuleSpec::default();
            for (key, value) in section {
                match value {
                    serde_json::Value::String(s) => {
                        spec.values.insert(key, s);
                    }
                    serde_json::Value::Object(map) => {
                        let mut inner = HashMap::new();
                        for (k, v) in map {
                            match v {
                                serde_json::Value::String(s) => {
                                    inner.insert(k, s);
                                }
                                other => {
                                    return Err(PhonemizerError::Config(format!(
                                        "rule '{rule_name}.{key}.{k}' must be a string, got {other}"
                                    )))
                                }
                            }
                        }
                        spec.maps.insert(key, inner);
                    }
                    other => {
                        return Err(PhonemizerError::Config(format!(
                            "rule '{rule_name}.{key}' must be a string or map, got {other}"
                        )))
                    }
                }
            }
            rules.insert(rule_name, spec);
        }

        Ok(Self { by_char, rules })
    }

    /// Full spec for a script character, if the catalog knows it.
    pub fn lookup(&self, ch: char) -> Option<&SymbolSpec> {
        self.by_char.get(&ch)
    }

    /// Base phoneme for a character; empty for unknown or silent symbols.
    pub fn base_phoneme(&self, ch: char) -> &str {
        self.by_char.get(&ch).map(|s| s.phoneme.as_str()).unwrap_or("")
    }

    /// A named phoneme from the rule table, e.g. `rule_phoneme("ikhfaa",
    /// "light_phoneme")`. A missing rule or key is a configuration error.
    pub fn rule_phoneme(&self, rule: &str, key: &str) -> Result<&str> {
        self.rules
            .get(rule)
            .and_then(|spec| spec.values.get(key))
            .map(String::as_str)
            .ok_or_else(|| PhonemizerError::Config(format!("missing rule phoneme {rule}.{key}")))
    }

    /// Nested map lookup, e.g. the nasalized equivalent of a base phoneme.
    pub fn rule_map_phoneme(&self, rule: &str, map: &str, key: &str) -> Result<Option<&str>> {
        let spec = self
            .rules
            .get(rule)
            .and_then(|spec| spec.maps.get(map))
            .ok_or_else(|| PhonemizerError::Config(format!("missing rule map {rule}.{map}")))?;
        Ok(spec.get(key).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_tables_load() {
        let reg = PhonemeRegistry::bundled().unwrap();
        assert_eq!(reg.base_phoneme('ب'), "b");
        assert_eq!(reg.base_phoneme('ن'), "n");
        assert_eq!(reg.base_phoneme('#'), "");
        assert_eq!(reg.lookup('ۚ').unwrap().category, SymbolCategory::StopSign);
    }

    #[test]
    fn rule_lookups() {
        let reg = PhonemeRegistry::bundled().unwrap();
        assert_eq!(reg.rule_phoneme("iqlab", "phoneme").unwrap(), "m̃");
        assert_eq!(
            reg.rule_map_phoneme("idgham", "nasalized_map", "m").unwrap(),
            Some("m̃")
        );
        assert!(reg.rule_phoneme("iqlab", "nope").is_err());
    }

    #[test]
    fn malformed_table_is_fatal() {
        assert!(PhonemeRegistry::from_json_strs("{", "{}").is_err());
        assert!(PhonemeRegistry::from_json_strs(
            r#"{"letters": {"BA": {"char": "با"}}}"#,
            "{}"
        )
        .is_err());
    }
}
