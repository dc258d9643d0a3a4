// File: src/core/symbols.rs
//! Typed symbol model: the role each script character plays inside a word.

use crate::error::{PhonemizerError, Result};

/// Short vowels, tanween and sukun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiacriticKind {
    Fatha,
    Damma,
    Kasra,
    Fathatan,
    Dammatan,
    Kasratan,
    Sukun,
}

impl DiacriticKind {
    /// Map a base-table entry name to its kind. Unknown names are a
    /// configuration error, surfaced during parsing.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FATHA" => Some(Self::Fatha),
            "DAMMA" => Some(Self::Damma),
            "KASRA" => Some(Self::Kasra),
            "FATHATAN" => Some(Self::Fathatan),
            "DAMMATAN" => Some(Self::Dammatan),
            "KASRATAN" => Some(Self::Kasratan),
            "SUKUN" | "SUKUN_PLAIN" => Some(Self::Sukun),
            _ => None,
        }
    }

    pub fn is_tanween(self) -> bool {
        matches!(self, Self::Fathatan | Self::Dammatan | Self::Kasratan)
    }

    pub fn is_sukun(self) -> bool {
        self == Self::Sukun
    }
}

#[derive(Debug, Clone)]
pub struct Diacritic {
    pub kind: DiacriticKind,
    pub ch: char,
    pub phoneme: String,
}

impl Diacritic {
    /// The synthetic sukun written onto the last letter of a stopping word.
    pub fn synthetic_sukun() -> Self {
        Self {
            kind: DiacriticKind::Sukun,
            ch: 'ۡ',
            phoneme: String::new(),
        }
    }

    pub fn synthetic_fatha() -> Self {
        Self {
            kind: DiacriticKind::Fatha,
            ch: 'َ',
            phoneme: "a".to_string(),
        }
    }
}

/// Marks vowel lengthening on the letter it is attached to (maddah, dagger
/// alef, small waw/ya).
#[derive(Debug, Clone)]
pub struct Extension {
    pub name: String,
    pub ch: char,
}

/// Catch-all marks attached to a letter (shaddah is modeled separately as a
/// boolean; silence annotations land here).
#[derive(Debug, Clone)]
pub struct OtherSymbol {
    pub name: String,
    pub ch: char,
}

pub const SILENT_ALWAYS: &str = "SILENT_ALWAYS";
pub const SILENT_AT_CONTINUATION: &str = "SILENT_AT_CONTINUATION";
pub const SHADDA: &str = "SHADDA";

/// The six recitation pause marks, by how binding the pause is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopKind {
    PreferredContinue,
    PreferredStop,
    CompulsoryStop,
    ProhibitedStop,
    OptionalStop,
    EmbracingStop,
}

impl StopKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "preferred_continue" => Some(Self::PreferredContinue),
            "preferred_stop" => Some(Self::PreferredStop),
            "compulsory_stop" => Some(Self::CompulsoryStop),
            "prohibited_stop" => Some(Self::ProhibitedStop),
            "optional_stop" => Some(Self::OptionalStop),
            "embracing_stop" => Some(Self::EmbracingStop),
            _ => None,
        }
    }
}

/// A pause mark attached to a word.
#[derive(Debug, Clone)]
pub struct StopSign {
    pub kind: StopKind,
    pub ch: char,
}

/// Caller-selected boundary classes: explicit pause marks and/or verse edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopType {
    Verse,
    Sign(StopKind),
}

impl StopType {
    /// Parse a selection string such as "verse" or "optional_stop".
    pub fn parse(s: &str) -> Result<Self> {
        if s == "verse" {
            return Ok(Self::Verse);
        }
        StopKind::from_name(s)
            .map(Self::Sign)
            .ok_or_else(|| PhonemizerError::InvalidStopType(s.to_string()))
    }
}

/// Which vowel letter a lengthening carrier is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VowelKind {
    Alef,
    AlefMaksura,
    Waw,
    Ya,
}

/// Closed set of per-letter rule variants. Every letter not named here uses
/// the default rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterKind {
    Default,
    Noon,
    Meem,
    Qalqala,
    Raa,
    Lam,
    HamzaWasl,
    TaaMarbuta,
    LongVowel(VowelKind),
}

impl LetterKind {
    pub fn classify(ch: char) -> Self {
        match ch {
            'ٱ' => Self::HamzaWasl,
            'ن' => Self::Noon,
            'م' => Self::Meem,
            'ق' | 'ط' | 'ب' | 'ج' | 'د' => Self::Qalqala,
            'ر' => Self::Raa,
            'ل' => Self::Lam,
            'ة' => Self::TaaMarbuta,
            'ا' => Self::LongVowel(VowelKind::Alef),
            'ى' => Self::LongVowel(VowelKind::AlefMaksura),
            'و' => Self::LongVowel(VowelKind::Waw),
            'ي' | 'ۧ' => Self::LongVowel(VowelKind::Ya),
            _ => Self::Default,
        }
    }
}

/// The emphatic letters; they select the heavy ikhfaa phoneme and force a
/// heavy raa after a kasra.
pub const HEAVY_LETTERS: [char; 7] = ['خ', 'ص', 'ض', 'غ', 'ط', 'ق', 'ظ'];

/// The fifteen concealment triggers for noon sakinah / tanween.
pub const IKHFAA_LETTERS: [char; 15] = [
    'ت', 'ث', 'ج', 'د', 'ذ', 'ز', 'س', 'ش', 'ص', 'ض', 'ط', 'ظ', 'ف', 'ق', 'ك',
];

/// The classical assimilation triggers for noon sakinah. The rules key on
/// the nasalizing subset below plus lam and raa; the overlap with the
/// ikhfaa set never fires.
pub const IDGHAM_LETTERS: [char; 16] = [
    'ي', 'ر', 'ز', 'س', 'ش', 'ص', 'ض', 'ط', 'ظ', 'ف', 'ق', 'ك', 'ل', 'م', 'ن', 'ه',
];

/// The subset of idgham triggers that keep the nasalization.
pub const IDGHAM_GHUNNAH_LETTERS: [char; 4] = ['ي', 'ن', 'م', 'و'];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_rule_letters() {
        assert_eq!(LetterKind::classify('ن'), LetterKind::Noon);
        assert_eq!(LetterKind::classify('ب'), LetterKind::Qalqala);
        assert_eq!(LetterKind::classify('ا'), LetterKind::LongVowel(VowelKind::Alef));
        assert_eq!(LetterKind::classify('س'), LetterKind::Default);
    }

    #[test]
    fn stop_type_parsing() {
        assert_eq!(StopType::parse("verse").unwrap(), StopType::Verse);
        assert_eq!(
            StopType::parse("optional_stop").unwrap(),
            StopType::Sign(StopKind::OptionalStop)
        );
        assert!(StopType::parse("sometimes_stop").is_err());
    }
}
