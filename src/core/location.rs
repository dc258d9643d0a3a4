// File: src/core/location.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PhonemizerError, Result};

/// Immutable (surah, verse, word) triple, 1-based.
///
/// The canonical string key is "s:v:w"; locations order lexicographically by
/// the numeric triple, which matches recitation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub surah: u32,
    pub verse: u32,
    pub word: u32,
}

impl Location {
    pub fn new(surah: u32, verse: u32, word: u32) -> Self {
        Self { surah, verse, word }
    }

    /// Parse a full "s:v:w" key.
    pub fn from_key(key: &str) -> Result<Self> {
        let mut parts = key.split(':');
        let mut next = || -> Result<u32> {
            parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| PhonemizerError::InvalidReference(key.to_string()))
        };
        let loc = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(PhonemizerError::InvalidReference(key.to_string()));
        }
        Ok(loc)
    }

    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.surah, self.verse, self.word)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.surah, self.verse, self.word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trip() {
        let loc = Location::from_key("2:255:12").unwrap();
        assert_eq!(loc, Location::new(2, 255, 12));
        assert_eq!(loc.key(), "2:255:12");
    }

    #[test]
    fn ordering_follows_recitation_order() {
        let a = Location::new(1, 7, 9);
        let b = Location::new(2, 1, 1);
        assert!(a < b);
    }

    #[test]
    fn rejects_partial_keys() {
        assert!(Location::from_key("2:255").is_err());
        assert!(Location::from_key("x:1:1").is_err());
    }
}
