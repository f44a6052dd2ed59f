//! Phones and stress marks
//!
//! A phone token in the lexicon is an ARPAbet symbol, optionally followed by a
//! single stress digit when it is a vowel nucleus (`K`, `AE1`, `AH0`).

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// The closed set of diphthong symbols
pub const DIPHTHONGS: [&str; 4] = ["EY", "AY", "AW", "OY"];

/// Whether an unstressed symbol names a diphthong
pub fn is_diphthong(symbol: &str) -> bool {
    DIPHTHONGS.contains(&symbol)
}

/// Stress level carried by a vowel nucleus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stress {
    Unstressed,
    Primary,
    Secondary,
}

impl Stress {
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Stress::Unstressed),
            '1' => Some(Stress::Primary),
            '2' => Some(Stress::Secondary),
            _ => None,
        }
    }

    pub fn digit(self) -> char {
        match self {
            Stress::Unstressed => '0',
            Stress::Primary => '1',
            Stress::Secondary => '2',
        }
    }
}

/// Error for a token that is not a well-formed phone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPhone(pub String);

impl fmt::Display for MalformedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed phone token {:?}", self.0)
    }
}

impl std::error::Error for MalformedPhone {}

/// One phone of a pronunciation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone {
    /// Symbol with any stress digit removed
    pub symbol: String,
    pub stress: Option<Stress>,
}

impl Phone {
    pub fn new(symbol: &str, stress: Option<Stress>) -> Self {
        Self {
            symbol: symbol.to_string(),
            stress,
        }
    }

    /// Vowel nuclei are exactly the phones carrying a stress digit
    pub fn is_nucleus(&self) -> bool {
        self.stress.is_some()
    }

    pub fn is_diphthong(&self) -> bool {
        is_diphthong(&self.symbol)
    }
}

impl FromStr for Phone {
    type Err = MalformedPhone;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedPhone(token.to_string());

        let Some(last) = token.chars().last() else {
            return Err(malformed());
        };

        let (symbol, stress) = if last.is_ascii_digit() {
            let stress = Stress::from_digit(last).ok_or_else(malformed)?;
            (&token[..token.len() - 1], Some(stress))
        } else {
            (token, None)
        };

        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(malformed());
        }

        Ok(Phone::new(symbol, stress))
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stress {
            Some(stress) => write!(f, "{}{}", self.symbol, stress.digit()),
            None => f.write_str(&self.symbol),
        }
    }
}

// Phones serialize back to their lexicon token
impl Serialize for Phone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_consonant() {
        let phone: Phone = "K".parse().unwrap();
        assert_eq!(phone.symbol, "K");
        assert_eq!(phone.stress, None);
        assert!(!phone.is_nucleus());
    }

    #[test]
    fn test_parse_stressed_vowel() {
        let phone: Phone = "AE1".parse().unwrap();
        assert_eq!(phone.symbol, "AE");
        assert_eq!(phone.stress, Some(Stress::Primary));

        let phone: Phone = "AH0".parse().unwrap();
        assert_eq!(phone.stress, Some(Stress::Unstressed));
        assert!(phone.is_nucleus());

        let phone: Phone = "OW2".parse().unwrap();
        assert_eq!(phone.stress, Some(Stress::Secondary));
    }

    #[test]
    fn test_parse_malformed() {
        assert!("".parse::<Phone>().is_err());
        assert!("1".parse::<Phone>().is_err());
        assert!("AE3".parse::<Phone>().is_err());
        assert!("A1E".parse::<Phone>().is_err());
        assert!("AE-".parse::<Phone>().is_err());
    }

    #[test]
    fn test_display_round_trips_token() {
        for token in ["K", "AE1", "AH0", "ER2", "NG"] {
            let phone: Phone = token.parse().unwrap();
            assert_eq!(phone.to_string(), token);
        }
    }

    #[test]
    fn test_diphthongs() {
        assert!(is_diphthong("AY"));
        assert!(is_diphthong("OY"));
        assert!(!is_diphthong("AE"));
        assert!("AW1".parse::<Phone>().unwrap().is_diphthong());
    }
}
