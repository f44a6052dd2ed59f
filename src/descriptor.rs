//! Per-word phonological descriptors
//!
//! Every descriptor except [`character_length`] is only defined for lexicon
//! words and returns `None` for anything else.

use std::fmt;

use serde::Serialize;

use crate::feature::FeatureVector;
use crate::lexicon::Lexicon;
use crate::phone::{Phone, is_diphthong};

/// Number of alphabetic characters in the literal word
pub fn character_length(word: &str) -> usize {
    word.chars().filter(|c| c.is_alphabetic()).count()
}

impl Lexicon {
    pub fn is_word(&self, word: &str) -> bool {
        self.entry(word).is_some()
    }

    /// Pronunciation exactly as stored, stress digits included
    pub fn phones_with_stress(&self, word: &str) -> Option<&[Phone]> {
        self.entry(word).map(|entry| entry.phones.as_slice())
    }

    pub fn phones_without_stress(&self, word: &str) -> Option<Vec<&str>> {
        self.phones_with_stress(word)
            .map(|phones| phones.iter().map(|p| p.symbol.as_str()).collect())
    }

    /// Number of vowel nuclei, i.e. phones carrying any stress digit
    pub fn syllable_count(&self, word: &str) -> Option<usize> {
        self.phones_with_stress(word)
            .map(|phones| phones.iter().filter(|p| p.is_nucleus()).count())
    }

    /// Diphthongs of the word in pronunciation order
    pub fn diphthongs(&self, word: &str) -> Option<Vec<&str>> {
        self.phones_without_stress(word)
            .map(|symbols| symbols.into_iter().filter(|s| is_diphthong(s)).collect())
    }

    pub fn contains_diphthong(&self, word: &str) -> Option<bool> {
        self.phones_with_stress(word)
            .map(|phones| phones.iter().any(Phone::is_diphthong))
    }

    pub fn character_length(&self, word: &str) -> usize {
        character_length(word)
    }

    pub fn phoneme_length(&self, word: &str) -> Option<usize> {
        self.phones_with_stress(word).map(<[Phone]>::len)
    }

    /// Feature vector of each phone, in pronunciation order
    pub fn feature_sequence(&self, word: &str) -> Option<Vec<&FeatureVector>> {
        let table = self.features();
        self.entry(word)
            .map(|entry| entry.ids.iter().map(|&id| table.vector(id)).collect())
    }

    /// Everything known about a word in one record
    pub fn describe<'a>(&'a self, word: &str) -> Description<'a> {
        Description {
            word: word.to_string(),
            is_word: self.is_word(word),
            syllables: self.syllable_count(word),
            diphthongs: self.diphthongs(word),
            characters: self.character_length(word),
            phonemes: self.phoneme_length(word),
            phones_with_stress: self.phones_with_stress(word),
            phones_without_stress: self.phones_without_stress(word),
            features: self.feature_sequence(word),
        }
    }
}

/// Descriptor record for one word
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description<'a> {
    pub word: String,
    pub is_word: bool,
    pub syllables: Option<usize>,
    pub diphthongs: Option<Vec<&'a str>>,
    pub characters: usize,
    pub phonemes: Option<usize>,
    pub phones_with_stress: Option<&'a [Phone]>,
    pub phones_without_stress: Option<Vec<&'a str>>,
    pub features: Option<Vec<&'a FeatureVector>>,
}

fn or_none<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

impl fmt::Display for Description<'_> {
    /// Two-table report: word-level features, then one column per phone
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diphthongs = self
            .diphthongs
            .as_ref()
            .map(|d| format!("[{}]", d.join(", ")));
        let rows = [
            ("word", self.word.clone()),
            ("is_word", self.is_word.to_string()),
            ("syllables", or_none(self.syllables)),
            ("diphthongs", or_none(diphthongs)),
            ("characters", self.characters.to_string()),
            ("phonemes", or_none(self.phonemes)),
        ];

        writeln!(f, "Table 1: Word-Level Features")?;
        for (label, value) in rows {
            writeln!(f, "{:<12} {}", label, value)?;
        }

        let (Some(phones), Some(features)) = (self.phones_with_stress, &self.features) else {
            return Ok(());
        };

        let names: Vec<&String> = features
            .first()
            .map(|vector| vector.keys().collect())
            .unwrap_or_default();
        let label_width = names.iter().map(|n| n.len()).max().unwrap_or(0);
        let columns: Vec<Vec<String>> = phones
            .iter()
            .zip(features)
            .map(|(phone, vector)| {
                std::iter::once(phone.to_string())
                    .chain(names.iter().map(|n| or_none(vector.get(*n))))
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .map(|col| col.iter().map(String::len).max().unwrap_or(0))
            .collect();

        writeln!(f)?;
        writeln!(f, "Table 2: Phoneme-Level Features")?;
        for row in 0..=names.len() {
            let label = if row == 0 { "" } else { names[row - 1].as_str() };
            write!(f, "{:<width$}", label, width = label_width)?;
            for (col, width) in columns.iter().zip(&widths) {
                write!(f, "  {:>width$}", col[row], width = *width)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureValue;
    use crate::lexicon::testing::{SAMPLE_WORDS, sample_lexicon};
    use crate::phone::Stress;

    #[test]
    fn test_describe_cat() {
        let lexicon = sample_lexicon();
        let d = lexicon.describe("cat");

        assert!(d.is_word);
        assert_eq!(d.syllables, Some(1));
        assert_eq!(d.diphthongs, Some(vec![]));
        assert_eq!(d.characters, 3);
        assert_eq!(d.phonemes, Some(3));
        assert_eq!(d.phones_without_stress, Some(vec!["K", "AE", "T"]));

        let stressed = d.phones_with_stress.unwrap();
        assert_eq!(stressed[1].stress, Some(Stress::Primary));
        assert_eq!(d.features.unwrap().len(), 3);
    }

    #[test]
    fn test_non_word_is_not_present() {
        let lexicon = sample_lexicon();
        let d = lexicon.describe("dog's");

        assert!(!d.is_word);
        assert_eq!(d.syllables, None);
        assert_eq!(d.diphthongs, None);
        assert_eq!(d.phonemes, None);
        assert!(d.phones_with_stress.is_none());
        assert_eq!(d.phones_without_stress, None);
        assert!(d.features.is_none());
        // Character length is defined for any string
        assert_eq!(d.characters, 4);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let lexicon = sample_lexicon();
        assert!(lexicon.is_word("Team"));
        assert_eq!(lexicon.syllable_count("KITTEN"), Some(2));
    }

    #[test]
    fn test_unstressed_phones_align_with_stressed() {
        let lexicon = sample_lexicon();
        for (word, _) in SAMPLE_WORDS {
            let stressed = lexicon.phones_with_stress(word).unwrap();
            let plain = lexicon.phones_without_stress(word).unwrap();
            assert_eq!(stressed.len(), plain.len());
            for (phone, symbol) in stressed.iter().zip(&plain) {
                let token = phone.to_string();
                assert!(token.starts_with(symbol));
                assert!(token.len() == symbol.len() || phone.is_nucleus());
            }
        }
    }

    #[test]
    fn test_syllables_count_stress_marks() {
        let lexicon = sample_lexicon();
        for (word, transcription) in SAMPLE_WORDS {
            let marks = transcription
                .split_whitespace()
                .filter(|t| t.ends_with(|c: char| c.is_ascii_digit()))
                .count();
            assert_eq!(lexicon.syllable_count(word), Some(marks), "{}", word);
        }
        assert_eq!(lexicon.syllable_count("catamaran"), Some(4));
        assert_eq!(lexicon.syllable_count("about"), Some(2));
    }

    #[test]
    fn test_diphthongs() {
        let lexicon = sample_lexicon();
        assert_eq!(lexicon.diphthongs("about"), Some(vec!["AW"]));
        assert_eq!(lexicon.diphthongs("boy"), Some(vec!["OY"]));
        assert_eq!(lexicon.contains_diphthong("bite"), Some(true));
        assert_eq!(lexicon.contains_diphthong("team"), Some(false));
        assert_eq!(lexicon.contains_diphthong("dog"), None);
    }

    #[test]
    fn test_character_length_counts_letters_only() {
        assert_eq!(character_length("cat"), 3);
        assert_eq!(character_length("o'clock"), 6);
        assert_eq!(character_length("x-ray"), 4);
        assert_eq!(character_length(""), 0);
    }

    #[test]
    fn test_feature_sequence() {
        let lexicon = sample_lexicon();
        let sequence = lexicon.feature_sequence("tea").unwrap();

        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence[0]["TYPE"], FeatureValue::category("C"));
        assert_eq!(sequence[1]["HEIGHT"], FeatureValue::Scalar(1.0));
        assert!(lexicon.feature_sequence("dog").is_none());
    }

    #[test]
    fn test_description_serializes_camel_case() {
        let lexicon = sample_lexicon();
        let value = serde_json::to_value(lexicon.describe("tea")).unwrap();

        assert_eq!(value["word"], "tea");
        assert_eq!(value["isWord"], true);
        assert_eq!(value["phonesWithStress"], serde_json::json!(["T", "IY1"]));
        assert_eq!(value["phonesWithoutStress"], serde_json::json!(["T", "IY"]));
        assert_eq!(value["features"][0]["HEIGHT"], serde_json::Value::Null);
        assert_eq!(value["features"][1]["TYPE"], "V");

        let value = serde_json::to_value(lexicon.describe("dog")).unwrap();
        assert_eq!(value["isWord"], false);
        assert_eq!(value["syllables"], serde_json::Value::Null);
        assert_eq!(value["characters"], 3);
    }

    #[test]
    fn test_description_tables() {
        let lexicon = sample_lexicon();
        let report = lexicon.describe("boy").to_string();

        assert!(report.starts_with("Table 1: Word-Level Features\n"));
        assert!(report.contains("diphthongs   [OY]"));
        assert!(report.contains("Table 2: Phoneme-Level Features"));
        assert!(report.contains("OY1"));
        assert!(report.lines().any(|l| l.starts_with("HEIGHT") && l.contains("0.5..0.9")));

        let report = lexicon.describe("dog").to_string();
        assert!(report.contains("syllables    None"));
        assert!(!report.contains("Table 2"));
    }
}
