//! The pronunciation lexicon
//!
//! A [`Lexicon`] owns the word → pronunciation map, the feature table and the
//! curated word lists. It is validated once when built and never mutated
//! afterwards, so it can be shared freely between threads.

use std::borrow::Cow;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::feature::{FeatureTable, PhoneId};
use crate::phone::Phone;

/// Errors raised while loading or validating lexicon data
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid document: expected {expected}")]
    InvalidDocument { expected: &'static str },

    #[error("word {word:?}: malformed phone token {token:?}")]
    MalformedPhone { word: String, token: String },

    #[error("word {word:?} has an empty pronunciation")]
    EmptyPronunciation { word: String },

    #[error("word {word:?} uses phone {phone:?}, which has no feature vector")]
    UnknownPhone { word: String, phone: String },

    #[error("phone {phone:?}: invalid value for feature {feature:?}")]
    InvalidFeatureValue { phone: String, feature: String },

    #[error("phone {phone:?} has features {found:?}, expected {expected:?}")]
    InconsistentFeatures {
        phone: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("feature table is empty")]
    EmptyFeatureTable,
}

/// Pronunciation of one word, with each phone resolved against the feature table
#[derive(Debug, Clone)]
pub struct Entry {
    pub phones: Vec<Phone>,
    pub ids: Vec<PhoneId>,
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Lexicon words in input order
    words: Vec<String>,
    entries: FxHashMap<String, Entry>,
    features: FeatureTable,
    common_words: Vec<String>,
    common_lemmas: Vec<String>,
}

impl Lexicon {
    /// Build a lexicon, resolving every phone against the feature table
    ///
    /// Words are keyed in lowercase. A later duplicate replaces the earlier
    /// pronunciation but keeps the earlier position.
    pub fn new(
        pronunciations: impl IntoIterator<Item = (String, Vec<Phone>)>,
        features: FeatureTable,
    ) -> Result<Self, LexiconError> {
        let mut words = Vec::new();
        let mut entries = FxHashMap::default();

        for (word, phones) in pronunciations {
            let word = word.to_lowercase();
            if phones.is_empty() {
                return Err(LexiconError::EmptyPronunciation { word });
            }

            let ids = phones
                .iter()
                .map(|phone| {
                    features
                        .id(&phone.symbol)
                        .ok_or_else(|| LexiconError::UnknownPhone {
                            word: word.clone(),
                            phone: phone.symbol.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if entries
                .insert(word.clone(), Entry { phones, ids })
                .is_none()
            {
                words.push(word);
            }
        }

        info!(
            words = words.len(),
            phones = features.len(),
            features = ?features.feature_names(),
            "built lexicon"
        );

        Ok(Self {
            words,
            entries,
            features,
            common_words: Vec::new(),
            common_lemmas: Vec::new(),
        })
    }

    /// Build a lexicon from its JSON document: `{word: ["K", "AE1", "T"]}`
    pub fn from_json(document: &Value, features: FeatureTable) -> Result<Self, LexiconError> {
        let Value::Object(words) = document else {
            return Err(LexiconError::InvalidDocument {
                expected: "an object mapping words to phone lists",
            });
        };

        let mut pronunciations = Vec::with_capacity(words.len());
        for (word, tokens) in words {
            let Value::Array(tokens) = tokens else {
                return Err(LexiconError::InvalidDocument {
                    expected: "a list of phone tokens",
                });
            };

            let phones = tokens
                .iter()
                .map(|token| {
                    token
                        .as_str()
                        .and_then(|t| t.parse::<Phone>().ok())
                        .ok_or_else(|| LexiconError::MalformedPhone {
                            word: word.clone(),
                            token: token.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            pronunciations.push((word.clone(), phones));
        }

        Self::new(pronunciations, features)
    }

    /// Attach the curated common-word list
    pub fn with_common_words(mut self, words: Vec<String>) -> Self {
        self.common_words = self.curated("common words", words);
        self
    }

    /// Attach the curated common-lemma list
    pub fn with_common_lemmas(mut self, lemmas: Vec<String>) -> Self {
        self.common_lemmas = self.curated("common lemmas", lemmas);
        self
    }

    fn curated(&self, list: &str, words: Vec<String>) -> Vec<String> {
        let words: Vec<String> = words.into_iter().map(|w| w.to_lowercase()).collect();
        let missing: Vec<&str> = words
            .iter()
            .filter(|w| !self.entries.contains_key(w.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            warn!(
                list,
                missing = missing.len(),
                examples = ?&missing[..missing.len().min(5)],
                "curated list contains words absent from the lexicon"
            );
        }
        words
    }

    /// Every lexicon word, in input order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn common_words(&self) -> &[String] {
        &self.common_words
    }

    pub fn common_lemmas(&self) -> &[String] {
        &self.common_lemmas
    }

    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Case-insensitive entry lookup
    pub(crate) fn entry(&self, word: &str) -> Option<&Entry> {
        let key = if word.chars().any(char::is_uppercase) {
            Cow::Owned(word.to_lowercase())
        } else {
            Cow::Borrowed(word)
        };
        self.entries.get(key.as_ref())
    }
}
