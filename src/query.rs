//! Structured lexicon queries
//!
//! A [`Query`] combines word-level filters, a phoneme [`Pattern`], an
//! alignment [`Mode`] and the [`Corpus`] to scan. Queries can be built in
//! code or read from the JSON document accepted by the command line tool:
//!
//! ```json
//! {
//!   "word_features": {"SYLLABLES": [2, 4], "CONTAINS_DIPHTHONG": true},
//!   "phone_features": [{"TYPE": "C"}, {}, {"HEIGHT": [0.6, 1.0]}],
//!   "mode": "ENDS_WITH",
//!   "frequency": "COMMON_WORDS"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::feature::FeatureValue;
use crate::lexicon::Lexicon;
use crate::matcher::{Mode, UnknownMode};
use crate::pattern::{Pattern, PositionConstraint};

/// Error type for malformed queries
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Query error: invalid mode {0:?}, choose from STARTS_WITH, ENDS_WITH, CONTAINS")]
    InvalidMode(String),

    #[error("Query error: invalid corpus {0:?}, choose from ALL, COMMON_WORDS, COMMON_LEMMAS")]
    InvalidCorpus(String),

    #[error("Query error: invalid {field} filter {value:?}, expected N or [MIN, MAX)")]
    InvalidCount { field: &'static str, value: String },

    #[error("Query error: position {position}: invalid value for feature {feature:?}")]
    InvalidFeatureValue { position: usize, feature: String },

    #[error("Query error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<UnknownMode> for QueryError {
    fn from(e: UnknownMode) -> Self {
        QueryError::InvalidMode(e.0)
    }
}

/// Word list a query scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Corpus {
    #[default]
    All,
    CommonWords,
    CommonLemmas,
}

impl Corpus {
    pub const ALL: [Corpus; 3] = [Corpus::All, Corpus::CommonWords, Corpus::CommonLemmas];

    pub fn as_str(self) -> &'static str {
        match self {
            Corpus::All => "ALL",
            Corpus::CommonWords => "COMMON_WORDS",
            Corpus::CommonLemmas => "COMMON_LEMMAS",
        }
    }

    /// The words of this corpus, in corpus order
    pub fn words(self, lexicon: &Lexicon) -> &[String] {
        match self {
            Corpus::All => lexicon.words(),
            Corpus::CommonWords => lexicon.common_words(),
            Corpus::CommonLemmas => lexicon.common_lemmas(),
        }
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corpus {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Corpus::ALL
            .into_iter()
            .find(|corpus| corpus.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| QueryError::InvalidCorpus(s.to_string()))
    }
}

/// Exact count or half-open range `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFilter {
    Exact(usize),
    Range { min: usize, max: usize },
}

impl CountFilter {
    pub fn range(min: usize, max: usize) -> Self {
        CountFilter::Range { min, max }
    }

    pub fn contains(&self, value: usize) -> bool {
        match *self {
            CountFilter::Exact(n) => value == n,
            CountFilter::Range { min, max } => min <= value && value < max,
        }
    }
}

impl fmt::Display for CountFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountFilter::Exact(n) => write!(f, "{}", n),
            CountFilter::Range { min, max } => write!(f, "{}..{}", min, max),
        }
    }
}

impl FromStr for CountFilter {
    type Err = QueryError;

    /// `N` for an exact count, `MIN..MAX` for a half-open range
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QueryError::InvalidCount {
            field: "count",
            value: s.to_string(),
        };

        match s.split_once("..") {
            Some((min, max)) => Ok(CountFilter::range(
                min.trim().parse().map_err(|_| invalid())?,
                max.trim().parse().map_err(|_| invalid())?,
            )),
            None => s.trim().parse().map(CountFilter::Exact).map_err(|_| invalid()),
        }
    }
}

/// Word-level filters; `None` leaves a dimension unconstrained
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordFilter {
    pub syllables: Option<CountFilter>,
    pub characters: Option<CountFilter>,
    pub phonemes: Option<CountFilter>,
    pub contains_diphthong: Option<bool>,
}

impl WordFilter {
    pub fn is_empty(&self) -> bool {
        *self == WordFilter::default()
    }

    /// Apply the filters in order: syllables, characters, phonemes, diphthongs
    ///
    /// A word missing from the lexicon fails every filter that needs its
    /// pronunciation.
    pub fn accepts(&self, lexicon: &Lexicon, word: &str) -> bool {
        fn passes(filter: Option<CountFilter>, value: impl FnOnce() -> Option<usize>) -> bool {
            filter.is_none_or(|f| value().is_some_and(|v| f.contains(v)))
        }

        passes(self.syllables, || lexicon.syllable_count(word))
            && passes(self.characters, || Some(lexicon.character_length(word)))
            && passes(self.phonemes, || lexicon.phoneme_length(word))
            && self
                .contains_diphthong
                .is_none_or(|wanted| lexicon.contains_diphthong(word) == Some(wanted))
    }
}

/// A complete lexicon query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: WordFilter,
    pub pattern: Pattern,
    pub mode: Mode,
    pub corpus: Corpus,
}

impl Query {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_corpus(mut self, corpus: Corpus) -> Self {
        self.corpus = corpus;
        self
    }

    pub fn syllables(mut self, filter: CountFilter) -> Self {
        self.filter.syllables = Some(filter);
        self
    }

    pub fn characters(mut self, filter: CountFilter) -> Self {
        self.filter.characters = Some(filter);
        self
    }

    pub fn phonemes(mut self, filter: CountFilter) -> Self {
        self.filter.phonemes = Some(filter);
        self
    }

    pub fn contains_diphthong(mut self, wanted: bool) -> Self {
        self.filter.contains_diphthong = Some(wanted);
        self
    }

    /// Parse a JSON query document
    pub fn from_json(text: &str) -> Result<Self, QueryError> {
        let document: QueryDocument = serde_json::from_str(text)?;
        document.try_into()
    }
}

/// Count as written in a query document: `3` or `[2, 4]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountSpec {
    Exact(usize),
    Bounds(Vec<usize>),
}

impl CountSpec {
    fn into_filter(self, field: &'static str) -> Result<CountFilter, QueryError> {
        match self {
            CountSpec::Exact(n) => Ok(CountFilter::Exact(n)),
            CountSpec::Bounds(bounds) => match bounds.as_slice() {
                [min, max] => Ok(CountFilter::range(*min, *max)),
                _ => Err(QueryError::InvalidCount {
                    field,
                    value: format!("{:?}", bounds),
                }),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WordFeatures {
    #[serde(rename = "SYLLABLES")]
    syllables: Option<CountSpec>,
    #[serde(rename = "CHARACTERS")]
    characters: Option<CountSpec>,
    #[serde(rename = "PHONEMES")]
    phonemes: Option<CountSpec>,
    #[serde(rename = "CONTAINS_DIPHTHONG")]
    contains_diphthong: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct QueryDocument {
    word_features: WordFeatures,
    phone_features: Vec<Map<String, Value>>,
    mode: Option<String>,
    #[serde(alias = "corpus")]
    frequency: Option<String>,
}

impl TryFrom<QueryDocument> for Query {
    type Error = QueryError;

    fn try_from(document: QueryDocument) -> Result<Self, Self::Error> {
        // Selectors first, so an invalid one rejects the query before anything else
        let mode = match &document.mode {
            Some(mode) => mode.parse::<Mode>()?,
            None => Mode::default(),
        };
        let corpus = match &document.frequency {
            Some(corpus) => corpus.parse::<Corpus>()?,
            None => Corpus::default(),
        };

        let features = document.word_features;
        let filter = WordFilter {
            syllables: features
                .syllables
                .map(|c| c.into_filter("SYLLABLES"))
                .transpose()?,
            characters: features
                .characters
                .map(|c| c.into_filter("CHARACTERS"))
                .transpose()?,
            phonemes: features
                .phonemes
                .map(|c| c.into_filter("PHONEMES"))
                .transpose()?,
            contains_diphthong: features.contains_diphthong,
        };

        let mut pattern = Pattern::new();
        for (index, constraints) in document.phone_features.iter().enumerate() {
            let mut position = PositionConstraint::new();
            for (feature, value) in constraints {
                let value = FeatureValue::from_json(value).ok_or_else(|| {
                    QueryError::InvalidFeatureValue {
                        position: index,
                        feature: feature.clone(),
                    }
                })?;
                position.insert(feature, value);
            }
            pattern.add_position(position);
        }

        Ok(Query {
            filter,
            pattern,
            mode,
            corpus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::testing::sample_lexicon;

    #[test]
    fn test_count_filter_bounds() {
        let range = CountFilter::range(2, 4);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(3));
        assert!(!range.contains(4));

        assert!(CountFilter::Exact(3).contains(3));
        assert!(!CountFilter::Exact(3).contains(4));
    }

    #[test]
    fn test_count_filter_from_str() {
        assert_eq!("3".parse::<CountFilter>().unwrap(), CountFilter::Exact(3));
        assert_eq!("2..4".parse::<CountFilter>().unwrap(), CountFilter::range(2, 4));
        assert_eq!(" 2 .. 4 ".parse::<CountFilter>().unwrap(), CountFilter::range(2, 4));
        assert!("two".parse::<CountFilter>().is_err());
        assert!("2..".parse::<CountFilter>().is_err());
        assert!("-1".parse::<CountFilter>().is_err());
        assert_eq!(CountFilter::range(2, 4).to_string(), "2..4");
    }

    #[test]
    fn test_corpus_from_str() {
        assert_eq!("ALL".parse::<Corpus>().unwrap(), Corpus::All);
        assert_eq!("common_words".parse::<Corpus>().unwrap(), Corpus::CommonWords);
        assert_eq!("COMMON_LEMMAS".parse::<Corpus>().unwrap(), Corpus::CommonLemmas);
        assert!(matches!(
            "RARE_WORDS".parse::<Corpus>(),
            Err(QueryError::InvalidCorpus(_))
        ));
    }

    #[test]
    fn test_word_filter_accepts() {
        let lexicon = sample_lexicon();

        let filter = WordFilter {
            syllables: Some(CountFilter::range(2, 4)),
            ..WordFilter::default()
        };
        assert!(filter.accepts(&lexicon, "about"));
        assert!(filter.accepts(&lexicon, "kitten"));
        assert!(!filter.accepts(&lexicon, "cat"));
        // Four syllables sits on the excluded upper bound
        assert!(!filter.accepts(&lexicon, "catamaran"));

        let filter = WordFilter {
            contains_diphthong: Some(false),
            ..WordFilter::default()
        };
        assert!(filter.accepts(&lexicon, "cat"));
        assert!(!filter.accepts(&lexicon, "boy"));
        assert!(!filter.accepts(&lexicon, "zyzzyva"));

        let filter = WordFilter {
            characters: Some(CountFilter::Exact(7)),
            ..WordFilter::default()
        };
        // Character length does not need the lexicon
        assert!(filter.accepts(&lexicon, "zyzzyva"));
        assert!(WordFilter::default().accepts(&lexicon, "zyzzyva"));
    }

    #[test]
    fn test_query_builder() {
        let query = Query::new(Pattern::new())
            .with_mode(Mode::EndsWith)
            .with_corpus(Corpus::CommonLemmas)
            .syllables(CountFilter::Exact(1))
            .contains_diphthong(true);

        assert_eq!(query.mode, Mode::EndsWith);
        assert_eq!(query.corpus, Corpus::CommonLemmas);
        assert_eq!(query.filter.syllables, Some(CountFilter::Exact(1)));
        assert_eq!(query.filter.contains_diphthong, Some(true));
        assert!(query.filter.characters.is_none());
        assert!(!query.filter.is_empty());
        assert!(Query::default().filter.is_empty());
    }

    #[test]
    fn test_from_json() {
        let query = Query::from_json(
            r#"{
                "word_features": {"SYLLABLES": [2, 4], "CHARACTERS": 5, "CONTAINS_DIPHTHONG": true},
                "phone_features": [{"TYPE": "C"}, {}, {"HEIGHT": [0.6, 1.0], "DEPTH": null}],
                "mode": "ENDS_WITH",
                "frequency": "COMMON_WORDS"
            }"#,
        )
        .unwrap();

        assert_eq!(query.filter.syllables, Some(CountFilter::range(2, 4)));
        assert_eq!(query.filter.characters, Some(CountFilter::Exact(5)));
        assert_eq!(query.filter.phonemes, None);
        assert_eq!(query.filter.contains_diphthong, Some(true));
        assert_eq!(query.mode, Mode::EndsWith);
        assert_eq!(query.corpus, Corpus::CommonWords);

        let positions = query.pattern.positions();
        assert_eq!(positions.len(), 3);
        assert_eq!(positions[0].get("TYPE"), Some(&FeatureValue::category("C")));
        assert!(positions[1].is_wildcard());
        assert_eq!(positions[2].get("HEIGHT"), Some(&FeatureValue::Range(0.6, 1.0)));
        assert_eq!(positions[2].get("DEPTH"), Some(&FeatureValue::Absent));
    }

    #[test]
    fn test_from_json_defaults() {
        let query = Query::from_json("{}").unwrap();
        assert_eq!(query, Query::default());
        assert_eq!(query.mode, Mode::Contains);
        assert_eq!(query.corpus, Corpus::All);

        let query = Query::from_json(r#"{"corpus": "COMMON_LEMMAS"}"#).unwrap();
        assert_eq!(query.corpus, Corpus::CommonLemmas);
    }

    #[test]
    fn test_from_json_rejects_invalid_selectors() {
        assert!(matches!(
            Query::from_json(r#"{"mode": "ANYWHERE"}"#),
            Err(QueryError::InvalidMode(ref m)) if m == "ANYWHERE"
        ));
        assert!(matches!(
            Query::from_json(r#"{"frequency": "RARE"}"#),
            Err(QueryError::InvalidCorpus(_))
        ));
        // Selector errors win over other problems in the same document
        assert!(matches!(
            Query::from_json(r#"{"mode": "X", "word_features": {"SYLLABLES": [1, 2, 3]}}"#),
            Err(QueryError::InvalidMode(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            Query::from_json(r#"{"word_features": {"SYLLABLES": [1, 2, 3]}}"#),
            Err(QueryError::InvalidCount { field: "SYLLABLES", .. })
        ));
        assert!(matches!(
            Query::from_json(r#"{"phone_features": [{}, {"TYPE": true}]}"#),
            Err(QueryError::InvalidFeatureValue { position: 1, .. })
        ));
        assert!(matches!(
            Query::from_json(r#"{"word_features": {"STRESS": 1}}"#),
            Err(QueryError::Json(_))
        ));
        assert!(matches!(Query::from_json("not json"), Err(QueryError::Json(_))));
    }
}
