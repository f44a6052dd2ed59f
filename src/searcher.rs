//! End-to-end lexicon search
//!
//! The search pipeline:
//! 1. Validate the pattern's feature names against the feature table
//! 2. Select the corpus word list
//! 3. Apply the word-level filters
//! 4. Align the pattern with each surviving word's feature sequence
//!
//! Results keep corpus order.

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::lexicon::Lexicon;
use crate::matcher::{Mode, matches};
use crate::parser::{ParseError, parse_pattern};
use crate::query::{Corpus, Query, QueryError, WordFilter};

/// Error during search
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Search error: position {position} constrains unknown feature {feature:?}")]
    UnknownFeature { position: usize, feature: String },
}

/// Reject patterns naming features the lexicon does not define
fn validate(lexicon: &Lexicon, query: &Query) -> Result<(), SearchError> {
    let table = lexicon.features();
    match query
        .pattern
        .constrained_features()
        .find(|(_, name)| !table.has_feature(name))
    {
        Some((position, feature)) => Err(SearchError::UnknownFeature {
            position,
            feature: feature.to_string(),
        }),
        None => Ok(()),
    }
}

/// Whether one word satisfies every part of the query
fn accepts(lexicon: &Lexicon, query: &Query, word: &str) -> bool {
    if !query.filter.accepts(lexicon, word) {
        return false;
    }
    if query.pattern.is_empty() {
        return true;
    }

    lexicon
        .feature_sequence(word)
        .is_some_and(|sequence| matches(&sequence, &query.pattern, query.mode))
}

/// Run a query over its corpus
///
/// Returns the matching words in corpus order.
pub fn search<'a>(lexicon: &'a Lexicon, query: &Query) -> Result<Vec<&'a str>, SearchError> {
    validate(lexicon, query)?;

    let words = query.corpus.words(lexicon);
    let results: Vec<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|word| accepts(lexicon, query, word))
        .collect();

    debug!(
        corpus = %query.corpus,
        mode = %query.mode,
        pattern = %query.pattern,
        scanned = words.len(),
        matches = results.len(),
        "search finished"
    );

    Ok(results)
}

/// [`search`] with the corpus scanned on the rayon thread pool
///
/// The result is identical to the sequential search, order included.
pub fn par_search<'a>(lexicon: &'a Lexicon, query: &Query) -> Result<Vec<&'a str>, SearchError> {
    validate(lexicon, query)?;

    let words = query.corpus.words(lexicon);
    let results: Vec<&str> = words
        .par_iter()
        .map(String::as_str)
        .filter(|word| accepts(lexicon, query, word))
        .collect();

    debug!(
        corpus = %query.corpus,
        mode = %query.mode,
        pattern = %query.pattern,
        scanned = words.len(),
        matches = results.len(),
        "parallel search finished"
    );

    Ok(results)
}

/// Search with a pattern string
///
/// Parses the pattern and then searches the lexicon.
pub fn search_str<'a>(
    lexicon: &'a Lexicon,
    pattern: &str,
    filter: WordFilter,
    mode: Mode,
    corpus: Corpus,
) -> Result<Vec<&'a str>, SearchError> {
    let query = Query {
        filter,
        pattern: parse_pattern(pattern)?,
        mode,
        corpus,
    };
    search(lexicon, &query)
}
