//! Python bindings for phonolex
//!
//! This module provides PyO3-based Python bindings for the Rust core.

use pyo3::IntoPyObjectExt;
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use serde_json::Value;
use std::path::PathBuf;

use crate::lexicon::{Lexicon, LexiconError};
use crate::loader::LexiconPaths;
use crate::parser::parse_pattern;
use crate::query::{CountFilter, Query, QueryError, WordFilter};
use crate::searcher::{SearchError, search};

/// Convert LexiconError to Python exception
impl From<LexiconError> for PyErr {
    fn from(err: LexiconError) -> PyErr {
        match err {
            LexiconError::Io { .. } => PyIOError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

impl From<SearchError> for PyErr {
    fn from(err: SearchError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<QueryError> for PyErr {
    fn from(err: QueryError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Count filter as passed from Python: `3`, `(2, 4)` or `[2, 4]`
#[derive(FromPyObject)]
enum PyCount {
    Exact(usize),
    Bounds(Vec<usize>),
}

impl PyCount {
    fn into_filter(self, field: &'static str) -> PyResult<CountFilter> {
        match self {
            PyCount::Exact(n) => Ok(CountFilter::Exact(n)),
            PyCount::Bounds(bounds) => match bounds.as_slice() {
                [min, max] => Ok(CountFilter::range(*min, *max)),
                _ => Err(QueryError::InvalidCount {
                    field,
                    value: format!("{:?}", bounds),
                }
                .into()),
            },
        }
    }
}

fn json_to_py<'py>(py: Python<'py>, value: &Value) -> PyResult<Bound<'py, PyAny>> {
    match value {
        Value::Null => Ok(py.None().into_bound(py)),
        Value::Bool(b) => b.into_bound_py_any(py),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.into_bound_py_any(py),
            None => n.as_f64().unwrap_or(f64::NAN).into_bound_py_any(py),
        },
        Value::String(s) => s.into_bound_py_any(py),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(json_to_py(py, item)?)?;
            }
            Ok(list.into_any())
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, json_to_py(py, item)?)?;
            }
            Ok(dict.into_any())
        }
    }
}

/// A pronunciation lexicon with its phone feature table.
///
/// Loads cmu.json, features.json, commonwords.txt and commonlemmas.txt from
/// the data directory (default: ./data).
#[pyclass(name = "Phonology")]
pub struct PyPhonology {
    inner: Lexicon,
}

#[pymethods]
impl PyPhonology {
    #[new]
    #[pyo3(signature = (data_dir=None))]
    fn new(data_dir: Option<PathBuf>) -> PyResult<Self> {
        let paths = match data_dir {
            Some(dir) => LexiconPaths::in_dir(dir),
            None => LexiconPaths::default(),
        };
        Ok(Self {
            inner: Lexicon::load(&paths)?,
        })
    }

    fn is_word(&self, word: &str) -> bool {
        self.inner.is_word(word)
    }

    /// Describe a word.
    ///
    /// Returns:
    ///     dict with word, isWord, syllables, diphthongs, characters,
    ///     phonemes, phonesWithStress, phonesWithoutStress and features.
    ///     Fields other than word, isWord and characters are None for
    ///     words outside the lexicon.
    fn describe<'py>(&self, py: Python<'py>, word: &str) -> PyResult<Bound<'py, PyAny>> {
        let value = serde_json::to_value(self.inner.describe(word))
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        json_to_py(py, &value)
    }

    /// Compact transcription, one character per phone.
    fn transcribe(&self, word: &str) -> Option<String> {
        self.inner.compact_transcription(word)
    }

    /// Search the lexicon.
    ///
    /// Args:
    ///     pattern: pattern string such as '[TYPE="C"] [] [TYPE="V"]'
    ///     mode: STARTS_WITH, ENDS_WITH or CONTAINS
    ///     frequency: ALL, COMMON_WORDS or COMMON_LEMMAS
    ///     syllables, characters, phonemes: exact count or (min, max) with max excluded
    ///     contains_diphthong: required diphthong presence
    ///
    /// Returns:
    ///     list of matching words in corpus order
    #[pyo3(signature = (
        pattern="",
        mode="CONTAINS",
        frequency="ALL",
        syllables=None,
        characters=None,
        phonemes=None,
        contains_diphthong=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn search(
        &self,
        pattern: &str,
        mode: &str,
        frequency: &str,
        syllables: Option<PyCount>,
        characters: Option<PyCount>,
        phonemes: Option<PyCount>,
        contains_diphthong: Option<bool>,
    ) -> PyResult<Vec<String>> {
        let query = Query {
            mode: mode.parse().map_err(QueryError::from)?,
            corpus: frequency.parse()?,
            filter: WordFilter {
                syllables: syllables.map(|c| c.into_filter("SYLLABLES")).transpose()?,
                characters: characters.map(|c| c.into_filter("CHARACTERS")).transpose()?,
                phonemes: phonemes.map(|c| c.into_filter("PHONEMES")).transpose()?,
                contains_diphthong,
            },
            pattern: parse_pattern(pattern).map_err(SearchError::from)?,
        };

        Ok(search(&self.inner, &query)?
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Search with a JSON query document.
    fn search_json(&self, document: &str) -> PyResult<Vec<String>> {
        let query = Query::from_json(document)?;
        Ok(search(&self.inner, &query)?
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    fn __contains__(&self, word: &str) -> bool {
        self.inner.is_word(word)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "<Phonology words={} phones={}>",
            self.inner.len(),
            self.inner.features().len()
        )
    }
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn phonolex(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPhonology>()?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
