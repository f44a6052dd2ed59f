//! Reading lexicon data from disk
//!
//! JSON documents and word lists are read transparently from plain or
//! gzip-compressed files (by `.gz` extension).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use bstr::io::BufReadExt;
use flate2::read::MultiGzDecoder;
use serde_json::Value;
use tracing::{debug, warn};

use crate::feature::FeatureTable;
use crate::lexicon::{Lexicon, LexiconError};

/// Locations of the four lexicon data files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconPaths {
    pub vocabulary: PathBuf,
    pub features: PathBuf,
    pub common_words: PathBuf,
    pub common_lemmas: PathBuf,
}

impl LexiconPaths {
    pub const VOCABULARY: &'static str = "cmu.json";
    pub const FEATURES: &'static str = "features.json";
    pub const COMMON_WORDS: &'static str = "commonwords.txt";
    pub const COMMON_LEMMAS: &'static str = "commonlemmas.txt";

    /// The default file names inside a data directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vocabulary: dir.join(Self::VOCABULARY),
            features: dir.join(Self::FEATURES),
            common_words: dir.join(Self::COMMON_WORDS),
            common_lemmas: dir.join(Self::COMMON_LEMMAS),
        }
    }
}

impl Default for LexiconPaths {
    fn default() -> Self {
        Self::in_dir("data")
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> LexiconError + '_ {
    move |source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Open a file for buffered reading, decompressing `.gz` files
fn open(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read a whole JSON document
pub fn read_json(path: &Path) -> Result<Value, LexiconError> {
    let reader = open(path).map_err(io_error(path))?;
    serde_json::from_reader(reader).map_err(|source| LexiconError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a word list: one word per line, trimmed and lowercased, blanks skipped
pub fn read_word_list(path: &Path) -> Result<Vec<String>, LexiconError> {
    let mut reader = open(path).map_err(io_error(path))?;
    let mut words = Vec::new();

    reader
        .for_byte_line(|line| {
            let line = line.trim();
            if !line.is_empty() {
                words.push(line.to_str_lossy().to_lowercase());
            }
            Ok(true)
        })
        .map_err(io_error(path))?;

    Ok(words)
}

/// Read an optional word list; a missing file gives an empty list
fn read_optional_word_list(path: &Path) -> Result<Vec<String>, LexiconError> {
    match read_word_list(path) {
        Err(LexiconError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "word list not found, using an empty list");
            Ok(Vec::new())
        }
        result => result,
    }
}

impl Lexicon {
    /// Load and validate a lexicon with its curated word lists
    pub fn load(paths: &LexiconPaths) -> Result<Self, LexiconError> {
        debug!(vocabulary = %paths.vocabulary.display(), features = %paths.features.display(), "loading lexicon");

        let features = FeatureTable::from_json(&read_json(&paths.features)?)?;
        let lexicon = Lexicon::from_json(&read_json(&paths.vocabulary)?, features)?;

        Ok(lexicon
            .with_common_words(read_optional_word_list(&paths.common_words)?)
            .with_common_lemmas(read_optional_word_list(&paths.common_lemmas)?))
    }
}
