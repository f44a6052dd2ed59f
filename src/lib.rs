//! Phonolex: phonological description and pattern search over a pronunciation lexicon
//!
//! Words are described by stress-marked phone sequences and each phone by a
//! vector of phonetic features. Queries combine word-level filters with a
//! positional pattern of feature constraints.
//! Core implementation in Rust with Python bindings.

// Core modules
pub mod arpabet; // Compact single-character transcription
pub mod descriptor; // Per-word descriptors
pub mod feature; // Feature values, comparison and the feature table
pub mod lexicon; // Validated pronunciation lexicon
pub mod loader; // Data files and paths
pub mod matcher; // Pattern alignment under a mode
pub mod parser; // Pattern language parser
pub mod pattern; // Pattern AST
pub mod phone; // Phone tokens and stress
pub mod query; // Structured queries and JSON query documents
pub mod searcher; // End-to-end search (filters + matcher)

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use descriptor::Description;
pub use feature::{FeatureTable, FeatureValue, FeatureVector, compare};
pub use lexicon::{Lexicon, LexiconError};
pub use loader::LexiconPaths;
pub use matcher::{Mode, matches};
pub use parser::{ParseError, parse_pattern};
pub use pattern::{Pattern, PositionConstraint};
pub use phone::{Phone, Stress};
pub use query::{CountFilter, Corpus, Query, QueryError, WordFilter};
pub use searcher::{SearchError, par_search, search, search_str};
