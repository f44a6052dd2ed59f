//! Phonetic feature values and the feature table
//!
//! Every phone in the alphabet carries a feature vector: a fixed set of named
//! features, each holding a category label, a scalar, a range (for gradient
//! features such as the height of a diphthong gliding between two targets),
//! or nothing when the feature does not apply to that class of phone.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::lexicon::LexiconError;

/// Dense index of a phone symbol in a [`FeatureTable`]
pub type PhoneId = usize;

/// Value of one feature on one phone, or one constraint in a pattern
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Category(String),
    Scalar(f64),
    /// Closed interval, always stored with `lo <= hi`
    Range(f64, f64),
    Absent,
}

impl FeatureValue {
    pub fn category(text: &str) -> Self {
        FeatureValue::Category(text.to_string())
    }

    /// Build a range, swapping reversed bounds
    pub fn range(lo: f64, hi: f64) -> Self {
        if lo <= hi {
            FeatureValue::Range(lo, hi)
        } else {
            FeatureValue::Range(hi, lo)
        }
    }

    /// Decode the JSON form used by feature tables and query documents
    ///
    /// string -> Category, number -> Scalar, `[lo, hi]` -> Range,
    /// `null` or `[null, null]` -> Absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(FeatureValue::Absent),
            Value::String(s) => Some(FeatureValue::Category(s.clone())),
            Value::Number(n) => n.as_f64().map(FeatureValue::Scalar),
            Value::Array(items) => match items.as_slice() {
                [Value::Null, Value::Null] => Some(FeatureValue::Absent),
                [lo, hi] => Some(FeatureValue::range(lo.as_f64()?, hi.as_f64()?)),
                _ => None,
            },
            Value::Bool(_) | Value::Object(_) => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FeatureValue::Absent)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Category(s) => f.write_str(s),
            FeatureValue::Scalar(v) => write!(f, "{}", v),
            FeatureValue::Range(lo, hi) => write!(f, "{}..{}", lo, hi),
            FeatureValue::Absent => f.write_str("_"),
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Category(s) => serializer.serialize_str(s),
            FeatureValue::Scalar(v) => serializer.serialize_f64(*v),
            FeatureValue::Range(lo, hi) => {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(lo)?;
                tuple.serialize_element(hi)?;
                tuple.end()
            }
            FeatureValue::Absent => serializer.serialize_none(),
        }
    }
}

/// Compare a pattern-side value against a word-side value
///
/// The first applicable rule decides:
/// 1. two categories match when the labels are equal
/// 2. two scalars match when numerically equal
/// 3. two absent values match
/// 4. a pattern range matches a word scalar inside it
/// 5. a pattern scalar matches a word range containing it
/// 6. two ranges match when the closed intervals overlap
/// 7. every other pairing fails
pub fn compare(pattern: &FeatureValue, word: &FeatureValue) -> bool {
    use FeatureValue::*;

    match (pattern, word) {
        (Category(p), Category(w)) => p == w,
        (Scalar(p), Scalar(w)) => p == w,
        (Absent, Absent) => true,
        (Range(lo, hi), Scalar(v)) | (Scalar(v), Range(lo, hi)) => *lo <= *v && *v <= *hi,
        (Range(lo1, hi1), Range(lo2, hi2)) => lo1.max(*lo2) <= hi1.min(*hi2),
        _ => false,
    }
}

/// Named feature values of one phone
pub type FeatureVector = BTreeMap<String, FeatureValue>;

/// Feature vectors for every phone symbol of the alphabet
///
/// All vectors share the same set of feature names; construction fails
/// otherwise.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    names: Vec<String>,
    symbols: Vec<String>,
    vectors: Vec<FeatureVector>,
    ids: FxHashMap<String, PhoneId>,
}

impl FeatureTable {
    /// Build a table, checking that every vector uses the same feature names
    pub fn new(
        entries: impl IntoIterator<Item = (String, FeatureVector)>,
    ) -> Result<Self, LexiconError> {
        let mut names: Option<Vec<String>> = None;
        let mut symbols = Vec::new();
        let mut vectors = Vec::new();
        let mut ids = FxHashMap::default();

        for (symbol, vector) in entries {
            let found: Vec<String> = vector.keys().cloned().collect();
            match &names {
                None => names = Some(found),
                Some(expected) if *expected != found => {
                    return Err(LexiconError::InconsistentFeatures {
                        phone: symbol,
                        expected: expected.clone(),
                        found,
                    });
                }
                Some(_) => {}
            }

            let id = match ids.get(&symbol) {
                Some(&id) => id,
                None => {
                    let id = vectors.len();
                    ids.insert(symbol.clone(), id);
                    symbols.push(symbol);
                    vectors.push(FeatureVector::new());
                    id
                }
            };
            vectors[id] = vector;
        }

        let names = names.ok_or(LexiconError::EmptyFeatureTable)?;

        Ok(Self {
            names,
            symbols,
            vectors,
            ids,
        })
    }

    /// Build a table from its JSON document: `{phone: {feature: value}}`
    pub fn from_json(document: &Value) -> Result<Self, LexiconError> {
        let Value::Object(phones) = document else {
            return Err(LexiconError::InvalidDocument {
                expected: "an object mapping phones to feature objects",
            });
        };

        let mut entries = Vec::with_capacity(phones.len());
        for (symbol, features) in phones {
            let Value::Object(features) = features else {
                return Err(LexiconError::InvalidDocument {
                    expected: "an object mapping feature names to values",
                });
            };

            let mut vector = FeatureVector::new();
            for (name, value) in features {
                let value = FeatureValue::from_json(value).ok_or_else(|| {
                    LexiconError::InvalidFeatureValue {
                        phone: symbol.clone(),
                        feature: name.clone(),
                    }
                })?;
                vector.insert(name.clone(), value);
            }
            entries.push((symbol.clone(), vector));
        }

        Self::new(entries)
    }

    pub fn id(&self, symbol: &str) -> Option<PhoneId> {
        self.ids.get(symbol).copied()
    }

    pub fn get(&self, symbol: &str) -> Option<&FeatureVector> {
        self.id(symbol).map(|id| &self.vectors[id])
    }

    /// Vector for an id handed out by this table
    pub fn vector(&self, id: PhoneId) -> &FeatureVector {
        &self.vectors[id]
    }

    pub fn symbol(&self, id: PhoneId) -> &str {
        &self.symbols[id]
    }

    /// Sorted feature names shared by every vector
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_categories() {
        let c = FeatureValue::category("C");
        assert!(compare(&c, &FeatureValue::category("C")));
        assert!(!compare(&c, &FeatureValue::category("V")));
    }

    #[test]
    fn test_compare_scalars() {
        assert!(compare(&FeatureValue::Scalar(0.5), &FeatureValue::Scalar(0.5)));
        assert!(!compare(&FeatureValue::Scalar(0.5), &FeatureValue::Scalar(0.6)));
    }

    #[test]
    fn test_compare_absent() {
        assert!(compare(&FeatureValue::Absent, &FeatureValue::Absent));
        assert!(!compare(&FeatureValue::Absent, &FeatureValue::Scalar(0.0)));
        assert!(!compare(&FeatureValue::Scalar(0.0), &FeatureValue::Absent));
        assert!(!compare(&FeatureValue::range(0.0, 1.0), &FeatureValue::Absent));
        assert!(!compare(&FeatureValue::category("C"), &FeatureValue::Absent));
    }

    #[test]
    fn test_compare_range_and_scalar() {
        let high = FeatureValue::range(0.6, 1.0);
        assert!(compare(&high, &FeatureValue::Scalar(0.8)));
        assert!(compare(&high, &FeatureValue::Scalar(0.6)));
        assert!(compare(&high, &FeatureValue::Scalar(1.0)));
        assert!(!compare(&high, &FeatureValue::Scalar(0.2)));

        // Symmetric rule: scalar pattern against a word range
        assert!(compare(&FeatureValue::Scalar(0.8), &high));
        assert!(!compare(&FeatureValue::Scalar(0.1), &high));
    }

    #[test]
    fn test_compare_range_overlap() {
        let upper = FeatureValue::range(0.5, 1.0);
        assert!(!compare(&FeatureValue::range(0.0, 0.4), &upper));
        // Touching closed intervals overlap
        assert!(compare(&FeatureValue::range(0.0, 0.5), &upper));
        assert!(compare(&FeatureValue::range(0.7, 0.8), &upper));
    }

    #[test]
    fn test_compare_type_mismatch_fails() {
        assert!(!compare(&FeatureValue::category("0.5"), &FeatureValue::Scalar(0.5)));
        assert!(!compare(&FeatureValue::Scalar(0.5), &FeatureValue::category("0.5")));
        assert!(!compare(&FeatureValue::range(0.0, 1.0), &FeatureValue::category("V")));
    }

    #[test]
    fn test_range_normalizes_bounds() {
        assert_eq!(FeatureValue::range(0.9, 0.1), FeatureValue::Range(0.1, 0.9));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(
            FeatureValue::from_json(&json!("C")),
            Some(FeatureValue::category("C"))
        );
        assert_eq!(
            FeatureValue::from_json(&json!(0.5)),
            Some(FeatureValue::Scalar(0.5))
        );
        assert_eq!(
            FeatureValue::from_json(&json!(1)),
            Some(FeatureValue::Scalar(1.0))
        );
        assert_eq!(
            FeatureValue::from_json(&json!([0.2, 0.8])),
            Some(FeatureValue::Range(0.2, 0.8))
        );
        assert_eq!(FeatureValue::from_json(&json!(null)), Some(FeatureValue::Absent));
        assert_eq!(
            FeatureValue::from_json(&json!([null, null])),
            Some(FeatureValue::Absent)
        );
        assert_eq!(FeatureValue::from_json(&json!(true)), None);
        assert_eq!(FeatureValue::from_json(&json!([0.1, 0.2, 0.3])), None);
        assert_eq!(FeatureValue::from_json(&json!(["a", "b"])), None);
    }

    #[test]
    fn test_serialize_matches_json_form() {
        let values = vec![
            FeatureValue::category("V"),
            FeatureValue::Scalar(0.5),
            FeatureValue::range(0.0, 1.0),
            FeatureValue::Absent,
        ];
        let encoded = serde_json::to_value(&values).unwrap();
        assert_eq!(encoded, json!(["V", 0.5, [0.0, 1.0], null]));
    }

    #[test]
    fn test_table_from_json() {
        let table = FeatureTable::from_json(&json!({
            "K": {"TYPE": "C", "HEIGHT": null},
            "IY": {"TYPE": "V", "HEIGHT": 1.0},
        }))
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.feature_names(), &["HEIGHT".to_string(), "TYPE".to_string()]);
        assert!(table.has_feature("TYPE"));
        assert!(!table.has_feature("SHAPE"));

        let iy = table.get("IY").unwrap();
        assert_eq!(iy["HEIGHT"], FeatureValue::Scalar(1.0));
        let id = table.id("K").unwrap();
        assert_eq!(table.symbol(id), "K");
        assert_eq!(table.vector(id)["HEIGHT"], FeatureValue::Absent);
    }

    #[test]
    fn test_table_rejects_inconsistent_names() {
        let result = FeatureTable::from_json(&json!({
            "K": {"TYPE": "C", "HEIGHT": null},
            "IY": {"TYPE": "V"},
        }));
        assert!(matches!(
            result,
            Err(LexiconError::InconsistentFeatures { ref phone, .. }) if phone == "IY"
        ));
    }

    #[test]
    fn test_table_rejects_bad_values() {
        let result = FeatureTable::from_json(&json!({"K": {"TYPE": true}}));
        assert!(matches!(result, Err(LexiconError::InvalidFeatureValue { .. })));

        let result = FeatureTable::from_json(&json!({}));
        assert!(matches!(result, Err(LexiconError::EmptyFeatureTable)));
    }
}
