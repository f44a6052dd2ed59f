//! Phoneme patterns
//!
//! A pattern is an ordered list of positions. Each position constrains some
//! features of the phone aligned with it; a position with no constraints is a
//! wildcard.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use crate::feature::FeatureValue;

/// Feature constraints on one phone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionConstraint {
    features: BTreeMap<String, FeatureValue>,
}

impl PositionConstraint {
    /// The wildcard position
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PositionConstraint::insert`]
    pub fn with(mut self, feature: &str, value: FeatureValue) -> Self {
        self.features.insert(feature.to_string(), value);
        self
    }

    /// Add a constraint; returns false if the feature was already constrained
    pub fn insert(&mut self, feature: &str, value: FeatureValue) -> bool {
        match self.features.entry(feature.to_owned()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(value);
                true
            }
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureValue> {
        self.features.get(feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl fmt::Display for PositionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                FeatureValue::Category(s) => write!(f, "{}={:?}", name, s)?,
                FeatureValue::Absent => write!(f, "{}=null", name)?,
                _ => write!(f, "{}={}", name, value)?,
            }
        }
        f.write_str("]")
    }
}

/// An ordered sequence of position constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    positions: Vec<PositionConstraint>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, position: PositionConstraint) {
        self.positions.push(position);
    }

    /// Builder form of [`Pattern::add_position`]
    pub fn then(mut self, position: PositionConstraint) -> Self {
        self.positions.push(position);
        self
    }

    pub fn positions(&self) -> &[PositionConstraint] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Every (position, feature name) pair the pattern constrains
    pub fn constrained_features(&self) -> impl Iterator<Item = (usize, &str)> {
        self.positions
            .iter()
            .enumerate()
            .flat_map(|(i, position)| position.iter().map(move |(name, _)| (i, name)))
    }
}

impl FromIterator<PositionConstraint> for Pattern {
    fn from_iter<I: IntoIterator<Item = PositionConstraint>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, position) in self.positions.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", position)?;
        }
        Ok(())
    }
}
