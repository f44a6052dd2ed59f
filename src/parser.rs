//! Pattern language parser
//!
//! Parses pattern strings into a [`Pattern`] using a pest grammar.

use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use crate::feature::FeatureValue;
use crate::pattern::{Pattern, PositionConstraint};

#[derive(Parser)]
#[grammar = "pattern.pest"]
struct PatternParser;

/// Error type for pattern parsing failures
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Pattern error: {0}")]
    Syntax(#[from] pest::error::Error<Rule>),

    #[error("Pattern error: invalid number {0:?}")]
    InvalidNumber(String),

    #[error("Pattern error: feature {feature:?} constrained twice at position {position}")]
    DuplicateFeature { position: usize, feature: String },

    #[error("Pattern error: unexpected {0}")]
    Unexpected(String),
}

/// Parse a pattern string such as `[TYPE="C"] [] [HEIGHT=0.6..1.0]`
///
/// The empty string parses to the empty pattern.
pub fn parse_pattern(input: &str) -> Result<Pattern, ParseError> {
    let mut pairs = PatternParser::parse(Rule::pattern, input)?;
    let mut pattern = Pattern::new();

    let Some(pattern_pair) = pairs.next() else {
        return Ok(pattern);
    };

    for pair in pattern_pair.into_inner() {
        match pair.as_rule() {
            Rule::position => {
                let position = parse_position(pair, pattern.len())?;
                pattern.add_position(position);
            }
            Rule::EOI => {} // End of input
            _ => {}
        }
    }

    Ok(pattern)
}

/// Parse one bracketed position: may be empty or comma-separated constraints
fn parse_position(
    pair: pest::iterators::Pair<Rule>,
    index: usize,
) -> Result<PositionConstraint, ParseError> {
    let mut position = PositionConstraint::new();

    for constraint in pair.into_inner() {
        let mut inner = constraint.into_inner();
        let (Some(feature), Some(value)) = (inner.next(), inner.next()) else {
            return Err(ParseError::Unexpected("constraint without a value".to_string()));
        };

        let feature = feature.as_str();
        if !position.insert(feature, parse_value(value)?) {
            return Err(ParseError::DuplicateFeature {
                position: index,
                feature: feature.to_string(),
            });
        }
    }

    Ok(position)
}

/// Parse a constraint value: string, number, range or null
fn parse_value(pair: pest::iterators::Pair<Rule>) -> Result<FeatureValue, ParseError> {
    match pair.as_rule() {
        Rule::string => Ok(FeatureValue::Category(pair.into_inner().as_str().to_string())),
        Rule::number => parse_number(pair.as_str()).map(FeatureValue::Scalar),
        Rule::range => {
            let mut bounds = pair.into_inner();
            let (Some(lo), Some(hi)) = (bounds.next(), bounds.next()) else {
                return Err(ParseError::Unexpected("range without two bounds".to_string()));
            };
            Ok(FeatureValue::range(
                parse_number(lo.as_str())?,
                parse_number(hi.as_str())?,
            ))
        }
        Rule::null => Ok(FeatureValue::Absent),
        rule => Err(ParseError::Unexpected(format!("{:?}", rule))),
    }
}

fn parse_number(text: &str) -> Result<f64, ParseError> {
    text.parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}
