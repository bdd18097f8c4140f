//! The expression dataset: validation of records loaded from JSON, the topic catalog, and a
//! summary of how complexity is distributed over a dataset.
//!
//! A payload is an object with an `expressions` array. Every record is validated on its own;
//! the first invalid record aborts loading with an error naming it.
//!
//! ```rust
//! use latex_drill::{complexity::Difficulty, dataset::load_expressions_from_json};
//!
//! let payload = r#"{ "expressions": [{
//!     "id": "quadratic",
//!     "name": "Quadratic formula",
//!     "latex": "x = \\frac{-b \\pm \\sqrt{b^2 - 4ac}}{2a}",
//!     "difficulty": "intermediate",
//!     "complexityBand": "intermediate",
//!     "complexityScore": 41,
//!     "topics": ["algebra"],
//!     "subtopics": ["quadratics"]
//! }] }"#;
//!
//! let expressions = load_expressions_from_json(payload).unwrap();
//! assert_eq!(expressions[0].difficulty, Difficulty::Intermediate);
//! ```
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::complexity::{analyze_latex_complexity, ComplexityFeatures, Difficulty};

/// The subtopic used for expressions that list none.
pub const FALLBACK_SUBTOPIC: &str = "fundamentals";

/// Keys every `complexityFeatures` object must carry.
const FEATURE_KEYS: [&str; 18] = [
    "nonWhitespaceChars",
    "commandCount",
    "commandNameChars",
    "controlSymbolEscapes",
    "delimiterGroupTokens",
    "maxGroupDepth",
    "scriptOperatorCount",
    "maxScriptDepth",
    "fracRootBinomCount",
    "fracRootBinomDepth",
    "largeOperatorCount",
    "relationOperatorCount",
    "delimiterSizingCount",
    "matrixAlignmentComplexity",
    "accentDecoratorCount",
    "commandRarityLoad",
    "unknownCommandCount",
    "knownCommandCount",
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload must be an object with an `expressions` array")]
    MissingExpressions,
    #[error("expression at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("duplicate expression id `{0}`")]
    DuplicateId(String),
    #[error("expression `{id}`: unknown topic ids: {}", topics.join(", "))]
    UnknownTopics { id: String, topics: Vec<String> },
}

/// A subject area expressions are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Topic {
    pub id: &'static str,
    pub label: &'static str,
    /// Position of the topic in listings, starting at 1.
    pub order: u8,
}

impl Topic {
    const fn new(id: &'static str, label: &'static str, order: u8) -> Self {
        Self { id, label, order }
    }
}

pub const TOPICS: [Topic; 15] = [
    Topic::new("algebra", "algebra", 1),
    Topic::new("geometry", "geometry", 2),
    Topic::new("trigonometry", "trigonometry", 3),
    Topic::new("calculus", "calculus", 4),
    Topic::new("linear-algebra", "linear algebra", 5),
    Topic::new("differential-equations", "differential equations", 6),
    Topic::new("probability", "probability", 7),
    Topic::new("statistics", "statistics", 8),
    Topic::new("number-theory", "number theory", 9),
    Topic::new("set-logic", "set logic", 10),
    Topic::new("complex-analysis", "complex analysis", 11),
    Topic::new("vector-calculus", "vector calculus", 12),
    Topic::new("mathematical-physics", "mathematical physics", 13),
    Topic::new("special-functions", "special functions", 14),
    Topic::new("optimization", "optimization", 15),
];

pub fn topic(id: &str) -> Option<&'static Topic> {
    TOPICS.iter().find(|topic| topic.id == id)
}

/// A practice expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    pub id: String,
    pub latex: String,
    pub difficulty: Difficulty,
    /// Score in `[0, 100]`.
    pub complexity_score: f64,
    /// Always equal to `difficulty`.
    pub complexity_band: Difficulty,
    pub name: String,
    pub topics: Vec<String>,
    pub subtopics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_features: Option<ComplexityFeatures>,
}

impl Expression {
    /// Build an expression whose score, band and features are computed from its markup.
    pub fn analyzed(
        id: impl Into<String>,
        name: impl Into<String>,
        latex: impl Into<String>,
        topics: Vec<String>,
        subtopics: Vec<String>,
    ) -> Self {
        let latex = latex.into();
        let report = analyze_latex_complexity(&latex);
        Self {
            id: id.into(),
            latex,
            difficulty: report.band,
            complexity_score: f64::from(report.score),
            complexity_band: report.band,
            name: name.into(),
            topics,
            subtopics,
            complexity_features: Some(report.features),
        }
    }
}

/// The subtopics of an expression, deduplicated and without blank entries.
///
/// Falls back to [`FALLBACK_SUBTOPIC`] if nothing is left.
pub fn topic_scoped_subtopics(expression: &Expression) -> Vec<&str> {
    let mut seen = HashSet::new();
    let subtopics: Vec<&str> = expression
        .subtopics
        .iter()
        .map(String::as_str)
        .filter(|subtopic| !subtopic.trim().is_empty() && seen.insert(*subtopic))
        .collect();
    if subtopics.is_empty() {
        vec![FALLBACK_SUBTOPIC]
    } else {
        subtopics
    }
}

/// Parse and validate a JSON payload of expressions.
pub fn load_expressions_from_json(json: &str) -> Result<Vec<Expression>, DatasetError> {
    let payload: Value = serde_json::from_str(json)?;
    load_expressions(&payload)
}

/// Validate an already parsed payload of expressions.
pub fn load_expressions(payload: &Value) -> Result<Vec<Expression>, DatasetError> {
    let records = payload
        .get("expressions")
        .and_then(Value::as_array)
        .ok_or(DatasetError::MissingExpressions)?;

    let expressions = records
        .iter()
        .enumerate()
        .map(|(index, record)| validate_record(record, index))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    for expression in &expressions {
        if !seen.insert(expression.id.as_str()) {
            return Err(DatasetError::DuplicateId(expression.id.clone()));
        }
    }
    Ok(expressions)
}

fn invalid(index: usize, reason: impl Into<String>) -> DatasetError {
    DatasetError::InvalidRecord {
        index,
        reason: reason.into(),
    }
}

fn required_string(
    record: &Map<String, Value>,
    key: &str,
    index: usize,
) -> Result<String, DatasetError> {
    match record.get(key).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value.to_owned()),
        _ => Err(invalid(index, format!("{key} is required"))),
    }
}

fn band(record: &Map<String, Value>, key: &str, index: usize) -> Result<Difficulty, DatasetError> {
    record
        .get(key)
        .and_then(Value::as_str)
        .and_then(Difficulty::from_name)
        .ok_or_else(|| {
            invalid(
                index,
                format!("{key} must be beginner, intermediate, or advanced"),
            )
        })
}

fn string_array(
    record: &Map<String, Value>,
    key: &str,
    index: usize,
) -> Result<Vec<String>, DatasetError> {
    let error = || invalid(index, format!("{key} must be a non-empty string array"));
    let items = record.get(key).and_then(Value::as_array).ok_or_else(error)?;
    if items.is_empty() {
        return Err(error());
    }
    items
        .iter()
        .map(|item| item.as_str().map(str::to_owned).ok_or_else(error))
        .collect()
}

/// Validate a single record of the `expressions` array.
pub fn validate_record(record: &Value, index: usize) -> Result<Expression, DatasetError> {
    let record = record
        .as_object()
        .ok_or_else(|| invalid(index, "record must be an object"))?;

    let id = required_string(record, "id", index)?;
    let latex = required_string(record, "latex", index)?;
    let name = required_string(record, "name", index)?;

    let difficulty = band(record, "difficulty", index)?;
    let complexity_band = band(record, "complexityBand", index)?;
    if difficulty != complexity_band {
        return Err(invalid(index, "difficulty must equal complexityBand"));
    }

    let complexity_score = record
        .get("complexityScore")
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite() && (0. ..=100.).contains(score))
        .ok_or_else(|| invalid(index, "complexityScore must be in range 0..100"))?;

    let topics = string_array(record, "topics", index)?;
    let unknown: Vec<String> = topics
        .iter()
        .filter(|id| topic(id).is_none())
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(DatasetError::UnknownTopics { id, topics: unknown });
    }
    let subtopics = string_array(record, "subtopics", index)?;

    let complexity_features = match record.get("complexityFeatures") {
        None => None,
        Some(value) => Some(validate_features(value, index)?),
    };

    Ok(Expression {
        id,
        latex,
        difficulty,
        complexity_score,
        complexity_band,
        name,
        topics,
        subtopics,
        complexity_features,
    })
}

fn validate_features(value: &Value, index: usize) -> Result<ComplexityFeatures, DatasetError> {
    let features = value
        .as_object()
        .ok_or_else(|| invalid(index, "complexityFeatures must be an object when provided"))?;
    for key in FEATURE_KEYS {
        let finite = features
            .get(key)
            .and_then(Value::as_f64)
            .is_some_and(f64::is_finite);
        if !finite {
            return Err(invalid(
                index,
                format!("complexityFeatures.{key} must be a finite number"),
            ));
        }
    }
    ComplexityFeatures::deserialize(value)
        .map_err(|err| invalid(index, format!("complexityFeatures: {err}")))
}

/// How the expressions of a dataset spread over the difficulty bands and the score range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityDistribution {
    pub total: usize,
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
    pub min_score: f64,
    pub max_score: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

impl ComplexityDistribution {
    pub fn from_expressions<'a>(expressions: impl IntoIterator<Item = &'a Expression>) -> Self {
        let mut distribution = Self::default();
        let mut scores = Vec::new();
        for expression in expressions {
            distribution.total += 1;
            match expression.difficulty {
                Difficulty::Beginner => distribution.beginner += 1,
                Difficulty::Intermediate => distribution.intermediate += 1,
                Difficulty::Advanced => distribution.advanced += 1,
            }
            scores.push(expression.complexity_score);
        }
        scores.sort_by(f64::total_cmp);

        distribution.min_score = scores.first().copied().unwrap_or(0.);
        distribution.max_score = scores.last().copied().unwrap_or(0.);
        distribution.p10 = percentile(&scores, 10.);
        distribution.p50 = percentile(&scores, 50.);
        distribution.p90 = percentile(&scores, 90.);
        distribution
    }

    pub fn count(&self, band: Difficulty) -> usize {
        match band {
            Difficulty::Beginner => self.beginner,
            Difficulty::Intermediate => self.intermediate,
            Difficulty::Advanced => self.advanced,
        }
    }

    /// Fraction of the expressions in the band, `0` for an empty dataset.
    pub fn ratio(&self, band: Difficulty) -> f64 {
        if self.total == 0 {
            0.
        } else {
            self.count(band) as f64 / self.total as f64
        }
    }
}

/// The value at the floor index `p% * (n - 1)` of sorted values, or `0` if there are none.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.;
    }
    let index = ((p / 100.) * (sorted.len() - 1) as f64).floor() as usize;
    sorted.get(index).copied().unwrap_or(0.)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record() -> Value {
        json!({
            "id": "expr-1",
            "latex": "a+b",
            "name": "Sum",
            "difficulty": "beginner",
            "complexityBand": "beginner",
            "complexityScore": 3,
            "topics": ["algebra"],
            "subtopics": ["fundamentals"],
        })
    }

    fn reason(err: DatasetError) -> String {
        match err {
            DatasetError::InvalidRecord { reason, .. } => reason,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_record() {
        let expression = validate_record(&record(), 0).unwrap();
        assert_eq!(expression.id, "expr-1");
        assert_eq!(expression.complexity_score, 3.);
        assert_eq!(expression.complexity_features, None);
    }

    #[test]
    fn invalid_records() {
        let cases = [
            ("id", json!("  "), "id is required"),
            ("latex", json!(null), "latex is required"),
            ("difficulty", json!("expert"), "difficulty must be"),
            ("complexityBand", json!("advanced"), "difficulty must equal complexityBand"),
            ("complexityScore", json!(101), "complexityScore"),
            ("complexityScore", json!("3"), "complexityScore"),
            ("topics", json!([]), "topics must be"),
            ("subtopics", json!(["a", 1]), "subtopics must be"),
            ("complexityFeatures", json!({ "commandCount": 1 }), "nonWhitespaceChars"),
        ];
        for (key, value, expected) in cases {
            let mut record = record();
            record[key] = value;
            let reason = reason(validate_record(&record, 4).unwrap_err());
            assert!(reason.contains(expected), "{key}: {reason}");
        }
    }

    #[test]
    fn unknown_topics() {
        let mut record = record();
        record["topics"] = json!(["algebra", "real-analysis", "alchemy"]);
        match validate_record(&record, 0).unwrap_err() {
            DatasetError::UnknownTopics { id, topics } => {
                assert_eq!(id, "expr-1");
                assert_eq!(topics, ["real-analysis", "alchemy"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn features_round_trip() {
        let mut record = record();
        let features = analyze_latex_complexity("a+b").features;
        record["complexityFeatures"] = serde_json::to_value(features).unwrap();
        let expression = validate_record(&record, 0).unwrap();
        assert_eq!(expression.complexity_features, Some(features));
    }

    #[test]
    fn subtopics_fallback() {
        let mut expression = Expression::analyzed(
            "e",
            "E",
            "x",
            vec!["algebra".to_owned()],
            vec!["b".to_owned(), " ".to_owned(), "a".to_owned(), "b".to_owned()],
        );
        assert_eq!(topic_scoped_subtopics(&expression), ["b", "a"]);
        expression.subtopics = vec!["".to_owned()];
        assert_eq!(topic_scoped_subtopics(&expression), [FALLBACK_SUBTOPIC]);
        expression.subtopics.clear();
        assert_eq!(topic_scoped_subtopics(&expression), [FALLBACK_SUBTOPIC]);
    }

    #[test]
    fn percentiles() {
        let scores = [5., 10., 20., 30., 40., 50., 60., 70., 80., 90., 100.];
        assert_eq!(percentile(&scores, 10.), 10.);
        assert_eq!(percentile(&scores, 50.), 50.);
        assert_eq!(percentile(&scores, 90.), 90.);
        assert_eq!(percentile(&[7.], 90.), 7.);
        assert_eq!(percentile(&[], 50.), 0.);
        assert_eq!(percentile(&[1., 2., 3., 4.], 50.), 2.);
    }

    #[test]
    fn topic_catalog() {
        assert_eq!(TOPICS.len(), 15);
        for (position, topic) in TOPICS.iter().enumerate() {
            assert_eq!(usize::from(topic.order), position + 1);
            assert_eq!(topic.label, topic.id.replace('-', " "));
        }
        assert_eq!(topic("set-logic").map(|t| t.label), Some("set logic"));
        assert!(topic("real-analysis").is_none());
    }
}
