//! Generic predicate engine for the analysis panel.
//!
//! Items are arbitrary JSON objects; a [`FilterCondition`] names a field
//! and compares its value with an operator. All conditions must hold
//! (logical AND). Evaluation never fails: an operator this build does not
//! know deserializes to [`FilterOperator::Unknown`] and rejects every item.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    /// Inclusive on both ends; the value is a two-element array `[lo, hi]`.
    Between,
    #[serde(other)]
    Unknown,
}

impl FilterOperator {
    /// Parse a wire tag such as `"greater_than"`. Unrecognised tags map to
    /// [`FilterOperator::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        serde_json::from_value(Value::String(tag.to_string())).unwrap_or(Self::Unknown)
    }
}

/// One predicate over a named field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCondition {
    pub id: String,
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
    /// Human-readable description for display.
    #[serde(default)]
    pub label: String,
}

/// Keep the items that satisfy every condition. Input order is preserved.
pub fn apply_filters(items: &[Value], conditions: &[FilterCondition]) -> Vec<Value> {
    items
        .iter()
        .filter(|item| conditions.iter().all(|c| matches(item, c)))
        .cloned()
        .collect()
}

/// Evaluate a single condition against `item`.
///
/// A field the item does not have is treated as `null`.
pub fn matches(item: &Value, cond: &FilterCondition) -> bool {
    let field = item.get(&cond.field).unwrap_or(&Value::Null);

    match cond.operator {
        FilterOperator::Equals => values_equal(field, &cond.value),
        FilterOperator::NotEquals => !values_equal(field, &cond.value),
        FilterOperator::Contains => lower_text(field).contains(&lower_text(&cond.value)),
        FilterOperator::NotContains => !lower_text(field).contains(&lower_text(&cond.value)),
        FilterOperator::StartsWith => lower_text(field).starts_with(&lower_text(&cond.value)),
        FilterOperator::EndsWith => lower_text(field).ends_with(&lower_text(&cond.value)),
        FilterOperator::GreaterThan => match (as_number(field), as_number(&cond.value)) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        },
        FilterOperator::LessThan => match (as_number(field), as_number(&cond.value)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        },
        FilterOperator::Between => match (as_number(field), bounds(&cond.value)) {
            (Some(x), Some((lo, hi))) => lo <= x && x <= hi,
            _ => false,
        },
        FilterOperator::Unknown => false,
    }
}

/// Strict equality; numbers compare by value so `2020` equals `2020.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn bounds(value: &Value) -> Option<(f64, f64)> {
    match value.as_array().map(Vec::as_slice) {
        Some([lo, hi]) => Some((as_number(lo)?, as_number(hi)?)),
        _ => None,
    }
}

/// Numeric coercion: numbers, numeric strings, and booleans.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    n.filter(|x| x.is_finite())
}

/// String coercion: `null` becomes empty, strings are taken verbatim,
/// everything else uses its JSON text.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn lower_text(value: &Value) -> String {
    as_text(value).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(field: &str, operator: FilterOperator, value: Value) -> FilterCondition {
        FilterCondition {
            id: "f1".into(),
            field: field.into(),
            operator,
            value,
            label: String::new(),
        }
    }

    #[test]
    fn test_between_is_inclusive() {
        let items = vec![
            json!({"year": 2019}),
            json!({"year": 2020}),
            json!({"year": 2023}),
            json!({"year": 2024}),
        ];
        let out = apply_filters(
            &items,
            &[cond("year", FilterOperator::Between, json!([2020, 2023]))],
        );
        assert_eq!(out, vec![json!({"year": 2020}), json!({"year": 2023})]);
    }

    #[test]
    fn test_between_with_malformed_bounds_rejects() {
        let items = vec![json!({"year": 2020})];
        let out = apply_filters(&items, &[cond("year", FilterOperator::Between, json!(2020))]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_string_operators_ignore_case() {
        let item = json!({"location": "Shizuoka Hills"});
        assert!(matches(&item, &cond("location", FilterOperator::Contains, json!("HILL"))));
        assert!(matches(&item, &cond("location", FilterOperator::StartsWith, json!("shizu"))));
        assert!(matches(&item, &cond("location", FilterOperator::EndsWith, json!("hills"))));
        assert!(!matches(&item, &cond("location", FilterOperator::NotContains, json!("hills"))));
    }

    #[test]
    fn test_contains_coerces_numbers_to_text() {
        let item = json!({"year": 2021});
        assert!(matches(&item, &cond("year", FilterOperator::Contains, json!("202"))));
    }

    #[test]
    fn test_numeric_comparisons_coerce_strings() {
        let item = json!({"height": "42.5"});
        assert!(matches(&item, &cond("height", FilterOperator::GreaterThan, json!(40))));
        assert!(matches(&item, &cond("height", FilterOperator::LessThan, json!("50"))));
        assert!(!matches(&item, &cond("height", FilterOperator::GreaterThan, json!("abc"))));
    }

    #[test]
    fn test_equals_is_strict_but_numeric_by_value() {
        let item = json!({"score": 3, "status": "active"});
        assert!(matches(&item, &cond("score", FilterOperator::Equals, json!(3.0))));
        assert!(!matches(&item, &cond("score", FilterOperator::Equals, json!("3"))));
        assert!(matches(&item, &cond("status", FilterOperator::NotEquals, json!("discarded"))));
    }

    #[test]
    fn test_unknown_operator_fails_closed() {
        let c: FilterCondition = serde_json::from_value(json!({
            "id": "x", "field": "year", "operator": "regex_match", "value": ".*"
        }))
        .unwrap();
        assert_eq!(c.operator, FilterOperator::Unknown);
        assert!(apply_filters(&[json!({"year": 2020})], &[c]).is_empty());
    }

    #[test]
    fn test_conditions_combine_with_and() {
        let items = vec![
            json!({"location": "A", "value": 10}),
            json!({"location": "A", "value": 30}),
            json!({"location": "B", "value": 30}),
        ];
        let out = apply_filters(
            &items,
            &[
                cond("location", FilterOperator::Equals, json!("A")),
                cond("value", FilterOperator::GreaterThan, json!(20)),
            ],
        );
        assert_eq!(out, vec![json!({"location": "A", "value": 30})]);
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(FilterOperator::from_tag("starts_with"), FilterOperator::StartsWith);
        assert_eq!(FilterOperator::from_tag("nope"), FilterOperator::Unknown);
    }
}
