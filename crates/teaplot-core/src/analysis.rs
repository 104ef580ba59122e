//! Aggregation engine for ad-hoc numeric analysis.
//!
//! [`analyze`] takes rows that already passed the custom filters
//! ([`crate::filter`]) and reduces a numeric field, either per group or
//! over the whole set.
//!
//! # Algorithm
//!
//! 1. With `group_by`: partition rows by the text value of that field
//!    (first-appearance order) and emit one row per group:
//!    `{ <group_by>: key, "value": aggregate, "count": size }`.
//! 2. Without `group_by`: the whole filtered set is one group. The
//!    filtered rows themselves are the output, and the summary carries the
//!    population standard deviation.
//!
//!    Either way, [`Summary::aggregate`] holds the configured aggregation
//!    over every filtered row.
//! 3. Sort output rows numerically on `sort_by`, then truncate to `limit`.
//!    Rows without a numeric sort value go last in both directions.
//! 4. Derive fixed-threshold insights from the summary.
//!
//! Statistics over an empty value set are `None`, never `NaN`.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::filter::{as_number, as_text};
use crate::models::SortOrder;

pub const DEFAULT_VALUE_FIELD: &str = "value";

/// Group key used for rows whose group-by field is missing, null, or empty.
pub const NO_GROUP: &str = "(none)";

/// Standard deviation above this fraction of the average is "high variance".
const HIGH_VARIANCE_RATIO: f64 = 0.5;
/// A maximum above this multiple of the average is a "possible outlier".
const OUTLIER_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    Count,
    Sum,
    #[default]
    Average,
    Min,
    Max,
    Median,
}

impl AggregationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Min => "min",
            Self::Max => "max",
            Self::Median => "median",
        }
    }
}

impl FromStr for AggregationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "count" => Self::Count,
            "sum" => Self::Sum,
            "average" | "avg" => Self::Average,
            "min" => Self::Min,
            "max" => Self::Max,
            "median" => Self::Median,
            other => bail!(
                "Unknown aggregation: '{}'. Use count, sum, average, min, max, or median.",
                other
            ),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregationConfig {
    pub aggregation: AggregationType,
    pub group_by: Option<String>,
    /// Numeric field that is aggregated.
    pub value_field: String,
    /// Output-row field used for numeric ordering.
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub limit: Option<usize>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationType::default(),
            group_by: None,
            value_field: DEFAULT_VALUE_FIELD.to_string(),
            sort_by: None,
            sort_order: SortOrder::default(),
            limit: None,
        }
    }
}

/// Global statistics over the value field. `None` means undefined
/// (no numeric values).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    /// The configured aggregation over all filtered rows.
    pub aggregation: AggregationType,
    pub aggregate: Option<f64>,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    /// Only computed when no group-by is configured.
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub rows: Vec<Value>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, Vec<Value>>>,
    pub insights: Vec<String>,
}

/// Convert any serializable collection into JSON rows.
pub fn to_rows<T: Serialize>(items: &[T]) -> Result<Vec<Value>> {
    items
        .iter()
        .map(|item| Ok(serde_json::to_value(item)?))
        .collect()
}

/// Aggregate `items` according to `config`.
pub fn analyze(items: &[Value], config: &AggregationConfig) -> AnalysisResult {
    let values = numeric_values(items.iter(), &config.value_field);

    let mut summary = Summary {
        total: items.len(),
        aggregation: config.aggregation,
        aggregate: aggregate(config.aggregation, &values, items.len()),
        average: mean(&values),
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
        median: median(&values),
        std_dev: None,
    };

    let (mut rows, groups) = match &config.group_by {
        Some(field) => {
            let partitions = partition(items, field);
            let rows: Vec<Value> = partitions
                .iter()
                .map(|(key, members)| group_row(field, key, members, config))
                .collect();
            let groups: BTreeMap<String, Vec<Value>> = partitions
                .into_iter()
                .map(|(key, members)| (key, members.into_iter().cloned().collect()))
                .collect();
            (rows, Some(groups))
        }
        None => {
            summary.std_dev = std_dev(&values);
            (items.to_vec(), None)
        }
    };

    if let Some(sort_by) = &config.sort_by {
        rows.sort_by(|a, b| compare_numeric(a, b, sort_by, config.sort_order));
    }
    if let Some(limit) = config.limit {
        rows.truncate(limit);
    }

    let insights = insights(&summary);

    tracing::debug!(
        total = summary.total,
        rows = rows.len(),
        grouped = config.group_by.is_some(),
        "analysis complete"
    );

    AnalysisResult {
        rows,
        summary,
        groups,
        insights,
    }
}

/// Reduce `values` with `kind`. `count` is the group size, which may
/// exceed the number of numeric values.
pub fn aggregate(kind: AggregationType, values: &[f64], count: usize) -> Option<f64> {
    match kind {
        AggregationType::Count => Some(count as f64),
        AggregationType::Sum => Some(values.iter().sum()),
        AggregationType::Average => mean(values),
        AggregationType::Min => values.iter().copied().reduce(f64::min),
        AggregationType::Max => values.iter().copied().reduce(f64::max),
        AggregationType::Median => median(values),
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Middle element of the sorted values; even lengths average the two
/// central elements.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

fn numeric_values<'a>(items: impl Iterator<Item = &'a Value>, field: &str) -> Vec<f64> {
    items
        .filter_map(|item| item.get(field).and_then(as_number))
        .collect()
}

fn group_key(item: &Value, field: &str) -> String {
    let text = item.get(field).map(as_text).unwrap_or_default();
    if text.is_empty() {
        NO_GROUP.to_string()
    } else {
        text
    }
}

/// Partition rows by group key, keeping first-appearance order.
fn partition<'a>(items: &'a [Value], field: &str) -> Vec<(String, Vec<&'a Value>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&'a Value>)> = Vec::new();
    for item in items {
        let key = group_key(item, field);
        match index.get(&key) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }
    groups
}

fn group_row(field: &str, key: &str, members: &[&Value], config: &AggregationConfig) -> Value {
    let values = numeric_values(members.iter().copied(), &config.value_field);
    let value = match config.aggregation {
        AggregationType::Count => Value::from(members.len()),
        kind => aggregate(kind, &values, members.len())
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
    };

    let mut row = Map::new();
    row.insert(field.to_string(), Value::String(key.to_string()));
    row.insert("value".to_string(), value);
    row.insert("count".to_string(), Value::from(members.len()));
    Value::Object(row)
}

/// Numeric comparison on `field` in `order`. Rows without a numeric value
/// sort after all numeric rows in either direction and tie among themselves.
fn compare_numeric(a: &Value, b: &Value, field: &str, order: SortOrder) -> Ordering {
    let x = a.get(field).and_then(as_number);
    let y = b.get(field).and_then(as_number);
    match (x, y) {
        (Some(x), Some(y)) => order.apply(x.total_cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn insights(summary: &Summary) -> Vec<String> {
    let mut out = vec![format!("{} records analyzed.", summary.total)];

    if let (Some(sd), Some(avg)) = (summary.std_dev, summary.average) {
        if sd > avg * HIGH_VARIANCE_RATIO {
            out.push(format!(
                "High variance: standard deviation {:.2} exceeds half of the average {:.2}.",
                sd, avg
            ));
        }
    }
    if let (Some(max), Some(avg)) = (summary.max, summary.average) {
        if max > avg * OUTLIER_RATIO {
            out.push(format!(
                "Possible outlier: maximum {:.2} is more than twice the average {:.2}.",
                max, avg
            ));
        }
    }

    out
}
