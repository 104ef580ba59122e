//! `teaplot analyze`: custom filters plus aggregation over one collection.
//!
//! Conditions are written `FIELD:OP:VALUE`, e.g. `year:between:2020,2023`
//! or `location:contains:shizuoka`. `VALUE` is parsed as JSON when it
//! can be (`3`, `true`, `"x"`), otherwise taken as a plain string.

use anyhow::{bail, Result};
use serde_json::Value;
use uuid::Uuid;

use teaplot_core::analysis::{analyze, to_rows, AggregationConfig, AnalysisResult};
use teaplot_core::filter::{apply_filters, FilterCondition, FilterOperator};
use teaplot_core::search::SearchCategory;

use crate::config::Config;
use crate::dataset::{load_dataset, Dataset};
use crate::search::parse_tag;

#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// `teas`, `growth`, or `health`.
    pub entity: String,
    pub value_field: Option<String>,
    pub aggregate: Option<String>,
    pub group_by: Option<String>,
    pub conditions: Vec<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub json: bool,
}

/// Parse one `FIELD:OP:VALUE` condition.
///
/// Unknown operators are kept; they reject every row when evaluated.
pub fn parse_condition(input: &str) -> Result<FilterCondition> {
    let mut parts = input.splitn(3, ':');
    let (field, op, raw) = match (parts.next(), parts.next(), parts.next()) {
        (Some(f), Some(o), Some(v)) if !f.is_empty() => (f, o, v),
        _ => bail!("invalid condition '{}': expected FIELD:OP:VALUE", input),
    };

    let operator = FilterOperator::from_tag(op);
    if operator == FilterOperator::Unknown {
        tracing::warn!(operator = op, "unknown filter operator; condition matches nothing");
    }

    let value = if operator == FilterOperator::Between {
        match raw.split_once(',') {
            Some((lo, hi)) => Value::Array(vec![parse_value(lo.trim()), parse_value(hi.trim())]),
            None => bail!("between expects LO,HI, got '{}'", raw),
        }
    } else {
        parse_value(raw)
    };

    Ok(FilterCondition {
        id: Uuid::new_v4().to_string(),
        field: field.to_string(),
        operator,
        value,
        label: format!("{} {} {}", field, op, raw),
    })
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Serialize the chosen collection into JSON rows.
pub fn rows_for(dataset: &Dataset, entity: SearchCategory) -> Result<Vec<Value>> {
    match entity {
        SearchCategory::Teas => to_rows(&dataset.cultivars),
        SearchCategory::Growth => to_rows(&dataset.growth_records),
        SearchCategory::Health => to_rows(&dataset.health_issues),
        SearchCategory::All => bail!("analyze needs one collection: teas, growth, or health"),
    }
}

/// Build the aggregation config from CLI options and config defaults.
pub fn build_config(config: &Config, args: &AnalyzeArgs) -> Result<AggregationConfig> {
    Ok(AggregationConfig {
        aggregation: match &args.aggregate {
            Some(a) => a.parse()?,
            None => config.analysis.default_aggregation,
        },
        group_by: args.group_by.clone(),
        value_field: args
            .value_field
            .clone()
            .unwrap_or_else(|| config.analysis.value_field.clone()),
        sort_by: args.sort_by.clone(),
        sort_order: match &args.order {
            Some(o) => parse_tag(o, "sort order")?,
            None => Default::default(),
        },
        limit: args.limit,
    })
}

/// Filter and aggregate `dataset` without printing.
pub fn analyze_dataset(
    dataset: &Dataset,
    entity: SearchCategory,
    conditions: &[FilterCondition],
    aggregation: &AggregationConfig,
) -> Result<AnalysisResult> {
    let rows = rows_for(dataset, entity)?;
    let filtered = apply_filters(&rows, conditions);
    tracing::info!(
        rows = rows.len(),
        kept = filtered.len(),
        conditions = conditions.len(),
        "filters applied"
    );
    Ok(analyze(&filtered, aggregation))
}

pub fn run_analyze(config: &Config, args: &AnalyzeArgs) -> Result<()> {
    let entity: SearchCategory = parse_tag(&args.entity, "entity")?;
    let conditions = args
        .conditions
        .iter()
        .map(|c| parse_condition(c))
        .collect::<Result<Vec<_>>>()?;
    let aggregation = build_config(config, args)?;

    let dataset = load_dataset(&config.data.path)?;
    let result = analyze_dataset(&dataset, entity, &conditions, &aggregation)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !conditions.is_empty() {
        println!("Filters:");
        for c in &conditions {
            println!("  {}", c.label);
        }
        println!();
    }

    println!("Rows ({}):", result.rows.len());
    for row in &result.rows {
        println!("  {}", row);
    }

    let s = &result.summary;
    println!();
    println!("Summary ({}):", aggregation.value_field);
    println!("  Total:    {}", s.total);
    println!(
        "  {:<10}{}",
        format!("{}:", s.aggregation.as_str()),
        fmt_stat(s.aggregate)
    );
    println!("  Average:  {}", fmt_stat(s.average));
    println!("  Min:      {}", fmt_stat(s.min));
    println!("  Max:      {}", fmt_stat(s.max));
    println!("  Median:   {}", fmt_stat(s.median));
    println!("  Std dev:  {}", fmt_stat(s.std_dev));

    println!();
    println!("Insights:");
    for insight in &result.insights {
        println!("  - {}", insight);
    }

    Ok(())
}

fn fmt_stat(v: Option<f64>) -> String {
    match v {
        Some(x) => format!("{:.2}", x),
        None => "undefined".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teaplot_core::analysis::AggregationType;

    #[test]
    fn test_parse_between() {
        let c = parse_condition("year:between:2020,2023").unwrap();
        assert_eq!(c.field, "year");
        assert_eq!(c.operator, FilterOperator::Between);
        assert_eq!(c.value, json!([2020, 2023]));
        assert_eq!(c.label, "year between 2020,2023");
    }

    #[test]
    fn test_parse_plain_string_and_json_values() {
        let c = parse_condition("location:contains:shizuoka").unwrap();
        assert_eq!(c.value, json!("shizuoka"));

        let c = parse_condition("growthScore:greater_than:3").unwrap();
        assert_eq!(c.value, json!(3));

        let c = parse_condition("note:contains:a:b").unwrap();
        assert_eq!(c.value, json!("a:b"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_condition("year").is_err());
        assert!(parse_condition(":equals:1").is_err());
        assert!(parse_condition("year:between:2020").is_err());
    }

    #[test]
    fn test_unknown_operator_is_kept() {
        let c = parse_condition("year:like:20%").unwrap();
        assert_eq!(c.operator, FilterOperator::Unknown);
    }

    #[test]
    fn test_build_config_defaults() {
        let config = Config::minimal("data.json");
        let agg = build_config(&config, &AnalyzeArgs::default()).unwrap();
        assert_eq!(agg.aggregation, AggregationType::Average);
        assert_eq!(agg.value_field, "value");

        let args = AnalyzeArgs {
            aggregate: Some("median".into()),
            value_field: Some("height".into()),
            ..Default::default()
        };
        let agg = build_config(&config, &args).unwrap();
        assert_eq!(agg.aggregation, AggregationType::Median);
        assert_eq!(agg.value_field, "height");
    }

    #[test]
    fn test_rows_for_all_is_rejected() {
        assert!(rows_for(&Dataset::default(), SearchCategory::All).is_err());
    }
}
