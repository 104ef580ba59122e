//! Core data models for breeding-trial records.
//!
//! These types represent the cultivars, growth records, and health issues
//! that the application layer owns and passes into the search and
//! analysis functions. The core only reads them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a cultivar is still part of the trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultivarStatus {
    Active,
    Discarded,
}

impl CultivarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Discarded => "discarded",
        }
    }
}

/// Weather observed when a growth record was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Disease,
    Pest,
    Nutrition,
    Environmental,
    Other,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disease => "disease",
            Self::Pest => "pest",
            Self::Nutrition => "nutrition",
            Self::Environmental => "environmental",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Recurred,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Recurred => "recurred",
        }
    }
}

/// Direction applied uniformly to a sort comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Apply this direction to an ascending comparison.
    pub fn apply(&self, ord: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

/// A tea variety or breeding line under trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cultivar {
    pub id: String,
    pub name: String,
    pub generation: String,
    pub location: String,
    pub year: i32,
    /// Percentage in `0..=100`.
    pub germination_rate: f64,
    /// Rating in `1..=5`.
    pub growth_score: u8,
    /// Rating in `1..=5`.
    pub disease_resistance: u8,
    #[serde(default)]
    pub aroma: String,
    #[serde(default)]
    pub note: String,
    pub status: CultivarStatus,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A dated growth observation for one cultivar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthRecord {
    pub id: String,
    pub cultivar_id: String,
    pub date: NaiveDate,
    /// Plant height in centimetres.
    pub height: f64,
    pub leaf_count: u32,
    pub weather: Weather,
    /// Air temperature in °C.
    pub temperature: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A disease, pest, or other health problem observed on a cultivar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIssue {
    pub id: String,
    pub cultivar_id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    pub status: IssueStatus,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Discriminant for the three searchable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Tea,
    Growth,
    Health,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tea => "tea",
            Self::Growth => "growth",
            Self::Health => "health",
        }
    }
}

/// A borrowed reference to one caller-owned entity.
///
/// Scoring and result construction dispatch on this enum instead of
/// probing which fields an entity carries.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum EntityRef<'a> {
    Cultivar(&'a Cultivar),
    Growth(&'a GrowthRecord),
    Health(&'a HealthIssue),
}

impl<'a> EntityRef<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Cultivar(_) => EntityKind::Tea,
            Self::Growth(_) => EntityKind::Growth,
            Self::Health(_) => EntityKind::Health,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            Self::Cultivar(c) => &c.id,
            Self::Growth(g) => &g.id,
            Self::Health(h) => &h.id,
        }
    }

    /// Orderable date key as a Unix timestamp.
    ///
    /// A cultivar only carries a year, which is placed at January 1st so
    /// all three kinds sort on one timeline.
    pub fn date_key(&self) -> i64 {
        match self {
            Self::Cultivar(c) => NaiveDate::from_ymd_opt(c.year, 1, 1)
                .map(day_timestamp)
                .unwrap_or(0),
            Self::Growth(g) => day_timestamp(g.date),
            Self::Health(h) => day_timestamp(h.date),
        }
    }
}

/// Midnight UTC of `date` as a Unix timestamp.
pub fn day_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
