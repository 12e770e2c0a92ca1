//! Module record types and ingestion-boundary normalization.
//!
//! The backend is loose about the shape of the tag field (plain string,
//! array, or a stringified JSON array) and about optional numerics. All
//! of that ambiguity is resolved here, immediately on fetch, so the rest
//! of the crate only ever sees a canonical [`ModuleRecord`].

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Dutch month names for the derived "month year" start label.
const MONTH_NAMES_NL: [&str; 12] = [
    "januari",
    "februari",
    "maart",
    "april",
    "mei",
    "juni",
    "juli",
    "augustus",
    "september",
    "oktober",
    "november",
    "december",
];

/// The tag field as delivered by the backend.
///
/// Sometimes an array, sometimes a comma-separated string, sometimes a
/// stringified JSON array inside a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagField {
    List(Vec<String>),
    Text(String),
}

impl TagField {
    /// Normalizes the raw field into an ordered list of trimmed tags.
    ///
    /// A string starting with `[` is treated as a stringified JSON array;
    /// if it fails to parse, the module is logged and treated as
    /// untagged rather than failing the whole load.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            TagField::List(tags) => clean_tags(tags.iter().map(|t| t.as_str())),
            TagField::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Vec::new();
                }
                if trimmed.starts_with('[') {
                    match serde_json::from_str::<Vec<String>>(trimmed) {
                        Ok(tags) => clean_tags(tags.iter().map(|t| t.as_str())),
                        Err(e) => {
                            warn!("Unparsable stringified tag array ({e}), treating as untagged");
                            Vec::new()
                        }
                    }
                } else {
                    clean_tags(trimmed.split(','))
                }
            }
        }
    }
}

fn clean_tags<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// A module record exactly as the backend serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawModule {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "shortDescription", alias = "shortdescription")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "learningOutcomes", alias = "learningoutcomes")]
    pub learning_outcomes: Option<String>,
    #[serde(default, alias = "studycredit", alias = "ec")]
    pub credits: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub difficulty: u32,
    #[serde(default)]
    pub tags: Option<TagField>,
    #[serde(default, alias = "startDate", alias = "startdate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "popularityScore", alias = "popularity_score")]
    pub popularity: f64,
    #[serde(default, alias = "availableSpots", alias = "available_spots")]
    pub available_spots: u32,
    #[serde(default, alias = "interestScore", alias = "interest_score")]
    pub interest_score: f64,
}

/// A normalized module record.
///
/// Fetched read-only from the backend; the only client-side mutations are
/// the derived fields (parsed tags, start label) computed at ingestion
/// and the `recommended` flag set from the signed-in user's saved list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleRecord {
    pub id: String,
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub credits: f64,
    pub location: String,
    pub level: u32,
    pub difficulty: u32,
    /// Canonical ordered tag list, normalized from the raw tag field
    pub tags: Vec<String>,
    pub start_date: Option<NaiveDate>,
    /// Derived "month year" label, e.g. "september 2026"
    pub start_label: Option<String>,
    pub popularity: f64,
    pub available_spots: u32,
    pub interest_score: f64,
    /// True when the module is on the user's saved/recommended list
    pub recommended: bool,
}

impl ModuleRecord {
    pub fn from_raw(raw: RawModule) -> Self {
        let tags = raw.tags.as_ref().map(TagField::normalize).unwrap_or_default();
        let start_date = raw.start_date.as_deref().and_then(parse_start_date);
        let start_label = start_date.map(month_year_label);

        Self {
            id: raw.id,
            name: raw.name,
            short_description: raw.short_description,
            description: raw.description,
            learning_outcomes: raw.learning_outcomes,
            credits: raw.credits,
            location: raw.location,
            level: raw.level,
            difficulty: raw.difficulty,
            tags,
            start_date,
            start_label,
            popularity: raw.popularity,
            available_spots: raw.available_spots,
            interest_score: raw.interest_score,
            recommended: false,
        }
    }

    /// All tags joined and lowercased, for substring matching.
    pub fn tag_blob(&self) -> String {
        self.tags.join(", ").to_lowercase()
    }
}

/// Parses a backend start date: RFC 3339 first, then bare date formats.
pub fn parse_start_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(trimmed, "%d-%m-%Y").ok()
}

/// Formats a date as a Dutch "month year" label.
pub fn month_year_label(date: NaiveDate) -> String {
    use chrono::Datelike;

    let month = MONTH_NAMES_NL[(date.month0()) as usize];
    format!("{} {}", month, date.year())
}
