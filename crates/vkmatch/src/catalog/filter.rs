//! Client-side filtering and sorting of the module list.
//!
//! Filtering is authoritative on the client: the full list is fetched
//! once and [`apply_filters`] re-derives the displayed list as a pure
//! function of (module list, configuration). The source list is never
//! mutated.

use super::types::ModuleRecord;

/// The interest-score range covering every module.
pub const FULL_INTEREST_RANGE: (f64, f64) = (0.0, 1.0);

/// The popularity range covering every module.
pub const FULL_POPULARITY_RANGE: (f64, f64) = (0.0, 100.0);

/// Sort order for the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Saved/recommended modules first, otherwise original order (stable)
    #[default]
    Recommended,
    /// Popularity score, descending
    Popularity,
    /// Name, case-insensitive ascending
    Alphabetical,
}

/// User-selected filter criteria.
///
/// Empty sets mean "no constraint". Range tuples are expected to satisfy
/// low <= high; an inverted range simply matches nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Free-text search over name, descriptions, outcomes, and tags
    pub search: String,
    pub locations: Vec<String>,
    pub credits: Vec<f64>,
    pub levels: Vec<u32>,
    pub difficulties: Vec<u32>,
    pub spots_range: Option<(u32, u32)>,
    /// Selected tags; a module matches when any selected tag is a
    /// case-insensitive substring of its tag blob
    pub tags: Vec<String>,
    /// Selected "month year" start labels
    pub start_labels: Vec<String>,
    /// Only applied when narrower than [`FULL_INTEREST_RANGE`]
    pub interest_range: (f64, f64),
    /// Only applied when narrower than [`FULL_POPULARITY_RANGE`]
    pub popularity_range: (f64, f64),
    pub sort: SortOrder,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search: String::new(),
            locations: Vec::new(),
            credits: Vec::new(),
            levels: Vec::new(),
            difficulties: Vec::new(),
            spots_range: None,
            tags: Vec::new(),
            start_labels: Vec::new(),
            interest_range: FULL_INTEREST_RANGE,
            popularity_range: FULL_POPULARITY_RANGE,
            sort: SortOrder::default(),
        }
    }
}

impl FilterConfig {
    fn interest_range_active(&self) -> bool {
        self.interest_range.0 > FULL_INTEREST_RANGE.0
            || self.interest_range.1 < FULL_INTEREST_RANGE.1
    }

    fn popularity_range_active(&self) -> bool {
        self.popularity_range.0 > FULL_POPULARITY_RANGE.0
            || self.popularity_range.1 < FULL_POPULARITY_RANGE.1
    }
}

/// Applies the filter configuration and sort order to a module list.
///
/// Pure: the input list is untouched and the result is a fresh list.
/// Missing optional fields compare as 0 or the empty string; no filter
/// step can panic on them. Applying the same configuration to its own
/// output yields the same list.
pub fn apply_filters(modules: &[ModuleRecord], config: &FilterConfig) -> Vec<ModuleRecord> {
    let query = config.search.trim().to_lowercase();

    let mut result: Vec<ModuleRecord> = modules
        .iter()
        .filter(|m| matches_search(m, &query))
        .filter(|m| matches_location(m, &config.locations))
        .filter(|m| config.credits.is_empty() || config.credits.contains(&m.credits))
        .filter(|m| config.levels.is_empty() || config.levels.contains(&m.level))
        .filter(|m| {
            config.difficulties.is_empty() || config.difficulties.contains(&m.difficulty)
        })
        .filter(|m| matches_spots(m, config.spots_range))
        .filter(|m| matches_tags(m, &config.tags))
        .filter(|m| matches_start_label(m, &config.start_labels))
        .filter(|m| {
            !config.interest_range_active()
                || in_range(m.interest_score, config.interest_range)
        })
        .filter(|m| {
            !config.popularity_range_active()
                || in_range(m.popularity, config.popularity_range)
        })
        .cloned()
        .collect();

    sort_modules(&mut result, config.sort);
    result
}

fn matches_search(module: &ModuleRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let fields = [
        Some(module.name.as_str()),
        module.description.as_deref(),
        module.short_description.as_deref(),
        module.learning_outcomes.as_deref(),
    ];

    fields
        .iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(query))
        || module.tag_blob().contains(query)
}

fn matches_location(module: &ModuleRecord, locations: &[String]) -> bool {
    locations.is_empty()
        || locations
            .iter()
            .any(|l| l.eq_ignore_ascii_case(&module.location))
}

fn matches_spots(module: &ModuleRecord, range: Option<(u32, u32)>) -> bool {
    match range {
        // An inverted range matches nothing; that is the caller's bug to
        // surface, not ours to crash on
        Some((lo, hi)) => module.available_spots >= lo && module.available_spots <= hi,
        None => true,
    }
}

fn matches_tags(module: &ModuleRecord, tags: &[String]) -> bool {
    if tags.is_empty() {
        return true;
    }
    let blob = module.tag_blob();
    tags.iter().any(|t| blob.contains(&t.to_lowercase()))
}

fn matches_start_label(module: &ModuleRecord, labels: &[String]) -> bool {
    if labels.is_empty() {
        return true;
    }
    match &module.start_label {
        Some(label) => labels.iter().any(|l| l == label),
        None => false,
    }
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

fn sort_modules(modules: &mut [ModuleRecord], order: SortOrder) {
    match order {
        // Stable: ties keep the backend's original ordering
        SortOrder::Recommended => modules.sort_by_key(|m| !m.recommended),
        SortOrder::Popularity => {
            modules.sort_by(|a, b| b.popularity.total_cmp(&a.popularity))
        }
        SortOrder::Alphabetical => {
            modules.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{RawModule, TagField};

    fn module(name: &str, credits: f64, tags: &str) -> ModuleRecord {
        ModuleRecord::from_raw(RawModule {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            short_description: None,
            description: None,
            learning_outcomes: None,
            credits,
            location: "Utrecht".to_string(),
            level: 0,
            difficulty: 0,
            tags: Some(TagField::Text(tags.to_string())),
            start_date: None,
            popularity: 0.0,
            available_spots: 10,
            interest_score: 0.0,
        })
    }

    fn sample() -> Vec<ModuleRecord> {
        vec![
            module("AI Basics", 6.0, "ai, data"),
            module("Art History", 3.0, "art"),
        ]
    }

    #[test]
    fn selected_tag_filters_by_substring() {
        let config = FilterConfig {
            tags: vec!["ai".to_string()],
            ..FilterConfig::default()
        };
        let result = apply_filters(&sample(), &config);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "AI Basics");
    }

    #[test]
    fn credit_set_excludes_other_values() {
        let config = FilterConfig {
            credits: vec![6.0],
            ..FilterConfig::default()
        };
        let result = apply_filters(&sample(), &config);
        assert!(result.iter().all(|m| m.credits == 6.0));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn inverted_spots_range_yields_empty_without_panicking() {
        let config = FilterConfig {
            spots_range: Some((20, 5)),
            ..FilterConfig::default()
        };
        assert!(apply_filters(&sample(), &config).is_empty());
    }

    #[test]
    fn apply_filters_is_idempotent() {
        let config = FilterConfig {
            search: "a".to_string(),
            credits: vec![3.0, 6.0],
            sort: SortOrder::Alphabetical,
            ..FilterConfig::default()
        };
        let once = apply_filters(&sample(), &config);
        let twice = apply_filters(&once, &config);
        assert_eq!(once, twice);
    }

    #[test]
    fn alphabetical_sort_is_pairwise_ordered() {
        let mut modules = sample();
        modules.push(module("aardrijkskunde in de stad", 3.0, "geo"));
        let config = FilterConfig {
            sort: SortOrder::Alphabetical,
            ..FilterConfig::default()
        };
        let result = apply_filters(&modules, &config);
        for pair in result.windows(2) {
            assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
        }
    }

    #[test]
    fn popularity_sort_is_descending() {
        let mut modules = sample();
        modules[0].popularity = 10.0;
        modules[1].popularity = 80.0;
        let config = FilterConfig {
            sort: SortOrder::Popularity,
            ..FilterConfig::default()
        };
        let result = apply_filters(&modules, &config);
        assert_eq!(result[0].name, "Art History");
    }

    #[test]
    fn recommended_sort_is_stable() {
        let mut modules = vec![
            module("Eerste", 3.0, "a"),
            module("Tweede", 3.0, "b"),
            module("Derde", 3.0, "c"),
        ];
        modules[2].recommended = true;
        let result = apply_filters(&modules, &FilterConfig::default());
        let names: Vec<&str> = result.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Derde", "Eerste", "Tweede"]);
    }

    #[test]
    fn search_covers_name_and_tags() {
        let config = FilterConfig {
            search: "DATA".to_string(),
            ..FilterConfig::default()
        };
        let result = apply_filters(&sample(), &config);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "AI Basics");

        let config = FilterConfig {
            search: "history".to_string(),
            ..FilterConfig::default()
        };
        assert_eq!(apply_filters(&sample(), &config).len(), 1);
    }

    #[test]
    fn full_score_ranges_do_not_filter() {
        // interest_score is 0.0 on all samples; the full range keeps them
        let result = apply_filters(&sample(), &FilterConfig::default());
        assert_eq!(result.len(), 2);

        let config = FilterConfig {
            interest_range: (0.5, 1.0),
            ..FilterConfig::default()
        };
        assert!(apply_filters(&sample(), &config).is_empty());
    }

    #[test]
    fn narrowed_popularity_range_filters() {
        let mut modules = sample();
        modules[0].popularity = 55.0;
        let config = FilterConfig {
            popularity_range: (50.0, 100.0),
            ..FilterConfig::default()
        };
        let result = apply_filters(&modules, &config);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "AI Basics");
    }
}
