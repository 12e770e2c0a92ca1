//! Module catalog: one-shot load, facet derivation, and filtering.

mod filter;
mod types;

pub use filter::{
    apply_filters, FilterConfig, SortOrder, FULL_INTEREST_RANGE, FULL_POPULARITY_RANGE,
};
pub use types::{month_year_label, parse_start_date, ModuleRecord, RawModule, TagField};

use std::collections::HashSet;

use tracing::info;

use crate::api::modules::ModuleApi;
use crate::api::profile::UserProfileClient;
use crate::error::VkmError;

/// Dutch stop words excluded from the derived tag facet.
pub const DUTCH_STOP_WORDS: &[&str] = &[
    "de", "het", "een", "en", "van", "in", "op", "voor", "met", "aan", "bij", "naar", "uit",
    "je", "is", "dat", "dit", "om", "ook", "als", "maar", "of", "door", "over",
];

/// The full module list plus its derived facets.
///
/// The list is fetched once per page load; filtering never mutates it.
pub struct ModuleCatalogStore {
    modules: Vec<ModuleRecord>,
    tags: Vec<String>,
    start_labels: Vec<String>,
}

impl ModuleCatalogStore {
    /// Builds the store and derives facets from normalized records.
    pub fn from_records(modules: Vec<ModuleRecord>) -> Self {
        let tags = derive_tag_facet(&modules);
        let start_labels = derive_start_facet(&modules);
        Self {
            modules,
            tags,
            start_labels,
        }
    }

    /// Fetches all modules once (no server-side filters) and normalizes
    /// them.
    pub async fn load(api: &ModuleApi) -> Result<Self, VkmError> {
        let modules = api.list().await?;
        info!(count = modules.len(), "Loaded module catalog");
        Ok(Self::from_records(modules))
    }

    /// Fetches the catalog and the signed-in profile concurrently, and
    /// marks the user's saved modules as recommended.
    pub async fn load_with_profile(
        api: &ModuleApi,
        profile: &UserProfileClient,
    ) -> Result<Self, VkmError> {
        let (modules, user) = futures::try_join!(api.list(), profile.fetch_profile())?;
        let mut store = Self::from_records(modules);
        store.mark_recommended(&user.saved_module_ids);
        Ok(store)
    }

    /// Flags the given module ids as saved/recommended.
    pub fn mark_recommended(&mut self, ids: &[String]) {
        let wanted: HashSet<&str> = ids.iter().map(|s| s.as_str()).collect();
        for module in &mut self.modules {
            module.recommended = wanted.contains(module.id.as_str());
        }
    }

    /// The normalized module list in backend order.
    pub fn modules(&self) -> &[ModuleRecord] {
        &self.modules
    }

    /// Unique tags across the catalog, stop words removed, sorted
    /// case-insensitively.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Unique "month year" start labels in chronological order.
    pub fn start_labels(&self) -> &[String] {
        &self.start_labels
    }

    /// Applies the filter configuration; see [`apply_filters`].
    pub fn filtered(&self, config: &FilterConfig) -> Vec<ModuleRecord> {
        apply_filters(&self.modules, config)
    }
}

fn derive_tag_facet(modules: &[ModuleRecord]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut tags: Vec<String> = Vec::new();

    for module in modules {
        for tag in &module.tags {
            let lower = tag.to_lowercase();
            if DUTCH_STOP_WORDS.contains(&lower.as_str()) {
                continue;
            }
            if seen.insert(lower) {
                tags.push(tag.clone());
            }
        }
    }

    tags.sort_by_key(|t| t.to_lowercase());
    tags
}

fn derive_start_facet(modules: &[ModuleRecord]) -> Vec<String> {
    let mut entries: Vec<(chrono::NaiveDate, String)> = Vec::new();

    for module in modules {
        if let (Some(date), Some(label)) = (module.start_date, module.start_label.clone()) {
            if !entries.iter().any(|(_, l)| l == &label) {
                entries.push((date, label));
            }
        }
    }

    entries.sort_by_key(|(date, _)| *date);
    entries.into_iter().map(|(_, label)| label).collect()
}
