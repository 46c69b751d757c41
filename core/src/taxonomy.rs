//! Classification taxonomy: category → group → facet key → label.
//!
//! The taxonomy is loaded from `classification.json` and then extended with the
//! groups derived from the dataset (see [`crate::facets`]). Object order from the
//! JSON document is preserved, which is also the display order.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use crate::model::FacetKey;

pub const ERRORS_CATEGORY: &str = "Errors";
pub const REPAIR_CATEGORY: &str = "Repair";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetLabel {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
}

impl FacetLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fullname: None,
        }
    }

    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = Some(fullname.into());
        self
    }

    /// `fullname` when present and non-empty, `name` otherwise.
    pub fn display(&self) -> &str {
        match self.fullname.as_deref() {
            Some(fullname) if !fullname.is_empty() => fullname,
            _ => &self.name,
        }
    }
}

pub type FacetGroup = IndexMap<FacetKey, FacetLabel>;
pub type Category = IndexMap<String, FacetGroup>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    categories: IndexMap<String, Category>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &Category)> {
        self.categories
            .iter()
            .map(|(name, category)| (name.as_str(), category))
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn group(&self, category: &str, group: &str) -> Option<&FacetGroup> {
        self.categories.get(category)?.get(group)
    }

    /// Insert or replace a group, creating the category when it does not exist.
    pub fn insert_group(
        &mut self,
        category: impl Into<String>,
        label: impl Into<String>,
        group: FacetGroup,
    ) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(label.into(), group);
    }

    /// Remove every group of `category` whose label starts with `prefix`.
    pub(crate) fn remove_groups_with_prefix(&mut self, category: &str, prefix: &str) {
        if let Some(groups) = self.categories.get_mut(category) {
            groups.retain(|label, _| !label.starts_with(prefix));
        }
    }

    /// Display name of `key`, searching every category in order.
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.categories
            .keys()
            .find_map(|category| self.display_name_in(category, key))
    }

    /// Display name of `key` within one category.
    pub fn display_name_in(&self, category: &str, key: &str) -> Option<&str> {
        self.categories
            .get(category)?
            .values()
            .find_map(|group| group.get(key))
            .map(FacetLabel::display)
    }

    /// Every facet key of every group, in display order. Keys that appear in
    /// several groups are yielded once per group.
    pub fn keys(&self) -> impl Iterator<Item = &FacetKey> {
        self.categories
            .values()
            .flat_map(IndexMap::values)
            .flat_map(IndexMap::keys)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
