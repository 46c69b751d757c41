//! Sorting and the filtered view the navigator indexes into.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::filter::FilterEngine;
use crate::model::ErrorRecord;
use crate::model::RecordId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Project name, then error id.
    #[default]
    Project,
    ErrorId,
    ErrorType,
    /// Number of tools that repaired the error.
    RepairedBy,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Project,
        SortKey::ErrorId,
        SortKey::ErrorType,
        SortKey::RepairedBy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Project => "project",
            SortKey::ErrorId => "error-id",
            SortKey::ErrorType => "error-type",
            SortKey::RepairedBy => "repaired-by",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SortKey::Project => "Project",
            SortKey::ErrorId => "Id",
            SortKey::ErrorType => "Error type",
            SortKey::RepairedBy => "Repaired by",
        }
    }

    fn compare(self, a: &ErrorRecord, b: &ErrorRecord) -> Ordering {
        match self {
            SortKey::Project => a
                .project_name
                .cmp(&b.project_name)
                .then_with(|| compare_ids(&a.error_id, &b.error_id)),
            SortKey::ErrorId => compare_ids(&a.error_id, &b.error_id),
            SortKey::ErrorType => a.exception_name().cmp(b.exception_name()),
            SortKey::RepairedBy => a.repaired_by.len().cmp(&b.repaired_by.len()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value.trim())
            .ok_or_else(|| format!("unknown sort key '{value}'"))
    }
}

/// Numeric comparison when both ids are integers, lexicographic otherwise.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub reverse: bool,
}

impl SortSpec {
    pub fn new(key: SortKey, reverse: bool) -> Self {
        Self { key, reverse }
    }

    /// Choosing the current key flips direction; a new key sorts ascending.
    pub fn sort(&mut self, key: SortKey) {
        if self.key == key {
            self.reverse = !self.reverse;
        } else {
            self.key = key;
            self.reverse = false;
        }
    }

    pub fn compare(&self, a: &ErrorRecord, b: &ErrorRecord) -> Ordering {
        let ordering = self.key.compare(a, b);
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Sorted, filtered projection of the dataset.
///
/// Holds indices into the record slice it was computed from, so it must be
/// recomputed whenever the records, the filter or the sort change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilteredView {
    rows: Vec<usize>,
    ids: Vec<RecordId>,
}

impl FilteredView {
    pub fn compute(records: &[ErrorRecord], filter: &FilterEngine, sort: SortSpec) -> Self {
        let mut rows: Vec<usize> = (0..records.len()).collect();
        rows.sort_by(|a, b| sort.compare(&records[*a], &records[*b]));
        rows.retain(|index| filter.passes(&records[*index]));
        let ids = rows.iter().map(|index| records[*index].id()).collect();
        Self { rows, ids }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index into the dataset of the `position`-th visible row.
    pub fn record_index(&self, position: usize) -> Option<usize> {
        self.rows.get(position).copied()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn id(&self, position: usize) -> Option<&RecordId> {
        self.ids.get(position)
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    /// Linear search for the visible position of a record.
    pub fn position_of(&self, project: &str, error_id: &str) -> Option<usize> {
        self.ids
            .iter()
            .position(|id| id.project == project && id.error_id == error_id)
    }

    /// Visible records of `records`, in view order. The items outlive the view.
    pub fn records<'r>(
        &self,
        records: &'r [ErrorRecord],
    ) -> impl Iterator<Item = &'r ErrorRecord> + use<'_, 'r> {
        self.rows.iter().filter_map(|index| records.get(*index))
    }
}
