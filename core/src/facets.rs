//! Facet derivation.
//!
//! Every record is tagged with the set of facet keys it belongs to, and the
//! distinct keys of each derived family are injected into the taxonomy under a
//! group label that carries the distinct count, e.g. `Projects (12)`.

use std::collections::BTreeSet;

use crate::model::ErrorRecord;
use crate::model::FacetKey;
use crate::taxonomy::ERRORS_CATEGORY;
use crate::taxonomy::FacetGroup;
use crate::taxonomy::FacetLabel;
use crate::taxonomy::REPAIR_CATEGORY;
use crate::taxonomy::Taxonomy;

const NOT_FIXED_PREFIX: &str = "not ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FacetFamily {
    Project,
    Exception,
    FixedBy,
    NotFixedBy,
}

impl FacetFamily {
    pub const ALL: [FacetFamily; 4] = [
        FacetFamily::Project,
        FacetFamily::Exception,
        FacetFamily::FixedBy,
        FacetFamily::NotFixedBy,
    ];

    pub fn category(self) -> &'static str {
        match self {
            FacetFamily::Project | FacetFamily::Exception => ERRORS_CATEGORY,
            FacetFamily::FixedBy | FacetFamily::NotFixedBy => REPAIR_CATEGORY,
        }
    }

    fn title(self) -> &'static str {
        match self {
            FacetFamily::Project => "Projects",
            FacetFamily::Exception => "Error types",
            FacetFamily::FixedBy => "Fixed by",
            FacetFamily::NotFixedBy => "Not fixed by",
        }
    }

    pub fn group_label(self, count: usize) -> String {
        format!("{} ({count})", self.title())
    }

    fn label_prefix(self) -> String {
        format!("{} (", self.title())
    }
}

/// Substring after the last `.` of a fully-qualified name.
pub fn exception_name(error_type: &str) -> &str {
    error_type
        .rsplit_once('.')
        .map_or(error_type, |(_, name)| name)
}

pub fn not_fixed_key(tool: &str) -> FacetKey {
    FacetKey::new(format!("{NOT_FIXED_PREFIX}{tool}"))
}

/// Distinct derived facet keys per family, sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacetIndex {
    pub projects: BTreeSet<FacetKey>,
    pub exceptions: BTreeSet<FacetKey>,
    pub fixed_by: BTreeSet<FacetKey>,
    pub not_fixed_by: BTreeSet<FacetKey>,
}

impl FacetIndex {
    pub fn family(&self, family: FacetFamily) -> &BTreeSet<FacetKey> {
        match family {
            FacetFamily::Project => &self.projects,
            FacetFamily::Exception => &self.exceptions,
            FacetFamily::FixedBy => &self.fixed_by,
            FacetFamily::NotFixedBy => &self.not_fixed_by,
        }
    }

    /// Replace the derived groups of `taxonomy` with the groups of this index.
    pub fn inject_into(&self, taxonomy: &mut Taxonomy) {
        for family in FacetFamily::ALL {
            taxonomy.remove_groups_with_prefix(family.category(), &family.label_prefix());
        }
        for family in FacetFamily::ALL {
            let keys = self.family(family);
            let group: FacetGroup = keys
                .iter()
                .map(|key| {
                    let label = FacetLabel::new(key.as_str());
                    let label = if family == FacetFamily::Project {
                        label.with_fullname(key.as_str())
                    } else {
                        label
                    };
                    (key.clone(), label)
                })
                .collect();
            taxonomy.insert_group(family.category(), family.group_label(keys.len()), group);
        }
    }
}

/// Facet keys of a single record: derived keys plus every extra field set to `true`.
pub fn record_facets(record: &ErrorRecord) -> BTreeSet<FacetKey> {
    let mut keys: BTreeSet<FacetKey> = record
        .extra
        .iter()
        .filter(|(_, value)| value.as_bool() == Some(true))
        .map(|(key, _)| FacetKey::new(key.as_str()))
        .collect();
    keys.insert(FacetKey::new(record.project_name.as_str()));
    keys.insert(FacetKey::new(record.exception_name()));
    keys.extend(record.repaired_by.iter().map(|tool| FacetKey::new(tool.as_str())));
    keys.extend(record.not_repaired_by.iter().map(|tool| not_fixed_key(tool)));
    keys
}

/// Tag every record with its facet set and collect the distinct derived keys.
///
/// Re-running over the same records yields the same sets and the same index.
pub fn derive(records: &mut [ErrorRecord]) -> FacetIndex {
    let mut index = FacetIndex::default();
    for record in records.iter_mut() {
        index
            .projects
            .insert(FacetKey::new(record.project_name.as_str()));
        index
            .exceptions
            .insert(FacetKey::new(record.exception_name()));
        index
            .fixed_by
            .extend(record.repaired_by.iter().map(|tool| FacetKey::new(tool.as_str())));
        index
            .not_fixed_by
            .extend(record.not_repaired_by.iter().map(|tool| not_fixed_key(tool)));
        let facets = record_facets(record);
        record.set_facets(facets);
    }
    index
}
