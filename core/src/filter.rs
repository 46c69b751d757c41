use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::model::ErrorRecord;
use crate::model::FacetKey;

/// How active facet keys combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every active key must be present on the record.
    #[default]
    All,
    /// At least one active key must be present on the record.
    Any,
}

impl MatchMode {
    pub fn toggled(self) -> Self {
        match self {
            MatchMode::All => MatchMode::Any,
            MatchMode::Any => MatchMode::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::All => "all",
            MatchMode::Any => "any",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(MatchMode::All),
            "any" => Ok(MatchMode::Any),
            other => Err(format!("unknown match mode '{other}', expected 'all' or 'any'")),
        }
    }
}

/// Sparse facet selection. Absent keys are inactive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    flags: BTreeMap<FacetKey, bool>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, key: &str) -> bool {
        let active = self.is_active(key);
        self.flags.insert(FacetKey::new(key), !active);
        !active
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Active keys in sorted order.
    pub fn active_keys(&self) -> impl Iterator<Item = &FacetKey> {
        self.flags
            .iter()
            .filter_map(|(key, active)| active.then_some(key))
    }

    pub fn has_active(&self) -> bool {
        self.flags.values().any(|active| *active)
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

impl<K: Into<FacetKey>> FromIterator<K> for FilterSelection {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self {
            flags: iter.into_iter().map(|key| (key.into(), true)).collect(),
        }
    }
}

/// Whether `record` passes `selection` under `mode`.
///
/// An empty selection lets everything through. The result depends only on the
/// set of active keys, never on their order.
pub fn passes(record: &ErrorRecord, selection: &FilterSelection, mode: MatchMode) -> bool {
    let mut active = selection.active_keys().peekable();
    if active.peek().is_none() {
        return true;
    }
    match mode {
        MatchMode::Any => active.any(|key| record.has_facet(key.as_str())),
        MatchMode::All => active.all(|key| record.has_facet(key.as_str())),
    }
}

/// Number of records tagged with `key`.
pub fn count(key: &str, records: &[ErrorRecord]) -> usize {
    records.iter().filter(|record| record.has_facet(key)).count()
}

/// Selection plus match mode, owned by the application state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterEngine {
    selection: FilterSelection,
    mode: MatchMode,
}

impl FilterEngine {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            selection: FilterSelection::new(),
            mode,
        }
    }

    /// Flip `key`; returns the new active flag.
    pub fn toggle(&mut self, key: &str) -> bool {
        self.selection.toggle(key)
    }

    pub fn set_mode(&mut self, mode: MatchMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.selection.is_active(key)
    }

    pub fn active_keys(&self) -> Vec<&FacetKey> {
        self.selection.active_keys().collect()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn passes(&self, record: &ErrorRecord) -> bool {
        passes(record, &self.selection, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets;
    use pretty_assertions::assert_eq;

    fn dataset() -> Vec<ErrorRecord> {
        let mut records = vec![
            ErrorRecord::new("A", "1", "x.Foo").with_repairs(["styler"], ["naturalize"]),
            ErrorRecord::new("A", "2", "x.Bar").with_repairs(["naturalize"], ["styler"]),
            ErrorRecord::new("B", "3", "x.Foo").with_repairs(["styler", "naturalize"], Vec::<String>::new()),
        ];
        facets::derive(&mut records);
        records
    }

    fn passing<'a>(engine: &FilterEngine, records: &'a [ErrorRecord]) -> Vec<&'a str> {
        records
            .iter()
            .filter(|record| engine.passes(record))
            .map(|record| record.error_id.as_str())
            .collect()
    }

    #[test]
    fn empty_selection_passes_everything() {
        let records = dataset();
        for mode in [MatchMode::All, MatchMode::Any] {
            let engine = FilterEngine::new(mode);
            assert_eq!(passing(&engine, &records), vec!["1", "2", "3"]);
        }

        let mut engine = FilterEngine::default();
        engine.toggle("B");
        engine.toggle("B");
        assert!(!engine.selection().has_active());
        assert_eq!(passing(&engine, &records), vec!["1", "2", "3"]);
    }

    #[test]
    fn single_project_under_all_mode() {
        let records = dataset();
        let mut engine = FilterEngine::new(MatchMode::All);
        engine.toggle("B");
        assert_eq!(passing(&engine, &records), vec!["3"]);
    }

    #[test]
    fn any_is_disjunction_and_all_is_conjunction() {
        let records = dataset();
        let mut engine = FilterEngine::new(MatchMode::Any);
        engine.toggle("Bar");
        engine.toggle("B");
        assert_eq!(passing(&engine, &records), vec!["2", "3"]);

        engine.set_mode(MatchMode::All);
        assert_eq!(passing(&engine, &records), Vec::<&str>::new());

        engine.clear();
        engine.toggle("Foo");
        engine.toggle("not naturalize");
        assert_eq!(passing(&engine, &records), vec!["1"]);
    }

    #[test]
    fn result_matches_definition_for_every_subset() {
        let records = dataset();
        let universe = ["A", "B", "Foo", "Bar", "styler", "not styler", "naturalize"];
        for mask in 0u32..(1 << universe.len()) {
            let active: Vec<&str> = universe
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, key)| *key)
                .collect();
            let forward: FilterSelection = active.iter().copied().collect();
            let backward: FilterSelection = active.iter().rev().copied().collect();

            for record in &records {
                let any = active.iter().any(|key| record.has_facet(key));
                let all = active.iter().all(|key| record.has_facet(key));
                let expect_any = active.is_empty() || any;
                assert_eq!(passes(record, &forward, MatchMode::Any), expect_any);
                assert_eq!(passes(record, &forward, MatchMode::All), all);
                assert_eq!(
                    passes(record, &backward, MatchMode::Any),
                    passes(record, &forward, MatchMode::Any)
                );
            }
        }
    }

    #[test]
    fn count_is_raw_membership() {
        let records = dataset();
        assert_eq!(count("A", &records), 2);
        assert_eq!(count("styler", &records), 2);
        assert_eq!(count("not styler", &records), 1);
        assert_eq!(count("missing", &records), 0);
    }

    #[test]
    fn match_mode_parses_and_toggles() {
        assert_eq!("ANY".parse::<MatchMode>(), Ok(MatchMode::Any));
        assert_eq!("all".parse::<MatchMode>(), Ok(MatchMode::All));
        assert!("some".parse::<MatchMode>().is_err());
        assert_eq!(MatchMode::All.toggled(), MatchMode::Any);
        assert_eq!(MatchMode::default(), MatchMode::All);
    }

    #[test]
    fn active_keys_are_sorted() {
        let mut engine = FilterEngine::default();
        engine.toggle("zeta");
        engine.toggle("alpha");
        engine.toggle("mid");
        engine.toggle("mid");
        let keys: Vec<&str> = engine.active_keys().into_iter().map(FacetKey::as_str).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
