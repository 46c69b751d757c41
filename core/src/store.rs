use std::collections::HashMap;
use std::fmt;

use tracing::info;
use tracing::warn;

use crate::error::Result;
use crate::facets;
use crate::facets::FacetIndex;
use crate::filter;
use crate::model::ErrorRecord;
use crate::model::FacetKey;
use crate::source::DataSource;
use crate::source::fetch_json;
use crate::taxonomy::Taxonomy;

pub const CLASSIFICATION_PATH: &str = "data/classification.json";
pub const RECORDS_PATH: &str = "data/all.json";

/// Records plus taxonomy after facet derivation. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    records: Vec<ErrorRecord>,
    taxonomy: Taxonomy,
    facets: FacetIndex,
    counts: HashMap<FacetKey, usize>,
}

impl Dataset {
    pub fn new(mut records: Vec<ErrorRecord>, mut taxonomy: Taxonomy) -> Self {
        let facets = facets::derive(&mut records);
        facets.inject_into(&mut taxonomy);

        let mut counts = HashMap::new();
        for key in taxonomy.keys() {
            if !counts.contains_key(key) {
                counts.insert(key.clone(), filter::count(key.as_str(), &records));
            }
        }

        Self {
            records,
            taxonomy,
            facets,
            counts,
        }
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn facets(&self) -> &FacetIndex {
        &self.facets
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records tagged with `key`, independent of any filter.
    pub fn count(&self, key: &str) -> usize {
        self.counts
            .get(key)
            .copied()
            .unwrap_or_else(|| filter::count(key, &self.records))
    }

    /// `fullname`, else `name`, else the key itself.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.taxonomy.display_name(key).unwrap_or(key)
    }

    pub fn display_name_in(&self, category: &str, key: &str) -> Option<&str> {
        self.taxonomy.display_name_in(category, key)
    }

    pub fn find(&self, project: &str, error_id: &str) -> Option<&ErrorRecord> {
        self.records
            .iter()
            .find(|record| record.matches(project, error_id))
    }
}

/// Fetch the taxonomy and the records concurrently and derive the dataset.
pub async fn load(source: &dyn DataSource) -> Result<Dataset> {
    let (taxonomy, records) = tokio::join!(
        fetch_json::<Taxonomy>(source, CLASSIFICATION_PATH),
        fetch_json::<Vec<ErrorRecord>>(source, RECORDS_PATH),
    );
    let dataset = Dataset::new(records?, taxonomy?);
    info!(
        source = %source.describe(),
        records = dataset.len(),
        projects = dataset.facets().projects.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    Failed(String),
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::NotLoaded => f.write_str("not loaded"),
            LoadState::Loading => f.write_str("loading…"),
            LoadState::Ready => f.write_str("ready"),
            LoadState::Failed(message) => write!(f, "failed to load: {message}"),
        }
    }
}

/// Load lifecycle around a [`Dataset`]. A failed load keeps no partial data.
#[derive(Debug, Default)]
pub struct DatasetStore {
    state: LoadState,
    dataset: Dataset,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn begin(&mut self) {
        self.state = LoadState::Loading;
    }

    pub fn finish(&mut self, result: Result<Dataset>) {
        match result {
            Ok(dataset) => {
                self.dataset = dataset;
                self.state = LoadState::Ready;
            }
            Err(err) => {
                warn!("dataset load failed: {err:#}");
                self.dataset = Dataset::default();
                self.state = LoadState::Failed(error_chain(&err));
            }
        }
    }
}

/// `err` followed by its sources, joined with `: `.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
