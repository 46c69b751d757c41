//! Detail of the selected error: fetching, staleness and the data the error
//! modal renders.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::model::ErrorDetail;
use crate::model::ErrorRecord;
use crate::model::RecordId;
use crate::source::DataSource;
use crate::source::fetch_json;
use crate::store::Dataset;

/// Lines of context shown above the first reported error.
const CONTEXT_LINES: i64 = 2;

pub async fn fetch_detail(source: &dyn DataSource, id: &RecordId) -> Result<ErrorDetail> {
    fetch_json(source, &id.detail_path()).await
}

/// Identifies one detail request. Only the ticket of the latest request is live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailTicket {
    pub generation: u64,
    pub id: RecordId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetailStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl fmt::Display for DetailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailStatus::Idle => Ok(()),
            DetailStatus::Loading => f.write_str("loading…"),
            DetailStatus::Ready => Ok(()),
            DetailStatus::Failed(message) => write!(f, "failed to refresh: {message}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct DetailPresenter {
    generation: u64,
    live: Option<RecordId>,
    shown: Option<(RecordId, ErrorDetail)>,
    status: DetailStatus,
}

impl DetailPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `id`. Any ticket issued earlier becomes stale.
    pub fn request(&mut self, id: RecordId) -> DetailTicket {
        self.generation += 1;
        self.live = Some(id.clone());
        self.status = DetailStatus::Loading;
        DetailTicket {
            generation: self.generation,
            id,
        }
    }

    pub fn is_stale(&self, ticket: &DetailTicket) -> bool {
        ticket.generation != self.generation || self.live.as_ref() != Some(&ticket.id)
    }

    /// Apply a response. Stale responses are dropped and `false` is returned.
    ///
    /// A failure keeps whatever detail was shown before and records the error.
    pub fn resolve(
        &mut self,
        ticket: DetailTicket,
        result: std::result::Result<ErrorDetail, String>,
    ) -> bool {
        if self.is_stale(&ticket) {
            debug!(
                id = %ticket.id,
                generation = ticket.generation,
                live = self.generation,
                "dropping stale detail response"
            );
            return false;
        }
        match result {
            Ok(detail) => {
                self.shown = Some((ticket.id, detail));
                self.status = DetailStatus::Ready;
            }
            Err(message) => {
                self.status = DetailStatus::Failed(message);
            }
        }
        true
    }

    /// Forget the selection. In-flight responses become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.live = None;
        self.shown = None;
        self.status = DetailStatus::Idle;
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    pub fn detail(&self) -> Option<&ErrorDetail> {
        self.shown.as_ref().map(|(_, detail)| detail)
    }

    /// Record the shown detail belongs to. Differs from the requested record while a
    /// newer request is pending or after it failed.
    pub fn shown_id(&self) -> Option<&RecordId> {
        self.shown.as_ref().map(|(id, _)| id)
    }
}

/// Line number of the first line of `source_code`.
pub fn line_offset(detail: &ErrorDetail) -> i64 {
    detail
        .first_error()
        .map_or(1, |error| error.line - CONTEXT_LINES)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: i64,
    pub text: &'a str,
    pub reported: bool,
}

/// Source lines numbered from [`line_offset`], flagging lines with a reported error.
pub fn source_lines(detail: &ErrorDetail) -> Vec<SourceLine<'_>> {
    let offset = line_offset(detail);
    let reported: BTreeSet<i64> = detail
        .information
        .errors
        .iter()
        .map(|error| error.line)
        .collect();
    detail
        .source_code
        .lines()
        .zip(offset..)
        .map(|(text, number)| SourceLine {
            number,
            text,
            reported: reported.contains(&number),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassificationName {
    pub category: String,
    pub key: String,
    pub name: String,
}

/// Display names of every taxonomy key the record belongs to, in taxonomy
/// order, once per category.
pub fn classification_names(record: &ErrorRecord, dataset: &Dataset) -> Vec<ClassificationName> {
    let mut names = Vec::new();
    for (category, groups) in dataset.taxonomy().categories() {
        let mut seen = BTreeSet::new();
        for (key, label) in groups.values().flatten() {
            if record.has_facet(key.as_str()) && seen.insert(key.as_str()) {
                names.push(ClassificationName {
                    category: category.to_string(),
                    key: key.to_string(),
                    name: label.display().to_string(),
                });
            }
        }
    }
    names
}
