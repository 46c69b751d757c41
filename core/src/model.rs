use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

/// Name of a boolean classification a record can belong to.
///
/// Project names, exception short names, tool names, `not <tool>` names and the
/// static keys of the classification taxonomy all share this one namespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetKey(String);

impl FacetKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FacetKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FacetKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FacetKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FacetKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier of a record within the dataset.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId {
    pub project: String,
    pub error_id: String,
}

impl RecordId {
    pub fn new(project: impl Into<String>, error_id: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            error_id: error_id.into(),
        }
    }

    /// Relative path of the extended detail payload for this record.
    pub fn detail_path(&self) -> String {
        format!("data/{}-{}.json", self.project, self.error_id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.project, self.error_id)
    }
}

/// One recorded error and the repair tools that did or did not fix it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub project_name: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub error_id: String,
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub repaired_by: Vec<String>,
    #[serde(default)]
    pub not_repaired_by: Vec<String>,
    /// Remaining fields of the catalog entry. Boolean `true` values are facet
    /// memberships for the static classification keys.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
    #[serde(skip)]
    facets: BTreeSet<FacetKey>,
}

impl ErrorRecord {
    pub fn new(
        project_name: impl Into<String>,
        error_id: impl Into<String>,
        error_type: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            error_id: error_id.into(),
            error_type: error_type.into(),
            repaired_by: Vec::new(),
            not_repaired_by: Vec::new(),
            extra: IndexMap::new(),
            facets: BTreeSet::new(),
        }
    }

    pub fn with_repairs<I, J, S, T>(mut self, repaired_by: I, not_repaired_by: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.repaired_by = repaired_by.into_iter().map(Into::into).collect();
        self.not_repaired_by = not_repaired_by.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> RecordId {
        RecordId::new(self.project_name.clone(), self.error_id.clone())
    }

    pub fn matches(&self, project: &str, error_id: &str) -> bool {
        self.project_name == project && self.error_id == error_id
    }

    /// Short exception name: everything after the last `.` of `error_type`.
    pub fn exception_name(&self) -> &str {
        crate::facets::exception_name(&self.error_type)
    }

    pub fn has_facet(&self, key: &str) -> bool {
        self.facets.contains(key)
    }

    pub fn facets(&self) -> &BTreeSet<FacetKey> {
        &self.facets
    }

    pub(crate) fn set_facets(&mut self, facets: BTreeSet<FacetKey>) {
        self.facets = facets;
    }
}

/// Extended payload of a single error, fetched on demand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub source_code: String,
    #[serde(default)]
    pub information: ErrorInformation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub repairs: IndexMap<String, RepairAttempt>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ErrorDetail {
    pub fn first_error(&self) -> Option<&ReportedError> {
        self.information.errors.first()
    }

    /// Every unified diff carried by the payload, labelled by origin.
    pub fn patches(&self) -> Vec<(&str, &str)> {
        let mut patches = Vec::new();
        if let Some(diff) = self.diff.as_deref()
            && !diff.trim().is_empty()
        {
            patches.push(("repair", diff));
        }
        for (tool, attempt) in &self.repairs {
            if let Some(diff) = attempt.diff.as_deref()
                && !diff.trim().is_empty()
            {
                patches.push((tool.as_str(), diff));
            }
        }
        patches
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorInformation {
    #[serde(default)]
    pub errors: Vec<ReportedError>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A checkstyle violation as reported against the source snippet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedError {
    #[serde(deserialize_with = "deserialize_line")]
    pub line: i64,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_line",
        skip_serializing_if = "Option::is_none"
    )]
    pub column: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairAttempt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(number) => number.to_string(),
        NumberOrText::Text(text) => text,
    })
}

fn parse_line<E: serde::de::Error>(value: NumberOrText) -> Result<i64, E> {
    match value {
        NumberOrText::Number(number) => number
            .as_i64()
            .ok_or_else(|| E::custom(format!("line number out of range: {number}"))),
        NumberOrText::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("invalid line number '{text}'"))),
    }
}

fn deserialize_line<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    parse_line(NumberOrText::deserialize(deserializer)?)
}

fn deserialize_optional_line<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(parse_line)
        .transpose()
}
