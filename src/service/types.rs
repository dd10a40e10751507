use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::search::SearchMode;

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    pub use_mesh: bool,
    pub max_results: u32,
    pub retmax: u32,
}

/// The service answers either with a bare list or with a wrapper carrying
/// pagination metadata. Both are accepted.
///
/// Below the top-level shape everything is lenient: a field of the wrong type
/// reads as absent instead of failing the whole response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResponseBody {
    Bare(Entries),
    Wrapped(WrappedResponse),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WrappedResponse {
    #[serde(deserialize_with = "lenient")]
    pub results: Option<Entries>,
    #[serde(deserialize_with = "lenient")]
    pub total_results: Option<CountField>,
    #[serde(deserialize_with = "lenient")]
    pub results_range: Option<String>,
}

/// Result list where an entry that is not an object becomes an empty entry.
#[derive(Debug, Default)]
pub struct Entries(pub Vec<ScoredEntry>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<Value>::deserialize(deserializer)?;
        let entries = values
            .into_iter()
            .map(|value| {
                serde_json::from_value(value).unwrap_or_else(|e| {
                    debug!(error = %e, "unreadable result entry");
                    ScoredEntry::default()
                })
            })
            .collect();
        Ok(Entries(entries))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoredEntry {
    #[serde(deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub record: Option<RawRecord>,
}

/// Record as sent by the service. Every field may be missing, null or of an
/// unexpected type.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub authors: Option<AuthorsField>,
    #[serde(deserialize_with = "lenient")]
    pub journal: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub year: Option<YearField>,
    #[serde(rename = "abstract", deserialize_with = "lenient")]
    pub abstract_text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub mesh_terms: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub url_full_text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub url_pubmed: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub pmid: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub doi: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub pmcid: Option<String>,
}

/// Read any JSON value, then keep it only if it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .inspect_err(|e| debug!(error = %e, "ignoring mistyped field"))
        .ok())
}

/// Author line. Normally one display string, sometimes a list of names.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AuthorsField {
    Text(String),
    List(Vec<String>),
}

impl AuthorsField {
    pub fn into_text(self) -> String {
        match self {
            AuthorsField::Text(s) => s,
            AuthorsField::List(names) => names.join(", "),
        }
    }
}

/// `total_results` as a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CountField {
    Number(u64),
    Text(String),
}

impl CountField {
    pub fn as_count(&self) -> Option<u64> {
        match self {
            CountField::Number(n) => Some(*n),
            CountField::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Publication year. Usually a number, occasionally a string like `"2021"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Number(i64),
    Float(f64),
    Text(String),
}

impl YearField {
    pub fn as_year(&self) -> Option<i32> {
        match self {
            YearField::Number(n) => i32::try_from(*n).ok(),
            YearField::Float(f) if f.fract() == 0.0 => Some(*f as i32),
            YearField::Float(_) => None,
            YearField::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Response from `GET /health`.
#[derive(Debug, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}
