use serde::Serialize;
use tracing::debug;

use super::types::{AuthorsField, RawRecord, ScoredEntry, SearchResponseBody};

/// One literature record in the flat shape the rest of the crate works with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// 1-based position in the service's ordering.
    pub id: usize,
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub year: Option<i32>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub relevance_score: f64,
    pub mesh_terms: Vec<String>,
    pub url_full_text: Option<String>,
    pub url_pubmed: Option<String>,
    pub pmid: Option<String>,
    pub doi: Option<String>,
    pub pmcid: Option<String>,
}

/// Pagination metadata. Travels next to the result list, never inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultMeta {
    pub total_results: Option<u64>,
    pub results_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub meta: ResultMeta,
}

pub fn normalize(body: SearchResponseBody) -> SearchOutcome {
    let (entries, meta) = match body {
        SearchResponseBody::Bare(entries) => (entries.0, ResultMeta::default()),
        SearchResponseBody::Wrapped(wrapped) => (
            wrapped.results.unwrap_or_default().0,
            ResultMeta {
                total_results: wrapped.total_results.and_then(|c| c.as_count()),
                results_range: wrapped.results_range,
            },
        ),
    };

    let results: Vec<SearchResult> = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| to_result(i + 1, entry))
        .collect();

    debug!(
        count = results.len(),
        total = ?meta.total_results,
        "normalized search response"
    );
    SearchOutcome { results, meta }
}

fn to_result(id: usize, entry: ScoredEntry) -> SearchResult {
    let record = entry.record.unwrap_or_default();
    let RawRecord {
        title,
        authors,
        journal,
        year,
        abstract_text,
        mesh_terms,
        url_full_text,
        url_pubmed,
        pmid,
        doi,
        pmcid,
    } = record;

    SearchResult {
        id,
        title: title.unwrap_or_default(),
        authors: authors.map(AuthorsField::into_text).unwrap_or_default(),
        journal: journal.unwrap_or_default(),
        year: year.and_then(|y| y.as_year()),
        abstract_text: abstract_text.unwrap_or_default(),
        relevance_score: entry.score.filter(|s| s.is_finite()).unwrap_or(0.0),
        mesh_terms: mesh_terms.unwrap_or_default(),
        url_full_text: non_empty(url_full_text),
        url_pubmed: non_empty(url_pubmed),
        pmid: non_empty(pmid),
        doi: non_empty(doi),
        pmcid: non_empty(pmcid),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SearchOutcome {
        normalize(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn normalizes_scored_record() {
        let outcome = parse(
            r#"[{"score":0.87,"record":{"title":"T","authors":"A","journal":"J","year":2023,"abstract":"...","mesh_terms":["x"]}}]"#,
        );

        assert_eq!(outcome.results.len(), 1);
        let r = &outcome.results[0];
        assert_eq!(r.id, 1);
        assert_eq!(r.relevance_score, 0.87);
        assert_eq!(r.title, "T");
        assert_eq!(r.authors, "A");
        assert_eq!(r.journal, "J");
        assert_eq!(r.year, Some(2023));
        assert_eq!(r.abstract_text, "...");
        assert_eq!(r.mesh_terms, vec!["x".to_string()]);
        assert_eq!(r.url_pubmed, None);
        assert_eq!(outcome.meta, ResultMeta::default());
    }

    #[test]
    fn bare_and_wrapped_shapes_normalize_identically() {
        let items = r#"[
            {"score":0.9,"record":{"title":"First","authors":"A","url_pubmed":"https://pubmed.ncbi.nlm.nih.gov/1/"}},
            {"score":0.4,"record":{"title":"Second","mesh_terms":["Neoplasms","Immunotherapy"]}}
        ]"#;
        let bare = parse(items);
        let wrapped = parse(&format!(
            r#"{{"results":{items},"total_results":1200,"results_range":"1-2"}}"#
        ));

        assert_eq!(bare.results, wrapped.results);
        assert_eq!(wrapped.meta.total_results, Some(1200));
        assert_eq!(wrapped.meta.results_range.as_deref(), Some("1-2"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let outcome = parse(r#"[{"score":0.2,"record":{}}, {}]"#);

        assert_eq!(outcome.results.len(), 2);
        for r in &outcome.results {
            assert_eq!(r.title, "");
            assert_eq!(r.authors, "");
            assert_eq!(r.journal, "");
            assert_eq!(r.abstract_text, "");
            assert!(r.mesh_terms.is_empty());
            assert!(r.year.is_none());
            assert!(r.url_full_text.is_none());
        }
        assert_eq!(outcome.results[1].relevance_score, 0.0);
    }

    #[test]
    fn serialized_result_always_has_mesh_terms_key() {
        let outcome = parse(r#"[{"score":0.1,"record":{"title":"T"}}]"#);
        let value = serde_json::to_value(&outcome.results[0]).unwrap();
        assert_eq!(value["mesh_terms"], serde_json::json!([]));
        assert_eq!(value["url_pubmed"], serde_json::Value::Null);
    }

    #[test]
    fn wrapper_without_results_is_empty() {
        let outcome = parse(r#"{"total_results":0}"#);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.meta.total_results, Some(0));
    }

    #[test]
    fn ids_follow_server_order() {
        let outcome = parse(
            r#"[{"score":0.1,"record":{"title":"low"}},{"score":0.9,"record":{"title":"high"}}]"#,
        );
        let titles: Vec<_> = outcome.results.iter().map(|r| (r.id, r.title.as_str())).collect();
        assert_eq!(titles, vec![(1, "low"), (2, "high")]);
    }

    #[test]
    fn mistyped_entry_does_not_drop_its_neighbours() {
        let outcome = parse(
            r#"{"results":[
                {"score":0.9,"record":{"title":"Good","authors":"Smith J","year":2021}},
                {"score":"high","record":{"title":"Bad","authors":["A","B"],"year":{"v":1},"mesh_terms":[1,2]}}
            ],"total_results":"42"}"#,
        );

        assert_eq!(outcome.results.len(), 2);
        let good = &outcome.results[0];
        assert_eq!((good.id, good.title.as_str()), (1, "Good"));
        assert_eq!(good.authors, "Smith J");
        assert_eq!(good.year, Some(2021));

        let bad = &outcome.results[1];
        assert_eq!((bad.id, bad.title.as_str()), (2, "Bad"));
        assert_eq!(bad.authors, "A, B");
        assert_eq!(bad.relevance_score, 0.0);
        assert!(bad.year.is_none());
        assert!(bad.mesh_terms.is_empty());

        assert_eq!(outcome.meta.total_results, Some(42));
    }

    #[test]
    fn blank_urls_are_treated_as_absent() {
        let outcome = parse(r#"[{"score":0.5,"record":{"url_pubmed":"  ","url_full_text":""}}]"#);
        assert!(outcome.results[0].url_pubmed.is_none());
        assert!(outcome.results[0].url_full_text.is_none());
    }
}
