use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::query::Query;

/// Why a fetch produced no standard.
///
/// The serialized strings are the ones the fetched/check documents have
/// always carried; renaming them breaks existing data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum FetchError {
    /// No published standard corresponds to the query. Terminal.
    #[serde(rename = "Not found")]
    #[error("Not found")]
    NotFound,
    /// Transport failure (DNS, timeout, reset). Retryable by the caller.
    #[serde(rename = "Connection error")]
    #[error("Connection error")]
    ConnectionError,
    /// A response arrived but did not have the expected shape.
    #[serde(rename = "Data parsing error")]
    #[error("Data parsing error")]
    DataParsingError,
}

/// The four content fields of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub no: String,
    pub rev: String,
    pub desc: String,
    pub url: String,
}

/// Canonical result of fetching one query from one body.
///
/// Either `error` is set and every content field is `None`, or `error` is
/// `None` and all four content fields are set. The constructors are the only
/// way to build one in code; documents loaded from disk may still violate
/// this, which [`StandardRecord::details`] reports as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardRecord {
    query: String,
    body: Body,
    #[serde(default)]
    error: Option<FetchError>,
    #[serde(default)]
    no: Option<String>,
    #[serde(default)]
    rev: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl StandardRecord {
    pub fn found(query: &Query, body: Body, details: Details) -> Self {
        Self {
            query: query.as_str().to_string(),
            body,
            error: None,
            no: Some(details.no),
            rev: Some(details.rev),
            desc: Some(details.desc),
            url: Some(details.url),
        }
    }

    pub fn failed(query: &Query, body: Body, error: FetchError) -> Self {
        Self {
            query: query.as_str().to_string(),
            body,
            error: Some(error),
            no: None,
            rev: None,
            desc: None,
            url: None,
        }
    }

    /// Placeholder for a document element that could not be read as a
    /// record. Counts as a parse failure so the batch keeps its length.
    pub fn unreadable(query: impl Into<String>, body: Body) -> Self {
        Self {
            query: query.into(),
            body,
            error: Some(FetchError::DataParsingError),
            no: None,
            rev: None,
            desc: None,
            url: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn body(&self) -> Body {
        self.body
    }

    pub fn error(&self) -> Option<FetchError> {
        self.error
    }

    pub fn no(&self) -> Option<&str> {
        self.no.as_deref()
    }

    pub fn rev(&self) -> Option<&str> {
        self.rev.as_deref()
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Content fields of a successful record; `None` for failed or partial ones.
    pub fn details(&self) -> Option<Details> {
        if self.error.is_some() {
            return None;
        }
        Some(Details {
            no: self.no.clone()?,
            rev: self.rev.clone()?,
            desc: self.desc.clone()?,
            url: self.url.clone()?,
        })
    }

    /// True when the record satisfies the error/content exclusivity rule.
    pub fn is_consistent(&self) -> bool {
        let fields = [&self.no, &self.rev, &self.desc, &self.url];
        match self.error {
            Some(_) => fields.iter().all(|f| f.is_none()),
            None => fields.iter().all(|f| f.is_some()),
        }
    }
}

/// One entry of the locally maintained "actual" registry.
///
/// Same shape as a [`StandardRecord`] plus a stable `id`. The registry is
/// edited by hand, so every field is optional and unknown keys are kept
/// verbatim for the round trip through id backfill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(default)]
    pub error: Option<FetchError>,
    #[serde(default)]
    pub no: Option<String>,
    #[serde(default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q(s: &str) -> Query {
        Query::parse(s).unwrap()
    }

    #[test]
    fn failed_record_has_no_content() {
        let rec = StandardRecord::failed(&q("D92"), Body::Astm, FetchError::ConnectionError);
        assert!(rec.is_consistent());
        assert_eq!(rec.details(), None);
        assert_eq!(
            serde_json::to_value(&rec).unwrap(),
            json!({
                "query": "D92",
                "body": "astm",
                "error": "Connection error",
                "no": null,
                "rev": null,
                "desc": null,
                "url": null
            })
        );
    }

    #[test]
    fn found_record_has_all_content() {
        let rec = StandardRecord::found(
            &q("60296"),
            Body::Iec,
            Details {
                no: "IEC 60296".into(),
                rev: "2020".into(),
                desc: "Fluids".into(),
                url: "https://webstore.iec.ch/publication/61025".into(),
            },
        );
        assert!(rec.is_consistent());
        assert_eq!(rec.error(), None);
        assert_eq!(rec.details().unwrap().rev, "2020");
    }

    #[test]
    fn unreadable_record_is_a_parse_failure() {
        let rec = StandardRecord::unreadable("", Body::Tse);
        assert!(rec.is_consistent());
        assert_eq!(rec.error(), Some(FetchError::DataParsingError));
        assert_eq!(rec.body(), Body::Tse);
    }

    #[test]
    fn partial_document_is_detected() {
        let rec: StandardRecord = serde_json::from_value(json!({
            "query": "C57.104",
            "body": "ieee",
            "no": "IEEE C57.104"
        }))
        .unwrap();
        assert!(!rec.is_consistent());
        assert_eq!(rec.details(), None);
    }

    #[test]
    fn actual_entry_keeps_unknown_fields() {
        let raw = json!({
            "query": "D92",
            "body": "astm",
            "error": null,
            "no": "ASTM D92",
            "rev": "16b",
            "desc": "Flash point",
            "url": "https://www.astm.org/Standards/D92.htm",
            "lab": "chemistry"
        });
        let entry: ActualEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.id, None);
        assert_eq!(entry.extra["lab"], "chemistry");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["lab"], "chemistry");
        assert!(back.get("id").is_none());
    }
}
