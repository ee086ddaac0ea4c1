//! One fetch contract, four body-specific protocols.

use stdcheck_core::{Body, Query, QueryError, StandardRecord};

use crate::astm::AstmAdapter;
use crate::client::FetchClient;
use crate::iec::IecAdapter;
use crate::ieee::IeeeAdapter;
use crate::tse::TseAdapter;

/// Capability every source adapter implements.
///
/// `fetch` never fails: every outcome, including transport failures, is
/// encoded in the returned record, whose `query` is the input and whose
/// `body` is the adapter's fixed tag.
pub trait Adapter: Send + Sync {
    fn body(&self) -> Body;

    fn fetch(&self, query: &Query) -> StandardRecord;

    /// Sequential batch form; one record per query, in order.
    fn fetch_all(&self, queries: &[Query]) -> Vec<StandardRecord> {
        queries.iter().map(|q| self.fetch(q)).collect()
    }

    /// Validate an untyped identifier first. A non-string value is caller
    /// misuse and is returned as an error before any request is made.
    fn fetch_value(&self, value: &serde_json::Value) -> Result<StandardRecord, QueryError> {
        let query = Query::from_json(value)?;
        Ok(self.fetch(&query))
    }
}

/// Base URLs for every source. Overridable for mirrors and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub astm: String,
    pub iec: String,
    pub ieee: String,
    pub tse: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            astm: crate::astm::ASTM_BASE.to_string(),
            iec: crate::iec::IEC_BASE.to_string(),
            ieee: crate::ieee::IEEE_BASE.to_string(),
            tse: crate::tse::TSE_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every source at the same base URL.
    pub fn all(base_url: &str) -> Self {
        Self {
            astm: base_url.to_string(),
            iec: base_url.to_string(),
            ieee: base_url.to_string(),
            tse: base_url.to_string(),
        }
    }

    pub fn get(&self, body: Body) -> &str {
        match body {
            Body::Astm => &self.astm,
            Body::Iec => &self.iec,
            Body::Ieee => &self.ieee,
            Body::Tse => &self.tse,
        }
    }
}

/// Closed set of adapters, selected by body tag.
#[derive(Debug, Clone)]
pub enum SourceAdapter {
    Astm(AstmAdapter),
    Iec(IecAdapter),
    Ieee(IeeeAdapter),
    Tse(TseAdapter),
}

impl SourceAdapter {
    pub fn for_body(body: Body, client: FetchClient, endpoints: &Endpoints) -> Self {
        let base_url = endpoints.get(body).to_string();
        match body {
            Body::Astm => Self::Astm(AstmAdapter::with_base_url(client, base_url)),
            Body::Iec => Self::Iec(IecAdapter::with_base_url(client, base_url)),
            Body::Ieee => Self::Ieee(IeeeAdapter::with_base_url(client, base_url)),
            Body::Tse => Self::Tse(TseAdapter::with_base_url(client, base_url)),
        }
    }
}

impl Adapter for SourceAdapter {
    fn body(&self) -> Body {
        match self {
            Self::Astm(a) => a.body(),
            Self::Iec(a) => a.body(),
            Self::Ieee(a) => a.body(),
            Self::Tse(a) => a.body(),
        }
    }

    fn fetch(&self, query: &Query) -> StandardRecord {
        match self {
            Self::Astm(a) => a.fetch(query),
            Self::Iec(a) => a.fetch(query),
            Self::Ieee(a) => a.fetch(query),
            Self::Tse(a) => a.fetch(query),
        }
    }
}

/// Build the record for one fetch outcome.
pub(crate) fn into_record(
    query: &Query,
    body: Body,
    outcome: Result<stdcheck_core::Details, stdcheck_core::FetchError>,
) -> StandardRecord {
    match outcome {
        Ok(details) => StandardRecord::found(query, body, details),
        Err(error) => StandardRecord::failed(query, body, error),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn for_body_keeps_tag() {
        let endpoints = Endpoints::all("http://127.0.0.1:1");
        for body in Body::ALL {
            let client = FetchClient::new(Duration::from_secs(1)).unwrap();
            let adapter = SourceAdapter::for_body(body, client, &endpoints);
            assert_eq!(adapter.body(), body);
        }
    }

    #[test]
    fn default_endpoints_are_public_sites() {
        let e = Endpoints::default();
        assert_eq!(e.get(Body::Astm), "https://www.astm.org");
        assert_eq!(e.get(Body::Tse), "https://intweb.tse.org.tr");
    }
}
