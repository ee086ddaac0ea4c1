//! IEEE: POST to the standards JSON search.
//!
//! Response shape:
//!
//! ```json
//! {"response": {"searchResults": {"resultsMapList": [
//!     {"record": {"stdNumber": "C57.104-2019", "stdTitle": "...", "stdUrl": "/content/..."}}
//! ]}}}
//! ```
//!
//! `response` missing means the body is not a search answer at all (parse
//! error); `response` present with an empty or missing result list is the
//! not-found answer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use stdcheck_core::{Body, Details, Query, StandardRecord};
use tracing::debug;

use crate::adapter::{into_record, Adapter};
use crate::classify::{classify, Parse};
use crate::client::FetchClient;
use crate::html;

pub const IEEE_BASE: &str = "https://standards.ieee.org";
const SEARCH_PATH: &str = "/bin/standards/search";
const ROWS_PER_PAGE: u32 = 25;

static NUMBER_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)-((?:19|20)\d{2})$").expect("static regex"));

#[derive(Debug, Clone)]
pub struct IeeeAdapter {
    client: FetchClient,
    base_url: String,
}

impl IeeeAdapter {
    pub fn with_base_url(client: FetchClient, base_url: String) -> Self {
        Self { client, base_url }
    }
}

impl Adapter for IeeeAdapter {
    fn body(&self) -> Body {
        Body::Ieee
    }

    fn fetch(&self, query: &Query) -> StandardRecord {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{base}{SEARCH_PATH}");
        let payload = json!({
            "action": "search",
            "query": query.trimmed(),
            "pageNumber": 1,
            "rowsPerPage": ROWS_PER_PAGE,
        });
        debug!(%query, %url, "searching IEEE standards");

        let attempt = self.client.send("IEEE", |http| http.post(&url).json(&payload));
        let outcome = classify(query.as_str(), attempt, |resp| {
            match serde_json::from_str::<Value>(&resp.body) {
                Ok(body) => parse_search(&body, query.trimmed(), base),
                Err(_) => Parse::Malformed("JSON body"),
            }
        });
        into_record(query, Body::Ieee, outcome)
    }
}

struct Candidate {
    number: String,
    year: String,
    title: String,
    url: String,
}

/// Select the newest revision whose number equals `query`.
pub fn parse_search(body: &Value, query: &str, base_url: &str) -> Parse<Details> {
    let Some(response) = body.get("response").and_then(Value::as_object) else {
        return Parse::Malformed("response object");
    };

    let results = match response.get("searchResults").and_then(|r| r.get("resultsMapList")) {
        None | Some(Value::Null) => return Parse::NoMatch,
        Some(Value::Array(items)) if items.is_empty() => return Parse::NoMatch,
        Some(Value::Array(items)) => items,
        Some(_) => return Parse::Malformed("resultsMapList array"),
    };

    let mut best: Option<Candidate> = None;
    for item in results {
        let candidate = match parse_record(item, base_url) {
            Parse::Found(c) => c,
            Parse::NoMatch => continue,
            Parse::Malformed(what) => return Parse::Malformed(what),
        };
        if !candidate.number.eq_ignore_ascii_case(query) {
            continue;
        }
        if best.as_ref().map_or(true, |b| candidate.year > b.year) {
            best = Some(candidate);
        }
    }

    match best {
        Some(c) => Parse::Found(Details {
            no: format!("IEEE {}", c.number),
            rev: c.year,
            desc: c.title,
            url: c.url,
        }),
        None => Parse::NoMatch,
    }
}

fn parse_record(item: &Value, base_url: &str) -> Parse<Candidate> {
    let Some(record) = item.get("record").and_then(Value::as_object) else {
        return Parse::Malformed("record object");
    };
    let (Some(number), Some(title), Some(url)) = (
        str_field(record, "stdNumber"),
        str_field(record, "stdTitle"),
        str_field(record, "stdUrl"),
    ) else {
        return Parse::Malformed("stdNumber/stdTitle/stdUrl");
    };

    // Drafts and withdrawn project numbers have no year; they cannot be the
    // current revision of anything.
    let Some(parts) = NUMBER_YEAR.captures(number) else {
        return Parse::NoMatch;
    };

    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), url.trim_start_matches('/'))
    };

    Parse::Found(Candidate {
        number: parts[1].to_string(),
        year: parts[2].to_string(),
        title: html::text(title),
        url,
    })
}

fn str_field<'a>(record: &'a serde_json::Map<String, Value>, name: &str) -> Option<&'a str> {
    record.get(name).and_then(Value::as_str).map(str::trim)
}
