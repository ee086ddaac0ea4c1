//! TSE: stateful ASP.NET search form.
//!
//! The search page must be loaded first; it hands out a session cookie and
//! the hidden view-state fields that the POST has to echo back. The answer is
//! the same page re-rendered with a results grid:
//!
//! | Standart No | Kabul Tarihi | Türkçe Başlık | İngilizce Başlık | Durum |
//!
//! Per-standard detail links are session-bound and not stable, so the record
//! URL is always the static search page.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use stdcheck_core::{Body, Details, FetchError, Query, StandardRecord};
use tracing::{debug, warn};

use crate::adapter::{into_record, Adapter};
use crate::classify::{classify, unless_sentinel, Parse};
use crate::client::FetchClient;
use crate::html;

pub const TSE_BASE: &str = "https://intweb.tse.org.tr";
pub const SEARCH_PAGE: &str = "/Standard/Standard/StandardAra.aspx";
pub const NOT_FOUND_MARKER: &str = "Kayıt bulunamadı";

const FIELD_QUERY: &str = "ctl00$ContentPlaceHolder1$txtStandardNo";
const FIELD_SUBMIT: &str = "ctl00$ContentPlaceHolder1$btnAra";
const IN_FORCE: &str = "Yürürlükte";

static RESULTS_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<table\b[^>]*id="ContentPlaceHolder1_dgSonuc"[^>]*>(.*?)</table>"#)
        .expect("static regex")
});
static ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("static regex"));
static CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").expect("static regex"));
static QUALIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("static regex"));

#[derive(Debug, Clone)]
pub struct TseAdapter {
    client: FetchClient,
    base_url: String,
}

impl TseAdapter {
    pub fn with_base_url(client: FetchClient, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEARCH_PAGE)
    }

    fn search(&self, query: &Query) -> Result<Details, FetchError> {
        let session = self.client.session().map_err(|e| {
            warn!(%query, error = %e, "cannot open TSE session");
            FetchError::ConnectionError
        })?;
        let url = self.search_url();

        debug!(%query, %url, "loading TSE search form");
        let landing = session.send("TSE", |http| http.get(&url));
        let state = classify(query.as_str(), landing, |resp| FormState::parse(&resp.body))?;

        debug!(%query, "submitting TSE search form");
        let form = state.submission(query.trimmed());
        let answer = session.send("TSE", |http| http.post(&url).form(&form));
        classify(query.as_str(), answer, |resp| {
            unless_sentinel(&resp.body, NOT_FOUND_MARKER, |page| {
                parse_results(page, query.trimmed(), &url)
            })
        })
    }
}

impl Adapter for TseAdapter {
    fn body(&self) -> Body {
        Body::Tse
    }

    fn fetch(&self, query: &Query) -> StandardRecord {
        into_record(query, Body::Tse, self.search(query))
    }
}

/// Hidden ASP.NET fields the POST must echo back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub view_state: String,
    pub view_state_generator: Option<String>,
    pub event_validation: String,
}

impl FormState {
    pub fn parse(page: &str) -> Parse<Self> {
        let (Some(view_state), Some(event_validation)) = (
            html::input_value(page, "__VIEWSTATE"),
            html::input_value(page, "__EVENTVALIDATION"),
        ) else {
            return Parse::Malformed("form view state");
        };
        Parse::Found(Self {
            view_state,
            view_state_generator: html::input_value(page, "__VIEWSTATEGENERATOR"),
            event_validation,
        })
    }

    pub fn submission(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("__EVENTTARGET", String::new()),
            ("__EVENTARGUMENT", String::new()),
            ("__VIEWSTATE", self.view_state.clone()),
            ("__EVENTVALIDATION", self.event_validation.clone()),
            (FIELD_QUERY, query.to_string()),
            (FIELD_SUBMIT, "Ara".to_string()),
        ];
        if let Some(generator) = &self.view_state_generator {
            form.push(("__VIEWSTATEGENERATOR", generator.clone()));
        }
        form
    }
}

/// Designation with the locale qualifiers removed:
/// `TS EN IEC 60296 (İngilizce Metin) (Renkli)` → `TS EN IEC 60296`.
pub fn base_designation(no: &str) -> String {
    html::normalize_ws(&QUALIFIER.replace_all(no, " "))
}

struct Row {
    no: String,
    date: String,
    title: String,
    in_force: bool,
}

/// Select the row for `query`, preferring one that is still in force.
pub fn parse_results(page: &str, query: &str, search_url: &str) -> Parse<Details> {
    let Some(table) = RESULTS_TABLE.captures(page) else {
        return Parse::Malformed("results table");
    };

    let mut rows = Vec::new();
    for row in ROW.captures_iter(&table[1]) {
        let cells: Vec<String> = CELL.captures_iter(&row[1]).map(|c| html::text(&c[1])).collect();
        if cells.len() < 3 {
            // header row (<th> cells) or the grid pager (one colspan cell)
            continue;
        }
        rows.push(Row {
            no: cells[0].clone(),
            date: cells[1].clone(),
            title: cells[2].clone(),
            in_force: cells.get(4).map_or(true, |status| status.contains(IN_FORCE)),
        });
    }
    if rows.is_empty() {
        return Parse::Malformed("results rows");
    }

    let wanted = html::normalize_ws(query).to_uppercase();
    let mut matching = rows
        .into_iter()
        .filter(|r| base_designation(&r.no).to_uppercase() == wanted)
        .collect::<Vec<_>>();
    let in_force = matching.iter().position(|r| r.in_force);
    let pick = match in_force {
        Some(i) => matching.swap_remove(i),
        None if !matching.is_empty() => matching.swap_remove(0),
        None => return Parse::NoMatch,
    };

    if NaiveDate::parse_from_str(&pick.date, "%d.%m.%Y").is_err() {
        return Parse::Malformed("acceptance date");
    }
    if pick.title.is_empty() {
        return Parse::Malformed("standard title");
    }

    Parse::Found(Details {
        no: pick.no,
        rev: pick.date,
        desc: pick.title,
        url: search_url.to_string(),
    })
}
