//! IEC: publication lookup against the webstore search.
//!
//! The search page lists one block per edition:
//!
//! ```text
//! <a class="publication-ref" href="/publication/61025">IEC 60296:2020</a>
//! <span class="publication-title">Fluids for electrotechnical applications &ndash; …</span>
//! ```
//!
//! Redline and other derived editions carry a suffix after the year and are
//! skipped. An explicit "No valid publication found." page is a not-found.

use once_cell::sync::Lazy;
use regex::Regex;
use stdcheck_core::{Body, Details, Query, StandardRecord};
use tracing::debug;

use crate::adapter::{into_record, Adapter};
use crate::classify::{classify, unless_sentinel, Parse};
use crate::client::FetchClient;
use crate::html;

pub const IEC_BASE: &str = "https://webstore.iec.ch";
pub const NOT_FOUND_SENTINEL: &str = "No valid publication found.";

static RESULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<a\b[^>]*class="publication-ref"[^>]*href="([^"]+)"[^>]*>(.*?)</a>.*?<span\b[^>]*class="publication-title"[^>]*>(.*?)</span>"#,
    )
    .expect("static regex")
});
static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(IEC\s+[^:\s]+):(\d{4}\S*)$").expect("static regex"));

#[derive(Debug, Clone)]
pub struct IecAdapter {
    client: FetchClient,
    base_url: String,
}

impl IecAdapter {
    pub fn with_base_url(client: FetchClient, base_url: String) -> Self {
        Self { client, base_url }
    }
}

impl Adapter for IecAdapter {
    fn body(&self) -> Body {
        Body::Iec
    }

    fn fetch(&self, query: &Query) -> StandardRecord {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{base}/searchkey");
        let reference = format!("IEC {}", query.trimmed());
        debug!(%query, %url, "searching IEC webstore");

        let attempt = self
            .client
            .send("IEC", |http| http.get(&url).query(&[("RefNumber", reference.as_str())]));
        let outcome = classify(query.as_str(), attempt, |resp| {
            unless_sentinel(&resp.body, NOT_FOUND_SENTINEL, |page| {
                parse_results(page, &reference, base)
            })
        });
        into_record(query, Body::Iec, outcome)
    }
}

/// Pick the edition whose designation equals `reference` (e.g. `IEC 60296`).
pub fn parse_results(page: &str, reference: &str, base_url: &str) -> Parse<Details> {
    let mut saw_result = false;

    for caps in RESULT.captures_iter(page) {
        saw_result = true;
        let label = html::text(&caps[2]);
        let Some(parts) = REFERENCE.captures(&label) else {
            continue;
        };
        let no = html::normalize_ws(&parts[1]);
        if !no.eq_ignore_ascii_case(&html::normalize_ws(reference)) {
            continue;
        }

        let desc = html::text(&caps[3]);
        if desc.is_empty() {
            return Parse::Malformed("publication title");
        }
        let href = html::decode_entities(caps[1].trim());
        let url = if href.starts_with("http://") || href.starts_with("https://") {
            href
        } else {
            format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/'))
        };
        return Parse::Found(Details {
            no,
            rev: parts[2].to_string(),
            desc,
            url,
        });
    }

    if saw_result {
        Parse::NoMatch
    } else {
        Parse::Malformed("publication result block")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://webstore.iec.ch";

    fn block(href: &str, label: &str, title: &str) -> String {
        format!(
            r#"<div class="result"><a class="publication-ref" href="{href}">{label}</a>
               <span class="publication-title">{title}</span></div>"#
        )
    }

    #[test]
    fn skips_redline_and_other_numbers() {
        let page = [
            block("/publication/63440", "IEC 60296:2020 RLV", "Redline"),
            block("/publication/1111", "IEC 60296-1:2019", "Other part"),
            block("/publication/61025", "IEC 60296:2020", "Fluids &ndash; Mineral oils"),
        ]
        .concat();
        let Parse::Found(d) = parse_results(&page, "IEC 60296", BASE) else {
            panic!("expected a match");
        };
        assert_eq!(d.no, "IEC 60296");
        assert_eq!(d.rev, "2020");
        assert_eq!(d.desc, "Fluids – Mineral oils");
        assert_eq!(d.url, "https://webstore.iec.ch/publication/61025");
    }

    #[test]
    fn consolidated_edition_keeps_amendments_in_rev() {
        let page = block(
            "/publication/60283",
            "IEC 62271-100:2008+AMD1:2012",
            "High-voltage switchgear and controlgear - Part 100: Alternating-current circuit-breakers",
        );
        let Parse::Found(d) = parse_results(&page, "IEC 62271-100", BASE) else {
            panic!("expected a match");
        };
        assert_eq!(d.no, "IEC 62271-100");
        assert_eq!(d.rev, "2008+AMD1:2012");
    }

    #[test]
    fn results_without_designation_match_are_not_found() {
        let page = block("/publication/1111", "IEC 60296-1:2019", "Other part");
        assert_eq!(parse_results(&page, "IEC 60296", BASE), Parse::NoMatch);
    }

    #[test]
    fn page_without_result_blocks_is_malformed() {
        assert!(matches!(parse_results("Bad webpage", "IEC 60296", BASE), Parse::Malformed(_)));
    }
}
