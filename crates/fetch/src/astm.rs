//! ASTM: one GET per designation, metadata read from the page title.
//!
//! The standard page's `<title>` reads `ASTM <designation> - <rev> <title>`.
//! ASTM answers unknown designations with an HTTP error page, so any 4xx/5xx
//! status is a not-found.

use once_cell::sync::Lazy;
use regex::Regex;
use stdcheck_core::{Body, Details, Query, StandardRecord};
use tracing::debug;

use crate::adapter::{into_record, Adapter};
use crate::classify::{classify, unless_error_status, Parse};
use crate::client::FetchClient;
use crate::html;

pub const ASTM_BASE: &str = "https://www.astm.org";

static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title>\s*(ASTM\s+[A-Z]+\s*\d\S*)\s+-\s+(\S+)\s+(.+?)\s*</title>")
        .expect("static regex")
});

#[derive(Debug, Clone)]
pub struct AstmAdapter {
    client: FetchClient,
    base_url: String,
}

impl AstmAdapter {
    pub fn with_base_url(client: FetchClient, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub fn standard_url(&self, query: &Query) -> String {
        format!("{}/Standards/{}.htm", self.base_url.trim_end_matches('/'), query.trimmed())
    }
}

impl Adapter for AstmAdapter {
    fn body(&self) -> Body {
        Body::Astm
    }

    fn fetch(&self, query: &Query) -> StandardRecord {
        let url = self.standard_url(query);
        debug!(%query, %url, "fetching ASTM standard page");
        let attempt = self.client.send("ASTM", |http| http.get(&url));
        let outcome = classify(query.as_str(), attempt, |resp| {
            unless_error_status(resp, |page| parse_page(page, &url))
        });
        into_record(query, Body::Astm, outcome)
    }
}

/// Extract designation, revision and title from a standard page.
pub fn parse_page(page: &str, url: &str) -> Parse<Details> {
    let Some(caps) = TITLE.captures(page) else {
        return Parse::Malformed("page title block");
    };
    let no = html::text(&caps[1]);
    let rev = html::text(&caps[2]);
    let desc = html::text(&caps[3]);
    if desc.is_empty() {
        return Parse::Malformed("standard title");
    }
    Parse::Found(Details { no, rev, desc, url: url.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.astm.org/Standards/D92.htm";

    #[test]
    fn parses_title_block() {
        let page = "<html><head><title>ASTM D92 - 18 Standard Test Method for Flash and \
                    Fire Points by Cleveland Open Cup Tester</title></head></html>";
        let Parse::Found(d) = parse_page(page, URL) else {
            panic!("expected a parsed page");
        };
        assert_eq!(d.no, "ASTM D92");
        assert_eq!(d.rev, "18");
        assert_eq!(
            d.desc,
            "Standard Test Method for Flash and Fire Points by Cleveland Open Cup Tester"
        );
        assert_eq!(d.url, URL);
    }

    #[test]
    fn keeps_editorial_revision_suffix() {
        let page = "<title>ASTM D3487 - 16e1 Standard Specification for Mineral Insulating \
                    Oil Used in Electrical Apparatus</title>";
        let Parse::Found(d) = parse_page(page, URL) else {
            panic!("expected a parsed page");
        };
        assert_eq!(d.no, "ASTM D3487");
        assert_eq!(d.rev, "16e1");
    }

    #[test]
    fn missing_title_block_is_malformed() {
        assert_eq!(parse_page("Bad webpage", URL), Parse::Malformed("page title block"));
        assert!(matches!(
            parse_page("<title>Search results</title>", URL),
            Parse::Malformed(_)
        ));
    }

    #[test]
    fn url_uses_trimmed_query() {
        let client = FetchClient::new(std::time::Duration::from_secs(1)).unwrap();
        let adapter = AstmAdapter::with_base_url(client, "http://mirror/".into());
        let q = Query::parse(" D1524 ").unwrap();
        assert_eq!(adapter.standard_url(&q), "http://mirror/Standards/D1524.htm");
    }
}
