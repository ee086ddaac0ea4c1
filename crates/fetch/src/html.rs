//! Minimal HTML text helpers for the page-scraping adapters.
//!
//! The upstream pages are treated as text with a few fixed anchors, not as
//! documents; each adapter pins its anchors with a regex and uses these
//! helpers to turn the captured markup into plain text.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));
static INPUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("static regex"));
static NAME_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\sname="([^"]*)""#).expect("static regex"));
static VALUE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\svalue="([^"]*)""#).expect("static regex"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("static regex"));

/// Collapse whitespace runs to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode numeric character references and the named entities these sources
/// actually emit. Unknown names are left as-is.
pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(name)
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '–',
        "mdash" => '—',
        "rsquo" => '’',
        "lsquo" => '‘',
        "rdquo" => '”',
        "ldquo" => '“',
        "reg" => '®',
        "copy" => '©',
        "deg" => '°',
        "micro" => 'µ',
        "Ccedil" => 'Ç',
        "ccedil" => 'ç',
        "Ouml" => 'Ö',
        "ouml" => 'ö',
        "Uuml" => 'Ü',
        "uuml" => 'ü',
        _ => return None,
    })
}

/// Markup fragment to display text: drop tags, decode entities, normalize whitespace.
pub fn text(fragment: &str) -> String {
    normalize_ws(&decode_entities(&TAG.replace_all(fragment, " ")))
}

/// Value of `<input ... name="NAME" ... value="...">`, in either attribute order.
pub fn input_value(page: &str, name: &str) -> Option<String> {
    let tag = INPUT
        .find_iter(page)
        .map(|m| m.as_str())
        .find(|tag| NAME_ATTR.captures(tag).is_some_and(|c| &c[1] == name))?;
    VALUE_ATTR.captures(tag).map(|c| decode_entities(&c[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_strips_tags_and_entities() {
        assert_eq!(
            text("<span>Fluids for electrotechnical applications &ndash;\n  Mineral&nbsp;oils</span>"),
            "Fluids for electrotechnical applications – Mineral oils"
        );
    }

    #[test]
    fn numeric_references_decode() {
        assert_eq!(decode_entities("Ak&#305;&#x15F;kanlar"), "Akışkanlar");
        assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
    }

    #[test]
    fn input_value_either_order() {
        let page = r#"<input type="hidden" value="dDwtMTI=" name="__VIEWSTATE" id="__VIEWSTATE" />
                      <input name="__EVENTVALIDATION" type="hidden" value="/wEW&amp;A" />"#;
        assert_eq!(input_value(page, "__VIEWSTATE").as_deref(), Some("dDwtMTI="));
        assert_eq!(input_value(page, "__EVENTVALIDATION").as_deref(), Some("/wEW&A"));
        assert_eq!(input_value(page, "__VIEWSTATEGENERATOR"), None);
    }

    #[test]
    fn input_value_ignores_prefixed_attributes() {
        let page = r#"<input data-name="__VIEWSTATE" value="decoy" />
                      <input name="__VIEWSTATE" value="real" />"#;
        assert_eq!(input_value(page, "__VIEWSTATE").as_deref(), Some("real"));
    }
}
