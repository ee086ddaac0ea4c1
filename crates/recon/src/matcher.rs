use std::collections::HashMap;

use stdcheck_core::{ActualEntry, Body};

const DASHES: [char; 7] = ['\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}'];

/// Comparison key for a designation or query.
///
/// `ASTM D92`, `d92` and `D 92` share a key; so do `IEEE Std C57.104` and
/// `C57.104`, and `TS EN IEC 60296 (İngilizce Metin)` and `ts en iec 60296`.
/// Empty when nothing identifying is left.
pub fn normalize_key(body: Body, s: &str) -> String {
    let upper: String = s
        .to_uppercase()
        .chars()
        .map(|c| if DASHES.contains(&c) { '-' } else { c })
        .collect();

    let words = strip_qualifiers(&upper);
    let words: Vec<&str> = words.split_whitespace().collect();
    let rest = strip_prefix(body, &words);
    rest.concat()
}

/// Drop `( … )` spans, nested or not. An unclosed `(` drops the remainder.
fn strip_qualifiers(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(' ');
            }
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Longest body prefix first; only whole words count (`ASTMD92` keeps its prefix).
fn strip_prefix<'a, 'w>(body: Body, words: &'a [&'w str]) -> &'a [&'w str] {
    for prefix in body.designation_prefixes() {
        let n = prefix.split_whitespace().count();
        if words.len() > n && words[..n].iter().copied().eq(prefix.split_whitespace()) {
            return &words[n..];
        }
    }
    words
}

/// Registry lookup for one body. Designation keys are tried before query
/// keys; within each, the first entry in registry order wins.
#[derive(Debug, Default)]
pub struct RegistryIndex<'a> {
    by_no: HashMap<String, &'a ActualEntry>,
    by_query: HashMap<String, &'a ActualEntry>,
}

impl<'a> RegistryIndex<'a> {
    /// Entries tagged with another body are skipped; untagged entries are
    /// assumed to belong to `body`.
    pub fn build(body: Body, entries: &'a [ActualEntry]) -> Self {
        let mut index = Self::default();
        for entry in entries.iter().filter(|e| e.body.map_or(true, |b| b == body)) {
            if let Some(no) = entry.no.as_deref() {
                insert_first(&mut index.by_no, normalize_key(body, no), entry);
            }
            if let Some(query) = entry.query.as_deref() {
                insert_first(&mut index.by_query, normalize_key(body, query), entry);
            }
        }
        index
    }

    pub fn lookup(&self, body: Body, query: &str) -> Option<&'a ActualEntry> {
        let key = normalize_key(body, query);
        if key.is_empty() {
            return None;
        }
        self.by_no.get(&key).or_else(|| self.by_query.get(&key)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_no.len().max(self.by_query.len())
    }

    pub fn is_empty(&self) -> bool {
        self.by_no.is_empty() && self.by_query.is_empty()
    }
}

fn insert_first<'a>(map: &mut HashMap<String, &'a ActualEntry>, key: String, entry: &'a ActualEntry) {
    if !key.is_empty() {
        map.entry(key).or_insert(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_body_prefix_and_spacing() {
        assert_eq!(normalize_key(Body::Astm, "ASTM D92"), "D92");
        assert_eq!(normalize_key(Body::Astm, "d 92"), "D92");
        assert_eq!(normalize_key(Body::Iec, "IEC 60296"), "60296");
        assert_eq!(normalize_key(Body::Ieee, "IEEE Std C57.104"), "C57.104");
        assert_eq!(normalize_key(Body::Ieee, "IEEE C57.104"), "C57.104");
        assert_eq!(normalize_key(Body::Ieee, "C57.104"), "C57.104");
    }

    #[test]
    fn prefix_must_be_a_whole_word() {
        assert_eq!(normalize_key(Body::Astm, "ASTMD92"), "ASTMD92");
        // a bare prefix is not stripped down to nothing
        assert_eq!(normalize_key(Body::Iec, "IEC"), "IEC");
    }

    #[test]
    fn unifies_dashes() {
        assert_eq!(normalize_key(Body::Iec, "IEC 60076\u{2013}1"), "60076-1");
        assert_eq!(normalize_key(Body::Iec, "60076\u{2212}1"), "60076-1");
    }

    #[test]
    fn tse_keeps_prefix_and_drops_qualifiers() {
        assert_eq!(
            normalize_key(Body::Tse, "TS EN IEC 60296 (İngilizce Metin) (Renkli)"),
            "TSENIEC60296"
        );
        assert_eq!(normalize_key(Body::Tse, "ts en iec 60296"), "TSENIEC60296");
        assert_eq!(normalize_key(Body::Tse, "TS 1615 (unclosed"), "TS1615");
    }

    #[test]
    fn blank_input_has_empty_key() {
        assert_eq!(normalize_key(Body::Astm, "   "), "");
        assert_eq!(normalize_key(Body::Tse, "(Renkli)"), "");
    }

    fn entry(id: u64, query: Option<&str>, no: Option<&str>, body: Option<Body>) -> ActualEntry {
        ActualEntry {
            id: Some(id),
            query: query.map(str::to_string),
            no: no.map(str::to_string),
            body,
            ..ActualEntry::default()
        }
    }

    #[test]
    fn designation_beats_query_and_first_wins() {
        let entries = vec![
            entry(1, Some("D92"), Some("ASTM D93"), None),
            entry(2, Some("D9x"), Some("ASTM D92"), None),
            entry(3, Some("D1"), Some("ASTM D92"), None),
        ];
        let index = RegistryIndex::build(Body::Astm, &entries);
        assert_eq!(index.lookup(Body::Astm, "D92").and_then(|e| e.id), Some(2));
        // falls back to the query key
        assert_eq!(index.lookup(Body::Astm, "d9x").and_then(|e| e.id), Some(2));
        assert!(index.lookup(Body::Astm, "D5").is_none());
    }

    #[test]
    fn entries_of_other_bodies_are_ignored() {
        let entries = vec![entry(7, Some("60296"), Some("IEC 60296"), Some(Body::Iec))];
        assert!(RegistryIndex::build(Body::Astm, &entries).is_empty());
        assert!(RegistryIndex::build(Body::Iec, &entries).lookup(Body::Iec, "60296").is_some());
    }
}
