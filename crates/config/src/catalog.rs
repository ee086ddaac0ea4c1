//! Query catalog: which identifiers to check, per body.
//!
//! ```toml
//! [astm]
//! queries = ["D92", "D97", "D1500"]
//!
//! [tse]
//! queries = ["TS EN IEC 60296"]
//! ```
//!
//! Every entry is validated on load; a catalog never holds a non-string
//! identifier.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use stdcheck_core::{Body, Query};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    queries: BTreeMap<Body, Vec<Query>>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let root: toml::Table = toml::from_str(input)?;
        let mut queries = BTreeMap::new();

        for (name, section) in &root {
            let body: Body = name.parse().map_err(|_| ConfigError::UnknownBody(name.clone()))?;
            let Some(items) = section.get("queries").and_then(toml::Value::as_array) else {
                return Err(ConfigError::MissingQueries(body));
            };
            let parsed = items
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    Query::from_toml(value)
                        .map_err(|source| ConfigError::InvalidQuery { body, index, source })
                })
                .collect::<Result<Vec<_>, _>>()?;
            queries.insert(body, parsed);
        }

        Ok(Self { queries })
    }

    /// Queries for `body`, in file order. Empty if the body has no section.
    pub fn queries(&self, body: Body) -> &[Query] {
        self.queries.get(&body).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bodies with a section, in [`Body`] order.
    pub fn bodies(&self) -> impl Iterator<Item = Body> + '_ {
        self.queries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.queries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stdcheck_core::QueryError;

    #[test]
    fn loads_sections_in_body_order() {
        let catalog = Catalog::from_toml(
            r#"
[tse]
queries = ["TS EN IEC 60296", "TS EN 60422"]

[astm]
queries = ["D92", " D97 "]
"#,
        )
        .unwrap();

        assert_eq!(catalog.bodies().collect::<Vec<_>>(), vec![Body::Astm, Body::Tse]);
        let astm: Vec<&str> = catalog.queries(Body::Astm).iter().map(Query::as_str).collect();
        assert_eq!(astm, vec!["D92", "D97"]);
        assert!(catalog.queries(Body::Ieee).is_empty());
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn integer_entry_is_rejected_with_position() {
        let err = Catalog::from_toml("[iec]\nqueries = [\"60296\", 60422]\n").unwrap_err();
        match err {
            ConfigError::InvalidQuery { body, index, source } => {
                assert_eq!(body, Body::Iec);
                assert_eq!(index, 1);
                assert_eq!(source, QueryError::TypeMismatch { found: "integer" });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_body_and_missing_list() {
        assert!(matches!(
            Catalog::from_toml("[iso]\nqueries = [\"9001\"]\n"),
            Err(ConfigError::UnknownBody(name)) if name == "iso"
        ));
        assert!(matches!(
            Catalog::from_toml("[astm]\nitems = [\"D92\"]\n"),
            Err(ConfigError::MissingQueries(Body::Astm))
        ));
        assert!(matches!(
            Catalog::from_toml("[astm\n"),
            Err(ConfigError::CatalogSyntax(_))
        ));
    }
}
