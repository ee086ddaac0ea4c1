use std::io;
use std::path::PathBuf;

use stdcheck_core::{Body, QueryError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid catalog: {0}")]
    CatalogSyntax(#[from] toml::de::Error),
    #[error("catalog: unknown body '{0}' (expected astm, iec, ieee or tse)")]
    UnknownBody(String),
    #[error("catalog [{0}]: expected a `queries` array")]
    MissingQueries(Body),
    #[error("catalog [{body}] queries[{index}]: {source}")]
    InvalidQuery {
        body: Body,
        index: usize,
        #[source]
        source: QueryError,
    },
}

