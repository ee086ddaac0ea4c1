use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// A fetched/actual/check document is not the expected JSON shape.
    #[error("invalid {kind} document: {source}")]
    Document {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// Report entry could not be serialized.
    #[error("cannot serialize report entry: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Writer failed mid-report.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
