//! `stdcheck-recon` — reconciliation of fetched standards against the registry.
//!
//! Pure engine crate: receives pre-loaded records, returns classified results.
//! No network or CLI dependencies; callers own the files.

pub mod document;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod registry;
pub mod summary;

pub use engine::{reconcile, reconcile_iter, Reconciler};
pub use error::ReconError;
pub use matcher::normalize_key;
pub use model::{ChangeReportEntry, FetchedFields, Field, MatchStatus, ReportSummary};
pub use registry::backfill_ids;
pub use summary::summarize;
