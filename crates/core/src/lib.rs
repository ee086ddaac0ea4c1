//! Shared data model for stdcheck.
//!
//! Everything that crosses a crate boundary lives here: the body tag, the
//! canonical [`StandardRecord`] produced by fetching, the locally maintained
//! [`ActualEntry`], and the validated [`Query`].

pub mod body;
pub mod query;
pub mod record;

pub use body::Body;
pub use query::{Query, QueryError};
pub use record::{ActualEntry, Details, FetchError, StandardRecord};
