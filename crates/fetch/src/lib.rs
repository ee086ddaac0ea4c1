//! `stdcheck-fetch` — source adapters for standards bodies.
//!
//! Each adapter turns one query into exactly one [`StandardRecord`],
//! classifying failures instead of returning them. Blocking reqwest client
//! (no Tokio runtime required); parallelism comes from [`Runner`].
//!
//! [`StandardRecord`]: stdcheck_core::StandardRecord

pub mod adapter;
pub mod astm;
pub mod classify;
pub mod client;
pub mod html;
pub mod iec;
pub mod ieee;
pub mod runner;
pub mod tse;

pub use adapter::{Adapter, Endpoints, SourceAdapter};
pub use client::{ClientError, FetchClient};
pub use runner::{BatchSummary, Runner, RunnerError};
