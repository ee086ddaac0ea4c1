//! Batch runner: fan queries out over a bounded worker pool.
//!
//! Records come back in query order regardless of completion order. The pool
//! size is the caller's fan-out limit; the form-based source holds a server
//! session per call, so this is also the number of concurrent sessions.

use std::time::Instant;

use rayon::prelude::*;
use stdcheck_core::{Body, Query, StandardRecord};
use tracing::info;

use crate::adapter::Adapter;

#[derive(Debug, thiserror::Error)]
#[error("cannot start fetch worker pool: {0}")]
pub struct RunnerError(#[from] rayon::ThreadPoolBuildError);

pub struct Runner {
    pool: rayon::ThreadPool,
    jobs: usize,
}

impl Runner {
    pub fn new(jobs: usize) -> Result<Self, RunnerError> {
        let jobs = jobs.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("stdcheck-fetch-{i}"))
            .build()?;
        Ok(Self { pool, jobs })
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// One record per query, in input order.
    pub fn run<A: Adapter + ?Sized>(&self, adapter: &A, queries: &[Query]) -> Vec<StandardRecord> {
        let body = adapter.body();
        let started = Instant::now();
        info!(%body, queries = queries.len(), jobs = self.jobs, "fetch batch started");

        let records: Vec<StandardRecord> =
            self.pool.install(|| queries.par_iter().map(|q| adapter.fetch(q)).collect());

        let summary = BatchSummary::of(body, &records);
        info!(
            %body,
            ok = summary.ok,
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetch batch finished"
        );
        records
    }
}

/// Success/failure counts of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub body: Body,
    pub ok: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of(body: Body, records: &[StandardRecord]) -> Self {
        let failed = records.iter().filter(|r| r.error().is_some()).count();
        Self { body, ok: records.len() - failed, failed }
    }
}
