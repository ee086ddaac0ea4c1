//! `stdcheck fetch` — look up current metadata for one body's standards.

use std::path::PathBuf;

use stdcheck_config::Catalog;
use stdcheck_core::{Body, Query, StandardRecord};
use stdcheck_fetch::BatchSummary;
use stdcheck_recon::document::to_json;

use crate::exit_codes::{EXIT_FETCH_ALL_FAILED, EXIT_FETCH_INVALID_QUERY};
use crate::runtime::Runtime;
use crate::util::write_file;
use crate::CliError;

pub fn cmd_fetch(
    rt: &Runtime,
    body: Body,
    raw_queries: Vec<String>,
    catalog: PathBuf,
    out: Option<PathBuf>,
) -> Result<(), CliError> {
    let queries = if raw_queries.is_empty() {
        Catalog::load(&catalog).map_err(CliError::config)?.queries(body).to_vec()
    } else {
        parse_queries(&raw_queries)?
    };
    if queries.is_empty() {
        return Err(CliError::args(format!("no queries for {body}")).with_hint(format!(
            "pass identifiers or add a [{body}] section with `queries` to {}",
            catalog.display()
        )));
    }

    let out = out.unwrap_or_else(|| rt.data_path(body, "fetched"));
    let records = fetch_batch(rt, body, &queries)?;
    let json = to_json(&records).map_err(|e| CliError::recon(&out, e))?;
    write_file(&out, &json)?;

    let summary = BatchSummary::of(body, &records);
    eprintln!(
        "{body}: fetched {} of {} ({} failed) -> {}",
        summary.ok,
        records.len(),
        summary.failed,
        out.display()
    );
    ensure_some_succeeded(&summary)
}

/// Run one body's batch through the configured adapter and worker pool.
pub(crate) fn fetch_batch(
    rt: &Runtime,
    body: Body,
    queries: &[Query],
) -> Result<Vec<StandardRecord>, CliError> {
    let adapter = rt.adapter(body, rt.client()?);
    let runner = rt.runner()?;
    Ok(runner.run(&adapter, queries))
}

pub(crate) fn ensure_some_succeeded(summary: &BatchSummary) -> Result<(), CliError> {
    if summary.ok == 0 && summary.failed > 0 {
        return Err(CliError {
            code: EXIT_FETCH_ALL_FAILED,
            message: format!("all {} {} fetches failed", summary.failed, summary.body),
            hint: Some("check connectivity or the endpoint settings; run with -v for details".into()),
        });
    }
    Ok(())
}

fn parse_queries(raw: &[String]) -> Result<Vec<Query>, CliError> {
    raw.iter()
        .map(|s| {
            Query::parse(s).map_err(|e| CliError {
                code: EXIT_FETCH_INVALID_QUERY,
                message: format!("invalid query {:?}: {}", s, e),
                hint: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_argument_is_invalid_query() {
        let err = parse_queries(&["D92".into(), "  ".into()]).unwrap_err();
        assert_eq!(err.code, EXIT_FETCH_INVALID_QUERY);
    }

    #[test]
    fn all_failed_only_when_nothing_succeeded() {
        let none_ok = BatchSummary { body: Body::Iec, ok: 0, failed: 3 };
        assert_eq!(ensure_some_succeeded(&none_ok).unwrap_err().code, EXIT_FETCH_ALL_FAILED);
        let some_ok = BatchSummary { body: Body::Iec, ok: 1, failed: 3 };
        assert!(ensure_some_succeeded(&some_ok).is_ok());
    }
}
