//! `stdcheck run` — the whole pipeline for every body in the catalog.
//!
//! Per body: fetch → `<body>_fetched.json`; if `<body>_actual.json` exists,
//! backfill its ids and write `<body>_check.json`. One body failing to write
//! stops the run; fetch failures are recorded, not fatal.

use std::path::PathBuf;

use stdcheck_config::Catalog;
use stdcheck_fetch::BatchSummary;
use stdcheck_recon::document::to_json;
use tracing::{info, warn};

use crate::backfill::backfill_file;
use crate::check::{check_body, load_actual};
use crate::exit_codes::EXIT_FETCH_ALL_FAILED;
use crate::fetch::fetch_batch;
use crate::runtime::Runtime;
use crate::util::write_file;
use crate::CliError;

pub fn cmd_run(rt: &Runtime, catalog: PathBuf, use_actual_id: bool) -> Result<(), CliError> {
    let catalog_doc = Catalog::load(&catalog).map_err(CliError::config)?;
    if catalog_doc.is_empty() {
        return Err(CliError::args(format!("{} lists no queries", catalog.display())));
    }

    let mut ok = 0;
    let mut failed = 0;
    for body in catalog_doc.bodies() {
        let queries = catalog_doc.queries(body);
        if queries.is_empty() {
            continue;
        }

        let records = fetch_batch(rt, body, queries)?;
        let fetched_path = rt.data_path(body, "fetched");
        let json = to_json(&records).map_err(|e| CliError::recon(&fetched_path, e))?;
        write_file(&fetched_path, &json)?;

        let batch = BatchSummary::of(body, &records);
        ok += batch.ok;
        failed += batch.failed;
        println!("{body}: fetched {} of {} -> {}", batch.ok, records.len(), fetched_path.display());

        let actual_path = rt.data_path(body, "actual");
        if !actual_path.exists() {
            warn!(%body, registry = %actual_path.display(), "no registry; skipping check");
            continue;
        }
        backfill_file(&actual_path)?;
        let actual = load_actual(&actual_path)?;
        let check_path = rt.data_path(body, "check");
        let outcome = check_body(&records, &actual, use_actual_id, &check_path)?;
        let s = &outcome.summary;
        println!(
            "{body}: {} unchanged, {} drifted, {} error -> {}",
            s.unchanged,
            s.drift(),
            s.error,
            check_path.display()
        );
    }

    info!(ok, failed, "run finished");
    if ok == 0 && failed > 0 {
        return Err(CliError {
            code: EXIT_FETCH_ALL_FAILED,
            message: format!("all {failed} fetches failed"),
            hint: Some("check connectivity or the endpoint settings; run with -v for details".into()),
        });
    }
    Ok(())
}
