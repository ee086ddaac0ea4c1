//! `stdcheck backfill-ids` — give every registry entry a stable id.

use std::path::{Path, PathBuf};

use stdcheck_recon::backfill_ids;
use stdcheck_recon::document::to_json;
use tracing::info;

use crate::check::load_actual;
use crate::util::write_file;
use crate::CliError;

pub fn cmd_backfill_ids(files: Vec<PathBuf>) -> Result<(), CliError> {
    for path in &files {
        let assigned = backfill_file(path)?;
        println!("{}: {} id(s) assigned", path.display(), assigned);
    }
    Ok(())
}

/// Rewrite `path` only when something was assigned. Returns the count.
pub(crate) fn backfill_file(path: &Path) -> Result<usize, CliError> {
    let mut entries = load_actual(path)?;
    let assigned = backfill_ids(&mut entries);
    if assigned > 0 {
        let json = to_json(&entries).map_err(|e| CliError::recon(path, e))?;
        write_file(path, &json)?;
    }
    info!(file = %path.display(), entries = entries.len(), assigned, "registry ids backfilled");
    Ok(assigned)
}
