//! `stdcheck check` — reconcile a fetched document against the registry.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use stdcheck_core::{ActualEntry, Body, StandardRecord};
use stdcheck_recon::document::{parse_actual, parse_fetched, write_report};
use stdcheck_recon::{reconcile_iter, ChangeReportEntry, Field, MatchStatus, ReportSummary};
use tracing::info;

use crate::exit_codes::EXIT_CHECK_DRIFT;
use crate::runtime::Runtime;
use crate::util::{create_writer, is_stdout, pad_right, read_file};
use crate::CliError;

pub struct CheckArgs {
    pub body: Body,
    pub fetched: Option<PathBuf>,
    pub actual: Option<PathBuf>,
    pub use_actual_id: bool,
    pub out: Option<PathBuf>,
    pub json: bool,
    pub fail_on_drift: bool,
}

pub fn cmd_check(rt: &Runtime, args: CheckArgs) -> Result<(), CliError> {
    let body = args.body;
    let fetched_path = args.fetched.unwrap_or_else(|| rt.data_path(body, "fetched"));
    let actual_path = args.actual.unwrap_or_else(|| rt.data_path(body, "actual"));
    let out = args.out.unwrap_or_else(|| rt.data_path(body, "check"));

    let fetched = load_fetched(&fetched_path, body)?;
    let actual = load_actual(&actual_path)?;
    let outcome = check_body(&fetched, &actual, args.use_actual_id, &out)?;

    // keep stdout clean when the report itself goes there
    let mut console: Box<dyn Write> = if is_stdout(&out) {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };
    let printed = if args.json {
        print_json(&mut console, body, &out, &outcome)
    } else {
        print_table(&mut console, body, &out, &outcome)
    };
    printed.map_err(|e| CliError::io(format!("cannot write summary: {}", e)))?;

    let drift = outcome.summary.drift();
    if args.fail_on_drift && drift > 0 {
        return Err(CliError {
            code: EXIT_CHECK_DRIFT,
            message: format!("{drift} of {} {body} entries drifted", outcome.summary.total),
            hint: None,
        });
    }
    Ok(())
}

pub(crate) fn load_fetched(path: &Path, body: Body) -> Result<Vec<StandardRecord>, CliError> {
    parse_fetched(&read_file(path)?, body).map_err(|e| CliError::recon(path, e))
}

pub(crate) fn load_actual(path: &Path) -> Result<Vec<ActualEntry>, CliError> {
    parse_actual(&read_file(path)?).map_err(|e| CliError::recon(path, e))
}

pub(crate) struct CheckOutcome {
    pub summary: ReportSummary,
    /// Entries that need attention: drifted or failed.
    pub flagged: Vec<ChangeReportEntry>,
}

/// Stream the report to `out` and tally it on the way.
pub(crate) fn check_body(
    fetched: &[StandardRecord],
    actual: &[ActualEntry],
    use_actual_id: bool,
    out: &Path,
) -> Result<CheckOutcome, CliError> {
    let mut summary = ReportSummary::default();
    let mut flagged = Vec::new();

    let writer = create_writer(out)?;
    let entries = reconcile_iter(fetched, actual, use_actual_id).inspect(|e| {
        summary.record(e.status);
        if e.status != MatchStatus::Unchanged {
            flagged.push(e.clone());
        }
    });
    write_report(writer, entries).map_err(|e| CliError::recon(out, e))?;

    info!(
        total = summary.total,
        drift = summary.drift(),
        errors = summary.error,
        report = %out.display(),
        "check report written"
    );
    Ok(CheckOutcome { summary, flagged })
}

fn print_json(w: &mut dyn Write, body: Body, out: &Path, outcome: &CheckOutcome) -> io::Result<()> {
    let value = serde_json::json!({
        "body": body,
        "report": out.display().to_string(),
        "summary": outcome.summary,
        "drift": outcome.summary.drift(),
    });
    serde_json::to_writer_pretty(&mut *w, &value)?;
    writeln!(w)
}

fn print_table(w: &mut dyn Write, body: Body, out: &Path, outcome: &CheckOutcome) -> io::Result<()> {
    let s = &outcome.summary;
    writeln!(
        w,
        "{body}: {} checked, {} unchanged, {} revised, {} renumbered, {} modified, {} new, {} error",
        s.total, s.unchanged, s.revised, s.renumbered, s.modified, s.new, s.error
    )?;
    writeln!(w, "report: {}", out.display())?;
    if outcome.flagged.is_empty() {
        return Ok(());
    }

    writeln!(w)?;
    writeln!(
        w,
        "  {} {} {} {} CHANGES",
        pad_right("QUERY", 22),
        pad_right("STATUS", 11),
        pad_right("FETCHED", 24),
        pad_right("REGISTRY", 24),
    )?;
    for e in &outcome.flagged {
        let (fetched, registry) = shown_values(e);
        let changes: Vec<&str> = e.changes.iter().map(field_name).collect();
        writeln!(
            w,
            "  {} {} {} {} {}",
            pad_right(&e.query, 22),
            pad_right(e.status.as_str(), 11),
            pad_right(&fetched, 24),
            pad_right(&registry, 24),
            changes.join(","),
        )?;
    }
    Ok(())
}

/// The most telling pair of values for one entry: designation when it was
/// renumbered, the error when the fetch failed, the revision otherwise.
fn shown_values(e: &ChangeReportEntry) -> (String, String) {
    let actual = e.actual.as_ref();
    match e.status {
        MatchStatus::Error => (
            e.error.map(|err| err.to_string()).unwrap_or_default(),
            String::new(),
        ),
        MatchStatus::Renumbered => (
            e.fetched.no.clone().unwrap_or_default(),
            actual.and_then(|a| a.no.clone()).unwrap_or_default(),
        ),
        _ => (
            e.fetched.rev.clone().unwrap_or_default(),
            actual.and_then(|a| a.rev.clone()).unwrap_or_else(|| "-".into()),
        ),
    }
}

fn field_name(f: &Field) -> &'static str {
    match f {
        Field::No => "no",
        Field::Rev => "rev",
        Field::Desc => "desc",
        Field::Url => "url",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stdcheck_core::{Details, FetchError, Query};

    fn record(query: &str, rev: &str) -> StandardRecord {
        StandardRecord::found(
            &Query::parse(query).unwrap(),
            Body::Ieee,
            Details {
                no: format!("IEEE {query}"),
                rev: rev.into(),
                desc: "Guide".into(),
                url: "https://standards.ieee.org/x".into(),
            },
        )
    }

    #[test]
    fn check_body_writes_report_and_flags_non_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("ieee_check.json");
        let fetched = vec![
            record("C57.104", "2019"),
            record("C57.106", "2015"),
            StandardRecord::failed(&Query::parse("C57.91").unwrap(), Body::Ieee, FetchError::NotFound),
        ];
        let actual = vec![ActualEntry {
            id: Some(5),
            query: Some("C57.104".into()),
            no: Some("IEEE C57.104".into()),
            rev: Some("2008".into()),
            desc: Some("Guide".into()),
            url: Some("https://standards.ieee.org/x".into()),
            ..ActualEntry::default()
        }];

        let outcome = check_body(&fetched, &actual, true, &out).unwrap();

        assert_eq!(outcome.summary.total, 3);
        assert_eq!(outcome.summary.revised, 1);
        assert_eq!(outcome.summary.new, 1);
        assert_eq!(outcome.summary.error, 1);
        assert_eq!(outcome.flagged.len(), 3);

        let written = std::fs::read_to_string(&out).unwrap();
        let report = stdcheck_recon::document::parse_report(&written).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].id, Some(5));
    }

    #[test]
    fn table_shows_revision_pair() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("ieee_check.json");
        let actual = vec![ActualEntry {
            query: Some("C57.104".into()),
            no: Some("IEEE C57.104".into()),
            rev: Some("2008".into()),
            ..ActualEntry::default()
        }];
        let outcome = check_body(&[record("C57.104", "2019")], &actual, false, &out).unwrap();

        let mut buf = Vec::new();
        print_table(&mut buf, Body::Ieee, &out, &outcome).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("ieee: 1 checked, 0 unchanged, 1 revised"), "{text}");
        assert!(text.contains("2019"));
        assert!(text.contains("2008"));
        assert!(text.contains("rev,desc,url"), "{text}");
    }
}
