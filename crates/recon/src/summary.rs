use crate::model::{ChangeReportEntry, ReportSummary};

/// Count report entries per status.
pub fn summarize(entries: &[ChangeReportEntry]) -> ReportSummary {
    let mut summary = ReportSummary::default();
    for e in entries {
        summary.record(e.status);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchedFields, MatchStatus};
    use stdcheck_core::Body;

    fn entry(status: MatchStatus) -> ChangeReportEntry {
        ChangeReportEntry {
            id: None,
            query: "q".into(),
            body: Body::Iec,
            status,
            changes: Vec::new(),
            error: None,
            fetched: FetchedFields::default(),
            actual: None,
        }
    }

    #[test]
    fn summary_counts() {
        let entries = vec![
            entry(MatchStatus::Unchanged),
            entry(MatchStatus::Unchanged),
            entry(MatchStatus::Revised),
            entry(MatchStatus::New),
            entry(MatchStatus::Error),
        ];
        let s = summarize(&entries);
        assert_eq!(s.total, 5);
        assert_eq!(s.unchanged, 2);
        assert_eq!(s.revised, 1);
        assert_eq!(s.new, 1);
        assert_eq!(s.error, 1);
        assert_eq!(s.drift(), 2);
        let counted: usize = MatchStatus::ALL.iter().map(|&st| s.count(st)).sum();
        assert_eq!(counted, s.total);
    }

    #[test]
    fn empty_report() {
        assert_eq!(summarize(&[]), ReportSummary::default());
    }
}
