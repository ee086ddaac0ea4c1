use std::collections::BTreeMap;

use stdcheck_core::{ActualEntry, Body, FetchError, StandardRecord};

use crate::matcher::RegistryIndex;
use crate::model::{actual_field, ChangeReportEntry, FetchedFields, Field, MatchStatus};

/// Fields compared for a matched record, in status priority order.
const COMPARED: [Field; 4] = [Field::No, Field::Rev, Field::Desc, Field::Url];

/// Reconcile a fetched batch against the registry, eagerly.
///
/// One entry per record, in input order. Never fails: records that cannot
/// be compared come out as [`MatchStatus::Error`].
pub fn reconcile(
    fetched: &[StandardRecord],
    actual: &[ActualEntry],
    use_actual_id: bool,
) -> Vec<ChangeReportEntry> {
    let reconciler = Reconciler::new(actual, use_actual_id);
    fetched
        .iter()
        .enumerate()
        .map(|(position, record)| reconciler.entry_for(position, record))
        .collect()
}

/// Same as [`reconcile`], one entry at a time.
pub fn reconcile_iter<'a, I>(
    fetched: I,
    actual: &'a [ActualEntry],
    use_actual_id: bool,
) -> ReportIter<'a, I::IntoIter>
where
    I: IntoIterator<Item = &'a StandardRecord>,
{
    ReportIter {
        reconciler: Reconciler::new(actual, use_actual_id),
        records: fetched.into_iter().enumerate(),
    }
}

pub struct ReportIter<'a, I> {
    reconciler: Reconciler<'a>,
    records: std::iter::Enumerate<I>,
}

impl<'a, I> Iterator for ReportIter<'a, I>
where
    I: Iterator<Item = &'a StandardRecord>,
{
    type Item = ChangeReportEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let (position, record) = self.records.next()?;
        Some(self.reconciler.entry_for(position, record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

/// Registry indexed per body, plus the identity mode.
pub struct Reconciler<'a> {
    indexes: BTreeMap<Body, RegistryIndex<'a>>,
    use_actual_id: bool,
    /// First synthesized id: one above the largest registry id, so a
    /// positional id never coincides with a stored one.
    id_base: u64,
}

impl<'a> Reconciler<'a> {
    pub fn new(actual: &'a [ActualEntry], use_actual_id: bool) -> Self {
        let indexes = Body::ALL
            .into_iter()
            .map(|body| (body, RegistryIndex::build(body, actual)))
            .collect();
        let id_base = actual.iter().filter_map(|e| e.id).max().map_or(0, |max| max + 1);
        Self { indexes, use_actual_id, id_base }
    }

    pub fn lookup(&self, body: Body, query: &str) -> Option<&'a ActualEntry> {
        self.indexes.get(&body)?.lookup(body, query)
    }

    /// Report entry for the record at `position` in its batch.
    pub fn entry_for(&self, position: usize, record: &StandardRecord) -> ChangeReportEntry {
        let matched = self.lookup(record.body(), record.query());
        let id = if self.use_actual_id {
            matched.and_then(|a| a.id)
        } else {
            Some(self.id_base + position as u64)
        };

        let failure = match record.error() {
            Some(error) => Some(error),
            // content fields missing on a record that claims success
            None if !record.is_consistent() => Some(FetchError::DataParsingError),
            None => None,
        };
        if let Some(error) = failure {
            return ChangeReportEntry {
                id,
                query: record.query().to_string(),
                body: record.body(),
                status: MatchStatus::Error,
                changes: Vec::new(),
                error: Some(error),
                fetched: FetchedFields::default(),
                actual: None,
            };
        }

        let fetched = FetchedFields::of(record);
        let (status, changes) = match matched {
            Some(actual) => compare(&fetched, actual),
            None => (MatchStatus::New, Vec::new()),
        };

        ChangeReportEntry {
            id,
            query: record.query().to_string(),
            body: record.body(),
            status,
            changes,
            error: None,
            fetched,
            actual: matched.cloned(),
        }
    }
}

fn compare(fetched: &FetchedFields, actual: &ActualEntry) -> (MatchStatus, Vec<Field>) {
    let changes: Vec<Field> = COMPARED
        .into_iter()
        .filter(|&f| fetched.get(f) != actual_field(actual, f))
        .collect();

    let status = match changes.first() {
        None => MatchStatus::Unchanged,
        Some(Field::No) => MatchStatus::Renumbered,
        Some(Field::Rev) => MatchStatus::Revised,
        Some(Field::Desc | Field::Url) => MatchStatus::Modified,
    };
    (status, changes)
}
