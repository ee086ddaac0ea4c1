use std::fmt;

use serde::{Deserialize, Serialize};
use stdcheck_core::{ActualEntry, Body, FetchError, StandardRecord};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Outcome of comparing one fetched record with the registry.
///
/// For a matched record the first differing field decides, in the order
/// `no` → `rev` → `desc`/`url`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Unchanged,
    /// Same designation, different revision.
    Revised,
    /// Designation changed (e.g. `TS EN 60296` → `TS EN IEC 60296`).
    Renumbered,
    /// Only title or link changed.
    Modified,
    /// Fetched successfully but absent from the registry.
    New,
    /// The fetch itself failed; nothing to compare.
    Error,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 6] = [
        MatchStatus::Unchanged,
        MatchStatus::Revised,
        MatchStatus::Renumbered,
        MatchStatus::Modified,
        MatchStatus::New,
        MatchStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Revised => "revised",
            Self::Renumbered => "renumbered",
            Self::Modified => "modified",
            Self::New => "new",
            Self::Error => "error",
        }
    }

    /// Registry is out of date for this entry. Fetch errors are not drift.
    pub fn is_drift(&self) -> bool {
        matches!(self, Self::Revised | Self::Renumbered | Self::Modified | Self::New)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    No,
    Rev,
    Desc,
    Url,
}

// ---------------------------------------------------------------------------
// Report entry
// ---------------------------------------------------------------------------

/// Content fields as fetched; all `None` when the fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedFields {
    pub no: Option<String>,
    pub rev: Option<String>,
    pub desc: Option<String>,
    pub url: Option<String>,
}

impl FetchedFields {
    pub fn of(record: &StandardRecord) -> Self {
        Self {
            no: record.no().map(str::to_string),
            rev: record.rev().map(str::to_string),
            desc: record.desc().map(str::to_string),
            url: record.url().map(str::to_string),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::No => self.no.as_deref(),
            Field::Rev => self.rev.as_deref(),
            Field::Desc => self.desc.as_deref(),
            Field::Url => self.url.as_deref(),
        }
    }
}

pub(crate) fn actual_field(entry: &ActualEntry, field: Field) -> Option<&str> {
    match field {
        Field::No => entry.no.as_deref(),
        Field::Rev => entry.rev.as_deref(),
        Field::Desc => entry.desc.as_deref(),
        Field::Url => entry.url.as_deref(),
    }
}

/// One line of the check report. Exactly one per fetched record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReportEntry {
    /// With registry ids: the matched entry's id, absent without a match.
    /// This holds for `error` entries too, even though their `actual` is
    /// null. Otherwise a synthesized id above every registry id, counting
    /// up by batch position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub query: String,
    pub body: Body,
    pub status: MatchStatus,
    #[serde(default)]
    pub changes: Vec<Field>,
    #[serde(default)]
    pub error: Option<FetchError>,
    pub fetched: FetchedFields,
    #[serde(default)]
    pub actual: Option<ActualEntry>,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub unchanged: usize,
    pub revised: usize,
    pub renumbered: usize,
    pub modified: usize,
    pub new: usize,
    pub error: usize,
}

impl ReportSummary {
    /// Tally one entry.
    pub fn record(&mut self, status: MatchStatus) {
        self.total += 1;
        let slot = match status {
            MatchStatus::Unchanged => &mut self.unchanged,
            MatchStatus::Revised => &mut self.revised,
            MatchStatus::Renumbered => &mut self.renumbered,
            MatchStatus::Modified => &mut self.modified,
            MatchStatus::New => &mut self.new,
            MatchStatus::Error => &mut self.error,
        };
        *slot += 1;
    }

    pub fn count(&self, status: MatchStatus) -> usize {
        match status {
            MatchStatus::Unchanged => self.unchanged,
            MatchStatus::Revised => self.revised,
            MatchStatus::Renumbered => self.renumbered,
            MatchStatus::Modified => self.modified,
            MatchStatus::New => self.new,
            MatchStatus::Error => self.error,
        }
    }

    pub fn drift(&self) -> usize {
        self.revised + self.renumbered + self.modified + self.new
    }
}
