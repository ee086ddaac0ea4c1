//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; never renumber one.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | check            | Registry drift found (`--fail-on-drift`) |
//! | 2       | Universal        | CLI usage error (bad args, no queries)   |
//! | 3-4     | Universal        | File IO / document parse                 |
//! | 60-69   | fetch            | Query validation and upstream outcomes   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-4)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, nothing to do.
pub const EXIT_USAGE: u8 = 2;

/// Cannot read or write a file (catalog, settings, data documents).
pub const EXIT_IO: u8 = 3;

/// A file was read but its contents are not the expected shape.
pub const EXIT_PARSE: u8 = 4;

// =============================================================================
// Check (1)
// =============================================================================

/// `check --fail-on-drift` found revised, renumbered, modified or new entries.
/// Like `diff(1)`, exit 1 means "registry differs."
pub const EXIT_CHECK_DRIFT: u8 = 1;

// =============================================================================
// Fetch (60-69)
// =============================================================================

/// A query is not a usable identifier (non-string catalog entry, empty,
/// control characters). Raised before any request is made.
pub const EXIT_FETCH_INVALID_QUERY: u8 = 60;

/// Every query in the batch came back with an error. The fetched document
/// is still written so the failures can be inspected.
pub const EXIT_FETCH_ALL_FAILED: u8 = 61;

/// HTTP client or worker pool could not be created (TLS backend, thread limits).
pub const EXIT_FETCH_SETUP: u8 = 62;
