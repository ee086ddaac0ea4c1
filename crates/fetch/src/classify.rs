//! Failure classification shared by every adapter.
//!
//! Priority, highest first:
//!
//! 1. transport failure                       → `ConnectionError`
//! 2. response carries the body's no-match signal → `NotFound`
//! 3. required fields cannot be extracted      → `DataParsingError`
//! 4. otherwise                                → success
//!
//! Rule 2 only fires on a positive signal. A response that is malformed and
//! also lacks the sentinel is a parse failure, never a not-found.

use stdcheck_core::FetchError;
use tracing::warn;

use crate::client::{Response, TransportError};

/// Result of running a body-specific parser over a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parse<T> {
    Found(T),
    /// The source explicitly answered "no such publication".
    NoMatch,
    /// Expected structure is missing.
    Malformed(&'static str),
}

impl<T> Parse<T> {
    /// Lift an optional extraction: `None` means the structure was missing.
    pub fn require(value: Option<T>, what: &'static str) -> Self {
        match value {
            Some(v) => Parse::Found(v),
            None => Parse::Malformed(what),
        }
    }
}

/// Apply the classification order to one fetch attempt.
pub fn classify<T>(
    query: &str,
    attempt: Result<Response, TransportError>,
    parse: impl FnOnce(&Response) -> Parse<T>,
) -> Result<T, FetchError> {
    let response = match attempt {
        Ok(r) => r,
        Err(e) => {
            warn!(query, error = %e, "connection error");
            return Err(FetchError::ConnectionError);
        }
    };

    match parse(&response) {
        Parse::Found(v) => Ok(v),
        Parse::NoMatch => {
            warn!(query, status = response.status, "not found");
            Err(FetchError::NotFound)
        }
        Parse::Malformed(what) => {
            warn!(query, status = response.status, missing = what, "data parsing error");
            Err(FetchError::DataParsingError)
        }
    }
}

/// Run `parse` unless `body` contains the no-match `sentinel`.
pub fn unless_sentinel<T>(
    body: &str,
    sentinel: &str,
    parse: impl FnOnce(&str) -> Parse<T>,
) -> Parse<T> {
    if body.contains(sentinel) {
        Parse::NoMatch
    } else {
        parse(body)
    }
}

/// Status-driven no-match: sources that answer unknown identifiers with an
/// HTTP error page instead of an in-band message.
pub fn unless_error_status<T>(
    response: &Response,
    parse: impl FnOnce(&str) -> Parse<T>,
) -> Parse<T> {
    if response.is_error_status() {
        Parse::NoMatch
    } else {
        parse(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(status: u16, body: &str) -> Result<Response, TransportError> {
        Ok(Response { status, body: body.to_string() })
    }

    fn parse_title(body: &str) -> Parse<String> {
        Parse::require(
            body.strip_prefix("title:").map(str::to_string),
            "title",
        )
    }

    #[test]
    fn transport_failure_wins_and_skips_parsing() {
        let attempt = Err(TransportError {
            source_name: "test",
            message: "timed out".into(),
        });
        let result: Result<(), FetchError> =
            classify("q", attempt, |_| panic!("parser must not run"));
        assert_eq!(result, Err(FetchError::ConnectionError));
    }

    #[test]
    fn sentinel_beats_parsing() {
        let result = classify("q", ok(200, "No valid publication found."), |r| {
            unless_sentinel(&r.body, "No valid publication found.", parse_title)
        });
        assert_eq!(result, Err(FetchError::NotFound));
    }

    #[test]
    fn malformed_without_sentinel_is_parse_error() {
        let result = classify("q", ok(200, "Bad webpage"), |r| {
            unless_sentinel(&r.body, "No valid publication found.", parse_title)
        });
        assert_eq!(result, Err(FetchError::DataParsingError));
    }

    #[test]
    fn success_passes_value_through() {
        let result = classify("q", ok(200, "title:Flash point"), |r| {
            unless_sentinel(&r.body, "No valid publication found.", parse_title)
        });
        assert_eq!(result, Ok("Flash point".to_string()));
    }

    #[test]
    fn error_status_is_not_found_when_requested() {
        for status in [404, 410, 500, 503] {
            let result = classify("q", ok(status, "title:ignored"), |r| {
                unless_error_status(r, parse_title)
            });
            assert_eq!(result, Err(FetchError::NotFound), "status {status}");
        }
    }
}
