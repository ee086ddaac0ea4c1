//! Shared HTTP plumbing for the source adapters.
//!
//! Adapters own their base URL and request shape. They pass a
//! request-building closure to [`FetchClient::send`], which performs a single
//! attempt (no retries) and reduces the outcome to either a [`Response`] or a
//! [`TransportError`]. Status codes are NOT interpreted here; what a 404 means
//! is body-specific.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use tracing::debug;

// ── Constants ───────────────────────────────────────────────────────

pub const USER_AGENT: &str = concat!("stdcheck/", env!("CARGO_PKG_VERSION"));

// ── Errors ──────────────────────────────────────────────────────────

/// The HTTP client itself could not be constructed (TLS backend, bad config).
#[derive(Debug, thiserror::Error)]
#[error("cannot build HTTP client: {0}")]
pub struct ClientError(#[from] reqwest::Error);

/// A request never produced a readable response.
#[derive(Debug, thiserror::Error)]
#[error("{source_name} transport error: {message}")]
pub struct TransportError {
    pub source_name: &'static str,
    pub message: String,
}

/// A fully read response. The body is always decoded as text; JSON adapters
/// parse it themselves so a non-JSON body is a parse failure, not a transport one.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_error_status(&self) -> bool {
        self.status >= 400
    }
}

// ── FetchClient ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    timeout: Duration,
}

impl FetchClient {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http(timeout, false)?,
            timeout,
        })
    }

    /// A client with its own cookie jar, for sources that keep form state
    /// in a server-side session. Each call gets a fresh, unshared jar.
    pub fn session(&self) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http(self.timeout, true)?,
            timeout: self.timeout,
        })
    }

    /// Send one request. `build_request` receives the underlying client and
    /// must return a fully configured `RequestBuilder`.
    pub fn send(
        &self,
        source_name: &'static str,
        build_request: impl FnOnce(&Client) -> RequestBuilder,
    ) -> Result<Response, TransportError> {
        let resp = build_request(&self.http).send().map_err(|e| TransportError {
            source_name,
            message: e.to_string(),
        })?;

        let status = resp.status().as_u16();
        // A body that cannot be read (reset mid-stream, bad chunking) is a
        // transport failure as well.
        let body = resp.text().map_err(|e| TransportError {
            source_name,
            message: format!("failed to read response body: {e}"),
        })?;
        let body = body.trim_start_matches('\u{feff}').to_string();

        debug!(source = source_name, status, bytes = body.len(), "response received");
        Ok(Response { status, body })
    }
}

fn build_http(timeout: Duration, cookies: bool) -> Result<Client, ClientError> {
    let http = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .cookie_store(cookies)
        .build()?;
    Ok(http)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client() -> FetchClient {
        FetchClient::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn returns_status_and_body_without_judging_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("\u{feff}gone");
        });

        let client = client();
        let url = server.url("/missing");
        let resp = client.send("test", |http| http.get(&url)).unwrap();
        assert_eq!(resp.status, 404);
        assert!(resp.is_error_status());
        assert_eq!(resp.body, "gone");
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let client = FetchClient::new(Duration::from_secs(2)).unwrap();
        let err = client
            .send("test", |http| http.get("http://127.0.0.1:1/"))
            .unwrap_err();
        assert_eq!(err.source_name, "test");
        assert!(err.to_string().starts_with("test transport error"));
    }

    #[test]
    fn session_client_replays_cookies() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/form");
            then.status(200)
                .header("set-cookie", "ASP.NET_SessionId=abc123; Path=/")
                .body("<form></form>");
        });
        let post = server.mock(|when, then| {
            when.method(POST)
                .path("/form")
                .header("cookie", "ASP.NET_SessionId=abc123");
            then.status(200).body("ok");
        });

        let session = client().session().unwrap();
        let url = server.url("/form");
        session.send("test", |http| http.get(&url)).unwrap();
        let resp = session.send("test", |http| http.post(&url)).unwrap();

        post.assert();
        assert_eq!(resp.body, "ok");
    }
}
