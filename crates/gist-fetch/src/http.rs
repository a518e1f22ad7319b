//! Blocking HTTP fetcher.

use std::time::Duration;

use ureq::Agent;

use crate::urls::{GIST_HOST, raw_url};
use crate::{FetchError, GistFetcher};

/// Default per-request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches raw gist bodies with one GET per call.
///
/// The underlying agent is reused across calls for connection pooling.
/// Redirects are followed, so the `gist.github.com/<id>/raw` form resolves to
/// the current raw content host.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use gist_fetch::{GistFetcher, HttpFetcher};
///
/// let fetcher = HttpFetcher::new().timeout(Duration::from_secs(10));
/// let body = fetcher.fetch("abc123", None)?;
/// # Ok::<(), gist_fetch::FetchError>(())
/// ```
pub struct HttpFetcher {
    base_url: String,
    agent: Agent,
}

impl HttpFetcher {
    /// Create a fetcher against `gist.github.com` with [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: GIST_HOST.to_owned(),
            agent: create_agent(DEFAULT_TIMEOUT),
        }
    }

    /// Set the host raw bodies are fetched from.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GistFetcher for HttpFetcher {
    fn fetch(&self, gist_id: &str, filename: Option<&str>) -> Result<String, FetchError> {
        let url = raw_url(&self.base_url, gist_id, filename);
        tracing::debug!(%url, "fetching gist");

        let transport = |e: ureq::Error| FetchError::Transport {
            url: url.clone(),
            message: e.to_string(),
        };

        let response = self.agent.get(&url).call().map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let mut body = response.into_body();
        let body = body.read_to_string().map_err(transport)?;
        if body.is_empty() {
            return Err(FetchError::Empty { url });
        }

        Ok(body)
    }
}

/// Create an HTTP agent with the given timeout.
///
/// Non-success statuses are returned as responses rather than errors so they
/// can be told apart from transport failures.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Serve a single canned HTTP response on a local port.
    ///
    /// Returns the base URL and a handle yielding the request line.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request.lines().next().unwrap_or_default().to_owned()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_fetch_success() {
        let (base, server) = serve_once("200 OK", "print(\"hi\")");
        let fetcher = HttpFetcher::new().base_url(base);

        let body = fetcher.fetch("abc123", None).unwrap();

        assert_eq!(body, "print(\"hi\")");
        assert_eq!(server.join().unwrap(), "GET /abc123/raw HTTP/1.1");
    }

    #[test]
    fn test_fetch_with_filename() {
        let (base, server) = serve_once("200 OK", "x = 1");
        let fetcher = HttpFetcher::new().base_url(base);

        fetcher.fetch("abc123", Some("a.py")).unwrap();

        assert_eq!(server.join().unwrap(), "GET /abc123/raw/a.py HTTP/1.1");
    }

    #[test]
    fn test_fetch_filename_with_space() {
        let (base, server) = serve_once("200 OK", "x = 1");
        let fetcher = HttpFetcher::new().base_url(base);

        let body = fetcher.fetch("abc123", Some("my file.py")).unwrap();

        assert_eq!(body, "x = 1");
        assert_eq!(server.join().unwrap(), "GET /abc123/raw/my%20file.py HTTP/1.1");
    }

    #[test]
    fn test_fetch_filename_cannot_leave_gist() {
        let (base, server) = serve_once("200 OK", "x = 1");
        let fetcher = HttpFetcher::new().base_url(base);

        fetcher.fetch("abc123", Some("../../cd/raw/evil.py")).unwrap();

        assert_eq!(
            server.join().unwrap(),
            "GET /abc123/raw/..%2F..%2Fcd%2Fraw%2Fevil.py HTTP/1.1"
        );
    }

    #[test]
    fn test_fetch_not_found_is_status_error() {
        let (base, server) = serve_once("404 Not Found", "Not Found");
        let fetcher = HttpFetcher::new().base_url(base);

        let err = fetcher.fetch("abc123", None).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_fetch_empty_body_is_empty_error() {
        let (base, server) = serve_once("200 OK", "");
        let fetcher = HttpFetcher::new().base_url(base);

        let err = fetcher.fetch("abc123", None).unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, FetchError::Empty { .. }));
    }

    #[test]
    fn test_fetch_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let fetcher = HttpFetcher::new()
            .base_url(format!("http://127.0.0.1:{port}"))
            .timeout(Duration::from_secs(5));

        let err = fetcher.fetch("abc123", None).unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert!(err.is_retryable());
    }
}
