// ABOUTME: Configuration options for the scrape client and the fluent ClientBuilder.
// ABOUTME: Covers the solver endpoint, fetch timeout, and the browser header profile sent to it.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;

/// Default FlareSolverr endpoint, overridable via `FLARESOLVERR_URL`.
pub const DEFAULT_SOLVER_URL: &str = "http://flaresolverr:8191/v1";

/// Browser user agent presented to the target site through the solver.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.121 Safari/537.36";

/// Configuration options for the scrape client.
#[derive(Debug, Clone)]
pub struct Options {
    pub solver_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            "Accept-Language".to_string(),
            "en-US,en;q=0.9".to_string(),
        );
        headers.insert("Referer".to_string(), "https://tracker.gg/".to_string());
        headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
        );
        Self {
            solver_url: std::env::var("FLARESOLVERR_URL")
                .unwrap_or_else(|_| DEFAULT_SOLVER_URL.to_string()),
            timeout: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers,
            http_client: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the FlareSolverr endpoint URL.
    pub fn solver_url(mut self, url: impl Into<String>) -> Self {
        self.opts.solver_url = url.into();
        self
    }

    /// Set the fetch timeout (applied to the solver call and forwarded to it).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent presented to the target site.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a header to the profile forwarded through the solver.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client for talking to the solver.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}
