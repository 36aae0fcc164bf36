// ABOUTME: The scrape Client that fetches rendered profile pages through FlareSolverr.
// ABOUTME: Provides async player_stats() tying URL construction, fetch, parse, and assembly together.

use std::collections::HashMap;

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScrapeError;
use crate::games::GameParser;
use crate::options::{ClientBuilder, Options};

/// Wire request for the solver's `request.get` command.
#[derive(Debug, Serialize)]
struct SolverRequest<'a> {
    cmd: &'static str,
    url: &'a str,
    #[serde(rename = "maxTimeout")]
    max_timeout: u64,
    headers: &'a HashMap<String, String>,
}

/// The solver wraps the rendered page in a `solution` envelope.
#[derive(Debug, Deserialize)]
struct SolverResponse {
    #[serde(default)]
    solution: Option<SolverSolution>,
}

#[derive(Debug, Deserialize)]
struct SolverSolution {
    #[serde(default)]
    response: Option<String>,
}

/// The scraping client: one solver endpoint, one header profile.
///
/// Each call owns its full lifecycle; nothing is shared between requests
/// beyond the connection pool, so a dropped caller simply abandons the
/// in-flight fetch with no observable side effects.
pub struct Client {
    solver_url: String,
    timeout_ms: u64,
    headers: HashMap<String, String>,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            // The outer HTTP timeout must outlast the solver's own render
            // budget, which is what opts.timeout actually bounds.
            reqwest::Client::builder()
                .timeout(opts.timeout + std::time::Duration::from_secs(5))
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        let mut headers = opts.headers.clone();
        headers
            .entry("User-Agent".to_string())
            .or_insert(opts.user_agent.clone());

        Self {
            solver_url: opts.solver_url,
            timeout_ms: opts.timeout.as_millis() as u64,
            headers,
            http_client,
        }
    }

    /// Fetch the rendered HTML for a target URL through the solver.
    ///
    /// Returns `Ok(None)` when the solver answers with empty content;
    /// network failures, timeouts, non-2xx solver statuses, and malformed
    /// solver replies are errors for the caller to classify.
    pub async fn fetch_page(&self, url: &str) -> Result<Option<String>, ScrapeError> {
        if url.is_empty() {
            return Err(ScrapeError::invalid_url(url, "FetchPage", None));
        }

        let payload = SolverRequest {
            cmd: "request.get",
            url,
            max_timeout: self.timeout_ms,
            headers: &self.headers,
        };

        let response = self
            .http_client
            .post(&self.solver_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScrapeError::timeout(url, "FetchPage", Some(e.into()))
                } else {
                    ScrapeError::fetch(url, "FetchPage", Some(e.into()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::fetch(
                url,
                "FetchPage",
                Some(anyhow::anyhow!("solver returned status {}", status)),
            ));
        }

        let body: SolverResponse = response
            .json()
            .await
            .map_err(|e| ScrapeError::solver(url, "FetchPage", Some(e.into())))?;

        let html = body
            .solution
            .and_then(|s| s.response)
            .unwrap_or_default();
        if html.is_empty() {
            Ok(None)
        } else {
            Ok(Some(html))
        }
    }

    /// Fetch and parse one player's stats for a game.
    ///
    /// `None` means not found: the solver produced no usable content
    /// (empty body, fetch failure, or timeout). A present record may still
    /// be all defaults when the page structure did not match — the two
    /// cases are not distinguishable from the extraction side.
    pub async fn player_stats<P: GameParser>(
        &self,
        parser: &P,
        player: &str,
        query: P::Query,
    ) -> Result<Option<P::Record>, ScrapeError> {
        let url = parser.profile_url(player, &query);

        let html = match self.fetch_page(&url).await {
            Ok(Some(html)) => html,
            Ok(None) => {
                debug!(url = %url, "no page content received");
                return Ok(None);
            }
            Err(err) if err.is_fetch() || err.is_timeout() || err.is_solver() => {
                warn!(url = %url, error = %err, "fetch failed, treating as not found");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        debug!(url = %url, bytes = html.len(), "parsing profile page");
        let doc = Html::parse_document(&html);
        Ok(Some(parser.extract(&doc, player, &query)))
    }
}
