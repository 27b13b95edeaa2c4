use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::config::resolve_endpoint;
use crate::error::{Error, Result};
use crate::query::SceneQuery;
use crate::scene::SceneCollection;

/// Client for the USGS Landsat STAC search endpoint.
///
/// Owns a [`SceneQuery`] and a blocking HTTP client. One `search()` call is
/// one POST; there are no retries and no pagination.
#[derive(Debug, Clone)]
pub struct SearchClient {
    endpoint: String,
    query: SceneQuery,
    http: HttpClient,
}

/// Status and parsed body of one search exchange.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub status: u16,
    pub body: Value,
}

impl SearchResponse {
    /// Parses the response body into a [`SceneCollection`].
    pub fn scenes(&self) -> Result<SceneCollection> {
        SceneCollection::from_response(&self.body)
    }
}

impl SearchClient {
    /// Creates a client for the given query against the configured endpoint
    /// (environment variable, rc file, or the built-in USGS URL).
    pub fn new(query: SceneQuery) -> Result<Self> {
        Self::with_url(query, None)
    }

    /// Creates a client with an explicit endpoint override.
    pub fn with_url(query: SceneQuery, url: Option<String>) -> Result<Self> {
        let endpoint = resolve_endpoint(url);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("landsat-stac/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("landsat-stac")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            endpoint,
            query,
            http,
        })
    }

    /// The search endpoint this client POSTs to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn query(&self) -> &SceneQuery {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut SceneQuery {
        &mut self.query
    }

    /// Renders the query document this client would POST.
    pub fn parameters(&self) -> Result<Value> {
        self.query.generate()
    }

    /// Executes the search, failing with [`Error::Request`] on any non-200
    /// status.
    pub fn search(&self) -> Result<SearchResponse> {
        let response = self.search_lenient()?;
        if response.status != 200 {
            return Err(Error::Request {
                status: response.status,
            });
        }
        Ok(response)
    }

    /// Executes the search and returns the status and body regardless of
    /// status code, so callers can inspect error responses. Only transport
    /// failures and a malformed success body are errors; a non-JSON error
    /// body is surfaced as a JSON string.
    pub fn search_lenient(&self) -> Result<SearchResponse> {
        let body = self.query.generate()?;
        log::debug!("POST {}: {}", self.endpoint, body);

        let response = self.http.post(&self.endpoint).json(&body).send()?;
        let status = response.status().as_u16();
        let text = response.text().unwrap_or_default();
        log::debug!("search returned HTTP {} ({} bytes)", status, text.len());

        let body = match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(e) if status == 200 => return Err(Error::Response(e)),
            Err(_) => Value::String(text),
        };

        Ok(SearchResponse { status, body })
    }
}
