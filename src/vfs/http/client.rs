/*!
 * HTTP Transport
 * Request/response types and the blocking reqwest client behind them
 */

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Method, StatusCode};
use std::fmt;
use std::io::Read;
use tracing::trace;
use url::Url;

use crate::core::config::ClientConfig;
use crate::vfs::types::{VfsError, VfsResult};
use crate::vfs::url::Credentials;

/// Transport seam for the network adapter
pub trait HttpClient: Send + Sync {
    /// Send one request; any status code is a successful exchange
    fn execute(&self, request: HttpRequest) -> VfsResult<HttpResponse>;
}

/// Outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Sent as HTTP Basic authentication
    pub credentials: Option<Credentials>,
    pub follow_redirects: bool,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            credentials: None,
            follow_redirects: true,
        }
    }

    pub fn head(url: Url) -> Self {
        Self::new(Method::HEAD, url)
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// `Range: bytes=start-` or `bytes=start-end` (inclusive)
    pub fn with_range(self, start: u64, end: Option<u64>) -> Self {
        let range = match end {
            Some(end) => format!("bytes={}-{}", start, end),
            None => format!("bytes={}-", start),
        };
        match HeaderValue::from_str(&range) {
            Ok(value) => self.with_header(reqwest::header::RANGE, value),
            Err(_) => self,
        }
    }

    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}

/// Response with a streaming body
pub struct HttpResponse {
    pub status: StatusCode,
    /// URL after any redirects the client followed
    pub final_url: Url,
    pub headers: HeaderMap,
    pub body: Box<dyn Read + Send>,
}

impl HttpResponse {
    pub fn header(&self, name: impl reqwest::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header(CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Status line text, e.g. `404 Not Found`
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_u16(), reason),
            None => self.status.as_u16().to_string(),
        }
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("final_url", &self.final_url.as_str())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Blocking reqwest transport
///
/// Holds two clients: one following redirects up to the configured limit and
/// one that never does, for callers that track redirects themselves.
pub struct ReqwestClient {
    following: Client,
    direct: Client,
    max_redirects: u32,
}

impl ReqwestClient {
    pub fn new(config: &ClientConfig) -> VfsResult<Self> {
        let build = |policy: Policy| {
            Client::builder()
                .timeout(config.timeout)
                .user_agent(config.user_agent.as_str())
                .redirect(policy)
                .build()
                .map_err(|e| VfsError::Transport(format!("cannot build HTTP client: {}", e)))
        };

        Ok(Self {
            following: build(Policy::limited(config.max_redirects as usize))?,
            direct: build(Policy::none())?,
            max_redirects: config.max_redirects,
        })
    }
}

impl HttpClient for ReqwestClient {
    fn execute(&self, request: HttpRequest) -> VfsResult<HttpResponse> {
        let client = if request.follow_redirects {
            &self.following
        } else {
            &self.direct
        };
        trace!(method = %request.method, url = %request.url, "HTTP request");

        let mut builder = client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(credentials.login(), Some(credentials.password()));
        }

        let response = builder.send().map_err(|e| {
            if e.is_redirect() {
                VfsError::TooManyRedirects(self.max_redirects)
            } else {
                VfsError::Transport(e.to_string())
            }
        })?;

        Ok(HttpResponse {
            status: response.status(),
            final_url: response.url().clone(),
            headers: response.headers().clone(),
            body: Box::new(response),
        })
    }
}

impl fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("max_redirects", &self.max_redirects)
            .finish_non_exhaustive()
    }
}
