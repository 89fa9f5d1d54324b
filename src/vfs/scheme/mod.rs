/*!
 * Scheme Handlers
 * Per-scheme policy: standard port, guest credentials, authentication, path syntax
 */

mod builtin;
mod registry;

pub use registry::{FileProvider, SchemeRegistry};

use serde::{Deserialize, Serialize};

use super::types::{VfsError, VfsResult};
use super::url::Credentials;

/// How a scheme deals with credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationType {
    /// Credentials are never used
    #[default]
    None,
    /// Credentials are always needed (guest credentials may stand in)
    Required,
    /// Credentials may be used but are not needed
    Optional,
}

/// Policy object for one scheme
///
/// One instance per scheme, immutable after registration and shared by every
/// locator of that scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeHandler {
    standard_port: Option<u16>,
    guest_credentials: Option<Credentials>,
    authentication: AuthenticationType,
    path_separator: String,
    query_parsed: bool,
}

impl SchemeHandler {
    /// Start building a handler (defaults: no port, no authentication,
    /// `/` separator, query not parsed)
    pub fn builder() -> SchemeHandlerBuilder {
        SchemeHandlerBuilder::default()
    }

    #[inline]
    pub const fn standard_port(&self) -> Option<u16> {
        self.standard_port
    }

    #[inline]
    pub fn guest_credentials(&self) -> Option<&Credentials> {
        self.guest_credentials.as_ref()
    }

    #[inline]
    pub const fn authentication_type(&self) -> AuthenticationType {
        self.authentication
    }

    #[inline]
    pub fn path_separator(&self) -> &str {
        &self.path_separator
    }

    /// True if `?` starts a query, false if it belongs to the path
    #[inline]
    pub const fn is_query_parsed(&self) -> bool {
        self.query_parsed
    }
}

impl Default for SchemeHandler {
    fn default() -> Self {
        Self {
            standard_port: None,
            guest_credentials: None,
            authentication: AuthenticationType::None,
            path_separator: "/".to_string(),
            query_parsed: false,
        }
    }
}

/// Builder for [`SchemeHandler`]
#[derive(Debug, Clone, Default)]
pub struct SchemeHandlerBuilder {
    inner: SchemeHandler,
}

impl SchemeHandlerBuilder {
    pub fn standard_port(mut self, port: u16) -> Self {
        self.inner.standard_port = Some(port);
        self
    }

    pub fn guest_credentials(mut self, credentials: Credentials) -> Self {
        self.inner.guest_credentials = Some(credentials);
        self
    }

    pub fn authentication(mut self, authentication: AuthenticationType) -> Self {
        self.inner.authentication = authentication;
        self
    }

    pub fn path_separator(mut self, separator: impl Into<String>) -> Self {
        self.inner.path_separator = separator.into();
        self
    }

    pub fn query_parsed(mut self, parsed: bool) -> Self {
        self.inner.query_parsed = parsed;
        self
    }

    /// Validate and build the handler
    pub fn build(self) -> VfsResult<SchemeHandler> {
        let handler = self.inner;
        if handler.standard_port == Some(0) {
            return Err(VfsError::InvalidArgument(
                "standard port must be in 1..=65535".into(),
            ));
        }
        if handler.path_separator.is_empty() {
            return Err(VfsError::InvalidArgument(
                "path separator cannot be empty".into(),
            ));
        }
        if handler.authentication == AuthenticationType::None
            && handler.guest_credentials.is_some()
        {
            return Err(VfsError::InvalidArgument(
                "guest credentials require an authenticating scheme".into(),
            ));
        }
        Ok(handler)
    }
}
