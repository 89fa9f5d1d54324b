/*!
 * Client Configuration
 *
 * Runtime settings for remote adapters, read from the environment
 */

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use super::limits::{
    DEFAULT_HTTP_TIMEOUT, DEFAULT_USER_AGENT, MAX_REDIRECTS, RANDOM_ACCESS_BLOCK_SIZE,
};

/// Remote client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Redirect hops followed when listing
    pub max_redirects: u32,
    /// Random-access read window
    pub block_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: MAX_REDIRECTS,
            block_size: RANDOM_ACCESS_BLOCK_SIZE,
        }
    }
}

impl ClientConfig {
    /// Build from environment variables, falling back to defaults
    ///
    /// Environment variables:
    /// - VFS_HTTP_TIMEOUT_SECS: request timeout in seconds (default: 30)
    /// - VFS_USER_AGENT: User-Agent header
    /// - VFS_MAX_REDIRECTS: redirect hops followed when listing (default: 10)
    /// - VFS_BLOCK_SIZE: random-access window in bytes (default: 1024)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: env_parse::<u64>("VFS_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            user_agent: std::env::var("VFS_USER_AGENT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            max_redirects: env_parse("VFS_MAX_REDIRECTS").unwrap_or(defaults.max_redirects),
            block_size: env_parse::<usize>("VFS_BLOCK_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(defaults.block_size),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}
