/*!
 * Scheme Registry
 * Maps scheme names to handlers and file providers
 */

use ahash::RandomState;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{builtin, SchemeHandler};
use crate::core::config::ClientConfig;
use crate::vfs::http::{HttpClient, HttpProvider, ReqwestClient};
use crate::vfs::local::LocalProvider;
use crate::vfs::traits::AbstractFile;
use crate::vfs::types::{VfsError, VfsResult};
use crate::vfs::url::{self, FileUrl};

/// Factory for protocol files of one scheme
pub trait FileProvider: Send + Sync {
    /// Instantiate the file designated by `url`
    ///
    /// Must not perform I/O that a lazy adapter would defer. The registry is
    /// handed over so the file can instantiate its parent and children later.
    fn create(&self, url: FileUrl, registry: &Arc<SchemeRegistry>) -> VfsResult<AbstractFile>;
}

/// Internal registry entry
struct SchemeEntry {
    handler: Arc<SchemeHandler>,
    provider: Option<Arc<dyn FileProvider>>,
}

/// Scheme registry
///
/// Keys are lower-cased, so `HTTP` and `http` share one entry. Registration is
/// expected at startup; lookups are lock-free reads on the shard map.
pub struct SchemeRegistry {
    entries: DashMap<String, SchemeEntry, RandomState>,
}

impl SchemeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Registry with the builtin schemes, using a reqwest transport
    pub fn with_defaults(config: &ClientConfig) -> VfsResult<Arc<Self>> {
        let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(config)?);
        Self::with_http_client(client, config)
    }

    /// Registry with the builtin schemes over the given HTTP transport
    ///
    /// `file`, `http` and `https` get adapters; `ftp`, `sftp` and `smb` only
    /// get their handler policy.
    pub fn with_http_client(
        client: Arc<dyn HttpClient>,
        config: &ClientConfig,
    ) -> VfsResult<Arc<Self>> {
        let registry = Self::new();
        let http: Arc<dyn FileProvider> = Arc::new(HttpProvider::new(client, config.clone())?);

        registry.register("file", builtin::file(), Arc::new(LocalProvider))?;
        registry.register("http", builtin::http(), Arc::clone(&http))?;
        registry.register("https", builtin::https(), http)?;
        registry.register_handler("ftp", builtin::ftp())?;
        registry.register_handler("sftp", builtin::sftp())?;
        registry.register_handler("smb", builtin::smb())?;

        Ok(Arc::new(registry))
    }

    /// Register a scheme with its handler and provider
    pub fn register(
        &self,
        scheme: &str,
        handler: SchemeHandler,
        provider: Arc<dyn FileProvider>,
    ) -> VfsResult<()> {
        self.insert(scheme, handler, Some(provider))
    }

    /// Register a scheme's policy without an adapter
    pub fn register_handler(&self, scheme: &str, handler: SchemeHandler) -> VfsResult<()> {
        self.insert(scheme, handler, None)
    }

    fn insert(
        &self,
        scheme: &str,
        handler: SchemeHandler,
        provider: Option<Arc<dyn FileProvider>>,
    ) -> VfsResult<()> {
        if scheme.is_empty() {
            return Err(VfsError::InvalidArgument("scheme cannot be empty".into()));
        }
        let key = scheme.to_ascii_lowercase();

        match self.entries.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(VfsError::AlreadyExists(format!(
                "scheme already registered: {}",
                scheme
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                debug!(scheme, adapter = provider.is_some(), "Registered scheme");
                slot.insert(SchemeEntry {
                    handler: Arc::new(handler),
                    provider,
                });
                Ok(())
            }
        }
    }

    /// Handler for a scheme
    pub fn handler(&self, scheme: &str) -> VfsResult<Arc<SchemeHandler>> {
        self.entries
            .get(&scheme.to_ascii_lowercase())
            .map(|entry| Arc::clone(&entry.handler))
            .ok_or_else(|| VfsError::UnknownScheme(scheme.to_string()))
    }

    /// Parse a locator against this registry's handlers
    pub fn parse(&self, text: &str) -> VfsResult<FileUrl> {
        url::parse(text, self)
    }

    /// Root locator (`scheme://`) for a registered scheme
    pub fn root_url(&self, scheme: &str) -> VfsResult<FileUrl> {
        Ok(FileUrl::new(scheme, self.handler(scheme)?))
    }

    /// Instantiate the file for a locator
    pub fn get_file(self: &Arc<Self>, url: FileUrl) -> VfsResult<AbstractFile> {
        // Clone the provider out so no shard lock is held during creation
        let provider = self
            .entries
            .get(&url.scheme().to_ascii_lowercase())
            .ok_or_else(|| VfsError::UnknownScheme(url.scheme().to_string()))?
            .provider
            .clone()
            .ok_or_else(|| {
                VfsError::UnknownScheme(format!("no adapter available for {}", url.scheme()))
            })?;
        provider.create(url, self)
    }

    /// Parse then instantiate
    pub fn resolve(self: &Arc<Self>, text: &str) -> VfsResult<AbstractFile> {
        let url = self.parse(text)?;
        self.get_file(url)
    }

    /// Registered scheme names, sorted
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        schemes.sort();
        schemes
    }

    pub fn is_registered(&self, scheme: &str) -> bool {
        self.entries.contains_key(&scheme.to_ascii_lowercase())
    }

    /// True if files of this scheme can be instantiated
    pub fn has_provider(&self, scheme: &str) -> bool {
        self.entries
            .get(&scheme.to_ascii_lowercase())
            .is_some_and(|entry| entry.provider.is_some())
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
