/*!
 * File Locators
 * Normalized, scheme-aware representation of `scheme://[login[:password]@]host[:port]path[?query]`
 */

mod credentials;
mod encoding;
mod parser;

pub use credentials::Credentials;
pub use encoding::{encode_credential, percent_decode};
pub(crate) use parser::parse;

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;

use super::scheme::{AuthenticationType, SchemeHandler, SchemeRegistry};
use super::types::VfsResult;

/// Parsed locator
///
/// Every setter re-normalizes: the path is never empty and always starts with
/// the scheme's path separator, empty hosts/credentials become `None`.
/// Cloning is deep; the scheme handler is shared but immutable.
#[derive(Clone)]
pub struct FileUrl {
    handler: Arc<SchemeHandler>,
    scheme: String,
    credentials: Option<Credentials>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: Option<String>,
    properties: BTreeMap<String, String>,
}

impl FileUrl {
    /// Create a root locator (`scheme://` + root path) for the given scheme
    pub fn new(scheme: impl Into<String>, handler: Arc<SchemeHandler>) -> Self {
        let path = handler.path_separator().to_string();
        Self {
            handler,
            scheme: scheme.into(),
            credentials: None,
            host: None,
            port: None,
            path,
            query: None,
            properties: BTreeMap::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[inline]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[inline]
    pub fn handler(&self) -> &Arc<SchemeHandler> {
        &self.handler
    }

    #[inline]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    #[inline]
    pub fn contains_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn login(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::login)
    }

    pub fn password(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::password)
    }

    #[inline]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Port as set, which may equal the standard port
    #[inline]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn standard_port(&self) -> Option<u16> {
        self.handler.standard_port()
    }

    pub fn guest_credentials(&self) -> Option<&Credentials> {
        self.handler.guest_credentials()
    }

    pub fn authentication_type(&self) -> AuthenticationType {
        self.handler.authentication_type()
    }

    pub fn path_separator(&self) -> &str {
        self.handler.path_separator()
    }

    /// Port with the standard port folded into "no port"
    #[inline]
    pub fn effective_port(&self) -> Option<u16> {
        match self.port {
            Some(port) if Some(port) == self.handler.standard_port() => None,
            port => port,
        }
    }

    // ---------------------------------------------------------------------
    // Setters
    // ---------------------------------------------------------------------

    /// Change the scheme, picking up the handler registered for it
    pub fn set_scheme(&mut self, scheme: &str, registry: &SchemeRegistry) -> VfsResult<()> {
        self.handler = registry.handler(scheme)?;
        self.scheme = scheme.to_string();
        let path = std::mem::take(&mut self.path);
        self.set_path(&path);
        Ok(())
    }

    /// Set or clear credentials; empty credentials clear them
    pub fn set_credentials(&mut self, credentials: Option<Credentials>) {
        self.credentials = credentials.filter(|c| !c.is_empty());
    }

    /// Set or clear the host; an empty host clears it
    pub fn set_host(&mut self, host: Option<&str>) {
        self.host = host.filter(|h| !h.is_empty()).map(str::to_string);
    }

    /// Set or clear the port; 0 clears it
    pub fn set_port(&mut self, port: Option<u16>) {
        self.port = port.filter(|p| *p != 0);
    }

    /// Set the path; empty means root, a leading separator is added if missing
    pub fn set_path(&mut self, path: &str) {
        let separator = self.handler.path_separator();
        self.path = if path.is_empty() {
            separator.to_string()
        } else if path.starts_with(separator) || path.starts_with('/') {
            path.to_string()
        } else {
            format!("{}{}", separator, path)
        };
    }

    pub fn set_query(&mut self, query: Option<&str>) {
        self.query = query.map(str::to_string);
    }

    /// Set a property, or remove it when `value` is `None`
    pub fn set_property(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.properties.insert(name.to_string(), value.to_string());
            }
            None => {
                self.properties.remove(name);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Path navigation
    // ---------------------------------------------------------------------

    /// Path with every trailing separator removed (root stays root)
    fn trimmed_path(&self) -> &str {
        let separator = self.path_separator();
        let mut path = self.path.as_str();
        while path.len() > separator.len() && path.ends_with(separator) {
            path = &path[..path.len() - separator.len()];
        }
        path
    }

    /// Path with at most one trailing separator removed, used for equality
    fn comparable_path(&self) -> &str {
        let separator = self.path_separator();
        if self.path.len() > separator.len() {
            self.path.strip_suffix(separator).unwrap_or(&self.path)
        } else {
            &self.path
        }
    }

    /// True if the path is the root path
    pub fn is_root(&self) -> bool {
        self.trimmed_path() == self.path_separator()
    }

    /// Last path segment, `None` at root; trailing separators are ignored
    pub fn filename(&self) -> Option<&str> {
        let separator = self.path_separator();
        let path = self.trimmed_path();
        if path == separator {
            return None;
        }
        let name = match path.rfind(separator) {
            Some(pos) => &path[pos + separator.len()..],
            None => path,
        };
        (!name.is_empty()).then_some(name)
    }

    /// Locator of the parent, `None` at root
    ///
    /// Keeps scheme, credentials, host, port and properties; drops the query.
    /// The parent path always ends with the separator.
    pub fn parent(&self) -> Option<FileUrl> {
        let separator = self.path_separator();
        let path = self.trimmed_path();
        if path == separator {
            return None;
        }
        let pos = path.rfind(separator)?;
        let parent_path = path[..pos + separator.len()].to_string();

        let mut parent = self.clone();
        parent.query = None;
        parent.set_path(&parent_path);
        Some(parent)
    }

    /// Locator of a direct child named `name`
    pub fn child(&self, name: &str) -> FileUrl {
        let separator = self.path_separator();
        let mut base = self.trimmed_path().to_string();
        if !base.ends_with(separator) {
            base.push_str(separator);
        }
        base.push_str(name);

        let mut child = self.clone();
        child.query = None;
        child.set_path(&base);
        child
    }

    /// Server-level identity: scheme, host and port with the root path
    pub fn realm(&self) -> FileUrl {
        let mut realm = FileUrl::new(self.scheme.clone(), Arc::clone(&self.handler));
        realm.host = self.host.clone();
        realm.port = self.port;
        realm
    }

    // ---------------------------------------------------------------------
    // Equality and hashing
    // ---------------------------------------------------------------------

    /// Compare locators, optionally including credentials and properties
    ///
    /// Scheme and host compare case-insensitively, the standard port equals
    /// "no port", paths ignore one trailing separator, queries compare exactly.
    pub fn equals_with(
        &self,
        other: &FileUrl,
        compare_credentials: bool,
        compare_properties: bool,
    ) -> bool {
        self.scheme.eq_ignore_ascii_case(&other.scheme)
            && match (&self.host, &other.host) {
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                (None, None) => true,
                _ => false,
            }
            && self.effective_port() == other.effective_port()
            && self.comparable_path() == other.comparable_path()
            && self.query == other.query
            && (!compare_credentials || self.credentials == other.credentials)
            && (!compare_properties || self.properties == other.properties)
    }

    fn hash_parts<H: Hasher>(&self, state: &mut H, credentials: bool, properties: bool) {
        self.scheme.to_ascii_lowercase().hash(state);
        self.host.as_ref().map(|h| h.to_ascii_lowercase()).hash(state);
        self.effective_port().hash(state);
        self.comparable_path().hash(state);
        self.query.hash(state);
        if credentials {
            self.credentials.hash(state);
        }
        if properties {
            self.properties.hash(state);
        }
    }

    /// Hash consistent with [`FileUrl::equals_with`] for the same flags
    pub fn hash_code(&self, compare_credentials: bool, compare_properties: bool) -> u64 {
        let state = ahash::RandomState::with_seeds(
            0x243f_6a88_85a3_08d3,
            0x1319_8a2e_0370_7344,
            0xa409_3822_299f_31d0,
            0x082e_fa98_ec4e_6c89,
        );
        let mut hasher = state.build_hasher();
        self.hash_parts(&mut hasher, compare_credentials, compare_properties);
        hasher.finish()
    }

    // ---------------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------------

    /// String form including the query
    pub fn to_string_with(&self, include_credentials: bool, mask_password: bool) -> String {
        self.to_string_opts(include_credentials, mask_password, true)
    }

    /// String form with every toggle
    ///
    /// Credentials are percent-encoded (or the password masked). A root path
    /// is omitted when there is no host, so `scheme:///` prints as `scheme://`.
    pub fn to_string_opts(
        &self,
        include_credentials: bool,
        mask_password: bool,
        include_query: bool,
    ) -> String {
        let mut out = String::with_capacity(self.scheme.len() + self.path.len() + 16);
        out.push_str(&self.scheme);
        out.push_str("://");

        if include_credentials {
            if let Some(credentials) = &self.credentials {
                out.push_str(&encode_credential(credentials.login()));
                if !credentials.password().is_empty() {
                    out.push(':');
                    if mask_password {
                        out.push_str(&credentials.masked_password());
                    } else {
                        out.push_str(&encode_credential(credentials.password()));
                    }
                }
                out.push('@');
            }
        }

        if let Some(host) = &self.host {
            if host.contains(':') {
                out.push('[');
                out.push_str(host);
                out.push(']');
            } else {
                out.push_str(host);
            }
            if let Some(port) = self.effective_port() {
                out.push(':');
                out.push_str(&port.to_string());
            }
        }

        if self.host.is_some() || self.path != self.path_separator() {
            out.push_str(&self.path);
        }

        if include_query {
            if let Some(query) = &self.query {
                out.push('?');
                out.push_str(query);
            }
        }

        out
    }
}

impl PartialEq for FileUrl {
    fn eq(&self, other: &Self) -> bool {
        self.equals_with(other, false, false)
    }
}

impl Eq for FileUrl {}

impl Hash for FileUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_parts(state, false, false);
    }
}

/// Credentials are never part of the display form
impl fmt::Display for FileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(false, false))
    }
}

impl fmt::Debug for FileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FileUrl")
            .field(&self.to_string_with(true, true))
            .finish()
    }
}
