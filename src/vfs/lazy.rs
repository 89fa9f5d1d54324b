/*!
 * Lazy File State
 * Deferred attribute resolution and parent caching shared by adapters
 */

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::info;

use super::scheme::SchemeRegistry;
use super::traits::AbstractFile;
use super::types::{FileAttributes, VfsResult};
use super::url::FileUrl;

/// Where a lazily resolved file stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Nothing fetched yet; the next getter resolves
    Unresolved,
    /// Provisional attributes are trusted; getters do not resolve
    Skipped,
    /// Attributes came from the server
    Resolved,
    /// Resolution was attempted and failed; never retried
    Failed,
}

/// Attributes resolved at most once per file instance
///
/// Concurrent first accesses block on the same [`OnceLock`] so only one
/// resolution runs. A failed resolution leaves the provisional attributes with
/// `exists = false`.
pub struct LazyAttributes {
    provisional: FileAttributes,
    skip: bool,
    resolved: OnceLock<(FileAttributes, ResolutionState)>,
}

impl LazyAttributes {
    /// Start unresolved, or skipped when the provisional values are good enough
    pub fn new(provisional: FileAttributes, skip: bool) -> Self {
        Self {
            provisional,
            skip,
            resolved: OnceLock::new(),
        }
    }

    pub fn state(&self) -> ResolutionState {
        match self.resolved.get() {
            Some((_, state)) => *state,
            None if self.skip => ResolutionState::Skipped,
            None => ResolutionState::Unresolved,
        }
    }

    /// Attributes as known before any resolution
    #[inline]
    pub fn provisional(&self) -> &FileAttributes {
        &self.provisional
    }

    /// Resolve (once) regardless of the skip flag
    pub fn force<F>(&self, url: &FileUrl, resolve: F) -> &FileAttributes
    where
        F: FnOnce() -> VfsResult<FileAttributes>,
    {
        let (attributes, _) = self.resolved.get_or_init(|| match resolve() {
            Ok(attributes) => (attributes, ResolutionState::Resolved),
            Err(e) => {
                info!(url = %url, error = %e, "Attribute resolution failed");
                let mut attributes = self.provisional.clone();
                attributes.exists = false;
                (attributes, ResolutionState::Failed)
            }
        });
        attributes
    }

    /// Attributes for a getter: provisional when skipped, resolved otherwise
    pub fn get<F>(&self, url: &FileUrl, resolve: F) -> &FileAttributes
    where
        F: FnOnce() -> VfsResult<FileAttributes>,
    {
        match self.resolved.get() {
            Some((attributes, _)) => attributes,
            None if self.skip => &self.provisional,
            None => self.force(url, resolve),
        }
    }
}

impl fmt::Debug for LazyAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyAttributes")
            .field("state", &self.state())
            .finish()
    }
}

/// Parent file instantiated on first request and kept for the file's lifetime
#[derive(Default)]
pub struct ParentCache {
    slot: Mutex<Option<Option<AbstractFile>>>,
}

impl ParentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached parent, creating it through the registry on first call
    ///
    /// Creation errors are returned and not cached.
    pub fn get_or_create(
        &self,
        url: &FileUrl,
        registry: &Arc<SchemeRegistry>,
    ) -> VfsResult<Option<AbstractFile>> {
        let mut slot = self.slot.lock();
        if let Some(parent) = slot.as_ref() {
            return Ok(parent.clone());
        }

        let parent = match url.parent() {
            Some(parent_url) => Some(registry.get_file(parent_url)?),
            None => None,
        };
        *slot = Some(parent.clone());
        Ok(parent)
    }

    pub fn is_cached(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl fmt::Debug for ParentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentCache")
            .field("cached", &self.is_cached())
            .finish()
    }
}
