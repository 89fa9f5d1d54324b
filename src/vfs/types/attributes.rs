/*!
 * VFS File Attributes
 * Snapshot of the attributes a protocol file exposes
 */

use super::permissions::FilePermissions;
use crate::core::serde::system_time_millis;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Size value meaning "not known"
pub const UNKNOWN_SIZE: i64 = -1;

/// File attributes
///
/// Timestamps are serialized as milliseconds since UNIX epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FileAttributes {
    pub exists: bool,
    pub directory: bool,
    /// Size in bytes, [`UNKNOWN_SIZE`] when not known
    pub size: i64,
    #[serde(with = "system_time_millis")]
    pub last_modified: SystemTime,
    pub permissions: FilePermissions,
}

impl FileAttributes {
    /// Best-effort defaults used before a file has been resolved:
    /// missing, not a directory, unknown size, dated "now"
    #[must_use]
    pub fn unresolved(permissions: FilePermissions) -> Self {
        Self {
            exists: false,
            directory: false,
            size: UNKNOWN_SIZE,
            last_modified: SystemTime::now(),
            permissions,
        }
    }

    #[inline]
    #[must_use]
    pub const fn has_known_size(&self) -> bool {
        self.size >= 0
    }
}

impl Default for FileAttributes {
    fn default() -> Self {
        Self::unresolved(FilePermissions::default())
    }
}
