/*!
 * VFS Permissions
 * Unix-style permission bits paired with the mask of bits an adapter supports
 */

use serde::{Deserialize, Deserializer, Serialize};

/// File permissions (Unix-style) with a mask of meaningful bits
///
/// Adapters that only know part of the permission model (HTTP only knows
/// "the user may read") set `mask` accordingly; bits outside the mask carry
/// no information.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilePermissions {
    #[serde(deserialize_with = "deserialize_permission_bits")]
    pub mode: u32,
    #[serde(deserialize_with = "deserialize_permission_bits")]
    pub mask: u32,
}

/// Permission access classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    User,
    Group,
    Other,
}

/// Permission kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Read,
    Write,
    Execute,
}

impl FilePermissions {
    /// Every rwx bit for user, group and other
    pub const FULL_MASK: u32 = 0o777;

    /// Create permissions with all bits supported (masks to valid bits)
    #[inline]
    #[must_use]
    pub const fn new(mode: u32) -> Self {
        Self {
            mode: mode & Self::FULL_MASK,
            mask: Self::FULL_MASK,
        }
    }

    /// Create permissions where only `mask` bits are meaningful
    #[inline]
    #[must_use]
    pub const fn with_mask(mode: u32, mask: u32) -> Self {
        let mask = mask & Self::FULL_MASK;
        Self {
            mode: mode & mask,
            mask,
        }
    }

    /// Read-only for the user, nothing else known (0o400 / 0o700)
    #[inline]
    #[must_use]
    pub const fn user_readonly() -> Self {
        Self::with_mask(0o400, 0o700)
    }

    /// Create read-write permissions (0o644)
    #[inline]
    #[must_use]
    pub const fn readwrite() -> Self {
        Self::new(0o644)
    }

    /// Create executable permissions (0o755)
    #[inline]
    #[must_use]
    pub const fn executable() -> Self {
        Self::new(0o755)
    }

    /// Bit for the given access class / permission pair
    #[inline(always)]
    #[must_use]
    pub const fn bit(access: Access, permission: Permission) -> u32 {
        let shift = match access {
            Access::User => 6,
            Access::Group => 3,
            Access::Other => 0,
        };
        let value = match permission {
            Permission::Read => 0o4,
            Permission::Write => 0o2,
            Permission::Execute => 0o1,
        };
        value << shift
    }

    /// Check a single permission bit
    #[inline(always)]
    #[must_use]
    pub const fn get(&self, access: Access, permission: Permission) -> bool {
        self.mode & Self::bit(access, permission) != 0
    }

    /// True if the adapter reports this bit at all
    #[inline]
    #[must_use]
    pub const fn is_supported(&self, access: Access, permission: Permission) -> bool {
        self.mask & Self::bit(access, permission) != 0
    }

    /// Copy with one bit toggled (bits outside the mask are ignored)
    #[must_use]
    pub const fn set(self, access: Access, permission: Permission, enabled: bool) -> Self {
        let bit = Self::bit(access, permission) & self.mask;
        let mode = if enabled {
            self.mode | bit
        } else {
            self.mode & !bit
        };
        Self {
            mode,
            mask: self.mask,
        }
    }

    /// Check if permissions are read-only (no user write bit set)
    #[inline(always)]
    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.mode & 0o200 == 0
    }

    /// Get user permissions (rwx)
    #[inline]
    #[must_use]
    pub const fn user_permissions(&self) -> u32 {
        (self.mode >> 6) & 0o7
    }

    /// Get group permissions (rwx)
    #[inline]
    #[must_use]
    pub const fn group_permissions(&self) -> u32 {
        (self.mode >> 3) & 0o7
    }

    /// Get other permissions (rwx)
    #[inline]
    #[must_use]
    pub const fn other_permissions(&self) -> u32 {
        self.mode & 0o7
    }

    /// `ls -l` style rendering, `-` for unsupported or cleared bits
    pub fn to_rwx_string(&self) -> String {
        let mut out = String::with_capacity(9);
        for shift in [6, 3, 0] {
            for (value, c) in [(0o4, 'r'), (0o2, 'w'), (0o1, 'x')] {
                let bit = value << shift;
                out.push(if self.mode & self.mask & bit != 0 { c } else { '-' });
            }
        }
        out
    }
}

/// Deserialize and validate permission bits (must be <= 0o777)
fn deserialize_permission_bits<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let bits = u32::deserialize(deserializer)?;
    if bits > FilePermissions::FULL_MASK {
        return Err(serde::de::Error::custom(format!(
            "invalid permission bits: 0o{:o} exceeds maximum 0o777",
            bits
        )));
    }
    Ok(bits)
}

impl Default for FilePermissions {
    fn default() -> Self {
        Self::readwrite()
    }
}
