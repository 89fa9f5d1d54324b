/*!
 * Limits and Constants
 *
 * Centralized location for protocol limits, block sizes and defaults.
 */

use std::time::Duration;

// =============================================================================
// HTTP
// =============================================================================

/// Maximum number of 3xx hops followed before giving up
pub const MAX_REDIRECTS: u32 = 10;

/// Window fetched per random-access block request (1KB)
pub const RANDOM_ACCESS_BLOCK_SIZE: usize = 1024;

/// Request timeout for remote round trips
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("remote-vfs/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// LOCAL FILESYSTEM
// =============================================================================

/// Longest symlink chain followed before reporting a cycle
/// Matches Linux MAXSYMLINKS
pub const MAX_SYMLINK_DEPTH: usize = 40;

// =============================================================================
// LOCATORS
// =============================================================================

/// Character used to mask passwords in displayed locators
pub const PASSWORD_MASK_CHAR: char = '*';
