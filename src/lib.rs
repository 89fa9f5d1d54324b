/*!
 * Remote VFS Library
 * Scheme-aware locators and a capability-based file contract over local and HTTP resources
 */

pub mod core;
pub mod monitoring;
pub mod vfs;

// Re-exports
pub use crate::core::ClientConfig;
pub use vfs::{
    AbstractFile, Credentials, FileComparator, FileFilter, FileOperation, FileUrl, ProtocolFile,
    SchemeRegistry, SortCriterion, VfsError, VfsResult,
};
