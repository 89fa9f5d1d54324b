/*!
 * VFS Types
 * Shared value types for protocol files
 */

mod attributes;
mod errors;
mod operation;
mod permissions;

pub use attributes::{FileAttributes, UNKNOWN_SIZE};
pub use errors::{VfsError, VfsResult};
pub use operation::{FileOperation, OperationSet};
pub use permissions::{Access, FilePermissions, Permission};
