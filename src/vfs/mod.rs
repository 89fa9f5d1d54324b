/*!
 * Virtual File System Module
 * Locators, scheme registry, protocol files, filters and ordering
 */

pub mod block;
pub mod comparator;
pub mod filter;
pub mod http;
pub mod lazy;
pub mod local;
pub mod scheme;
pub mod traits;
pub mod types;
pub mod url;

// Re-exports
pub use block::{BlockRandomReader, BlockSource};
pub use comparator::{FileComparator, SortCriterion};
pub use filter::FileFilter;
pub use http::{HttpClient, HttpFile, HttpProvider, ReqwestClient};
pub use lazy::{LazyAttributes, ParentCache, ResolutionState};
pub use local::{LocalFile, LocalProvider};
pub use scheme::{AuthenticationType, FileProvider, SchemeHandler, SchemeRegistry};
pub use traits::{
    AbstractFile, CredentialsPrompt, InputStream, OutputStream, ProtocolFile, RandomAccessRead,
    RandomAccessWrite,
};
pub use types::{
    FileAttributes, FileOperation, FilePermissions, OperationSet, VfsError, VfsResult,
    UNKNOWN_SIZE,
};
pub use url::{Credentials, FileUrl};
