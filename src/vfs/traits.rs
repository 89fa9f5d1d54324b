/*!
 * VFS Traits
 * Protocol file contract and random access streams
 */

use std::fmt;
use std::io::{Read, Seek, Write};
use std::sync::Arc;
use std::time::SystemTime;

use super::types::*;
use super::url::{percent_decode, Credentials, FileUrl};

/// Shared handle to any protocol file
pub type AbstractFile = Arc<dyn ProtocolFile>;

/// Readable input stream
pub type InputStream = Box<dyn Read + Send>;

/// Writable output stream
pub type OutputStream = Box<dyn Write + Send>;

/// Protocol file trait
///
/// One implementation per scheme. Capability is queried through
/// [`ProtocolFile::supported_operations`]; every operation a protocol does not
/// implement fails with [`VfsError::Unsupported`] naming the operation, which
/// is what the default bodies below do.
///
/// Attribute getters never fail: when the underlying protocol cannot answer,
/// they report a missing file of unknown size.
pub trait ProtocolFile: Send + Sync + fmt::Debug {
    /// Locator of this file
    fn url(&self) -> &FileUrl;

    /// Operations this file supports
    fn supported_operations(&self) -> OperationSet;

    #[inline]
    fn is_supported(&self, op: FileOperation) -> bool {
        self.supported_operations().contains(op)
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    fn exists(&self) -> bool;

    fn is_directory(&self) -> bool;

    fn is_symlink(&self) -> bool {
        false
    }

    /// Size in bytes, [`UNKNOWN_SIZE`] if not known
    fn size(&self) -> i64;

    fn last_modified(&self) -> SystemTime;

    fn permissions(&self) -> FilePermissions;

    /// Permission bits [`ProtocolFile::change_permissions`] can alter
    fn changeable_permissions(&self) -> u32 {
        0
    }

    fn owner(&self) -> Option<String> {
        None
    }

    fn group(&self) -> Option<String> {
        None
    }

    /// Display name: the decoded last path segment, or the host at root
    fn name(&self) -> String {
        match self.url().filename() {
            Some(name) => percent_decode(name),
            None => self.url().host().unwrap_or_default().to_string(),
        }
    }

    fn is_hidden(&self) -> bool {
        self.name().starts_with('.')
    }

    fn is_root(&self) -> bool {
        self.url().is_root()
    }

    /// Snapshot of the attribute getters
    fn attributes(&self) -> FileAttributes {
        FileAttributes {
            exists: self.exists(),
            directory: self.is_directory(),
            size: self.size(),
            last_modified: self.last_modified(),
            permissions: self.permissions(),
        }
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// Parent file, `None` at root
    fn parent(&self) -> VfsResult<Option<AbstractFile>>;

    /// Direct children
    fn list(&self) -> VfsResult<Vec<AbstractFile>> {
        Err(VfsError::Unsupported(FileOperation::ListChildren))
    }

    /// Locator with symbolic links resolved
    fn canonical_url(&self) -> VfsResult<FileUrl> {
        Ok(self.url().clone())
    }

    // ---------------------------------------------------------------------
    // Streams
    // ---------------------------------------------------------------------

    fn open_read(&self) -> VfsResult<InputStream> {
        Err(VfsError::Unsupported(FileOperation::ReadFile))
    }

    /// Stream starting at `offset`
    ///
    /// Adapters without partial transfers only serve offset 0.
    fn open_read_at(&self, offset: u64) -> VfsResult<InputStream> {
        if offset == 0 {
            return self.open_read();
        }
        Err(VfsError::Unsupported(FileOperation::ReadFile))
    }

    /// Create or truncate, then write
    fn open_write(&self) -> VfsResult<OutputStream> {
        Err(VfsError::Unsupported(FileOperation::WriteFile))
    }

    fn open_append(&self) -> VfsResult<OutputStream> {
        Err(VfsError::Unsupported(FileOperation::AppendFile))
    }

    fn open_random_read(&self) -> VfsResult<Box<dyn RandomAccessRead>> {
        Err(VfsError::Unsupported(FileOperation::RandomReadFile))
    }

    fn open_random_write(&self) -> VfsResult<Box<dyn RandomAccessWrite>> {
        Err(VfsError::Unsupported(FileOperation::RandomWriteFile))
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    fn rename_to(&self, _destination: &dyn ProtocolFile) -> VfsResult<()> {
        Err(VfsError::Unsupported(FileOperation::Rename))
    }

    fn delete(&self) -> VfsResult<()> {
        Err(VfsError::Unsupported(FileOperation::Delete))
    }

    fn mkdir(&self) -> VfsResult<()> {
        Err(VfsError::Unsupported(FileOperation::CreateDirectory))
    }

    fn change_permissions(&self, _mode: u32) -> VfsResult<()> {
        Err(VfsError::Unsupported(FileOperation::ChangePermission))
    }

    fn set_last_modified(&self, _time: SystemTime) -> VfsResult<()> {
        Err(VfsError::Unsupported(FileOperation::ChangeDate))
    }

    fn free_space(&self) -> VfsResult<u64> {
        Err(VfsError::Unsupported(FileOperation::GetFreeSpace))
    }

    fn total_space(&self) -> VfsResult<u64> {
        Err(VfsError::Unsupported(FileOperation::GetTotalSpace))
    }

    /// Server-side copy to a file of the same protocol
    fn copy_remotely_to(&self, _destination: &dyn ProtocolFile) -> VfsResult<()> {
        Err(VfsError::Unsupported(FileOperation::CopyRemotely))
    }
}

/// Random access input
///
/// Closing is idempotent; reads after close fail.
pub trait RandomAccessRead: Read + Seek + Send {
    /// Total length in bytes
    fn length(&self) -> u64;

    fn close(&mut self) -> VfsResult<()>;
}

/// Random access output
pub trait RandomAccessWrite: Write + Seek + Send {
    fn length(&self) -> VfsResult<u64>;

    /// Truncate or extend to `length` bytes
    fn set_length(&mut self, length: u64) -> VfsResult<()>;

    /// Flush data to storage
    fn sync(&mut self) -> VfsResult<()>;
}

/// Supplies credentials when an operation reports
/// [`VfsError::AuthenticationRequired`]
///
/// The caller sets the returned credentials on the locator and retries; the
/// library never prompts on its own.
pub trait CredentialsPrompt {
    fn credentials_for(&self, url: &FileUrl) -> Option<Credentials>;
}
