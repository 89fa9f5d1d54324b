/*!
 * Local Filesystem Adapter
 * The `file` scheme over std::fs
 */

use std::collections::HashSet;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::lazy::ParentCache;
use super::scheme::{FileProvider, SchemeRegistry};
use super::traits::{
    AbstractFile, InputStream, OutputStream, ProtocolFile, RandomAccessRead, RandomAccessWrite,
};
use super::types::*;
use super::url::FileUrl;
use crate::core::limits::MAX_SYMLINK_DEPTH;

const LOCAL_OPERATIONS: OperationSet = OperationSet::all().without(FileOperation::CopyRemotely);

/// Creates [`LocalFile`]s for `file://` locators
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalProvider;

impl FileProvider for LocalProvider {
    fn create(&self, url: FileUrl, registry: &Arc<SchemeRegistry>) -> VfsResult<AbstractFile> {
        Ok(Arc::new(LocalFile::new(url, Arc::clone(registry))))
    }
}

/// File on the host filesystem
///
/// Attributes are read from the filesystem on every call.
#[derive(Debug)]
pub struct LocalFile {
    url: FileUrl,
    path: PathBuf,
    registry: Arc<SchemeRegistry>,
    parent: ParentCache,
}

impl LocalFile {
    pub fn new(url: FileUrl, registry: Arc<SchemeRegistry>) -> Self {
        let path = path_clean::clean(url.path());
        Self {
            url,
            path,
            registry,
            parent: ParentCache::new(),
        }
    }

    /// Host path of this file
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn metadata(&self) -> Option<fs::Metadata> {
        fs::metadata(&self.path).ok()
    }

    fn io_error(&self, e: std::io::Error, action: &str) -> VfsError {
        VfsError::from_io(e, format!("{} {}", action, self.path.display()))
    }

    fn open_options(&self, options: &fs::OpenOptions, action: &str) -> VfsResult<fs::File> {
        options.open(&self.path).map_err(|e| self.io_error(e, action))
    }

    /// Host path designated by another locator of the same scheme
    fn local_path_of(destination: &dyn ProtocolFile) -> Option<PathBuf> {
        destination
            .url()
            .scheme()
            .eq_ignore_ascii_case("file")
            .then(|| path_clean::clean(destination.url().path()))
    }
}

impl ProtocolFile for LocalFile {
    fn url(&self) -> &FileUrl {
        &self.url
    }

    fn supported_operations(&self) -> OperationSet {
        LOCAL_OPERATIONS
    }

    fn exists(&self) -> bool {
        fs::symlink_metadata(&self.path).is_ok()
    }

    fn is_directory(&self) -> bool {
        self.metadata().is_some_and(|md| md.is_dir())
    }

    fn is_symlink(&self) -> bool {
        fs::symlink_metadata(&self.path).is_ok_and(|md| md.file_type().is_symlink())
    }

    fn size(&self) -> i64 {
        match self.metadata() {
            Some(md) if md.is_dir() => 0,
            Some(md) => i64::try_from(md.len()).unwrap_or(i64::MAX),
            None => UNKNOWN_SIZE,
        }
    }

    fn last_modified(&self) -> SystemTime {
        self.metadata()
            .and_then(|md| md.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH)
    }

    fn permissions(&self) -> FilePermissions {
        let Some(md) = self.metadata() else {
            return FilePermissions::new(0);
        };

        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            md.permissions().mode() & 0o777
        };
        #[cfg(not(unix))]
        let mode = if md.permissions().readonly() {
            0o444
        } else {
            0o644
        };

        FilePermissions::new(mode)
    }

    fn changeable_permissions(&self) -> u32 {
        if cfg!(unix) {
            0o777
        } else {
            0o200
        }
    }

    fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.to_string_lossy().into_owned(),
        }
    }

    fn parent(&self) -> VfsResult<Option<AbstractFile>> {
        self.parent.get_or_create(&self.url, &self.registry)
    }

    fn list(&self) -> VfsResult<Vec<AbstractFile>> {
        let entries = fs::read_dir(&self.path).map_err(|e| self.io_error(e, "list"))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.io_error(e, "read entry in"))?;
            let name = entry.file_name().into_string().map_err(|_| {
                VfsError::InvalidArgument(format!(
                    "invalid UTF-8 in filename under {}",
                    self.path.display()
                ))
            })?;
            let child: AbstractFile = Arc::new(LocalFile::new(
                self.url.child(&name),
                Arc::clone(&self.registry),
            ));
            children.push(child);
        }
        Ok(children)
    }

    /// Follow the symlink chain one hop at a time
    fn canonical_url(&self) -> VfsResult<FileUrl> {
        let mut current = self.path.clone();
        let mut visited = HashSet::new();

        loop {
            if !visited.insert(current.clone()) || visited.len() > MAX_SYMLINK_DEPTH {
                return Err(VfsError::CyclicReference(format!(
                    "symlink loop at {}",
                    current.display()
                )));
            }
            let is_link = fs::symlink_metadata(&current)
                .map(|md| md.file_type().is_symlink())
                .unwrap_or(false);
            if !is_link {
                break;
            }
            let target = fs::read_link(&current).map_err(|e| self.io_error(e, "read link"))?;
            current = match current.parent() {
                Some(dir) if target.is_relative() => path_clean::clean(dir.join(&target)),
                _ => path_clean::clean(&target),
            };
        }

        let mut url = self.url.clone();
        url.set_path(&current.to_string_lossy());
        Ok(url)
    }

    fn open_read(&self) -> VfsResult<InputStream> {
        let file = fs::File::open(&self.path).map_err(|e| self.io_error(e, "open"))?;
        Ok(Box::new(file))
    }

    fn open_read_at(&self, offset: u64) -> VfsResult<InputStream> {
        let mut file = fs::File::open(&self.path).map_err(|e| self.io_error(e, "open"))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| self.io_error(e, "seek in"))?;
        Ok(Box::new(file))
    }

    fn open_write(&self) -> VfsResult<OutputStream> {
        let file = self.open_options(
            fs::OpenOptions::new().write(true).create(true).truncate(true),
            "open for write",
        )?;
        Ok(Box::new(file))
    }

    fn open_append(&self) -> VfsResult<OutputStream> {
        let file = self.open_options(
            fs::OpenOptions::new().create(true).append(true),
            "open for append",
        )?;
        Ok(Box::new(file))
    }

    fn open_random_read(&self) -> VfsResult<Box<dyn RandomAccessRead>> {
        let file = fs::File::open(&self.path).map_err(|e| self.io_error(e, "open"))?;
        let length = file
            .metadata()
            .map_err(|e| self.io_error(e, "stat"))?
            .len();
        Ok(Box::new(LocalRandomRead {
            file: Some(file),
            length,
        }))
    }

    fn open_random_write(&self) -> VfsResult<Box<dyn RandomAccessWrite>> {
        let file = self.open_options(
            fs::OpenOptions::new().read(true).write(true).create(true),
            "open for random write",
        )?;
        Ok(Box::new(LocalRandomWrite { file }))
    }

    fn rename_to(&self, destination: &dyn ProtocolFile) -> VfsResult<()> {
        let target =
            Self::local_path_of(destination).ok_or(VfsError::Unsupported(FileOperation::Rename))?;
        fs::rename(&self.path, &target).map_err(|e| {
            VfsError::from_io(
                e,
                format!("rename {} to {}", self.path.display(), target.display()),
            )
        })
    }

    fn delete(&self) -> VfsResult<()> {
        let is_dir = fs::symlink_metadata(&self.path)
            .map_err(|e| self.io_error(e, "delete"))?
            .is_dir();
        if is_dir {
            fs::remove_dir(&self.path).map_err(|e| self.io_error(e, "delete"))
        } else {
            fs::remove_file(&self.path).map_err(|e| self.io_error(e, "delete"))
        }
    }

    fn mkdir(&self) -> VfsResult<()> {
        fs::create_dir(&self.path).map_err(|e| self.io_error(e, "mkdir"))
    }

    fn change_permissions(&self, mode: u32) -> VfsResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(mode & 0o777))
                .map_err(|e| self.io_error(e, "chmod"))
        }

        #[cfg(not(unix))]
        {
            let mut perms = fs::metadata(&self.path)
                .map_err(|e| self.io_error(e, "stat"))?
                .permissions();
            perms.set_readonly(mode & 0o200 == 0);
            fs::set_permissions(&self.path, perms).map_err(|e| self.io_error(e, "chmod"))
        }
    }

    fn set_last_modified(&self, time: SystemTime) -> VfsResult<()> {
        let file = self.open_options(fs::OpenOptions::new().write(true), "open for touch")?;
        file.set_modified(time)
            .map_err(|e| self.io_error(e, "set date of"))
    }

    fn free_space(&self) -> VfsResult<u64> {
        space::free(&self.path)
    }

    fn total_space(&self) -> VfsResult<u64> {
        space::total(&self.path)
    }
}

#[cfg(unix)]
mod space {
    use nix::sys::statvfs::statvfs;
    use std::path::Path;

    use crate::vfs::types::{VfsError, VfsResult};

    fn stat(path: &Path) -> VfsResult<nix::sys::statvfs::Statvfs> {
        statvfs(path).map_err(|e| VfsError::Io(format!("statvfs {}: {}", path.display(), e)))
    }

    #[allow(clippy::unnecessary_cast)]
    pub(super) fn free(path: &Path) -> VfsResult<u64> {
        let st = stat(path)?;
        Ok(st.blocks_available() as u64 * st.fragment_size() as u64)
    }

    #[allow(clippy::unnecessary_cast)]
    pub(super) fn total(path: &Path) -> VfsResult<u64> {
        let st = stat(path)?;
        Ok(st.blocks() as u64 * st.fragment_size() as u64)
    }
}

#[cfg(not(unix))]
mod space {
    use std::path::Path;

    use crate::vfs::types::{FileOperation, VfsError, VfsResult};

    pub(super) fn free(_path: &Path) -> VfsResult<u64> {
        Err(VfsError::Unsupported(FileOperation::GetFreeSpace))
    }

    pub(super) fn total(_path: &Path) -> VfsResult<u64> {
        Err(VfsError::Unsupported(FileOperation::GetTotalSpace))
    }
}

/// Random access input over a local file
struct LocalRandomRead {
    file: Option<fs::File>,
    length: u64,
}

impl LocalRandomRead {
    fn file(&mut self) -> std::io::Result<&mut fs::File> {
        self.file
            .as_mut()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "stream is closed"))
    }
}

impl Read for LocalRandomRead {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file()?.read(buf)
    }
}

impl Seek for LocalRandomRead {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file()?.seek(pos)
    }
}

impl RandomAccessRead for LocalRandomRead {
    fn length(&self) -> u64 {
        self.length
    }

    fn close(&mut self) -> VfsResult<()> {
        self.file = None;
        Ok(())
    }
}

/// Random access output over a local file
struct LocalRandomWrite {
    file: fs::File,
}

impl Write for LocalRandomWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Seek for LocalRandomWrite {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl RandomAccessWrite for LocalRandomWrite {
    fn length(&self) -> VfsResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn set_length(&mut self, length: u64) -> VfsResult<()> {
        self.file
            .set_len(length)
            .map_err(|e| VfsError::Io(format!("set_len: {}", e)))
    }

    fn sync(&mut self) -> VfsResult<()> {
        self.file
            .sync_all()
            .map_err(|e| VfsError::Io(format!("sync: {}", e)))
    }
}
