/*!
 * File Operations
 * Capability names an adapter may or may not support
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named file operation (capability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOperation {
    ReadFile,
    WriteFile,
    AppendFile,
    RandomReadFile,
    RandomWriteFile,
    ListChildren,
    CreateDirectory,
    Rename,
    Delete,
    ChangeDate,
    ChangePermission,
    GetFreeSpace,
    GetTotalSpace,
    CopyRemotely,
}

impl FileOperation {
    /// Every operation, in declaration order
    pub const ALL: [FileOperation; 14] = [
        FileOperation::ReadFile,
        FileOperation::WriteFile,
        FileOperation::AppendFile,
        FileOperation::RandomReadFile,
        FileOperation::RandomWriteFile,
        FileOperation::ListChildren,
        FileOperation::CreateDirectory,
        FileOperation::Rename,
        FileOperation::Delete,
        FileOperation::ChangeDate,
        FileOperation::ChangePermission,
        FileOperation::GetFreeSpace,
        FileOperation::GetTotalSpace,
        FileOperation::CopyRemotely,
    ];

    #[inline(always)]
    const fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Operations that modify the file or its container
    #[inline]
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(
            self,
            FileOperation::ReadFile
                | FileOperation::RandomReadFile
                | FileOperation::ListChildren
                | FileOperation::GetFreeSpace
                | FileOperation::GetTotalSpace
        )
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FileOperation::ReadFile => "read file",
            FileOperation::WriteFile => "write file",
            FileOperation::AppendFile => "append file",
            FileOperation::RandomReadFile => "random read file",
            FileOperation::RandomWriteFile => "random write file",
            FileOperation::ListChildren => "list children",
            FileOperation::CreateDirectory => "create directory",
            FileOperation::Rename => "rename",
            FileOperation::Delete => "delete",
            FileOperation::ChangeDate => "change date",
            FileOperation::ChangePermission => "change permission",
            FileOperation::GetFreeSpace => "get free space",
            FileOperation::GetTotalSpace => "get total space",
            FileOperation::CopyRemotely => "copy remotely",
        };
        f.write_str(name)
    }
}

/// Compact set of supported operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OperationSet(u32);

impl OperationSet {
    /// No operation supported
    pub const EMPTY: OperationSet = OperationSet(0);

    /// Build a set from a list of operations
    #[must_use]
    pub const fn of(ops: &[FileOperation]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < ops.len() {
            bits |= ops[i].bit();
            i += 1;
        }
        OperationSet(bits)
    }

    /// Every operation
    #[must_use]
    pub const fn all() -> Self {
        Self::of(&FileOperation::ALL)
    }

    #[inline(always)]
    #[must_use]
    pub const fn contains(&self, op: FileOperation) -> bool {
        self.0 & op.bit() != 0
    }

    #[must_use]
    pub const fn with(self, op: FileOperation) -> Self {
        OperationSet(self.0 | op.bit())
    }

    #[must_use]
    pub const fn without(self, op: FileOperation) -> Self {
        OperationSet(self.0 & !op.bit())
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the contained operations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = FileOperation> + '_ {
        FileOperation::ALL.into_iter().filter(move |op| self.contains(*op))
    }
}

impl FromIterator<FileOperation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = FileOperation>>(iter: I) -> Self {
        iter.into_iter().fold(OperationSet::EMPTY, OperationSet::with)
    }
}
