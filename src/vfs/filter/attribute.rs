/*!
 * Attribute Filters
 * Type bits, capabilities and the accept-everything filter
 */

use serde::{Deserialize, Serialize};

use super::{inversion_flag, FileFilter};
use crate::vfs::traits::ProtocolFile;
use crate::vfs::types::FileOperation;

/// Boolean file attribute tested by [`AttributeFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAttribute {
    Directory,
    /// Not a directory
    File,
    Symlink,
    Hidden,
    Exists,
    Root,
}

/// Accepts files that have one attribute
#[derive(Debug, Clone)]
pub struct AttributeFilter {
    attribute: FileAttribute,
    inverted: bool,
}

impl AttributeFilter {
    pub fn new(attribute: FileAttribute) -> Self {
        Self {
            attribute,
            inverted: false,
        }
    }

    pub fn inverted(attribute: FileAttribute) -> Self {
        Self {
            attribute,
            inverted: true,
        }
    }

    pub fn attribute(&self) -> FileAttribute {
        self.attribute
    }
}

impl FileFilter for AttributeFilter {
    fn accept(&self, file: &dyn ProtocolFile) -> bool {
        match self.attribute {
            FileAttribute::Directory => file.is_directory(),
            FileAttribute::File => !file.is_directory(),
            FileAttribute::Symlink => file.is_symlink(),
            FileAttribute::Hidden => file.is_hidden(),
            FileAttribute::Exists => file.exists(),
            FileAttribute::Root => file.is_root(),
        }
    }

    inversion_flag!();
}

/// Accepts files supporting an operation, without invoking it
#[derive(Debug, Clone)]
pub struct OperationFilter {
    operation: FileOperation,
    inverted: bool,
}

impl OperationFilter {
    pub fn new(operation: FileOperation) -> Self {
        Self {
            operation,
            inverted: false,
        }
    }
}

impl FileFilter for OperationFilter {
    fn accept(&self, file: &dyn ProtocolFile) -> bool {
        file.is_supported(self.operation)
    }

    inversion_flag!();
}

/// Accepts every file (rejects every file when inverted)
#[derive(Debug, Clone, Default)]
pub struct PassThroughFilter {
    inverted: bool,
}

impl PassThroughFilter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileFilter for PassThroughFilter {
    fn accept(&self, _file: &dyn ProtocolFile) -> bool {
        true
    }

    inversion_flag!();
}
