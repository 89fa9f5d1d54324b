/*!
 * File Filters
 * Composable predicates over protocol files with an inversion mode
 */

mod attribute;
mod composite;
mod filename;

pub use attribute::{AttributeFilter, FileAttribute, OperationFilter, PassThroughFilter};
pub use composite::{AndFilter, OrFilter};
pub use filename::{ExtensionFilter, FilenameFilter, MatchMode, RegexFilenameFilter};

use super::traits::{AbstractFile, ProtocolFile};

/// File predicate
///
/// `accept` and `reject` are always complementary and ignore inversion;
/// `matches` is what callers use, and it honours inversion.
pub trait FileFilter: Send + Sync {
    fn accept(&self, file: &dyn ProtocolFile) -> bool;

    fn reject(&self, file: &dyn ProtocolFile) -> bool {
        !self.accept(file)
    }

    fn is_inverted(&self) -> bool;

    fn set_inverted(&mut self, inverted: bool);

    /// `accept` normally, `reject` when inverted
    fn matches(&self, file: &dyn ProtocolFile) -> bool {
        if self.is_inverted() {
            self.reject(file)
        } else {
            self.accept(file)
        }
    }

    /// Matching files, input order preserved
    fn filter(&self, files: &[AbstractFile]) -> Vec<AbstractFile> {
        files
            .iter()
            .filter(|file| self.matches(file.as_ref()))
            .cloned()
            .collect()
    }

    /// Drop non-matching files, input order preserved
    fn filter_in_place(&self, files: &mut Vec<AbstractFile>) {
        files.retain(|file| self.matches(file.as_ref()));
    }

    fn match_all(&self, files: &[AbstractFile]) -> bool {
        files.iter().all(|file| self.matches(file.as_ref()))
    }

    fn accept_all(&self, files: &[AbstractFile]) -> bool {
        files.iter().all(|file| self.accept(file.as_ref()))
    }

    fn reject_all(&self, files: &[AbstractFile]) -> bool {
        files.iter().all(|file| self.reject(file.as_ref()))
    }
}

/// `is_inverted`/`set_inverted` over an `inverted: bool` field
macro_rules! inversion_flag {
    () => {
        fn is_inverted(&self) -> bool {
            self.inverted
        }

        fn set_inverted(&mut self, inverted: bool) {
            self.inverted = inverted;
        }
    };
}

pub(crate) use inversion_flag;
