/*!
 * File Comparator
 * Multi-criterion ordering for directory listings
 */

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::traits::{AbstractFile, ProtocolFile};
use super::types::VfsError;

/// Primary sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    #[default]
    Name,
    Size,
    Date,
    Extension,
}

impl FromStr for SortCriterion {
    type Err = VfsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "size" => Ok(Self::Size),
            "date" => Ok(Self::Date),
            "extension" | "ext" => Ok(Self::Extension),
            other => Err(VfsError::InvalidArgument(format!(
                "unknown sort criterion: {}",
                other
            ))),
        }
    }
}

/// Ordering over files
///
/// With `directories_first`, directories precede other files whatever the
/// criterion or direction; `ascending = false` only reverses the order
/// inside each group. Every criterion falls back to the name on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileComparator {
    pub criterion: SortCriterion,
    pub ascending: bool,
    pub case_sensitive: bool,
    pub directories_first: bool,
}

impl Default for FileComparator {
    fn default() -> Self {
        Self {
            criterion: SortCriterion::Name,
            ascending: true,
            case_sensitive: false,
            directories_first: true,
        }
    }
}

/// Text after the last `.`, empty if none
fn extension_of(name: &str) -> &str {
    name.rfind('.').map_or("", |pos| &name[pos + 1..])
}

impl FileComparator {
    pub fn new(
        criterion: SortCriterion,
        ascending: bool,
        case_sensitive: bool,
        directories_first: bool,
    ) -> Self {
        Self {
            criterion,
            ascending,
            case_sensitive,
            directories_first,
        }
    }

    fn compare_names(&self, a: &str, b: &str) -> Ordering {
        if self.case_sensitive {
            a.cmp(b)
        } else {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        }
    }

    fn compare_within_group(&self, a: &dyn ProtocolFile, b: &dyn ProtocolFile) -> Ordering {
        let (name_a, name_b) = (a.name(), b.name());
        let primary = match self.criterion {
            SortCriterion::Name => Ordering::Equal,
            SortCriterion::Size => a.size().max(0).cmp(&b.size().max(0)),
            SortCriterion::Date => a.last_modified().cmp(&b.last_modified()),
            SortCriterion::Extension => extension_of(&name_a)
                .to_lowercase()
                .cmp(&extension_of(&name_b).to_lowercase()),
        };
        primary.then_with(|| self.compare_names(&name_a, &name_b))
    }

    pub fn compare(&self, a: &dyn ProtocolFile, b: &dyn ProtocolFile) -> Ordering {
        if self.directories_first {
            match (a.is_directory(), b.is_directory()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }

        let order = self.compare_within_group(a, b);
        if self.ascending {
            order
        } else {
            order.reverse()
        }
    }

    /// Stable in-place sort
    pub fn sort(&self, files: &mut [AbstractFile]) {
        files.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }
}
