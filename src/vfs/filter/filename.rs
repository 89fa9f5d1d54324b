/*!
 * Filename Filters
 * String, regex and extension matching on file names
 */

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::{inversion_flag, FileFilter};
use crate::vfs::traits::ProtocolFile;
use crate::vfs::types::{VfsError, VfsResult};

/// How [`FilenameFilter`] compares the name with its pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Equals,
    StartsWith,
    EndsWith,
    Contains,
}

/// Compares file names with a fixed string
///
/// Case-insensitive unless [`FilenameFilter::case_sensitive`] is set.
#[derive(Debug, Clone)]
pub struct FilenameFilter {
    pattern: String,
    mode: MatchMode,
    case_sensitive: bool,
    inverted: bool,
}

impl FilenameFilter {
    pub fn new(pattern: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            pattern: pattern.into(),
            mode,
            case_sensitive: false,
            inverted: false,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    fn matches_name(&self, name: &str, pattern: &str) -> bool {
        match self.mode {
            MatchMode::Equals => name == pattern,
            MatchMode::StartsWith => name.starts_with(pattern),
            MatchMode::EndsWith => name.ends_with(pattern),
            MatchMode::Contains => name.contains(pattern),
        }
    }
}

impl FileFilter for FilenameFilter {
    fn accept(&self, file: &dyn ProtocolFile) -> bool {
        let name = file.name();
        if self.case_sensitive {
            self.matches_name(&name, &self.pattern)
        } else {
            self.matches_name(&name.to_lowercase(), &self.pattern.to_lowercase())
        }
    }

    inversion_flag!();
}

/// Accepts names that match a regular expression in full
#[derive(Debug, Clone)]
pub struct RegexFilenameFilter {
    regex: Regex,
    inverted: bool,
}

impl RegexFilenameFilter {
    pub fn new(pattern: &str, case_sensitive: bool) -> VfsResult<Self> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", pattern))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| VfsError::InvalidArgument(format!("bad filename pattern: {}", e)))?;
        Ok(Self {
            regex,
            inverted: false,
        })
    }
}

impl FileFilter for RegexFilenameFilter {
    fn accept(&self, file: &dyn ProtocolFile) -> bool {
        self.regex.is_match(&file.name())
    }

    inversion_flag!();
}

/// Accepts names ending in one of a set of extensions
///
/// Extensions may be given with or without the leading dot.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
    case_sensitive: bool,
    inverted: bool,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref();
                if ext.starts_with('.') {
                    ext.to_string()
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();
        Self {
            suffixes,
            case_sensitive: false,
            inverted: false,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl FileFilter for ExtensionFilter {
    fn accept(&self, file: &dyn ProtocolFile) -> bool {
        let name = file.name();
        if self.case_sensitive {
            self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
        } else {
            let name = name.to_lowercase();
            self.suffixes
                .iter()
                .any(|suffix| name.ends_with(&suffix.to_lowercase()))
        }
    }

    inversion_flag!();
}
