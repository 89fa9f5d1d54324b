/*!
 * Link Scraping
 * Extracts `src`/`href` attribute values from HTML listing lines
 */

use regex::Regex;

use crate::vfs::types::{VfsError, VfsResult};

/// Attribute patterns, single-quoted first
const PATTERNS: [&str; 2] = [
    r#"(?:src|href|SRC|HREF)='(.*?)'"#,
    r#"(?:src|href|SRC|HREF)="(.*?)""#,
];

/// Compiled link patterns
#[derive(Debug, Clone)]
pub struct LinkScanner {
    patterns: Vec<Regex>,
}

impl LinkScanner {
    pub fn new() -> VfsResult<Self> {
        let patterns = PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VfsError::InvalidArgument(format!("link pattern: {}", e)))?;
        Ok(Self { patterns })
    }

    /// Raw link values on one line, single-quoted matches before double-quoted
    pub fn scan<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.patterns.iter().flat_map(move |pattern| {
            pattern
                .captures_iter(line)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        })
    }
}

/// Links that do not designate a downloadable resource
pub fn is_pseudo_link(link: &str) -> bool {
    let link = link.trim_start().to_ascii_lowercase();
    link.starts_with("mailto") || link.starts_with('#') || link.starts_with("javascript:")
}
