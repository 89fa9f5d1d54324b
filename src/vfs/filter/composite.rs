/*!
 * Composite Filters
 * AND / OR over child filters
 */

use std::fmt;

use super::{inversion_flag, FileFilter};
use crate::vfs::traits::ProtocolFile;

/// Accepts when every child matches; an empty AND accepts everything
///
/// Children are evaluated in order through their own `matches`, stopping at
/// the first miss. Inverting the composite negates the whole conjunction.
#[derive(Default)]
pub struct AndFilter {
    filters: Vec<Box<dyn FileFilter>>,
    inverted: bool,
}

impl AndFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl FileFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn push(&mut self, filter: Box<dyn FileFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FileFilter for AndFilter {
    fn accept(&self, file: &dyn ProtocolFile) -> bool {
        self.filters.iter().all(|filter| filter.matches(file))
    }

    inversion_flag!();
}

impl fmt::Debug for AndFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AndFilter")
            .field("filters", &self.filters.len())
            .field("inverted", &self.inverted)
            .finish()
    }
}

/// Accepts when any child matches; an empty OR accepts nothing
#[derive(Default)]
pub struct OrFilter {
    filters: Vec<Box<dyn FileFilter>>,
    inverted: bool,
}

impl OrFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl FileFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn push(&mut self, filter: Box<dyn FileFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FileFilter for OrFilter {
    fn accept(&self, file: &dyn ProtocolFile) -> bool {
        self.filters.iter().any(|filter| filter.matches(file))
    }

    inversion_flag!();
}

impl fmt::Debug for OrFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrFilter")
            .field("filters", &self.filters.len())
            .field("inverted", &self.inverted)
            .finish()
    }
}
