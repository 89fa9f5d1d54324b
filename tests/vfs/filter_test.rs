/*!
 * Filter Tests
 * Primitive predicates, composition and inversion
 */

use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use remote_vfs::vfs::filter::{
    AndFilter, AttributeFilter, ExtensionFilter, FileAttribute, FilenameFilter, MatchMode,
    OperationFilter, OrFilter, PassThroughFilter, RegexFilenameFilter,
};
use remote_vfs::vfs::{AbstractFile, FileFilter, FileOperation, ProtocolFile};

use super::common::{names, StubFile};

fn sample() -> Vec<AbstractFile> {
    vec![
        StubFile::file("notes.TXT"),
        StubFile::dir("docs"),
        StubFile::file(".profile"),
        StubFile::file("photo.jpg"),
        StubFile::dir(".cache"),
    ]
}

/// Counts how often it is consulted
struct Counting {
    result: bool,
    calls: Arc<AtomicUsize>,
    inverted: bool,
}

impl Counting {
    fn new(result: bool) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let filter = Self {
            result,
            calls: Arc::clone(&calls),
            inverted: false,
        };
        (filter, calls)
    }
}

impl FileFilter for Counting {
    fn accept(&self, _file: &dyn ProtocolFile) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }

    fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }
}

#[test]
fn test_attribute_filters() {
    let files = sample();
    assert_eq!(
        names(&AttributeFilter::new(FileAttribute::Directory).filter(&files)),
        vec!["docs", ".cache"]
    );
    assert_eq!(
        names(&AttributeFilter::new(FileAttribute::File).filter(&files)),
        vec!["notes.TXT", ".profile", "photo.jpg"]
    );
    assert_eq!(
        names(&AttributeFilter::inverted(FileAttribute::Hidden).filter(&files)),
        vec!["notes.TXT", "docs", "photo.jpg"]
    );
}

#[test]
fn test_filename_filters() {
    let files = sample();

    let contains = FilenameFilter::new("O", MatchMode::Contains);
    assert_eq!(
        names(&contains.filter(&files)),
        vec!["notes.TXT", "docs", ".profile", "photo.jpg"]
    );

    let exact = FilenameFilter::new("DOCS", MatchMode::Equals).case_sensitive(true);
    assert!(exact.filter(&files).is_empty());

    let starts = FilenameFilter::new(".", MatchMode::StartsWith);
    assert_eq!(names(&starts.filter(&files)), vec![".profile", ".cache"]);

    let ext = ExtensionFilter::new(["txt", ".jpg"]);
    assert_eq!(names(&ext.filter(&files)), vec!["notes.TXT", "photo.jpg"]);
    let ext = ExtensionFilter::new(["txt"]).case_sensitive(true);
    assert!(ext.filter(&files).is_empty());
}

#[test]
fn test_regex_filter_matches_whole_name() {
    let files = sample();
    let regex = RegexFilenameFilter::new(r"[a-z]+\.txt", false).unwrap();
    assert_eq!(names(&regex.filter(&files)), vec!["notes.TXT"]);

    let partial = RegexFilenameFilter::new("doc", false).unwrap();
    assert!(partial.filter(&files).is_empty());

    assert!(RegexFilenameFilter::new("(unclosed", true).is_err());
}

#[test]
fn test_operation_filter_checks_capability_only() {
    let files = sample();
    let readable = OperationFilter::new(FileOperation::ReadFile);
    assert!(readable.reject_all(&files));
    assert!(!readable.accept_all(&files));
}

#[test]
fn test_inversion_uses_reject() {
    let files = sample();
    let mut filter = AttributeFilter::new(FileAttribute::Directory);
    for file in &files {
        assert_eq!(filter.matches(file.as_ref()), filter.accept(file.as_ref()));
    }

    filter.set_inverted(true);
    for file in &files {
        assert_eq!(filter.matches(file.as_ref()), filter.reject(file.as_ref()));
        assert_eq!(filter.reject(file.as_ref()), !filter.accept(file.as_ref()));
    }
    assert!(filter.is_inverted());
}

#[test]
fn test_inverted_and_is_not_of_conjunction() {
    let files = sample();
    // hidden AND directory => only ".cache"
    let mut and = AndFilter::new()
        .with(AttributeFilter::new(FileAttribute::Hidden))
        .with(AttributeFilter::new(FileAttribute::Directory));
    assert_eq!(names(&and.filter(&files)), vec![".cache"]);

    // NOT(hidden AND directory), not (NOT hidden) AND (NOT directory)
    and.set_inverted(true);
    assert_eq!(
        names(&and.filter(&files)),
        vec!["notes.TXT", "docs", ".profile", "photo.jpg"]
    );
}

#[test]
fn test_nested_inversion() {
    let files = sample();
    // OR(NOT hidden, directory) => everything but ".profile"
    let or = OrFilter::new()
        .with(AttributeFilter::inverted(FileAttribute::Hidden))
        .with(AttributeFilter::new(FileAttribute::Directory));
    assert_eq!(
        names(&or.filter(&files)),
        vec!["notes.TXT", "docs", "photo.jpg", ".cache"]
    );

    let mut outer = AndFilter::new().with(or);
    outer.set_inverted(true);
    assert_eq!(names(&outer.filter(&files)), vec![".profile"]);
}

#[test]
fn test_composites_short_circuit() {
    let file = StubFile::file("x");

    let (first, first_calls) = Counting::new(false);
    let (second, second_calls) = Counting::new(true);
    let and = AndFilter::new().with(first).with(second);
    assert!(!and.matches(file.as_ref()));
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);

    let (first, first_calls) = Counting::new(true);
    let (second, second_calls) = Counting::new(false);
    let or = OrFilter::new().with(first).with(second);
    assert!(or.matches(file.as_ref()));
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_empty_composites() {
    let file = StubFile::file("x");
    assert!(AndFilter::new().matches(file.as_ref()));
    assert!(!OrFilter::new().matches(file.as_ref()));
    assert!(PassThroughFilter::new().matches(file.as_ref()));

    let mut none = PassThroughFilter::new();
    none.set_inverted(true);
    assert!(!none.matches(file.as_ref()));
}

#[test]
fn test_filter_in_place_keeps_order() {
    let mut files = sample();
    AttributeFilter::new(FileAttribute::File).filter_in_place(&mut files);
    assert_eq!(names(&files), vec!["notes.TXT", ".profile", "photo.jpg"]);
    assert!(AttributeFilter::new(FileAttribute::File).match_all(&files));
}
