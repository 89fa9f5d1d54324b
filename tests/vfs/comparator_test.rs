/*!
 * Comparator Tests
 * Criterion, direction and directories-first grouping
 */

use pretty_assertions::assert_eq;
use std::cmp::Ordering;
use std::sync::Arc;

use remote_vfs::vfs::{AbstractFile, FileComparator, SortCriterion};

use super::common::StubFile;

fn stub(name: &str, directory: bool, size: i64, modified: u64) -> AbstractFile {
    Arc::new(StubFile::new(name, directory, size, modified))
}

fn fixture() -> Vec<AbstractFile> {
    vec![
        stub("C.e3", false, 200, 3),
        stub("A", false, 500, 1),
        stub("D.e2", true, 0, 4),
        stub("B.e9.e1", true, 0, 2),
    ]
}

fn order(criterion: SortCriterion, ascending: bool, directories_first: bool) -> String {
    let mut files = fixture();
    FileComparator::new(criterion, ascending, false, directories_first).sort(&mut files);
    files.iter().map(|f| f.name()[..1].to_string()).collect()
}

#[test]
fn test_size_ascending_directories_first() {
    assert_eq!(order(SortCriterion::Size, true, true), "BDCA");
}

#[test]
fn test_size_descending_without_grouping() {
    assert_eq!(order(SortCriterion::Size, false, false), "ACDB");
}

#[test]
fn test_extension_ordering() {
    assert_eq!(order(SortCriterion::Extension, true, false), "ABDC");
    assert_eq!(order(SortCriterion::Extension, false, true), "DBCA");
}

#[test]
fn test_name_ordering() {
    assert_eq!(order(SortCriterion::Name, true, false), "ABCD");
    assert_eq!(order(SortCriterion::Name, false, false), "DCBA");
    assert_eq!(order(SortCriterion::Name, false, true), "DBCA");
}

#[test]
fn test_date_ordering() {
    assert_eq!(order(SortCriterion::Date, true, false), "ABCD");
    assert_eq!(order(SortCriterion::Date, false, true), "DBCA");
}

#[test]
fn test_unknown_size_sorts_as_zero() {
    let unknown = StubFile::new("b", false, -1, 0);
    let empty = StubFile::new("a", false, 0, 0);
    let by_size = FileComparator::new(SortCriterion::Size, true, false, false);

    // Equal sizes fall back to the name
    assert_eq!(by_size.compare(&unknown, &empty), Ordering::Greater);
    assert_eq!(by_size.compare(&empty, &unknown), Ordering::Less);
}

#[test]
fn test_name_case_sensitivity() {
    let upper = StubFile::new("Beta", false, 0, 0);
    let lower = StubFile::new("alpha", false, 0, 0);

    let insensitive = FileComparator::new(SortCriterion::Name, true, false, false);
    assert_eq!(insensitive.compare(&lower, &upper), Ordering::Less);

    let sensitive = FileComparator::new(SortCriterion::Name, true, true, false);
    assert_eq!(sensitive.compare(&lower, &upper), Ordering::Greater);
}

#[test]
fn test_directories_first_ignores_direction() {
    let dir = StubFile::new("z", true, 0, 0);
    let file = StubFile::new("a", false, 0, 0);
    for ascending in [true, false] {
        let comparator = FileComparator::new(SortCriterion::Name, ascending, false, true);
        assert_eq!(comparator.compare(&dir, &file), Ordering::Less);
        assert_eq!(comparator.compare(&file, &dir), Ordering::Greater);
    }
}

#[test]
fn test_default_comparator() {
    let comparator = FileComparator::default();
    assert_eq!(comparator.criterion, SortCriterion::Name);
    assert!(comparator.ascending);
    assert!(!comparator.case_sensitive);
    assert!(comparator.directories_first);

    let json = serde_json::to_string(&comparator).unwrap();
    assert!(json.contains("\"criterion\":\"name\""));
}
