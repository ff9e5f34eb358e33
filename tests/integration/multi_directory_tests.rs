use finddup::diagnostics::NullDiagnostics;
use finddup::duplicates::{DuplicateFinder, HashGroup};
use std::fs::{self, File};
use std::io::Write;
use std::sync::Arc;
use tempfile::tempdir;

fn duplicates_of(groups: Vec<HashGroup>) -> Vec<HashGroup> {
    groups.into_iter().filter(|g| g.is_duplicate()).collect()
}

#[test]
fn test_scan_two_non_overlapping_directories() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();

    File::create(dir1.path().join("a.txt"))
        .unwrap()
        .write_all(b"dup")
        .unwrap();
    File::create(dir2.path().join("b.txt"))
        .unwrap()
        .write_all(b"dup")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(
            vec![dir1.path().to_path_buf(), dir2.path().to_path_buf()],
            Arc::new(NullDiagnostics),
        )
        .unwrap();

    let dups = duplicates_of(groups);
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].files.len(), 2);
    assert_eq!(summary.files_discovered, 2);
}

#[test]
fn test_scan_overlapping_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();
    File::create(sub.join("b.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();

    // Parent and child: the child is dropped so nothing is walked twice
    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(
            vec![dir.path().to_path_buf(), sub.clone()],
            Arc::new(NullDiagnostics),
        )
        .unwrap();

    assert_eq!(summary.files_discovered, 2);
    let dups = duplicates_of(groups);
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].files.len(), 2);
}

#[test]
fn test_same_directory_given_twice() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only.txt"), b"alone").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(
            vec![dir.path().to_path_buf(), dir.path().to_path_buf()],
            Arc::new(NullDiagnostics),
        )
        .unwrap();

    // A file must never be reported as a duplicate of itself
    assert_eq!(summary.files_discovered, 1);
    assert!(duplicates_of(groups).is_empty());
}

#[test]
fn test_cross_directory_duplicate_detection() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    let dir3 = tempdir().unwrap();

    fs::write(dir1.path().join("x"), b"shared by three").unwrap();
    fs::write(dir2.path().join("y"), b"shared by three").unwrap();
    fs::write(dir3.path().join("z"), b"shared by three").unwrap();
    fs::write(dir3.path().join("w"), b"shared by one!!").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(
            vec![
                dir1.path().to_path_buf(),
                dir2.path().to_path_buf(),
                dir3.path().to_path_buf(),
            ],
            Arc::new(NullDiagnostics),
        )
        .unwrap();

    let dups = duplicates_of(groups);
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].len(), 3);
    assert_eq!(dups[0].wasted_space(), 2 * 15);
    assert_eq!(summary.files_discovered, 4);
}
