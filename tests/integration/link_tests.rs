use finddup::diagnostics::{CollectingDiagnostics, NullDiagnostics};
use finddup::duplicates::{DuplicateFinder, FinderConfig};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_hardlinks_are_reported_as_duplicates() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let hardlink = dir.path().join("hardlink.txt");

    fs::write(&original, b"identical content").unwrap();
    if let Err(e) = fs::hard_link(&original, &hardlink) {
        eprintln!("Skipping hardlink test: failed to create hardlink: {}", e);
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(vec![dir.path().to_path_buf()], Arc::new(NullDiagnostics))
        .unwrap();

    // Two directory entries with identical content
    assert_eq!(summary.files_discovered, 2);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].is_duplicate());
}

#[cfg(unix)]
#[test]
fn test_symlinks_not_followed_by_default() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    fs::write(&original, b"linked content").unwrap();
    std::os::unix::fs::symlink(&original, dir.path().join("symlink.txt")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(vec![dir.path().to_path_buf()], Arc::new(NullDiagnostics))
        .unwrap();

    assert_eq!(summary.files_discovered, 1);
    assert!(groups.iter().all(|g| !g.is_duplicate()));
}

#[cfg(unix)]
#[test]
fn test_symlinks_followed_when_enabled() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    fs::write(&original, b"linked content").unwrap();
    std::os::unix::fs::symlink(&original, dir.path().join("symlink.txt")).unwrap();

    let finder = DuplicateFinder::new(FinderConfig::default().with_follow_symlinks(true));
    let (groups, summary) = finder
        .find_duplicates(vec![dir.path().to_path_buf()], Arc::new(NullDiagnostics))
        .unwrap();

    assert_eq!(summary.files_discovered, 2);
    let dups: Vec<_> = groups.into_iter().filter(|g| g.is_duplicate()).collect();
    assert_eq!(dups.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_is_reported_not_followed_forever() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("file.txt"), b"content").unwrap();
    std::os::unix::fs::symlink(dir.path(), sub.join("back")).unwrap();

    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let finder = DuplicateFinder::new(FinderConfig::default().with_follow_symlinks(true));
    let (_, summary) = finder
        .find_duplicates(vec![dir.path().to_path_buf()], diagnostics.clone())
        .unwrap();

    assert_eq!(summary.files_discovered, 1);
    assert_eq!(summary.traversal_errors, 1);
    assert!(diagnostics.messages()[0].starts_with("error reading directory '"));
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_reported_as_file_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real"), b"content").unwrap();
    std::os::unix::fs::symlink(dir.path().join("nothere.txt"), dir.path().join("dangling.txt"))
        .unwrap();

    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let finder = DuplicateFinder::new(FinderConfig::default().with_follow_symlinks(true));
    let (_, summary) = finder
        .find_duplicates(vec![dir.path().to_path_buf()], diagnostics.clone())
        .unwrap();

    assert_eq!(summary.files_discovered, 1);
    assert_eq!(summary.traversal_errors, 1);

    let messages = diagnostics.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("error reading file '"));
    assert!(messages[0].contains("dangling.txt"));
    assert!(!messages[0].contains("IO error for operation"));
}
