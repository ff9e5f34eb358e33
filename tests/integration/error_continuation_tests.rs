use finddup::diagnostics::CollectingDiagnostics;
use finddup::duplicates::{group_by_size, DuplicateFinder, HashConfig, HashGrouper};
use finddup::scanner::{Traverser, WalkerConfig};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_missing_root_does_not_stop_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();

    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(
            vec![dir.path().join("does-not-exist"), dir.path().to_path_buf()],
            diagnostics.clone(),
        )
        .unwrap();

    assert_eq!(groups.iter().filter(|g| g.is_duplicate()).count(), 1);
    assert_eq!(summary.traversal_errors, 1);

    let messages = diagnostics.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("error reading directory '"));
    assert!(messages[0].contains("does-not-exist"));
}

#[test]
fn test_file_given_as_root_is_reported() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"not a directory").unwrap();

    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(vec![file], diagnostics.clone())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.files_discovered, 0);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.messages()[0].starts_with("error reading directory '"));
}

#[test]
fn test_file_deleted_before_hashing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("keep1"), b"same bytes").unwrap();
    fs::write(dir.path().join("keep2"), b"same bytes").unwrap();
    fs::write(dir.path().join("gone"), b"same bytes").unwrap();

    let traverser = Traverser::new(vec![dir.path().to_path_buf()], WalkerConfig::default());
    let files: Vec<_> = traverser.walk().map(Result::unwrap).collect();
    let (size_groups, _) = group_by_size(files);
    assert_eq!(size_groups.len(), 1);

    fs::remove_file(dir.path().join("gone")).unwrap();

    let diagnostics = CollectingDiagnostics::new();
    let grouper = HashGrouper::new(HashConfig::default());
    let size_group = size_groups.into_iter().next().unwrap();
    let (hash_groups, stats) = grouper.group(size_group, &diagnostics);

    assert_eq!(hash_groups.len(), 1);
    assert_eq!(hash_groups[0].len(), 2);
    assert!(hash_groups[0].files.iter().all(|f| !f.path.ends_with("gone")));
    assert_eq!(stats.failed_files, 1);

    let messages = diagnostics.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("can not hash file '"));
}

#[test]
fn test_unlistable_root_is_skipped_and_scan_continues() {
    // Listing a regular file fails for every user, privileged or not
    let tree = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    let not_a_dir = elsewhere.path().join("listing.txt");
    fs::write(&not_a_dir, b"duplicate").unwrap();

    fs::create_dir(tree.path().join("open")).unwrap();
    fs::write(tree.path().join("open").join("one"), b"duplicate").unwrap();
    fs::write(tree.path().join("open").join("two"), b"duplicate").unwrap();
    fs::write(tree.path().join("other"), b"unique!!!").unwrap();

    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(
            vec![tree.path().to_path_buf(), not_a_dir.clone()],
            diagnostics.clone(),
        )
        .unwrap();

    let dups: Vec<_> = groups.into_iter().filter(|g| g.is_duplicate()).collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].len(), 2);
    assert!(dups[0].files.iter().all(|f| f.path.starts_with(tree.path())));
    assert_eq!(summary.files_discovered, 3);
    assert_eq!(summary.traversal_errors, 1);

    let messages = diagnostics.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages[0],
        format!(
            "error reading directory '{}': not a directory",
            not_a_dir.display()
        )
    );
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let open = dir.path().join("open");
    let locked = dir.path().join("locked");
    fs::create_dir(&open).unwrap();
    fs::create_dir(&locked).unwrap();

    fs::write(open.join("one"), b"duplicate").unwrap();
    fs::write(open.join("two"), b"duplicate").unwrap();
    fs::write(locked.join("hidden"), b"duplicate").unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still list the directory
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        eprintln!("Skipping unreadable directory test: running with elevated privileges");
        return;
    }

    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(vec![dir.path().to_path_buf()], diagnostics.clone());

    // Restore permissions so the temp dir can be cleaned up
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (groups, summary) = result.unwrap();
    let dups: Vec<_> = groups.into_iter().filter(|g| g.is_duplicate()).collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].len(), 2);
    assert_eq!(summary.traversal_errors, 1);

    let messages = diagnostics.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("error reading directory '"));
    assert!(messages[0].contains("locked"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_reported_and_excluded() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let secret = dir.path().join("secret");
    fs::write(dir.path().join("a"), b"payload").unwrap();
    fs::write(dir.path().join("b"), b"payload").unwrap();
    fs::write(&secret, b"payload").unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::File::open(&secret).is_ok() {
        eprintln!("Skipping unreadable file test: running with elevated privileges");
        return;
    }

    let diagnostics = Arc::new(CollectingDiagnostics::new());
    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates(vec![dir.path().to_path_buf()], diagnostics.clone())
        .unwrap();

    let dups: Vec<_> = groups.into_iter().filter(|g| g.is_duplicate()).collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].len(), 2);
    assert_eq!(summary.hash_failures, 1);

    let messages = diagnostics.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("can not hash file '"));
    assert!(messages[0].contains("secret"));
}
