// sandbox_scenario.rs — End-to-end test of the containment boundary.
//
// One sandbox root, every service, every policy branch:
//
//   1. Operations on paths outside the root are denied (list) or
//      degraded (exists → false, search → empty)
//   2. create_directory builds nested directories and is idempotent
//   3. write/read round-trips; append creates parents and concatenates
//   4. Name search finds files inside the root, prunes the ignore-list,
//      and drops matches that resolve outside the sandbox via symlinks
//   5. Content search delegates to grep and treats "no matches" as an
//      empty success

use std::fs;
use std::sync::Arc;

use tempfile::tempdir;

use fsgate_guard::{AllowedRoots, GuardError};
use fsgate_ops::{DirectoryService, FileService, OpsError};
use fsgate_search::SearchService;

struct Sandbox {
    root: tempfile::TempDir,
    dirs: DirectoryService,
    files: FileService,
    search: SearchService,
}

fn sandbox() -> Sandbox {
    let root = tempdir().unwrap();
    let roots = Arc::new(AllowedRoots::new([root.path()]).unwrap());
    Sandbox {
        root,
        dirs: DirectoryService::new(Arc::clone(&roots)),
        files: FileService::new(Arc::clone(&roots)),
        search: SearchService::new(roots),
    }
}

#[test]
fn operations_outside_sandbox_are_denied() {
    let sb = sandbox();
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("secret.txt"), b"s").unwrap();

    // list: explicit denial.
    assert!(matches!(
        sb.dirs.list(outside.path()),
        Err(OpsError::Guard(GuardError::AccessDenied { .. }))
    ));
    // read/write/append: explicit denial.
    assert!(sb.files.read(outside.path().join("secret.txt")).is_err());
    assert!(sb.files.write(outside.path().join("new.txt"), "x").is_err());
    assert!(sb.files.append(outside.path().join("new.txt"), "x").is_err());
    // exists: collapses to false by design.
    assert!(!sb.files.exists(outside.path().join("secret.txt")));
    // search: fails closed to empty.
    assert!(sb.search.find_by_name(outside.path(), "secret").is_empty());
}

#[test]
fn create_directory_builds_and_tolerates_existing() {
    let sb = sandbox();
    let nested = sb.root.path().join("a/b");

    let first = sb.dirs.create(&nested).unwrap();
    assert!(sb.root.path().join("a").is_dir());
    assert!(first.is_dir());

    // Second create: success, contents untouched.
    fs::write(first.join("keep.txt"), b"k").unwrap();
    let second = sb.dirs.create(&nested).unwrap();
    assert_eq!(first, second);
    assert!(second.join("keep.txt").exists());
}

#[test]
fn file_lifecycle_round_trips() {
    let sb = sandbox();
    let path = sb.root.path().join("doc.txt");

    assert!(!sb.files.exists(&path));
    sb.files.write(&path, "v1\n").unwrap();
    assert!(sb.files.exists(&path));
    assert_eq!(sb.files.read(&path).unwrap(), "v1\n");

    // Append to a brand-new file under a missing parent: both created.
    let log = sb.root.path().join("logs/run.log");
    sb.files.append(&log, "first").unwrap();
    sb.files.append(&log, " second").unwrap();
    assert_eq!(sb.files.read(&log).unwrap(), "first second");

    // Write, by contrast, refuses a missing parent.
    assert!(matches!(
        sb.files.write(sb.root.path().join("nope/f.txt"), "x"),
        Err(OpsError::Io { .. })
    ));
}

#[test]
fn name_search_prunes_ignored_and_respects_boundary() {
    let sb = sandbox();
    fs::write(sb.root.path().join("note1.txt"), b"x").unwrap();
    fs::create_dir(sb.root.path().join(".git")).unwrap();
    fs::write(sb.root.path().join(".git/note2.txt"), b"x").unwrap();

    let matches = sb.search.find_by_name(sb.root.path(), "note");
    assert_eq!(matches.len(), 1);
    assert!(matches[0].ends_with("note1.txt"));
}

#[cfg(unix)]
#[test]
fn symlinked_results_outside_sandbox_are_dropped() {
    let sb = sandbox();
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("leak-note.txt"), b"needle").unwrap();
    std::os::unix::fs::symlink(
        outside.path().join("leak-note.txt"),
        sb.root.path().join("alias-note.txt"),
    )
    .unwrap();
    fs::write(sb.root.path().join("real-note.txt"), b"needle").unwrap();

    let matches = sb.search.find_by_name(sb.root.path(), "note");
    assert_eq!(matches.len(), 1);
    assert!(matches[0].ends_with("real-note.txt"));
}

#[tokio::test]
async fn content_search_end_to_end() {
    let sb = sandbox();
    fs::write(sb.root.path().join("hit.txt"), b"the magic word").unwrap();
    fs::write(sb.root.path().join("miss.txt"), b"nothing here").unwrap();
    fs::create_dir(sb.root.path().join("node_modules")).unwrap();
    fs::write(sb.root.path().join("node_modules/dep.txt"), b"the magic word").unwrap();

    let matches = sb.search.find_by_content(sb.root.path(), "MAGIC").await;
    assert_eq!(matches.len(), 1);
    assert!(matches[0].ends_with("hit.txt"));

    // Zero matches: empty success, not an error surface.
    let none = sb.search.find_by_content(sb.root.path(), "absent-token").await;
    assert!(none.is_empty());
}
