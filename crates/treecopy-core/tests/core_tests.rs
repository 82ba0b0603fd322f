use std::path::{Path, PathBuf};

use treecopy_core::{
    CopyAction, CopyOptions, CopyPlanner, CopyRequest, EntryKind, PathMatcher, WalkEntry,
};

fn walk_entry(relative: &str, kind: EntryKind) -> WalkEntry {
    let relative_path = PathBuf::from(relative);
    WalkEntry {
        depth: relative_path.components().count(),
        source_path: Path::new("/work/dir").join(&relative_path),
        relative_path,
        kind,
        mode: None,
    }
}

fn selected(planner: &CopyPlanner, entries: &[WalkEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| !planner.plan(e).is_skip())
        .map(|e| e.match_path())
        .collect()
}

#[test]
fn test_options_deserialize_single_pattern() {
    let options: CopyOptions = serde_json::from_str(r#"{"matching": "*.txt"}"#).unwrap();
    assert!(!options.overwrite);
    assert_eq!(options.matching, vec!["*.txt"]);
}

#[test]
fn test_options_deserialize_pattern_list() {
    let options: CopyOptions =
        serde_json::from_str(r#"{"overwrite": true, "matching": ["b", "!c"]}"#).unwrap();
    assert!(options.overwrite);
    assert_eq!(options.matching, vec!["b", "!c"]);
}

#[test]
fn test_options_deserialize_defaults() {
    let options: CopyOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, CopyOptions::default());
}

#[test]
fn test_txt_filter_over_three_depths() {
    let entries = [
        walk_entry("file.txt", EntryKind::File),
        walk_entry("file.md", EntryKind::File),
        walk_entry("a", EntryKind::Directory),
        walk_entry("a/file.txt", EntryKind::File),
        walk_entry("a/file.md", EntryKind::File),
        walk_entry("a/b", EntryKind::Directory),
        walk_entry("a/b/file.txt", EntryKind::File),
        walk_entry("a/b/file.md", EntryKind::File),
    ];
    let request = CopyRequest::new("/work/dir", "/work/copy", CopyOptions::new().with_matching(["*.txt"]));
    let planner = request.planner().unwrap();

    assert_eq!(
        selected(&planner, &entries),
        vec!["file.txt", "a/file.txt", "a/b/file.txt"]
    );
}

#[test]
fn test_anchored_filter_selects_one_level() {
    let entries = [
        walk_entry("file.txt", EntryKind::File),
        walk_entry("a", EntryKind::Directory),
        walk_entry("a/file.txt", EntryKind::File),
        walk_entry("a/b", EntryKind::Directory),
        walk_entry("a/b/file.txt", EntryKind::File),
    ];
    let request = CopyRequest::new("/work/dir", "/work/copy", CopyOptions::new().with_matching(["./a/*.txt"]));
    let planner = request.planner().unwrap();

    assert_eq!(selected(&planner, &entries), vec!["a/file.txt"]);
}

#[test]
fn test_negation_filter() {
    let entries = [
        walk_entry("a", EntryKind::Directory),
        walk_entry("a/b", EntryKind::Directory),
        walk_entry("a/c", EntryKind::Directory),
    ];
    let request = CopyRequest::new("/work/dir", "/work/copy", CopyOptions::new().with_matching(["b", "!c"]));
    let planner = request.planner().unwrap();

    assert_eq!(selected(&planner, &entries), vec!["a/b"]);
    assert_eq!(
        planner.plan(&entries[1]).destination(),
        Some(Path::new("/work/copy/a/b"))
    );
}

#[test]
fn test_unfiltered_plan_keeps_everything() {
    let planner = CopyPlanner::new(
        PathBuf::from("/work/a"),
        PathBuf::from("/work/dir/a"),
        PathMatcher::all(),
    );
    let action = planner.plan(&WalkEntry {
        relative_path: PathBuf::from("b/c"),
        source_path: PathBuf::from("/work/a/b/c"),
        kind: EntryKind::Directory,
        mode: Some(0o700),
        depth: 2,
    });

    assert_eq!(
        action,
        CopyAction::CreateDir {
            destination: PathBuf::from("/work/dir/a/b/c"),
            mode: Some(0o700),
        }
    );
}
