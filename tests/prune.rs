//! End-to-end pruning runs against real temp directories.

use filetime::{FileTime, set_file_mtime};
use prune_directory::pruner::{DeletionReport, PruneEvents, PruneOptions, prune, prune_entries};
use prune_directory::scanner::{deletion_order, scan};
use prune_directory::{PruneError, parse_size};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Default)]
struct Recorder {
    started: Vec<(PathBuf, u64)>,
    missing: Vec<PathBuf>,
    reports: Vec<DeletionReport>,
}

impl PruneEvents for Recorder {
    fn started(&mut self, directory: &Path, budget: u64) {
        self.started.push((directory.to_path_buf(), budget));
    }

    fn directory_missing(&mut self, directory: &Path) {
        self.missing.push(directory.to_path_buf());
    }

    fn deleted(&mut self, report: &DeletionReport) {
        self.reports.push(report.clone());
    }
}

/// Write `size` bytes to `dir/name` and pin its mtime to `secs`.
fn write_file(dir: &Path, name: &str, size: usize, secs: i64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, vec![b'x'; size]).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(1_600_000_000 + secs, 0)).unwrap();
    path
}

fn run(dir: &Path, budget: u64) -> (Result<usize, PruneError>, Recorder) {
    let mut rec = Recorder::default();
    let result = prune(dir, budget, &PruneOptions::default(), &mut rec).map(|s| s.reports.len());
    (result, rec)
}

#[test]
fn test_oldest_files_go_first() {
    let tmp = TempDir::new().unwrap();
    let a = write_file(tmp.path(), "c.log", 100, 1);
    let b = write_file(tmp.path(), "a.log", 100, 2);
    let c = write_file(tmp.path(), "b.log", 100, 3);

    let (result, rec) = run(tmp.path(), 150);
    assert_eq!(result.unwrap(), 2);
    assert_eq!(rec.started, vec![(tmp.path().to_path_buf(), 150)]);

    let deleted: Vec<_> = rec.reports.iter().map(|r| r.path.clone()).collect();
    assert_eq!(deleted, vec![a.clone(), b.clone()]);
    let remaining: Vec<_> = rec.reports.iter().map(|r| r.remaining_total).collect();
    assert_eq!(remaining, vec![200, 100]);
    assert!(rec.reports.iter().all(|r| r.deleted_size == 100));

    assert!(!a.exists());
    assert!(!b.exists());
    assert!(c.exists());
}

#[test]
fn test_equal_mtimes_break_ties_by_path() {
    let tmp = TempDir::new().unwrap();
    let b = write_file(tmp.path(), "b", 100, 5);
    let a = write_file(tmp.path(), "a", 100, 5);

    let (result, rec) = run(tmp.path(), 50);
    assert_eq!(result.unwrap(), 2);
    let deleted: Vec<_> = rec.reports.iter().map(|r| r.path.clone()).collect();
    assert_eq!(deleted, vec![a, b]);
    assert_eq!(rec.reports.last().unwrap().remaining_total, 0);
}

#[test]
fn test_missing_directory_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let gone = tmp.path().join("does-not-exist");

    let (result, rec) = run(&gone, 0);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(rec.missing, vec![gone]);
    assert!(rec.started.is_empty());
    assert!(rec.reports.is_empty());
}

#[test]
fn test_file_removed_after_scan_still_counts() {
    let tmp = TempDir::new().unwrap();
    let old = write_file(tmp.path(), "old.log", 100, 1);
    write_file(tmp.path(), "new.log", 100, 2);

    let order = deletion_order(scan(tmp.path()).unwrap());
    fs::remove_file(&old).unwrap();

    let mut rec = Recorder::default();
    let summary = prune_entries(order, 100, &PruneOptions::default(), &mut rec).unwrap();
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(rec.reports[0].path, old);
    assert_eq!(rec.reports[0].deleted_size, 100);
    assert_eq!(summary.remaining_total, 100);
    assert!(tmp.path().join("new.log").exists());
}

#[test]
fn test_delete_failure_halts_the_run() {
    let tmp = TempDir::new().unwrap();
    let first = write_file(tmp.path(), "first.log", 100, 1);
    let blocked = write_file(tmp.path(), "second.log", 100, 2);
    let third = write_file(tmp.path(), "third.log", 100, 3);

    let order = deletion_order(scan(tmp.path()).unwrap());
    // A directory in place of the scanned file makes remove_file fail with
    // something other than NotFound.
    fs::remove_file(&blocked).unwrap();
    fs::create_dir(&blocked).unwrap();

    let mut rec = Recorder::default();
    let err = prune_entries(order, 0, &PruneOptions::default(), &mut rec).unwrap_err();
    match err {
        PruneError::Delete { path, .. } => assert_eq!(path, blocked),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(rec.reports.len(), 1);
    assert_eq!(rec.reports[0].path, first);
    assert!(!first.exists());
    assert!(third.exists());
}

#[test]
fn test_empty_files_are_deleted_while_over_budget() {
    let tmp = TempDir::new().unwrap();
    let empty = write_file(tmp.path(), "a", 0, 1);
    let full = write_file(tmp.path(), "b", 100, 2);

    let (result, rec) = run(tmp.path(), 50);
    assert_eq!(result.unwrap(), 2);
    let steps: Vec<_> = rec
        .reports
        .iter()
        .map(|r| (r.deleted_size, r.remaining_total))
        .collect();
    assert_eq!(steps, vec![(0, 100), (100, 0)]);
    assert!(!empty.exists());
    assert!(!full.exists());
}

#[test]
fn test_second_run_is_a_no_op() {
    let tmp = TempDir::new().unwrap();
    for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
        write_file(tmp.path(), name, 400, i as i64);
    }
    let budget = parse_size("1KB").unwrap();

    let (first, _) = run(tmp.path(), budget);
    assert_eq!(first.unwrap(), 2);

    let (second, rec) = run(tmp.path(), budget);
    assert_eq!(second.unwrap(), 0);
    assert!(rec.reports.is_empty());
}

#[test]
fn test_budget_larger_than_directory() {
    let tmp = TempDir::new().unwrap();
    let kept = write_file(tmp.path(), "a", 10, 1);

    let (result, _) = run(tmp.path(), parse_size("1MiB").unwrap());
    assert_eq!(result.unwrap(), 0);
    assert!(kept.exists());
}

#[test]
fn test_subdirectories_are_untouched() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "top.log", 100, 1);
    fs::create_dir(tmp.path().join("nested")).unwrap();
    let inner = write_file(&tmp.path().join("nested"), "inner.log", 100, 0);

    let (result, rec) = run(tmp.path(), 0);
    assert_eq!(result.unwrap(), 1);
    assert_eq!(rec.reports[0].remaining_total, 0);
    assert!(inner.exists());
}
