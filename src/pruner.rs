use crate::error::PruneError;
use crate::scanner::{self, FileEntry};
use crate::size::{SizeFormat, format_size_with};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct PruneOptions {
    /// Walk the deletion order and report, but leave every file in place.
    pub dry_run: bool,
}

/// One step of the deletion loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub path: PathBuf,
    /// Size recorded at scan time.
    pub deleted_size: u64,
    /// Total of the files not yet deleted, after this step.
    pub remaining_total: u64,
    /// The file was left in place because the run is a dry run.
    pub dry_run: bool,
}

/// Receives progress from a pruning run.
pub trait PruneEvents {
    fn started(&mut self, directory: &Path, budget: u64);
    fn directory_missing(&mut self, directory: &Path);
    fn deleted(&mut self, report: &DeletionReport);
}

/// Logs run progress through `tracing`, rendering sizes for humans.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents {
    pub format: SizeFormat,
}

impl PruneEvents for TracingEvents {
    fn started(&mut self, directory: &Path, budget: u64) {
        tracing::info!(
            directory = %directory.display(),
            budget_bytes = budget,
            "{}",
            started_message(directory, budget, self.format)
        );
    }

    fn directory_missing(&mut self, directory: &Path) {
        tracing::warn!(
            directory = %directory.display(),
            "{}",
            missing_message(directory)
        );
    }

    fn deleted(&mut self, report: &DeletionReport) {
        tracing::info!(
            path = %report.path.display(),
            deleted_size = report.deleted_size,
            remaining_total = report.remaining_total,
            dry_run = report.dry_run,
            "{}",
            deletion_message(report, self.format)
        );
    }
}

fn started_message(directory: &Path, budget: u64, format: SizeFormat) -> String {
    format!(
        "Pruning {} to maximum size of {}",
        directory.display(),
        format_size_with(budget, format)
    )
}

fn missing_message(directory: &Path) -> String {
    format!("Directory {} does not exist. Exiting.", directory.display())
}

fn deletion_message(report: &DeletionReport, format: SizeFormat) -> String {
    let verb = if report.dry_run { "Would delete" } else { "Deleted" };
    format!(
        "{} {} with {}. {} remaining.",
        verb,
        report.path.display(),
        format_size_with(report.deleted_size, format),
        format_size_with(report.remaining_total, format)
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub reports: Vec<DeletionReport>,
    pub initial_total: u64,
    pub remaining_total: u64,
}

impl PruneSummary {
    pub fn freed(&self) -> u64 {
        self.initial_total - self.remaining_total
    }

    pub fn within_budget(&self, budget: u64) -> bool {
        self.remaining_total <= budget
    }
}

/// Delete the oldest regular files in `directory` until the rest fit in
/// `budget` bytes.
///
/// A missing directory is reported through `events` and is not an error.
/// The first scan or delete failure stops the run; reports already handed
/// to `events` describe what was removed before it.
pub fn prune(
    directory: &Path,
    budget: u64,
    options: &PruneOptions,
    events: &mut dyn PruneEvents,
) -> Result<PruneSummary, PruneError> {
    match fs::metadata(directory) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(PruneError::NotADirectory {
                path: directory.to_path_buf(),
            });
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            events.directory_missing(directory);
            return Ok(PruneSummary::default());
        }
        Err(source) => {
            return Err(PruneError::Metadata {
                path: directory.to_path_buf(),
                source,
            });
        }
    }

    events.started(directory, budget);
    let order = scanner::deletion_order(scanner::scan(directory)?);
    prune_entries(order, budget, options, events)
}

/// Run the deletion loop over an already sorted deletion order.
///
/// The running total is always computed from scan-time sizes, so a file
/// that vanished since the scan still counts as freed.
pub fn prune_entries(
    order: Vec<FileEntry>,
    budget: u64,
    options: &PruneOptions,
    events: &mut dyn PruneEvents,
) -> Result<PruneSummary, PruneError> {
    let initial_total = scanner::total_size(&order);
    let mut remaining_total = initial_total;
    let mut reports = Vec::new();

    for entry in order {
        if remaining_total <= budget {
            break;
        }

        if !options.dry_run {
            remove(&entry.path)?;
        }

        remaining_total -= entry.size_bytes;
        let report = DeletionReport {
            path: entry.path,
            deleted_size: entry.size_bytes,
            remaining_total,
            dry_run: options.dry_run,
        };
        events.deleted(&report);
        reports.push(report);
    }

    Ok(PruneSummary {
        reports,
        initial_total,
        remaining_total,
    })
}

fn remove(path: &Path) -> Result<(), PruneError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "File already gone");
            Ok(())
        }
        Err(source) => Err(PruneError::Delete {
            path: path.to_path_buf(),
            source,
        }),
    }
}
