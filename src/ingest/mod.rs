//! Concurrent ingestion of observation files into the store.
//!
//! [`ingest_file`] handles one file line by line. [`Coordinator`] discovers
//! the csv files in a directory, runs a bounded number of file ingestions at
//! once, and folds their [`IngestReport`]s into one [`DirectoryReport`].

pub mod directory;
pub mod file;

use std::{
    fmt,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    thread,
};

pub use directory::{discover_csv_files, Coordinator, IngestHandle};
pub use file::ingest_file;

/// Upper bound for the default worker count.
pub const MAX_CONCURRENCY: usize = 16;

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Files ingested at the same time. Zero is treated as one.
    pub concurrency: usize,
    /// Draw a progress bar over files on the terminal.
    pub show_progress: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            show_progress: false,
        }
    }
}

/// Available parallelism, capped at [`MAX_CONCURRENCY`].
pub fn default_concurrency() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
        .min(MAX_CONCURRENCY)
}

/// Outcome counts for one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub path: PathBuf,
    /// Data lines read, excluding the header and blank lines.
    pub read: u64,
    /// Observations newly inserted.
    pub parsed: u64,
    pub duplicates: u64,
    pub parse_errors: u64,
    /// Why the file could not be (fully) ingested, if it couldn't.
    pub failure: Option<String>,
}

impl IngestReport {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn failed(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(path)
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Totals across every file of one directory load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryReport {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_read: u64,
    pub total_parsed: u64,
    pub total_duplicates: u64,
    pub total_parse_errors: u64,
    pub files: Vec<IngestReport>,
}

impl DirectoryReport {
    pub fn from_reports(files: Vec<IngestReport>) -> Self {
        let mut report = DirectoryReport {
            files_processed: files.len(),
            ..Default::default()
        };

        for file in &files {
            if file.is_failed() {
                report.files_failed += 1;
            }
            report.total_read += file.read;
            report.total_parsed += file.parsed;
            report.total_duplicates += file.duplicates;
            report.total_parse_errors += file.parse_errors;
        }
        report.files = files;

        report
    }
}

impl fmt::Display for DirectoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files ({} failed): {} inserted, {} duplicates, {} parse errors",
            self.files_processed,
            self.files_failed,
            self.total_parsed,
            self.total_duplicates,
            self.total_parse_errors
        )
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_sum_file_reports() {
        let mut a = IngestReport::new(Path::new("a.csv"));
        a.read = 4;
        a.parsed = 3;
        a.parse_errors = 1;
        let mut b = IngestReport::new(Path::new("b.csv"));
        b.read = 2;
        b.parsed = 1;
        b.duplicates = 1;
        let c = IngestReport::failed(Path::new("c.csv"), "permission denied");

        let report = DirectoryReport::from_reports(vec![a, b, c]);

        assert_eq!(report.files_processed, 3);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.total_read, 6);
        assert_eq!(report.total_parsed, 4);
        assert_eq!(report.total_duplicates, 1);
        assert_eq!(report.total_parse_errors, 1);
        assert_eq!(
            report.to_string(),
            "3 files (1 failed): 4 inserted, 1 duplicates, 1 parse errors"
        );
    }

    #[test]
    fn should_cap_default_concurrency() {
        let concurrency = IngestConfig::default().concurrency;
        assert!(concurrency >= 1);
        assert!(concurrency <= MAX_CONCURRENCY);
    }
}
