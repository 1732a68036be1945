//! Ingestion of a single observation file.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::{error, info, warn};

use super::IngestReport;
use crate::{
    db::{InsertOutcome, ObservationStore},
    error::ParseError,
    reading::Observation,
};

/// Reads `path` one line at a time and offers every parsed observation to
/// `store`. The first line is a header and is skipped.
///
/// Never fails: an unopenable file, an I/O error mid-read or a storage error
/// is recorded in the report's `failure`, malformed lines are counted and
/// skipped.
pub fn ingest_file(path: &Path, store: &ObservationStore) -> IngestReport {
    let mut report = IngestReport::new(path);

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "Cannot open file");
            report.failure = Some(e.to_string());
            return report;
        }
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => line_number += 1,
            Err(e) => {
                error!(file = %path.display(), line = line_number + 1, error = %e, "Read failed");
                report.failure = Some(e.to_string());
                break;
            }
        }

        if line_number == 1 {
            continue;
        }

        let parsed = match std::str::from_utf8(&buf) {
            Ok(text) => {
                let line = text.trim_end_matches(&['\r', '\n'][..]);
                if line.is_empty() {
                    continue;
                }
                Observation::from_line(line)
            }
            Err(_) => Err(ParseError::Encoding),
        };
        report.read += 1;

        let obs = match parsed {
            Ok(obs) => obs,
            Err(e) => {
                report.parse_errors += 1;
                warn!(file = %path.display(), line = line_number, error = %e, "Skipping malformed line");
                continue;
            }
        };

        match store.try_insert(&obs) {
            Ok(InsertOutcome::Inserted) => report.parsed += 1,
            Ok(InsertOutcome::Duplicate) => report.duplicates += 1,
            Err(e) => {
                error!(file = %path.display(), line = line_number, error = %e, "Store rejected write");
                report.failure = Some(e.to_string());
                break;
            }
        }
    }

    info!(
        file = %path.display(),
        read = report.read,
        inserted = report.parsed,
        duplicates = report.duplicates,
        parse_errors = report.parse_errors,
        "File ingested"
    );

    report
}

// -- Tests -------------------------------------------------------------------
