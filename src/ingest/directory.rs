//! Fan-out/fan-in of file ingestion across a directory.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::join_all;
use indicatif::ProgressBar;
use tokio::{
    sync::{oneshot, Semaphore},
    task,
};
use tracing::{info, warn};

use super::{file::ingest_file, DirectoryReport, IngestConfig, IngestReport};
use crate::{db::ObservationStore, error::IngestError, progress::create_progress_bar};

/// Lists the `.csv` files (any case) directly inside `dir`, sorted by path.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Directory does not exist");
        return Err(IngestError::NotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        warn!(dir = %dir.display(), "No csv files found");
        return Err(IngestError::Empty(dir.to_path_buf()));
    }
    files.sort();

    Ok(files)
}

/// Per-file work run on a blocking worker.
type FileHandler = Arc<dyn Fn(&Path, &ObservationStore) -> IngestReport + Send + Sync>;

/// Runs directory loads against one shared store.
#[derive(Clone)]
pub struct Coordinator {
    store: Arc<ObservationStore>,
    config: IngestConfig,
    handler: FileHandler,
}

impl Coordinator {
    pub fn new(store: Arc<ObservationStore>, config: IngestConfig) -> Self {
        Self {
            store,
            config,
            handler: Arc::new(ingest_file),
        }
    }

    #[cfg(test)]
    fn with_file_handler(
        mut self,
        handler: impl Fn(&Path, &ObservationStore) -> IngestReport + Send + Sync + 'static,
    ) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    pub fn store(&self) -> &Arc<ObservationStore> {
        &self.store
    }

    /// Ingests every csv file in `dir`, at most `concurrency` at a time, and
    /// returns once all of them have finished.
    ///
    /// A file that fails is recorded in its report; it never cancels the
    /// others. Observations already inserted stay committed.
    pub async fn ingest_directory(&self, dir: &Path) -> Result<DirectoryReport, IngestError> {
        let files = discover_csv_files(dir)?;
        let concurrency = self.config.concurrency.max(1);

        info!(
            dir = %dir.display(),
            files = files.len(),
            concurrency,
            "Starting directory ingestion"
        );

        let progress = if self.config.show_progress {
            create_progress_bar(files.len() as u64, "Ingesting files".to_string())
        } else {
            ProgressBar::hidden()
        };

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = Vec::with_capacity(files.len());

        for file in &files {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| IngestError::Aborted(e.to_string()))?;
            let store = Arc::clone(&self.store);
            let handler = Arc::clone(&self.handler);
            let file = file.clone();
            let progress = progress.clone();

            tasks.push(task::spawn_blocking(move || {
                let report = handler(file.as_path(), store.as_ref());
                progress.inc(1);
                drop(permit);
                report
            }));
        }

        let reports: Vec<IngestReport> = join_all(tasks)
            .await
            .into_iter()
            .zip(&files)
            .map(|(result, file)| match result {
                Ok(report) => report,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "Ingestion task panicked");
                    IngestReport::failed(file, e.to_string())
                }
            })
            .collect();

        progress.finish_with_message("Ingestion complete");

        let report = DirectoryReport::from_reports(reports);
        info!(
            dir = %dir.display(),
            files = report.files_processed,
            failed = report.files_failed,
            inserted = report.total_parsed,
            duplicates = report.total_duplicates,
            parse_errors = report.total_parse_errors,
            "Directory ingestion finished"
        );

        Ok(report)
    }

    /// Starts [`Coordinator::ingest_directory`] on a background task.
    ///
    /// Must be called from within a tokio runtime. The returned handle is the
    /// only way to observe completion and yields the result exactly once.
    pub fn spawn_ingest_directory(&self, dir: impl Into<PathBuf>) -> IngestHandle {
        let (tx, rx) = oneshot::channel();
        let coordinator = self.clone();
        let dir = dir.into();

        tokio::spawn(async move {
            let result = coordinator.ingest_directory(&dir).await;
            if tx.send(result).is_err() {
                warn!(dir = %dir.display(), "Ingestion finished after its handle was dropped");
            }
        });

        IngestHandle { rx }
    }
}

/// Single-fire completion of a background directory load.
#[must_use = "dropping the handle discards the ingestion result"]
pub struct IngestHandle {
    rx: oneshot::Receiver<Result<DirectoryReport, IngestError>>,
}

impl IngestHandle {
    pub async fn wait(self) -> Result<DirectoryReport, IngestError> {
        self.rx.await.map_err(lost_task)?
    }

    /// Blocks the current thread until the load finishes. Must not be called
    /// from inside an async context.
    pub fn blocking_wait(self) -> Result<DirectoryReport, IngestError> {
        self.rx.blocking_recv().map_err(lost_task)?
    }
}

fn lost_task(_: oneshot::error::RecvError) -> IngestError {
    IngestError::Aborted("background task ended without a result".to_string())
}

// -- Tests -------------------------------------------------------------------
