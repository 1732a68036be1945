use std::{path::Path, sync::Arc};

use anyhow::Result;
use weather_ingest::{
    ingest::default_concurrency, Coordinator, IngestConfig, ObservationStore,
};

pub async fn load(db_path: &Path, dir: &Path, concurrency: Option<usize>) -> Result<()> {
    let store = Arc::new(ObservationStore::open(db_path)?);
    let config = IngestConfig {
        concurrency: concurrency.unwrap_or_else(default_concurrency),
        show_progress: true,
    };

    let coordinator = Coordinator::new(store, config);
    let report = coordinator.spawn_ingest_directory(dir).wait().await?;

    for file in report.files.iter().filter(|f| f.is_failed()) {
        eprintln!(
            "Failed: {} ({})",
            file.path.display(),
            file.failure.as_deref().unwrap_or("unknown error")
        );
    }
    println!("{report}");

    Ok(())
}
