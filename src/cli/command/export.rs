use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{bail, Result};
use weather_ingest::{
    parquet::save_observations,
    progress::create_spinner,
    reading::{Observation, CSV_HEADER},
    ObservationStore,
};

pub fn export(db_path: &Path, file: &Path) -> Result<()> {
    let store = ObservationStore::open(db_path)?;
    let observations = store.select_all()?;

    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("parquet") => save_observations(&observations, file)?,
        Some("csv") => {
            let bar = create_spinner("Writing csv file...".to_string());
            save_csv(&observations, file)?;
            bar.finish_with_message("Csv file written");
        }
        _ => bail!(
            "unsupported export format for `{}`, use .parquet or .csv",
            file.display()
        ),
    }

    println!("File saved to `{}`", file.display());

    Ok(())
}

/// Writes observations in the ingest file layout, header included.
pub fn save_csv(observations: &[Observation], file_path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(file_path)?);

    writeln!(writer, "{CSV_HEADER}")?;
    for observation in observations {
        writeln!(writer, "{observation}")?;
    }
    writer.flush()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
