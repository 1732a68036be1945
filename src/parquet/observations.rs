//! Save observations to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Float64Array, Int16Array, Int32Array, TimestampSecondArray},
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::ArrowWriter,
    basic::{Compression, ZstdLevel},
    file::properties::WriterProperties,
};
use tracing::info;

use crate::{progress::create_progress_bar, reading::Observation};

const CHUNK_SIZE: usize = 100_000;

pub fn save_observations(observations: &[Observation], file_path: &Path) -> Result<()> {
    let schema = Arc::new(observation_schema());
    let file = File::create(file_path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::default()))
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
    let pb = create_progress_bar(observations.len() as u64, "Writing parquet file".to_string());

    for chunk in observations.chunks(CHUNK_SIZE) {
        let batch = RecordBatch::try_new(schema.clone(), columns(chunk))?;
        writer.write(&batch)?;
        pb.inc(chunk.len() as u64);
    }

    writer.close()?;
    pb.finish_with_message("Finished writing parquet file");

    info!(
        path = %file_path.display(),
        rows = observations.len(),
        "Saved observations to parquet"
    );

    Ok(())
}

fn observation_schema() -> Schema {
    Schema::new(vec![
        Field::new("timestamp", DataType::Timestamp(TimeUnit::Second, None), false),
        Field::new("avg_temp", DataType::Float64, false),
        Field::new("min_temp", DataType::Float64, false),
        Field::new("max_temp", DataType::Float64, false),
        Field::new("precipitation", DataType::Float64, false),
        Field::new("snow_depth", DataType::Int32, false),
        Field::new("wind_direction", DataType::Int16, false),
        Field::new("wind_speed", DataType::Float64, false),
        Field::new("wind_peak_gust", DataType::Float64, false),
        Field::new("air_pressure", DataType::Float64, false),
        Field::new("sunshine_duration", DataType::Int32, false),
    ])
}

fn columns(chunk: &[Observation]) -> Vec<ArrayRef> {
    let float = |f: fn(&Observation) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(chunk.iter().map(f)))
    };

    vec![
        Arc::new(TimestampSecondArray::from_iter_values(
            chunk.iter().map(|o| o.timestamp.and_utc().timestamp()),
        )) as ArrayRef,
        float(|o| o.avg_temp),
        float(|o| o.min_temp),
        float(|o| o.max_temp),
        float(|o| o.precipitation),
        Arc::new(Int32Array::from_iter_values(chunk.iter().map(|o| o.snow_depth))) as ArrayRef,
        Arc::new(Int16Array::from_iter_values(chunk.iter().map(|o| o.wind_direction))) as ArrayRef,
        float(|o| o.wind_speed),
        float(|o| o.wind_peak_gust),
        float(|o| o.air_pressure),
        Arc::new(Int32Array::from_iter_values(chunk.iter().map(|o| o.sunshine_duration))) as ArrayRef,
    ]
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    use super::*;

    fn read_back(path: &Path) -> Vec<RecordBatch> {
        let file = File::open(path).unwrap();
        ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn should_write_all_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.parquet");
        let observations = vec![
            Observation::from_line("2020-01-01 00:00:00,1.0,-2.0,4.0,0.0,0,10,1.0,2.0,1000.0,0")
                .unwrap(),
            Observation::from_line("2020-01-02 00:00:00,2.0,-1.0,5.0,1.5,3,20,1.5,2.5,1001.0,90")
                .unwrap(),
        ];

        save_observations(&observations, &path).unwrap();
        let batches = read_back(&path);

        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 2);
        assert_eq!(batches[0].num_columns(), 11);

        let max = batches[0]
            .column(3)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(max.value(1), 5.0);

        let stamps = batches[0]
            .column(0)
            .as_any()
            .downcast_ref::<TimestampSecondArray>()
            .unwrap();
        assert_eq!(stamps.value(0), 1_577_836_800);
        assert!(!stamps.is_null(0));
    }

    #[test]
    fn should_write_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.parquet");

        save_observations(&[], &path).unwrap();

        let rows: usize = read_back(&path).iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 0);
    }
}
