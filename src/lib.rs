//! Weather observation ingestion.
//!
//! Parses directories of daily observation csv files in parallel into a
//! SQLite store that keeps one observation per timestamp, and answers
//! temperature statistics and ad-hoc read-only queries over it.

pub mod db;
pub mod error;
pub mod ingest;
pub mod parquet;
pub mod progress;
pub mod reading;
pub mod stats;

pub use db::{InsertOutcome, ObservationStore, QueryRows};
pub use error::{IngestError, ParseError, StoreError};
pub use ingest::{Coordinator, DirectoryReport, IngestConfig, IngestHandle, IngestReport};
pub use reading::Observation;
pub use stats::{Summary, TemperaturePoint, WeatherStats};
