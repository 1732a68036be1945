use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use chrono::NaiveDateTime;
use rusqlite::{params, types::Type, types::Value, Connection, Row};
use tracing::{debug, info};

use super::{query, InsertOutcome, QueryRows, STORED_TIMESTAMP_FORMAT};
use crate::{
    error::StoreError,
    reading::Observation,
    stats::{Summary, TemperaturePoint},
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS weather (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        avg_temp REAL,
        min_temp REAL,
        max_temp REAL,
        precipitation REAL,
        snow_depth INTEGER,
        wind_direction INTEGER,
        wind_speed REAL,
        wind_peak_gust REAL,
        air_pressure REAL,
        sunshine_duration INTEGER
    );
    CREATE UNIQUE INDEX IF NOT EXISTS weather_date ON weather (date);
";

const OBSERVATION_COLUMNS: &str = "date, avg_temp, min_temp, max_temp, precipitation, snow_depth, \
     wind_direction, wind_speed, wind_peak_gust, air_pressure, sunshine_duration";

/// The deduplicated `weather` table.
///
/// A single connection sits behind a mutex, and the unique index on `date`
/// turns `INSERT OR IGNORE` into the check-and-insert primitive, so no caller
/// can separate the existence check from the write.
pub struct ObservationStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl ObservationStore {
    /// Opens (creating if needed) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let unavailable = |source: rusqlite::Error| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open(path).map_err(unavailable)?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(unavailable)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })
        .map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(unavailable)?;

        info!(path = %path.display(), "Opened observation store");

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
        })
    }

    /// Opens a private in-memory store; contents vanish on drop.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let path = PathBuf::from(":memory:");
        let unavailable = |source: rusqlite::Error| StoreError::Unavailable {
            path: path.clone(),
            source,
        };

        let conn = Connection::open_in_memory().map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(unavailable)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts `obs` unless a row with the same timestamp already exists.
    ///
    /// The first observation seen for a timestamp wins; later ones are
    /// reported as [`InsertOutcome::Duplicate`] and left untouched.
    pub fn try_insert(&self, obs: &Observation) -> Result<InsertOutcome, StoreError> {
        let conn = self.lock()?;
        let changes = conn.execute(
            "INSERT OR IGNORE INTO weather (
                date, avg_temp, min_temp, max_temp, precipitation, snow_depth,
                wind_direction, wind_speed, wind_peak_gust, air_pressure, sunshine_duration
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                format_timestamp(&obs.timestamp),
                obs.avg_temp,
                obs.min_temp,
                obs.max_temp,
                obs.precipitation,
                obs.snow_depth,
                obs.wind_direction,
                obs.wind_speed,
                obs.wind_peak_gust,
                obs.air_pressure,
                obs.sunshine_duration,
            ],
        )?;

        if changes == 0 {
            debug!(timestamp = %obs.timestamp, "Duplicate observation skipped");
            Ok(InsertOutcome::Duplicate)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    /// All observations ordered by timestamp.
    pub fn select_all(&self) -> Result<Vec<Observation>, StoreError> {
        self.select_range(None, None)
    }

    /// Observations with `from <= timestamp <= to`, ordered by timestamp.
    pub fn select_range(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<Vec<Observation>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {OBSERVATION_COLUMNS} FROM weather
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY date"
        ))?;

        let rows = stmt.query_map(
            params![
                from.as_ref().map(format_timestamp),
                to.as_ref().map(format_timestamp)
            ],
            observation_from_row,
        )?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?;

        Ok(count as u64)
    }

    /// Removes every observation, keeping the schema. Returns rows removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM weather", [])?;
        info!(removed, "Cleared observation store");

        Ok(removed)
    }

    /// Count and temperature extremes in one pass; `None` when empty.
    pub fn summary(&self) -> Result<Option<Summary>, StoreError> {
        let conn = self.lock()?;
        let summary = conn.query_row(
            "SELECT COUNT(*), MIN(min_temp), MAX(max_temp), AVG(avg_temp) FROM weather",
            [],
            |row| {
                let count: i64 = row.get(0)?;
                let min: Option<f64> = row.get(1)?;
                let max: Option<f64> = row.get(2)?;
                let average: Option<f64> = row.get(3)?;

                Ok((count > 0).then(|| Summary {
                    count: count as u64,
                    min_temperature: min.unwrap_or_default(),
                    max_temperature: max.unwrap_or_default(),
                    average_temperature: average.unwrap_or_default(),
                }))
            },
        )?;

        Ok(summary)
    }

    /// Chronological (timestamp, avg, min, max) points for charting.
    pub fn temperature_series(&self) -> Result<Vec<TemperaturePoint>, StoreError> {
        self.temperature_series_range(None, None)
    }

    /// Series points with `from <= timestamp <= to`.
    pub fn temperature_series_range(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<Vec<TemperaturePoint>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT date, avg_temp, min_temp, max_temp FROM weather
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY date",
        )?;

        let points = stmt.query_map(
            params![
                from.as_ref().map(format_timestamp),
                to.as_ref().map(format_timestamp)
            ],
            |row| {
                Ok(TemperaturePoint {
                    timestamp: timestamp_from_row(row, 0)?,
                    avg_temp: row.get(1)?,
                    min_temp: row.get(2)?,
                    max_temp: row.get(3)?,
                })
            },
        )?;

        Ok(points.collect::<Result<Vec<_>, _>>()?)
    }

    /// Runs an ad-hoc read-only query.
    ///
    /// Text containing `INSERT`, `UPDATE`, `DELETE` or `ATTACH` is rejected
    /// before it reaches SQLite, as is any statement SQLite reports as writing.
    pub fn query(&self, sql: &str) -> Result<QueryRows, StoreError> {
        query::ensure_read_only(sql)?;

        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(StoreError::Rejected(
                "statement would modify the database".to_string(),
            ));
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();
        let rows = stmt.query_map([], |row| {
            (0..width)
                .map(|idx| row.get::<_, Value>(idx))
                .collect::<Result<Vec<_>, _>>()
        })?;

        Ok(QueryRows {
            columns,
            rows: rows.collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(STORED_TIMESTAMP_FORMAT).to_string()
}

fn timestamp_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, STORED_TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<Observation> {
    Ok(Observation {
        timestamp: timestamp_from_row(row, 0)?,
        avg_temp: row.get(1)?,
        min_temp: row.get(2)?,
        max_temp: row.get(3)?,
        precipitation: row.get(4)?,
        snow_depth: row.get(5)?,
        wind_direction: row.get(6)?,
        wind_speed: row.get(7)?,
        wind_peak_gust: row.get(8)?,
        air_pressure: row.get(9)?,
        sunshine_duration: row.get(10)?,
    })
}

// -- Tests -------------------------------------------------------------------
