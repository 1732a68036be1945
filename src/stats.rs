//! Temperature statistics and chart series derived from the store.

use chrono::NaiveDateTime;

use crate::{db::ObservationStore, error::StoreError};

/// Returned by the single-value aggregates when the store is empty.
pub const EMPTY_SENTINEL: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: u64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub average_temperature: f64,
}

/// One chart sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperaturePoint {
    pub timestamp: NaiveDateTime,
    pub avg_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
}

pub struct WeatherStats<'a> {
    store: &'a ObservationStore,
}

impl<'a> WeatherStats<'a> {
    pub fn new(store: &'a ObservationStore) -> Self {
        Self { store }
    }

    /// Highest `max_temp`, or [`EMPTY_SENTINEL`] for an empty store.
    pub fn max_temperature(&self) -> Result<f64, StoreError> {
        Ok(self
            .summary()?
            .map_or(EMPTY_SENTINEL, |s| s.max_temperature))
    }

    /// Lowest `min_temp`, or [`EMPTY_SENTINEL`] for an empty store.
    pub fn min_temperature(&self) -> Result<f64, StoreError> {
        Ok(self
            .summary()?
            .map_or(EMPTY_SENTINEL, |s| s.min_temperature))
    }

    /// Mean of `avg_temp`, or [`EMPTY_SENTINEL`] for an empty store.
    pub fn average_temperature(&self) -> Result<f64, StoreError> {
        Ok(self
            .summary()?
            .map_or(EMPTY_SENTINEL, |s| s.average_temperature))
    }

    /// All three aggregates at once; `None` distinguishes the empty store.
    pub fn summary(&self) -> Result<Option<Summary>, StoreError> {
        self.store.summary()
    }

    pub fn time_series(&self) -> Result<Vec<TemperaturePoint>, StoreError> {
        self.store.temperature_series()
    }

    /// The series restricted to inclusive timestamp bounds.
    pub fn time_series_between(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Result<Vec<TemperaturePoint>, StoreError> {
        self.store.temperature_series_range(from, to)
    }
}

// -- Tests -------------------------------------------------------------------
