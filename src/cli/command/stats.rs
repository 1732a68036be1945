use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;
use weather_ingest::{reading::TIMESTAMP_FORMAT, ObservationStore, TemperaturePoint, WeatherStats};

pub fn stats(db_path: &Path) -> Result<()> {
    let store = ObservationStore::open(db_path)?;
    let stats = WeatherStats::new(&store);

    match stats.summary()? {
        None => println!("No observations stored"),
        Some(summary) => {
            println!("Observations:        {}", summary.count);
            println!("Highest temperature: {:.1}", summary.max_temperature);
            println!("Lowest temperature:  {:.1}", summary.min_temperature);
            println!("Average temperature: {:.1}", summary.average_temperature);
        }
    }

    Ok(())
}

pub fn series(
    db_path: &Path,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
) -> Result<()> {
    let store = ObservationStore::open(db_path)?;

    println!("timestamp,avg_temp,min_temp,max_temp");
    for point in WeatherStats::new(&store).time_series_between(from, to)? {
        println!("{}", series_line(&point));
    }

    Ok(())
}

fn series_line(point: &TemperaturePoint) -> String {
    format!(
        "{},{},{},{}",
        point.timestamp.format(TIMESTAMP_FORMAT),
        point.avg_temp,
        point.min_temp,
        point.max_temp
    )
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use crate::cli::parse_timestamp;

    use super::*;

    #[test]
    fn should_format_series_line() {
        let point = TemperaturePoint {
            timestamp: parse_timestamp("2023-04-05").unwrap(),
            avg_temp: 7.5,
            min_temp: 2.0,
            max_temp: 12.25,
        };

        assert_eq!(series_line(&point), "2023-04-05 00:00:00,7.5,2,12.25");
    }
}
