//! One day's weather observation and its line parser.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::ParseError;

/// Timestamp layout used in the input files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header written when exporting observations back to the input format.
pub const CSV_HEADER: &str = "date,avg_temp,min_temp,max_temp,precipitation,snow_depth,\
wind_direction,wind_speed,wind_peak_gust,air_pressure,sunshine_duration";

const FIELD_COUNT: usize = 11;

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub avg_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub precipitation: f64,
    pub snow_depth: i32,
    pub wind_direction: i16,
    pub wind_speed: f64,
    pub wind_peak_gust: f64,
    pub air_pressure: f64,
    pub sunshine_duration: i32,
}

impl Observation {
    /// Parses one data line. The header line must be skipped by the caller.
    pub fn from_line(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != FIELD_COUNT {
            return Err(ParseError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        }

        let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
            .map_err(|_| ParseError::Timestamp(fields[0].to_string()))?;

        Ok(Observation {
            timestamp,
            avg_temp: parse_float(fields[1], "avg_temp")?,
            min_temp: parse_float(fields[2], "min_temp")?,
            max_temp: parse_float(fields[3], "max_temp")?,
            precipitation: parse_float(fields[4], "precipitation")?,
            snow_depth: parse_field(fields[5], "snow_depth")?,
            wind_direction: parse_field(fields[6], "wind_direction")?,
            wind_speed: parse_float(fields[7], "wind_speed")?,
            wind_peak_gust: parse_float(fields[8], "wind_peak_gust")?,
            air_pressure: parse_float(fields[9], "air_pressure")?,
            sunshine_duration: parse_field(fields[10], "sunshine_duration")?,
        })
    }

    /// Serialises back to the 11-field input layout.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Observation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Observation::from_line(s)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{},{},{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.avg_temp,
            self.min_temp,
            self.max_temp,
            self.precipitation,
            self.snow_depth,
            self.wind_direction,
            self.wind_speed,
            self.wind_peak_gust,
            self.air_pressure,
            self.sunshine_duration
        )
    }
}

fn parse_field<T: FromStr>(value: &str, field: &'static str) -> Result<T, ParseError> {
    value.parse::<T>().map_err(|_| ParseError::Number {
        field,
        value: value.to_string(),
    })
}

fn parse_float(value: &str, field: &'static str) -> Result<f64, ParseError> {
    let number: f64 = parse_field(value, field)?;
    if !number.is_finite() {
        return Err(ParseError::NonFinite {
            field,
            value: value.to_string(),
        });
    }

    Ok(number)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::{Datelike, Timelike};

    use super::*;

    const LINE: &str = "2023-01-15 00:00:00,-2.5,-7.1,1.3,0.4,12,270,3.6,9.8,1013.2,145";

    #[test]
    fn should_parse_line() {
        let obs = Observation::from_line(LINE).unwrap();

        assert_eq!(obs.timestamp.year(), 2023);
        assert_eq!(obs.timestamp.month(), 1);
        assert_eq!(obs.timestamp.day(), 15);
        assert_eq!(obs.timestamp.hour(), 0);
        assert_eq!(obs.avg_temp, -2.5);
        assert_eq!(obs.min_temp, -7.1);
        assert_eq!(obs.max_temp, 1.3);
        assert_eq!(obs.precipitation, 0.4);
        assert_eq!(obs.snow_depth, 12);
        assert_eq!(obs.wind_direction, 270);
        assert_eq!(obs.wind_speed, 3.6);
        assert_eq!(obs.wind_peak_gust, 9.8);
        assert_eq!(obs.air_pressure, 1013.2);
        assert_eq!(obs.sunshine_duration, 145);
    }

    #[test]
    fn should_round_trip_values() {
        let obs = Observation::from_line(LINE).unwrap();
        let again = Observation::from_line(&obs.to_line()).unwrap();

        assert_eq!(again.timestamp, obs.timestamp);
        assert!((again.avg_temp - obs.avg_temp).abs() < 1e-9);
        assert!((again.air_pressure - obs.air_pressure).abs() < 1e-9);
        assert_eq!(again, obs);
    }

    #[test]
    fn should_reject_short_line() {
        let line = "2023-01-15 00:00:00,-2.5,-7.1,1.3,0.4,12,270,3.6,9.8,1013.2";
        assert_eq!(
            Observation::from_line(line),
            Err(ParseError::FieldCount {
                expected: 11,
                found: 10
            })
        );
    }

    #[test]
    fn should_reject_long_line() {
        let line = format!("{LINE},1");
        assert!(matches!(
            Observation::from_line(&line),
            Err(ParseError::FieldCount { found: 12, .. })
        ));
    }

    #[test]
    fn should_reject_bad_timestamp() {
        let line = "15/01/2023,-2.5,-7.1,1.3,0.4,12,270,3.6,9.8,1013.2,145";
        assert_eq!(
            Observation::from_line(line),
            Err(ParseError::Timestamp("15/01/2023".to_string()))
        );
    }

    #[test]
    fn should_reject_whole_line_on_bad_number() {
        let line = "2023-01-15 00:00:00,-2.5,-7.1,1.3,0.4,12,west,3.6,9.8,1013.2,145";
        assert_eq!(
            Observation::from_line(line),
            Err(ParseError::Number {
                field: "wind_direction",
                value: "west".to_string()
            })
        );
    }

    #[test]
    fn should_reject_out_of_range_wind_direction() {
        let line = "2023-01-15 00:00:00,-2.5,-7.1,1.3,0.4,12,40000,3.6,9.8,1013.2,145";
        assert!(matches!(
            Observation::from_line(line),
            Err(ParseError::Number {
                field: "wind_direction",
                ..
            })
        ));
    }

    #[test]
    fn should_trim_fields() {
        let line = "2023-01-15 00:00:00, -2.5 ,-7.1,1.3,0.4,12,270,3.6,9.8,1013.2, 145";
        let obs: Observation = line.parse().unwrap();
        assert_eq!(obs.avg_temp, -2.5);
        assert_eq!(obs.sunshine_duration, 145);
    }

    #[test]
    fn should_reject_non_finite_numbers() {
        for (value, field) in [
            ("NaN", "avg_temp"),
            ("inf", "avg_temp"),
            ("-infinity", "avg_temp"),
        ] {
            let line = format!("2023-01-15 00:00:00,{value},-7.1,1.3,0.4,12,270,3.6,9.8,1013.2,145");
            assert_eq!(
                Observation::from_line(&line),
                Err(ParseError::NonFinite {
                    field,
                    value: value.to_string()
                })
            );
        }

        let line = "2023-01-15 00:00:00,-2.5,-7.1,1.3,0.4,12,270,3.6,9.8,INF,145";
        assert!(matches!(
            Observation::from_line(line),
            Err(ParseError::NonFinite {
                field: "air_pressure",
                ..
            })
        ));
    }
}
