//! Command line interface.

pub mod command;

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{command, Parser, Subcommand};
use weather_ingest::reading::TIMESTAMP_FORMAT;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    /// Observation database file [default: ~/weather.db]
    #[arg(long, global = true, env = "WEATHER_DB")]
    pub db: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "WEATHER_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every csv file in a directory
    Load {
        dir: PathBuf,
        /// Files ingested at the same time [default: available cores, max 16]
        #[arg(short, long, env = "WEATHER_CONCURRENCY")]
        concurrency: Option<usize>,
    },
    /// Show temperature statistics
    Stats {},
    /// Print the temperature series as csv
    Series {
        /// First timestamp to include (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
        #[arg(long, value_parser = parse_timestamp)]
        from: Option<NaiveDateTime>,
        /// Last timestamp to include
        #[arg(long, value_parser = parse_timestamp)]
        to: Option<NaiveDateTime>,
    },
    /// Print stored observations
    List {
        /// First timestamp to include (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
        #[arg(long, value_parser = parse_timestamp)]
        from: Option<NaiveDateTime>,
        /// Last timestamp to include
        #[arg(long, value_parser = parse_timestamp)]
        to: Option<NaiveDateTime>,
    },
    /// Run a read-only SQL query against the `weather` table
    Query { sql: String },
    /// Export observations to a .parquet or .csv file
    Export { file: PathBuf },
    /// Remove every stored observation
    Clear {},
}

/// Accepts a full timestamp or a bare date (midnight).
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::default()))
        })
        .map_err(|_| format!("expected YYYY-MM-DD or \"YYYY-MM-DD HH:MM:SS\", got `{s}`"))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::Timelike;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn should_parse_timestamps() {
        let full = parse_timestamp("2023-04-05 06:07:08").unwrap();
        assert_eq!(full.hour(), 6);

        let date = parse_timestamp("2023-04-05").unwrap();
        assert_eq!(date.to_string(), "2023-04-05 00:00:00");

        assert!(parse_timestamp("05/04/2023").is_err());
    }

    #[test]
    fn should_parse_load_command() {
        let cli = Cli::try_parse_from(["weather", "--db", "x.db", "load", "data", "-c", "3"]).unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Commands::Load { dir, concurrency } => {
                assert_eq!(dir, PathBuf::from("data"));
                assert_eq!(concurrency, Some(3));
            }
            _ => panic!("expected load"),
        }
    }

    #[test]
    fn should_parse_bounded_series_command() {
        let cli = Cli::try_parse_from([
            "weather",
            "series",
            "--from",
            "2023-01-01",
            "--to",
            "2023-01-31 12:00:00",
        ])
        .unwrap();

        match cli.command {
            Commands::Series { from, to } => {
                assert_eq!(from, parse_timestamp("2023-01-01").ok());
                assert_eq!(to.map(|t| t.hour()), Some(12));
            }
            _ => panic!("expected series"),
        }

        let open = Cli::try_parse_from(["weather", "series"]).unwrap();
        assert!(matches!(
            open.command,
            Commands::Series {
                from: None,
                to: None
            }
        ));
    }

    #[test]
    fn should_have_valid_cli_definition() {
        Cli::command().debug_assert();
    }
}
