pub mod export;
pub mod load;
pub mod records;
pub mod stats;

use std::path::PathBuf;

pub use export::export;
pub use load::load;
pub use records::{clear, list, query};
pub use stats::{series, stats};

/// `weather.db` in the home directory, or the working directory without one.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join("weather.db")
}
