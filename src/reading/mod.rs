pub mod observation;

pub use observation::{Observation, CSV_HEADER, TIMESTAMP_FORMAT};
