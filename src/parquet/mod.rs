pub mod observations;

pub use observations::save_observations;
