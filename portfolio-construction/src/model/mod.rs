pub mod config;

pub use config::{AccumulativeConfig, EqualWeightingConfig};
