//! # Portfolio Construction
//!
//! Turns streams of directional insights into per-instrument target weights.
//!
//! ## Modules
//! - `accumulative`: incremental allocator that moves each instrument by a
//!   fixed step per insight and reverses the step on expiry.
//! - `equal_weighting`: stateless `1/N` allocator, recomputed on rebalance.
//! - `accumulator`: the weight table and its once-only application rules.
//! - `ledger`: in-memory tracking of active insights.
//! - `materializer`: sizing of weights into holdings.
//! - `model`: configuration.

pub mod accumulative;
pub mod accumulator;
pub mod equal_weighting;
pub mod error;
pub mod ledger;
pub mod materializer;
pub mod model;

pub use accumulative::AccumulativeConstructor;
pub use accumulator::WeightAccumulator;
pub use equal_weighting::EqualWeightingConstructor;
pub use error::{AllocatorError, Result};
pub use ledger::{InsightCollection, InsightFilter};
pub use materializer::PercentMaterializer;
pub use model::config::{AccumulativeConfig, EqualWeightingConfig};
