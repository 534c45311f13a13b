//! Defines the `DataFeed` trait for price ingestion.
//!
//! The allocator itself never prices instruments. Drivers poll a `DataFeed`
//! and forward the updates to whichever `TargetMaterializer` sizes the
//! resulting weights.

use chrono::{DateTime, Utc};

use crate::model::market_data::PriceUpdate;

/// A trait for components that produce market data.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Utc};
/// use trading::model::market_data::PriceUpdate;
/// use trading::traits::data_feed::DataFeed;
///
/// struct ConstantFeed;
///
/// impl DataFeed for ConstantFeed {
///     fn next_prices(&mut self, now: DateTime<Utc>) -> Option<Vec<PriceUpdate>> {
///         Some(vec![PriceUpdate::new(1, 100.0, now)])
///     }
/// }
/// ```
pub trait DataFeed {
    /// Retrieves the next set of price updates as of `now`.
    ///
    /// Returns `None` once the feed has ended.
    fn next_prices(&mut self, now: DateTime<Utc>) -> Option<Vec<PriceUpdate>>;
}
