//! Market data consumed when sizing weights into holdings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::instrument::InstrumentId;

/// Represents a single update to the price of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// The ID of the instrument.
    pub instrument_id: InstrumentId,
    /// The last traded price.
    pub last: f64,
    /// When the update was observed.
    pub timestamp: DateTime<Utc>,
}

impl PriceUpdate {
    pub fn new(instrument_id: InstrumentId, last: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            instrument_id,
            last,
            timestamp,
        }
    }

    pub fn get_instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    pub fn get_last(&self) -> f64 {
        self.last
    }

    pub fn get_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
