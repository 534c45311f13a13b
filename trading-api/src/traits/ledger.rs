use chrono::{DateTime, Utc};

use crate::model::{insight::Insight, instrument::InstrumentId};

/// Bookkeeping of the insights a construction model is currently tracking.
///
/// The ledger owns the active insight set; construction models only query it.
/// Implementations must return insights in a deterministic order (the order
/// they were tracked in) so that allocation passes are reproducible.
pub trait SignalLedger: Send {
    /// Starts tracking the given insights.
    fn track(&mut self, insights: Vec<Insight>);

    /// Returns every tracked insight still active at `utc_time`.
    fn active_as_of(&self, utc_time: DateTime<Utc>) -> Vec<Insight>;

    /// Removes and returns every tracked insight expired at `utc_time`.
    fn expire_as_of(&mut self, utc_time: DateTime<Utc>) -> Vec<Insight>;

    /// Earliest close time among tracked insights, if any.
    fn next_expiry(&self) -> Option<DateTime<Utc>>;

    /// Drops every insight on the given instruments without expiring them.
    fn untrack(&mut self, instruments: &[InstrumentId]);

    /// Whether the instrument has at least one insight active at `utc_time`.
    fn has_active(&self, instrument_id: InstrumentId, utc_time: DateTime<Utc>) -> bool {
        self.active_as_of(utc_time)
            .iter()
            .any(|insight| insight.instrument_id() == instrument_id)
    }
}

impl SignalLedger for Box<dyn SignalLedger> {
    fn track(&mut self, insights: Vec<Insight>) {
        (**self).track(insights)
    }

    fn active_as_of(&self, utc_time: DateTime<Utc>) -> Vec<Insight> {
        (**self).active_as_of(utc_time)
    }

    fn expire_as_of(&mut self, utc_time: DateTime<Utc>) -> Vec<Insight> {
        (**self).expire_as_of(utc_time)
    }

    fn next_expiry(&self) -> Option<DateTime<Utc>> {
        (**self).next_expiry()
    }

    fn untrack(&mut self, instruments: &[InstrumentId]) {
        (**self).untrack(instruments)
    }

    fn has_active(&self, instrument_id: InstrumentId, utc_time: DateTime<Utc>) -> bool {
        (**self).has_active(instrument_id, utc_time)
    }
}
