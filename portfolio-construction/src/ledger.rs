//! In-memory signal ledger.

use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use trading::{Insight, InstrumentId, SignalLedger};

/// Decides whether an incoming insight should be tracked at all.
pub type InsightFilter = Box<dyn Fn(&Insight) -> bool + Send>;

pub fn accept_all() -> InsightFilter {
    Box::new(|_| true)
}

/// Tracks insights in the order they were received.
#[derive(Debug, Default)]
pub struct InsightCollection {
    insights: Vec<Insight>,
}

impl InsightCollection {
    pub fn new() -> Self {
        Self {
            insights: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.insights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    pub fn contains_instrument(&self, instrument_id: InstrumentId) -> bool {
        self.insights
            .iter()
            .any(|insight| insight.instrument_id() == instrument_id)
    }
}

impl SignalLedger for InsightCollection {
    fn track(&mut self, insights: Vec<Insight>) {
        self.insights.extend(insights);
    }

    fn active_as_of(&self, utc_time: DateTime<Utc>) -> Vec<Insight> {
        self.insights
            .iter()
            .filter(|insight| insight.is_active(utc_time))
            .cloned()
            .collect()
    }

    fn expire_as_of(&mut self, utc_time: DateTime<Utc>) -> Vec<Insight> {
        let (expired, active): (Vec<Insight>, Vec<Insight>) = self
            .insights
            .drain(..)
            .partition(|insight| insight.is_expired(utc_time));
        self.insights = active;
        expired
    }

    fn next_expiry(&self) -> Option<DateTime<Utc>> {
        self.insights.iter().map(Insight::close_time).min()
    }

    fn untrack(&mut self, instruments: &[InstrumentId]) {
        let before = self.insights.len();
        self.insights
            .retain(|insight| !instruments.contains(&insight.instrument_id()));
        debug!(
            "Untracked {} insights across {} instruments",
            before - self.insights.len(),
            instruments.len()
        );
    }
}

/// Reduces insights to the most recently generated one per instrument.
///
/// Instruments appear in the order of their first insight. When two insights
/// share a generation time the later one in `insights` wins.
pub fn latest_per_instrument(insights: Vec<Insight>) -> Vec<Insight> {
    let mut order: Vec<InstrumentId> = Vec::new();
    let mut latest: HashMap<InstrumentId, Insight> = HashMap::new();

    for insight in insights {
        let instrument_id = insight.instrument_id();
        match latest.get(&instrument_id) {
            Some(current) if current.generated_time() > insight.generated_time() => {}
            Some(_) => {
                latest.insert(instrument_id, insight);
            }
            None => {
                order.push(instrument_id);
                latest.insert(instrument_id, insight);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|instrument_id| latest.remove(&instrument_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use trading::InsightDirection;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap()
    }

    fn insight(instrument: InstrumentId, offset_min: i64, period_min: i64) -> Insight {
        Insight::new(
            instrument,
            InsightDirection::Up,
            t0() + Duration::minutes(offset_min),
            Duration::minutes(period_min),
        )
    }

    #[test]
    fn test_active_and_expire() {
        let mut ledger = InsightCollection::new();
        ledger.track(vec![insight(1, 0, 5), insight(2, 0, 10)]);

        let at = t0() + Duration::minutes(5);
        assert_eq!(ledger.active_as_of(at).len(), 1);

        let expired = ledger.expire_as_of(at);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].instrument_id(), 1);
        assert_eq!(ledger.len(), 1);

        // Already removed, never returned twice.
        assert!(ledger.expire_as_of(at).is_empty());
    }

    #[test]
    fn test_next_expiry_is_earliest_close() {
        let mut ledger = InsightCollection::new();
        assert_eq!(ledger.next_expiry(), None);

        ledger.track(vec![insight(1, 0, 30), insight(2, 0, 10), insight(3, 0, 20)]);
        assert_eq!(ledger.next_expiry(), Some(t0() + Duration::minutes(10)));
    }

    #[test]
    fn test_untrack_drops_instrument() {
        let mut ledger = InsightCollection::new();
        ledger.track(vec![insight(1, 0, 5), insight(2, 0, 5), insight(1, 1, 5)]);

        ledger.untrack(&[1]);
        assert!(!ledger.contains_instrument(1));
        assert!(ledger.contains_instrument(2));
        assert!(!ledger.has_active(1, t0()));
    }

    #[test]
    fn test_latest_per_instrument() {
        let a_old = insight(1, 0, 60);
        let b = insight(2, 1, 60);
        let a_new = insight(1, 2, 60);

        let latest = latest_per_instrument(vec![a_old, b.clone(), a_new.clone()]);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].id(), a_new.id());
        assert_eq!(latest[1].id(), b.id());
    }

    #[test]
    fn test_latest_per_instrument_tie_goes_to_later() {
        let first = insight(1, 0, 60);
        let second = insight(1, 0, 60);

        let latest = latest_per_instrument(vec![first, second.clone()]);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id(), second.id());
    }
}
