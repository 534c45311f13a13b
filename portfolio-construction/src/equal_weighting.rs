//! Equal-weighting portfolio construction.
//!
//! Gives every instrument with a non-`Flat` active insight the same weight,
//! `1/N`, signed by the insight direction. Targets are recomputed from scratch
//! whenever a rebalance is due: new insights arrived, the universe changed, or
//! the rebalance period elapsed.

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::collections::HashSet;
use trading::{
    Insight, InsightDirection, InstrumentId, PortfolioConstructor, PortfolioTarget,
    SecurityChanges, SignalLedger, TargetBatch, TargetMaterializer, WeightChange,
};

use crate::error::{AllocatorError, Result};
use crate::ledger::{accept_all, latest_per_instrument, InsightCollection, InsightFilter};
use crate::model::config::EqualWeightingConfig;

pub struct EqualWeightingConstructor<L: SignalLedger = InsightCollection> {
    ledger: L,
    filter: InsightFilter,
    rebalance_period: Duration,
    last_rebalance: Option<DateTime<Utc>>,
    removed: Option<Vec<InstrumentId>>,
}

impl EqualWeightingConstructor<InsightCollection> {
    pub fn new(config: EqualWeightingConfig) -> Self {
        Self::with_ledger(config, InsightCollection::new())
    }
}

impl Default for EqualWeightingConstructor<InsightCollection> {
    fn default() -> Self {
        Self::new(EqualWeightingConfig::default())
    }
}

impl<L: SignalLedger> EqualWeightingConstructor<L> {
    pub fn with_ledger(config: EqualWeightingConfig, ledger: L) -> Self {
        Self {
            ledger,
            filter: accept_all(),
            rebalance_period: config.rebalance_period(),
            last_rebalance: None,
            removed: None,
        }
    }

    pub fn with_insight_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Insight) -> bool + Send + 'static,
    {
        self.filter = Box::new(filter);
        self
    }

    /// Time of the next scheduled rebalance. `None` before the first pass, or
    /// when the period reaches past the representable calendar.
    pub fn next_rebalance(&self) -> Option<DateTime<Utc>> {
        self.last_rebalance
            .and_then(|last| last.checked_add_signed(self.rebalance_period))
    }

    fn is_rebalance_due(&self, utc_time: DateTime<Utc>, has_new_insights: bool) -> bool {
        has_new_insights
            || self.removed.is_some()
            || self.last_rebalance.map_or(true, |last| {
                utc_time.signed_duration_since(last) >= self.rebalance_period
            })
    }

    /// Signed `1/N` weight per insight, N counting non-`Flat` insights.
    pub fn target_weights(insights: &[Insight]) -> Vec<WeightChange> {
        let count = insights
            .iter()
            .filter(|insight| insight.direction() != InsightDirection::Flat)
            .count();
        let percent = if count == 0 { 0.0 } else { 1.0 / count as f64 };

        insights
            .iter()
            .map(|insight| {
                WeightChange::new(
                    insight.instrument_id(),
                    insight.direction().as_f64() * percent,
                )
            })
            .collect()
    }
}

impl<L: SignalLedger> PortfolioConstructor for EqualWeightingConstructor<L> {
    type Error = AllocatorError;

    fn create_targets(
        &mut self,
        utc_time: DateTime<Utc>,
        insights: Vec<Insight>,
        materializer: &dyn TargetMaterializer,
    ) -> Result<TargetBatch> {
        let has_new_insights = !insights.is_empty();
        let accepted: Vec<Insight> = insights
            .into_iter()
            .filter(|insight| (self.filter)(insight))
            .collect();
        self.ledger.track(accepted);

        let mut batch = TargetBatch::new();
        if !self.is_rebalance_due(utc_time, has_new_insights) {
            return Ok(batch);
        }
        self.last_rebalance = Some(utc_time);

        for instrument_id in self.removed.take().unwrap_or_default() {
            batch.push(PortfolioTarget::new(instrument_id, 0.0));
        }

        let latest = latest_per_instrument(self.ledger.active_as_of(utc_time));
        for change in Self::target_weights(&latest) {
            match materializer.materialize(&change) {
                Ok(target) => batch.push(target),
                Err(e) => {
                    warn!("Could not size instrument {}: {}", change.instrument_id(), e);
                    batch.mark_failed(change.instrument_id());
                }
            }
        }

        let mut seen = HashSet::new();
        for insight in self.ledger.expire_as_of(utc_time) {
            let instrument_id = insight.instrument_id();
            if !seen.insert(instrument_id) {
                continue;
            }
            if !self.ledger.has_active(instrument_id, utc_time) && !batch.is_failed(instrument_id)
            {
                batch.push(PortfolioTarget::new(instrument_id, 0.0));
            }
        }

        info!(
            "Rebalanced at {}: {} targets, {} failed, next rebalance {:?}",
            utc_time,
            batch.len(),
            batch.failed().len(),
            self.next_rebalance()
        );
        Ok(batch)
    }

    fn on_securities_changed(&mut self, changes: &SecurityChanges) {
        let removed = changes.removed_instruments();
        self.ledger.untrack(removed);
        self.removed = Some(removed.to_vec());
    }
}
