//! Accumulative insight portfolio construction.
//!
//! Allocates `percent` of the portfolio per insight instead of recomputing a
//! full allocation on every pass. No rebalancing happens: only a new insight or
//! the expiry of an old one changes a target.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use trading::{
    Insight, InstrumentId, PortfolioConstructor, PortfolioTarget, SecurityChanges, SignalLedger,
    TargetBatch, TargetMaterializer, WeightChange,
};

use crate::accumulator::WeightAccumulator;
use crate::error::{AllocatorError, Result};
use crate::ledger::{accept_all, latest_per_instrument, InsightCollection, InsightFilter};
use crate::model::config::AccumulativeConfig;

/// Weight changes of one pass, split by origin.
#[derive(Debug, Default)]
struct Pass {
    flattened: Vec<WeightChange>,
    adjusted: Vec<WeightChange>,
}

pub struct AccumulativeConstructor<L: SignalLedger = InsightCollection> {
    ledger: L,
    accumulator: WeightAccumulator,
    filter: InsightFilter,
    next_expiry: Option<DateTime<Utc>>,
    // `None` once the pending removals have been flattened.
    removed: Option<Vec<InstrumentId>>,
}

impl AccumulativeConstructor<InsightCollection> {
    pub fn new(config: AccumulativeConfig) -> Self {
        Self::with_ledger(config, InsightCollection::new())
    }
}

impl Default for AccumulativeConstructor<InsightCollection> {
    fn default() -> Self {
        Self::new(AccumulativeConfig::default())
    }
}

impl<L: SignalLedger> AccumulativeConstructor<L> {
    pub fn with_ledger(config: AccumulativeConfig, ledger: L) -> Self {
        Self {
            ledger,
            accumulator: WeightAccumulator::new(config.percent()),
            filter: accept_all(),
            next_expiry: None,
            removed: Some(Vec::new()),
        }
    }

    /// Replaces the acceptance predicate applied to incoming insights.
    pub fn with_insight_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Insight) -> bool + Send + 'static,
    {
        self.filter = Box::new(filter);
        self
    }

    pub fn percent(&self) -> f64 {
        self.accumulator.percent()
    }

    /// Current accumulated weight of an instrument.
    pub fn weight(&self, instrument_id: InstrumentId) -> f64 {
        self.accumulator.weight(instrument_id)
    }

    pub fn weights(&self) -> impl Iterator<Item = (InstrumentId, f64)> + '_ {
        self.accumulator.weights()
    }

    /// Cached earliest expiry among tracked insights.
    pub fn next_expiry(&self) -> Option<DateTime<Utc>> {
        self.next_expiry
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    fn is_idle(&self, utc_time: DateTime<Utc>, insights: &[Insight]) -> bool {
        let before_expiry = matches!(self.next_expiry, Some(next) if utc_time <= next);
        before_expiry && insights.is_empty() && self.removed.is_none()
    }

    /// Runs one allocation pass and returns the weight changes it produced,
    /// in order: removal flattening, activations, expiries.
    ///
    /// Returns an empty list without touching any state when nothing can have
    /// changed since the previous pass.
    pub fn evaluate(
        &mut self,
        utc_time: DateTime<Utc>,
        insights: Vec<Insight>,
    ) -> Result<Vec<WeightChange>> {
        let pass = self.run_pass(utc_time, insights)?;
        let mut changes = pass.flattened;
        changes.extend(pass.adjusted);
        Ok(changes)
    }

    fn run_pass(&mut self, utc_time: DateTime<Utc>, insights: Vec<Insight>) -> Result<Pass> {
        let mut pass = Pass::default();
        if self.is_idle(utc_time, &insights) {
            return Ok(pass);
        }

        let accepted: Vec<Insight> = insights
            .into_iter()
            .filter(|insight| (self.filter)(insight))
            .collect();
        self.ledger.track(accepted);

        for instrument_id in self.removed.take().unwrap_or_default() {
            pass.flattened.push(self.accumulator.flatten(instrument_id));
        }

        for insight in latest_per_instrument(self.ledger.active_as_of(utc_time)) {
            if let Some(change) = self.accumulator.apply_activation(&insight) {
                pass.adjusted.push(change);
            }
        }
        let activated = pass.adjusted.len();

        for insight in self.ledger.expire_as_of(utc_time) {
            if let Some(change) = self.accumulator.apply_expiry(&insight)? {
                pass.adjusted.push(change);
            }
        }

        self.next_expiry = self.ledger.next_expiry();

        info!(
            "Pass at {}: {} flattened, {} activated, {} expired, next expiry {:?}",
            utc_time,
            pass.flattened.len(),
            activated,
            pass.adjusted.len() - activated,
            self.next_expiry
        );
        Ok(pass)
    }

    /// Records removed instruments for the next pass and stops tracking their
    /// insights.
    pub fn on_universe_change(&mut self, removed: &[InstrumentId]) {
        if !removed.is_empty() {
            info!("Universe removed {} instruments: {:?}", removed.len(), removed);
        }
        self.removed = Some(removed.to_vec());
        self.ledger.untrack(removed);
    }
}

impl<L: SignalLedger> PortfolioConstructor for AccumulativeConstructor<L> {
    type Error = AllocatorError;

    fn create_targets(
        &mut self,
        utc_time: DateTime<Utc>,
        insights: Vec<Insight>,
        materializer: &dyn TargetMaterializer,
    ) -> Result<TargetBatch> {
        let pass = self.run_pass(utc_time, insights)?;

        let mut batch = TargetBatch::new();
        // Removal targets close the position outright and need no price.
        for change in &pass.flattened {
            batch.push(PortfolioTarget::new(change.instrument_id(), 0.0));
        }
        for change in &pass.adjusted {
            match materializer.materialize(change) {
                Ok(target) => {
                    debug!(
                        "Target {} -> {:.4} units (weight {:.4})",
                        target.instrument_id(),
                        target.quantity(),
                        change.weight()
                    );
                    batch.push(target);
                }
                Err(e) => {
                    warn!("Could not size instrument {}: {}", change.instrument_id(), e);
                    batch.mark_failed(change.instrument_id());
                }
            }
        }
        Ok(batch)
    }

    fn on_securities_changed(&mut self, changes: &SecurityChanges) {
        self.on_universe_change(changes.removed_instruments());
    }
}
