//! Accumulated target weights.
//!
//! Each insight moves its instrument's weight by one `percent` step when it is
//! first seen active, and moves it back when it expires:
//!
//! 1. `Up` adds `percent`, `Down` subtracts it, with no ceiling.
//! 2. `Flat` moves the weight one step towards zero, snapping to zero when
//!    closer than one step.
//! 3. Expiry reverses the original step, snapping to zero when the reversal
//!    would cross it. A `Flat` expiry leaves the weight unchanged.
//!
//! Every insight is applied at most once on activation and at most once on
//! expiry, no matter how many passes observe it.

use log::debug;
use std::collections::{HashMap, HashSet};
use trading::{Insight, InsightDirection, InsightId, InstrumentId, WeightChange};

use crate::error::{AllocatorError, Result};
use crate::model::config::DEFAULT_PERCENT;

#[derive(Debug)]
pub struct WeightAccumulator {
    percent: f64,
    weights: HashMap<InstrumentId, f64>,
    activated: HashSet<InsightId>,
    expired: HashSet<InsightId>,
}

impl Default for WeightAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_PERCENT)
    }
}

impl WeightAccumulator {
    /// Creates an empty accumulator. The sign of `percent` is discarded.
    pub fn new(percent: f64) -> Self {
        if percent < 0.0 {
            debug!("Normalising negative step size {} to {}", percent, percent.abs());
        }
        Self {
            percent: percent.abs(),
            weights: HashMap::new(),
            activated: HashSet::new(),
            expired: HashSet::new(),
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Current weight of an instrument, zero when it never received one.
    pub fn weight(&self, instrument_id: InstrumentId) -> f64 {
        self.weights.get(&instrument_id).copied().unwrap_or(0.0)
    }

    /// Whether the instrument has an entry in the weight table.
    pub fn has_weight(&self, instrument_id: InstrumentId) -> bool {
        self.weights.contains_key(&instrument_id)
    }

    pub fn weights(&self) -> impl Iterator<Item = (InstrumentId, f64)> + '_ {
        self.weights.iter().map(|(id, weight)| (*id, *weight))
    }

    pub fn is_activated(&self, insight: &Insight) -> bool {
        self.activated.contains(&insight.id())
    }

    pub fn is_expired(&self, insight: &Insight) -> bool {
        self.expired.contains(&insight.id())
    }

    /// Folds an active insight into its instrument's weight.
    ///
    /// Returns `None` when the insight was already applied.
    pub fn apply_activation(&mut self, insight: &Insight) -> Option<WeightChange> {
        if !self.activated.insert(insight.id()) {
            return None;
        }

        let instrument_id = insight.instrument_id();
        let current = self.weight(instrument_id);

        let target = match insight.direction() {
            InsightDirection::Flat => {
                if current.abs() < self.percent {
                    0.0
                } else if current > 0.0 {
                    current - self.percent
                } else {
                    current + self.percent
                }
            }
            direction => current + self.percent * direction.as_f64(),
        };

        debug!(
            "Activated {} insight {} on {}: {:.4} -> {:.4}",
            insight.direction(),
            insight.id(),
            instrument_id,
            current,
            target
        );
        self.weights.insert(instrument_id, target);
        Some(WeightChange::new(instrument_id, target))
    }

    /// Reverses the step an insight applied, now that it has expired.
    ///
    /// Returns `Ok(None)` when the expiry was already applied, and
    /// `AllocatorError::MissingWeight` when the instrument has no weight to
    /// reverse.
    pub fn apply_expiry(&mut self, insight: &Insight) -> Result<Option<WeightChange>> {
        if self.expired.contains(&insight.id()) {
            return Ok(None);
        }

        let instrument_id = insight.instrument_id();
        let current = *self
            .weights
            .get(&instrument_id)
            .ok_or(AllocatorError::MissingWeight {
                instrument_id,
                insight: insight.id(),
            })?;
        self.expired.insert(insight.id());

        let direction = insight.direction();
        let target = if current.abs() < self.percent && direction != InsightDirection::Flat {
            0.0
        } else {
            current - self.percent * direction.as_f64()
        };

        debug!(
            "Expired {} insight {} on {}: {:.4} -> {:.4}",
            direction,
            insight.id(),
            instrument_id,
            current,
            target
        );
        self.weights.insert(instrument_id, target);
        Ok(Some(WeightChange::new(instrument_id, target)))
    }

    /// Forces an instrument's weight to zero, bypassing the step rules.
    pub fn flatten(&mut self, instrument_id: InstrumentId) -> WeightChange {
        self.weights.insert(instrument_id, 0.0);
        WeightChange::flat(instrument_id)
    }
}
