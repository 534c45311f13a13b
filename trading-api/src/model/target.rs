//! Output of portfolio construction.
//!
//! A `WeightChange` is the raw result of an allocation pass: the new target
//! weight of one instrument as a signed fraction of portfolio value. A
//! `PortfolioTarget` is the same intent sized in actual holdings, ready for an
//! execution model.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::instrument::InstrumentId;

/// New target weight for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightChange {
    instrument_id: InstrumentId,
    weight: f64,
}

impl WeightChange {
    pub fn new(instrument_id: InstrumentId, weight: f64) -> Self {
        Self {
            instrument_id,
            weight,
        }
    }

    /// A change that closes out the instrument entirely.
    pub fn flat(instrument_id: InstrumentId) -> Self {
        Self::new(instrument_id, 0.0)
    }

    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Desired holdings of one instrument, in units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTarget {
    instrument_id: InstrumentId,
    quantity: f64,
}

impl PortfolioTarget {
    pub fn new(instrument_id: InstrumentId, quantity: f64) -> Self {
        Self {
            instrument_id,
            quantity,
        }
    }

    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }
}

/// Targets produced by one construction pass, together with the instruments
/// whose weight could not be sized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetBatch {
    targets: Vec<PortfolioTarget>,
    failed: HashSet<InstrumentId>,
}

impl TargetBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: PortfolioTarget) {
        self.targets.push(target);
    }

    pub fn mark_failed(&mut self, instrument_id: InstrumentId) {
        self.failed.insert(instrument_id);
    }

    pub fn targets(&self) -> &[PortfolioTarget] {
        &self.targets
    }

    pub fn failed(&self) -> &HashSet<InstrumentId> {
        &self.failed
    }

    pub fn is_failed(&self, instrument_id: InstrumentId) -> bool {
        self.failed.contains(&instrument_id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.failed.is_empty()
    }
}
