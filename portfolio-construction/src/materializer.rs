use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use trading::{
    InstrumentId, PortfolioTarget, PriceUpdate, SizingError, TargetMaterializer, WeightChange,
};

/// Sizes weights against the last known price and total portfolio value:
/// `quantity = weight * portfolio_value / price`, truncated to the
/// instrument's lot size when one is registered.
#[derive(Debug, Clone, Default)]
pub struct PercentMaterializer {
    portfolio_value: f64,
    prices: HashMap<InstrumentId, (f64, DateTime<Utc>)>,
    lot_sizes: HashMap<InstrumentId, f64>,
}

impl PercentMaterializer {
    pub fn new(portfolio_value: f64) -> Self {
        Self {
            portfolio_value,
            prices: HashMap::new(),
            lot_sizes: HashMap::new(),
        }
    }

    /// Records the last price of an instrument. Updates older than the one
    /// already held are ignored.
    pub fn on_price(&mut self, update: &PriceUpdate) {
        let instrument_id = update.get_instrument_id();
        if let Some((_, seen)) = self.prices.get(&instrument_id) {
            if update.get_timestamp() < *seen {
                debug!(
                    "Ignoring stale price for {} at {}",
                    instrument_id,
                    update.get_timestamp()
                );
                return;
            }
        }
        self.prices
            .insert(instrument_id, (update.get_last(), update.get_timestamp()));
    }

    pub fn price(&self, instrument_id: InstrumentId) -> Option<f64> {
        self.prices.get(&instrument_id).map(|(price, _)| *price)
    }

    /// Registers the minimum tradable increment of an instrument.
    pub fn set_lot_size(&mut self, instrument_id: InstrumentId, lot_size: f64) {
        if lot_size > 0.0 {
            self.lot_sizes.insert(instrument_id, lot_size);
        }
    }

    fn round_to_lot(&self, instrument_id: InstrumentId, quantity: f64) -> f64 {
        match self.lot_sizes.get(&instrument_id) {
            // Truncate towards zero so a target never exceeds its weight.
            Some(lot) => (quantity / lot).trunc() * lot,
            None => quantity,
        }
    }
}

impl TargetMaterializer for PercentMaterializer {
    fn materialize(&self, change: &WeightChange) -> Result<PortfolioTarget, SizingError> {
        let instrument_id = change.instrument_id();
        if change.weight() == 0.0 {
            return Ok(PortfolioTarget::new(instrument_id, 0.0));
        }
        if !self.portfolio_value.is_finite() || self.portfolio_value < 0.0 {
            return Err(SizingError::InvalidPortfolioValue(self.portfolio_value));
        }

        let price = self
            .price(instrument_id)
            .ok_or(SizingError::MissingPrice(instrument_id))?;
        if price <= 0.0 {
            return Err(SizingError::NonPositivePrice {
                instrument_id,
                price,
            });
        }

        let raw = change.weight() * self.portfolio_value / price;
        let quantity = self.round_to_lot(instrument_id, raw);
        debug!(
            "Sized {} weight {:.4} at {:.4}: {:.6} units",
            instrument_id,
            change.weight(),
            price,
            quantity
        );
        Ok(PortfolioTarget::new(instrument_id, quantity))
    }
}
