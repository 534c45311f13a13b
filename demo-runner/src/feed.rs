//! Synthetic market: random-walk prices and random insights.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use trading::model::market_data::PriceUpdate;
use trading::traits::data_feed::DataFeed;
use trading::{Insight, InsightDirection, InstrumentId};

/// A simple random walk data generator.
pub struct RandomFeed {
    instruments: Vec<InstrumentId>,
    prices: Vec<f64>,
}

impl RandomFeed {
    pub fn new(num_instruments: usize, start_price: f64) -> Self {
        let instruments: Vec<InstrumentId> = (1..=num_instruments).collect();
        let prices = vec![start_price; num_instruments];
        Self {
            instruments,
            prices,
        }
    }

    pub fn instruments(&self) -> &[InstrumentId] {
        &self.instruments
    }
}

impl DataFeed for RandomFeed {
    fn next_prices(&mut self, now: DateTime<Utc>) -> Option<Vec<PriceUpdate>> {
        let mut rng = rand::thread_rng();
        let mut updates = Vec::with_capacity(self.instruments.len());

        for (i, &instrument_id) in self.instruments.iter().enumerate() {
            // Random walk: +/- 1%
            let change_pct = rng.gen_range(-0.01..0.01);
            self.prices[i] = (self.prices[i] * (1.0 + change_pct)).max(0.01);

            updates.push(PriceUpdate::new(instrument_id, self.prices[i], now));
        }

        Some(updates)
    }
}

/// Emits random insights for a set of instruments.
pub struct RandomAlpha {
    rate: f64,
}

impl RandomAlpha {
    /// `rate` is clamped to `[0, 1]`; a NaN rate never emits.
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self { rate }
    }

    pub fn generate(&self, now: DateTime<Utc>, instruments: &[InstrumentId]) -> Vec<Insight> {
        let mut rng = rand::thread_rng();
        let mut insights = Vec::new();

        for &instrument_id in instruments {
            if !rng.gen_bool(self.rate) {
                continue;
            }
            let direction = match rng.gen_range(0..3) {
                0 => InsightDirection::Up,
                1 => InsightDirection::Down,
                _ => InsightDirection::Flat,
            };
            let period = Duration::minutes(rng.gen_range(5..30));
            insights.push(
                Insight::new(instrument_id, direction, now, period).with_source_model("random"),
            );
        }

        insights
    }
}
