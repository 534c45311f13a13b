//! Directional trading signals ("insights").
//!
//! An `Insight` states that an instrument is expected to move `Up`, `Down` or
//! stay `Flat` for a bounded period. Insights are immutable once created and
//! are identified by their `InsightId`, never by their contents: two insights
//! with identical fields are still two distinct signals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::model::instrument::InstrumentId;

/// Expected direction of an instrument over the insight period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightDirection {
    Up,
    Down,
    Flat,
}

impl InsightDirection {
    /// Signed unit multiplier: `+1`, `-1` or `0`.
    pub fn sign(&self) -> i8 {
        match self {
            InsightDirection::Up => 1,
            InsightDirection::Down => -1,
            InsightDirection::Flat => 0,
        }
    }

    /// The multiplier as a float, ready to scale a weight step.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.sign())
    }
}

impl fmt::Display for InsightDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InsightDirection::Up => "Up",
            InsightDirection::Down => "Down",
            InsightDirection::Flat => "Flat",
        };
        write!(f, "{}", s)
    }
}

/// Identity of a single insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InsightId(Uuid);

impl InsightId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InsightId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InsightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directional recommendation for one instrument, valid from its
/// generation time until (exclusive) its close time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    id: InsightId,
    instrument_id: InstrumentId,
    direction: InsightDirection,
    generated_time: DateTime<Utc>,
    close_time: DateTime<Utc>,
    #[serde(default)]
    source_model: Option<String>,
}

impl Insight {
    /// Creates a new insight that stays active for `period` after generation.
    ///
    /// # Arguments
    ///
    /// * `instrument_id` - The instrument the insight is about.
    /// * `direction` - The expected direction.
    /// * `generated_time` - When the insight was emitted.
    /// * `period` - How long the insight remains valid.
    pub fn new(
        instrument_id: InstrumentId,
        direction: InsightDirection,
        generated_time: DateTime<Utc>,
        period: Duration,
    ) -> Self {
        Self::with_close_time(
            instrument_id,
            direction,
            generated_time,
            generated_time + period,
        )
    }

    /// Creates a new insight with an explicit close time.
    pub fn with_close_time(
        instrument_id: InstrumentId,
        direction: InsightDirection,
        generated_time: DateTime<Utc>,
        close_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InsightId::new(),
            instrument_id,
            direction,
            generated_time,
            close_time,
            source_model: None,
        }
    }

    /// Tags the insight with the name of the model that produced it.
    pub fn with_source_model(mut self, name: impl Into<String>) -> Self {
        self.source_model = Some(name.into());
        self
    }

    pub fn id(&self) -> InsightId {
        self.id
    }

    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    pub fn direction(&self) -> InsightDirection {
        self.direction
    }

    pub fn generated_time(&self) -> DateTime<Utc> {
        self.generated_time
    }

    pub fn close_time(&self) -> DateTime<Utc> {
        self.close_time
    }

    pub fn source_model(&self) -> Option<&str> {
        self.source_model.as_deref()
    }

    /// An insight is active strictly before its close time.
    pub fn is_active(&self, utc_time: DateTime<Utc>) -> bool {
        self.close_time > utc_time
    }

    pub fn is_expired(&self, utc_time: DateTime<Utc>) -> bool {
        !self.is_active(utc_time)
    }
}
