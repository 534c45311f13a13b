//! Universe membership changes, as reported by the universe provider.

use serde::{Deserialize, Serialize};

use crate::model::instrument::InstrumentId;

/// Instruments removed from the tracked universe since the previous
/// notification. Additions need no handling: an added instrument only gains
/// weight once an insight for it arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityChanges {
    #[serde(default)]
    removed: Vec<InstrumentId>,
}

impl SecurityChanges {
    pub fn removed(instruments: Vec<InstrumentId>) -> Self {
        Self {
            removed: instruments,
        }
    }

    pub fn removed_instruments(&self) -> &[InstrumentId] {
        &self.removed
    }
}
