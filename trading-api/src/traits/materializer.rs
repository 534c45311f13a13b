use thiserror::Error;

use crate::model::{
    instrument::InstrumentId,
    target::{PortfolioTarget, WeightChange},
};

/// Reasons a weight could not be turned into a holding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("No price available for instrument {0}")]
    MissingPrice(InstrumentId),
    #[error("Price {price} for instrument {instrument_id} is not positive")]
    NonPositivePrice { instrument_id: InstrumentId, price: f64 },
    #[error("Portfolio value {0} cannot be allocated")]
    InvalidPortfolioValue(f64),
}

pub trait TargetMaterializer {
    /// Converts a target weight into an executable target sized in units.
    ///
    /// # Arguments
    ///
    /// * `change` - The instrument and its new target weight.
    ///
    /// # Returns
    ///
    /// * `Result<PortfolioTarget, SizingError>` - The sized target, or why it could not be sized.
    fn materialize(&self, change: &WeightChange) -> Result<PortfolioTarget, SizingError>;
}

impl<T: TargetMaterializer + ?Sized> TargetMaterializer for &T {
    fn materialize(&self, change: &WeightChange) -> Result<PortfolioTarget, SizingError> {
        (**self).materialize(change)
    }
}
