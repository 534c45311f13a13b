use chrono::{DateTime, Utc};

use crate::model::{insight::Insight, target::TargetBatch, universe::SecurityChanges};
use crate::traits::materializer::TargetMaterializer;

pub trait PortfolioConstructor: Send {
    /// Fatal error type aborting a construction pass.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called on every step of the driving loop with the insights emitted
    /// since the previous call.
    ///
    /// # Arguments
    ///
    /// * `utc_time` - The reference time of this pass.
    /// * `insights` - Newly emitted insights (possibly empty).
    /// * `materializer` - Sizes target weights into holdings.
    ///
    /// # Returns
    ///
    /// * `Result<TargetBatch, Self::Error>` - The targets produced by this pass and the instruments that failed sizing.
    fn create_targets(
        &mut self,
        utc_time: DateTime<Utc>,
        insights: Vec<Insight>,
        materializer: &dyn TargetMaterializer,
    ) -> Result<TargetBatch, Self::Error>;

    /// Called when instruments are added to or removed from the universe.
    ///
    /// Must be called before the next `create_targets` to take effect.
    fn on_securities_changed(&mut self, changes: &SecurityChanges);
}
