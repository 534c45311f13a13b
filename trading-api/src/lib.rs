pub mod model;
pub mod traits;

pub use model::insight::{Insight, InsightDirection, InsightId};
pub use model::instrument::InstrumentId;
pub use model::market_data::PriceUpdate;
pub use model::target::{PortfolioTarget, TargetBatch, WeightChange};
pub use model::universe::SecurityChanges;
pub use traits::constructor::PortfolioConstructor;
pub use traits::data_feed::DataFeed;
pub use traits::ledger::SignalLedger;
pub use traits::materializer::{SizingError, TargetMaterializer};
