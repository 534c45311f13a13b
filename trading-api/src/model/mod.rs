pub mod insight;
pub mod instrument;
pub mod market_data;
pub mod target;
pub mod universe;
