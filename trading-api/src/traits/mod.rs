pub mod constructor;
pub mod data_feed;
pub mod ledger;
pub mod materializer;
