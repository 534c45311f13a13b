//! Instrument identity.
//!
//! Instruments are referred to by a compact numeric id everywhere in the
//! allocation pipeline. Resolving an id to its static definition (ticker,
//! exchange, lot size) belongs to the universe provider, not to this crate.

/// Unique identifier of a tradable instrument.
pub type InstrumentId = usize;
