//! Candle data access port trait.
//!
//! The retrieval side (paging, rate limits, retries) lives behind this
//! boundary; the domain only sees a time-ordered candle series.

use crate::domain::candle::Candle;
use crate::domain::error::CandlebotError;

pub trait DataPort {
    /// Fetch every stored candle for a symbol, strictly time-ordered.
    fn fetch_candles(&self, symbol: &str) -> Result<Vec<Candle>, CandlebotError>;

    fn list_symbols(&self) -> Result<Vec<String>, CandlebotError>;
}
