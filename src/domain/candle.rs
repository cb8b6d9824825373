//! OHLCV candle representation.

use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// (open + close) / 2
    pub middle: f64,
    /// Volume in the base asset (the traded coin).
    pub volume_base: f64,
    /// Volume in the quote asset.
    pub volume_quote: f64,
    pub open_time: NaiveDateTime,
    pub close_time: NaiveDateTime,
    /// Midpoint of open and close time.
    pub middle_time: NaiveDateTime,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume_base: f64,
        volume_quote: f64,
        open_time: NaiveDateTime,
        close_time: NaiveDateTime,
    ) -> Self {
        let middle = (open + close) / 2.0;
        let middle_time = open_time + (close_time - open_time) / 2;
        Self {
            open,
            high,
            low,
            close,
            middle,
            volume_base,
            volume_quote,
            open_time,
            close_time,
            middle_time,
        }
    }

    /// (low + close + high) / 3
    pub fn typical_price(&self) -> f64 {
        (self.low + self.close + self.high) / 3.0
    }
}
