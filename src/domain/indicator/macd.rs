//! Moving Average Convergence Divergence.
//!
//! MACD = EMA(close, window) - EMA(close, 2 * window), then smoothed
//! again with EMA over 3 * window / 4 (integer division) as MACDEMA.

use crate::domain::indicator::smoothing;
use crate::domain::table::{CandleTable, Column};

pub(crate) fn compute(table: &mut CandleTable, window: usize) {
    let closes = table.map_candles(|c| c.close);
    let fast = smoothing::ema(&closes, window);
    let slow = smoothing::ema(&closes, window * 2);
    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = smoothing::ema(&macd, (window * 3 / 4).max(1));
    table.insert_column(Column::Macd, macd);
    table.insert_column(Column::MacdEma, signal);
}
