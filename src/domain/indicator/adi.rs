//! Accumulation/Distribution Index.
//!
//! Trailing-window sum of the Close Location Value, then EMA-smoothed
//! as ADIEMA (the pair the ADI crossover strategy compares).

use crate::domain::indicator::{primitives, smoothing};
use crate::domain::table::{CandleTable, Column};

pub(crate) fn compute(table: &mut CandleTable, window: usize) {
    primitives::ensure_clv(table);
    let adi = smoothing::rolling_sum(table.column(Column::Clv).unwrap(), window);
    let adi_ema = smoothing::ema(&adi, window);
    table.insert_column(Column::Adi, adi);
    table.insert_column(Column::AdiEma, adi_ema);
}
