//! Relative Strength Index.
//!
//! Up and down close moves are smoothed separately with the finite
//! horizon EMA (EMAU / EMAD), then
//! RSI = 100 * EMAU / (EMAU + EMAD + eps). The additive form keeps the
//! value inside [0, 100] even when one side is zero.

use crate::domain::indicator::{EPS, primitives};
use crate::domain::table::{CandleTable, Column};

pub(crate) fn compute(table: &mut CandleTable, window: usize) {
    primitives::ensure_delta_smoothing(table, window);
    let up = table.column(Column::Emau).unwrap();
    let down = table.column(Column::Emad).unwrap();
    let rs: Vec<f64> = up.iter().zip(down).map(|(u, d)| u / (d + EPS)).collect();
    let rsi: Vec<f64> = up
        .iter()
        .zip(down)
        .map(|(u, d)| 100.0 * u / (u + d + EPS))
        .collect();
    table.insert_column(Column::Rs, rs);
    table.insert_column(Column::Rsi, rsi);
}
