//! Commodity Channel Index.
//!
//! CCI = (TP - SMA) / (MAD + eps) / 0.015. The epsilon keeps a constant
//! price (zero deviation) from dividing by zero.

use crate::domain::indicator::{EPS, primitives};
use crate::domain::table::{CandleTable, Column};

pub(crate) fn compute(table: &mut CandleTable, window: usize) {
    primitives::ensure_mad(table, window);
    let tp = table.column(Column::Tp).unwrap();
    let sma = table.column(Column::Sma).unwrap();
    let mad = table.column(Column::Mad).unwrap();
    let cci: Vec<f64> = tp
        .iter()
        .zip(sma)
        .zip(mad)
        .map(|((t, s), m)| (t - s) / (m + EPS) / 0.015)
        .collect();
    table.insert_column(Column::Cci, cci);
}
