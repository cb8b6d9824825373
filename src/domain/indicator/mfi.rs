//! Money Flow Index.
//!
//! Maps the Money Ratio (positive over negative typical-price-weighted
//! volume) onto [0, 100): MFI = 100 - 100 / (1 + MR).

use crate::domain::indicator::primitives;
use crate::domain::table::{CandleTable, Column};

pub(crate) fn compute(table: &mut CandleTable, window: usize) {
    primitives::ensure_money_ratio(table, window);
    let mfi: Vec<f64> = table
        .column(Column::Mr)
        .unwrap()
        .iter()
        .map(|mr| 100.0 - 100.0 / (1.0 + mr))
        .collect();
    table.insert_column(Column::Mfi, mfi);
}
