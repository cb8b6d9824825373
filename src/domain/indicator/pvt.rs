//! Price-Volume Trend over a trailing window.
//!
//! Each row contributes volume scaled by the fractional close change;
//! PVT is the trailing-window sum and PVTCA its cumulative average. The
//! first row has no previous close and contributes nothing.

use crate::domain::indicator::smoothing;
use crate::domain::table::{CandleTable, Column};

pub(crate) fn compute(table: &mut CandleTable, window: usize) {
    let n = table.len();
    let mut flow = vec![0.0; n];
    for i in 1..n {
        let prev = table.close(i - 1);
        if prev != 0.0 {
            flow[i] = table.candle(i).volume_base * (table.close(i) - prev) / prev;
        }
    }
    let pvt = smoothing::rolling_sum(&flow, window);
    let pvt_ca = smoothing::rolling_mean(&pvt, window);
    table.insert_column(Column::Pvt, pvt);
    table.insert_column(Column::PvtCa, pvt_ca);
}
